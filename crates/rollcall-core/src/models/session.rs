//! Attendance session domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session state machine: `Pending --open--> Active --close--> Closed`.
/// `Closed` is terminal; nothing re-enters `Active`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SessionState {
    Pending,
    Active,
    Closed,
}

/// A bounded time window during which one teacher accepts attendance
/// claims from students.
///
/// Owned exclusively by the store. The lifecycle is the only writer of
/// `state` and `current_code`; the verifier reads whole-session
/// snapshots and never mutates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    /// Identity of the creating teacher. Opaque to the core.
    pub owner_id: String,
    /// Short identifier the proximity transport broadcasts alongside
    /// the code.
    pub beacon_id: String,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub state: SessionState,
    /// The active verification code (6 digits).
    pub current_code: String,
    pub code_issued_at: DateTime<Utc>,
    pub code_expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }
}
