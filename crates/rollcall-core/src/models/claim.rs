//! Claim domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A student's assertion of presence. Transient — never persisted on
/// its own; verification turns it into at most one
/// [`AttendanceRecord`](crate::models::attendance::AttendanceRecord).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    pub session_id: Uuid,
    pub student_id: String,
    pub device_id: String,
    pub submitted_code: String,
    /// Proximity confidence in `[0, 1]` supplied by the external
    /// attestor. Untrusted; the verifier clamps it before use.
    pub proximity_confidence: f64,
    pub submitted_at: DateTime<Utc>,
}
