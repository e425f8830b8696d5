//! Attendance record — the durable outcome of a verified claim.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One accepted claim. At most one record ever exists per
/// `(session_id, student_id)` pair — first accepted wins. Created only
/// by the verifier and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub session_id: Uuid,
    pub student_id: String,
    pub device_id: String,
    pub accepted_at: DateTime<Utc>,
}
