//! Claim verification pipeline.
//!
//! Checks run in a fixed order so rejection reasons are deterministic
//! and debuggable; the first failing check wins. The attendance insert
//! is the linearization point for duplicate prevention.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use rollcall_core::error::{RollcallError, RollcallResult};
use rollcall_core::models::attendance::AttendanceRecord;
use rollcall_core::models::claim::Claim;
use rollcall_core::models::reason::RejectReason;
use rollcall_core::models::session::SessionState;
use rollcall_core::proximity::clamp_confidence;
use rollcall_core::store::SessionStore;

use crate::code;
use crate::config::SessionConfig;

/// Outcome of verifying a single claim.
#[derive(Debug, Clone)]
pub enum Verdict {
    /// Exactly one attendance record was created.
    Accepted(AttendanceRecord),
    Rejected(RejectReason),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// Validates incoming claims against the active session. Read-only
/// against `Session`; its only write is the conditional attendance
/// insert.
pub struct ClaimVerifier<S> {
    store: S,
    config: SessionConfig,
}

impl<S: SessionStore> ClaimVerifier<S> {
    pub fn new(store: S, config: SessionConfig) -> Self {
        Self { store, config }
    }

    /// Verify a claim against the session state as of `now`.
    ///
    /// Store faults surface as errors (`StoreUnavailable` is the one
    /// the caller should retry); every verification outcome is a
    /// value. Cancellation before the final insert leaves no trace;
    /// once the insert is acknowledged the record is durable.
    pub async fn verify(&self, claim: &Claim, now: DateTime<Utc>) -> RollcallResult<Verdict> {
        // 1. Session exists.
        let session = match self.store.get_session(claim.session_id).await {
            Ok(s) => s,
            Err(RollcallError::SessionNotFound { .. }) => {
                return Ok(Verdict::Rejected(RejectReason::SessionNotFound));
            }
            Err(e) => return Err(e),
        };

        // 2. Session still accepts claims.
        if session.state != SessionState::Active {
            return Ok(Verdict::Rejected(RejectReason::SessionClosed));
        }

        // 3. Code still valid. Expiry wins over a matching code.
        if now > session.code_expires_at {
            return Ok(Verdict::Rejected(RejectReason::CodeExpired));
        }

        // 4. Code matches (constant-time).
        if !code::codes_match(&claim.submitted_code, &session.current_code) {
            return Ok(Verdict::Rejected(RejectReason::CodeMismatch));
        }

        // 5. Not already recorded. Advisory read — keeps the rejection
        //    reason deterministic; the conditional insert below remains
        //    the authority under races.
        let already = self
            .store
            .list_attendance(claim.session_id)
            .await?
            .iter()
            .any(|r| r.student_id == claim.student_id);
        if already {
            return Ok(Verdict::Rejected(RejectReason::DuplicateClaim));
        }

        // 6. Proximity threshold on the clamped, untrusted confidence.
        if clamp_confidence(claim.proximity_confidence) < self.config.proximity_threshold {
            return Ok(Verdict::Rejected(RejectReason::ProximityCheckFailed));
        }

        let record = AttendanceRecord {
            session_id: claim.session_id,
            student_id: claim.student_id.clone(),
            device_id: claim.device_id.clone(),
            accepted_at: now,
        };

        // Single atomic insert: two racing claims for the same
        // (session, student) cannot both observe `true`.
        if self.store.try_insert_attendance(record.clone()).await? {
            debug!(
                session_id = %claim.session_id,
                student_id = %claim.student_id,
                "Claim accepted"
            );
            Ok(Verdict::Accepted(record))
        } else {
            Ok(Verdict::Rejected(RejectReason::DuplicateClaim))
        }
    }

    /// Device-consistency report: device ids that appear on accepted
    /// records for more than one student in the session. Reporting
    /// only — reuse is a signal for the teacher, not a rejection.
    pub async fn device_reuse(&self, session_id: Uuid) -> RollcallResult<Vec<String>> {
        let records = self.store.list_attendance(session_id).await?;

        let mut students_by_device: HashMap<&str, HashSet<&str>> = HashMap::new();
        for record in &records {
            students_by_device
                .entry(record.device_id.as_str())
                .or_default()
                .insert(record.student_id.as_str());
        }

        let mut flagged: Vec<String> = students_by_device
            .into_iter()
            .filter(|(_, students)| students.len() > 1)
            .map(|(device, _)| device.to_string())
            .collect();
        flagged.sort();
        Ok(flagged)
    }
}
