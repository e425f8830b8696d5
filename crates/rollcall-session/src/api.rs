//! Transport-agnostic request/response contract.
//!
//! The surrounding HTTP/UI layer is a thin adapter over these calls.
//! Status mapping: `InvalidDuration` maps to 400, `SessionNotFound`
//! rejections to 404, every other rejection to 403; closure is
//! idempotent and always succeeds.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rollcall_core::clock::Clock;
use rollcall_core::error::{RollcallError, RollcallResult};
use rollcall_core::models::attendance::AttendanceRecord;
use rollcall_core::models::claim::Claim;
use rollcall_core::models::reason::RejectReason;
use rollcall_core::models::session::SessionState;
use rollcall_core::proximity::ProximityAttestor;
use rollcall_core::store::SessionStore;

use crate::codec::{self, BroadcastPayload};
use crate::config::SessionConfig;
use crate::lifecycle::SessionLifecycle;
use crate::verifier::{ClaimVerifier, Verdict};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenSessionResponse {
    pub session_id: Uuid,
    pub current_code: String,
    pub beacon_id: String,
    pub valid_until: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitClaimRequest {
    pub session_id: Uuid,
    pub student_id: String,
    pub device_id: String,
    pub submitted_code: String,
    pub proximity_confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitClaimResponse {
    pub accepted: bool,
    /// Stable machine-readable reason code, present on rejection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloseSessionResponse {
    pub closed: bool,
}

/// Transport status code for a rejection reason.
pub fn status_for(reason: RejectReason) -> u16 {
    match reason {
        RejectReason::SessionNotFound => 404,
        _ => 403,
    }
}

/// Facade tying lifecycle and verification together behind the
/// abstract contract. Holds no state of its own — everything lives in
/// the store instance.
pub struct AttendanceApi<S, C> {
    store: S,
    lifecycle: SessionLifecycle<S, C>,
    verifier: ClaimVerifier<S>,
    clock: C,
}

impl<S, C> AttendanceApi<S, C>
where
    S: SessionStore + Clone,
    C: Clock + Clone,
{
    pub fn new(store: S, clock: C, config: SessionConfig) -> Self {
        Self {
            lifecycle: SessionLifecycle::new(store.clone(), clock.clone(), config.clone()),
            verifier: ClaimVerifier::new(store.clone(), config),
            store,
            clock,
        }
    }

    /// `OpenSession(ownerId, durationSeconds)`.
    pub async fn open_session(
        &self,
        owner_id: &str,
        duration_secs: i64,
    ) -> RollcallResult<OpenSessionResponse> {
        let session = self
            .lifecycle
            .open_session(owner_id, Duration::seconds(duration_secs))
            .await?;
        Ok(OpenSessionResponse {
            session_id: session.id,
            current_code: session.current_code,
            beacon_id: session.beacon_id,
            valid_until: session.valid_until,
        })
    }

    /// Render the current broadcast payload for an active session.
    pub async fn broadcast(&self, session_id: Uuid) -> RollcallResult<String> {
        let session = self.store.get_session(session_id).await?;
        if session.state != SessionState::Active {
            return Err(RollcallError::SessionNotActive);
        }
        codec::encode_broadcast(&BroadcastPayload {
            session_id: session.id,
            beacon_id: session.beacon_id,
            code: session.current_code,
            code_expires_at: session.code_expires_at,
        })
    }

    /// `SubmitClaim(...)` with the proximity confidence already
    /// measured by the adapter.
    pub async fn submit_claim(
        &self,
        request: SubmitClaimRequest,
    ) -> RollcallResult<SubmitClaimResponse> {
        let now = self.clock.now();
        let claim = Claim {
            session_id: request.session_id,
            student_id: request.student_id,
            device_id: request.device_id,
            submitted_code: request.submitted_code,
            proximity_confidence: request.proximity_confidence,
            submitted_at: now,
        };

        match self.verifier.verify(&claim, now).await? {
            Verdict::Accepted(_) => Ok(SubmitClaimResponse {
                accepted: true,
                reason: None,
                message: None,
            }),
            Verdict::Rejected(reason) => Ok(SubmitClaimResponse {
                accepted: false,
                reason: Some(reason.code().to_string()),
                message: Some(reason.message().to_string()),
            }),
        }
    }

    /// Submit a wire-encoded claim payload, measuring proximity for
    /// the submitting device through the attestor.
    pub async fn submit_claim_payload<P: ProximityAttestor>(
        &self,
        raw: &str,
        attestor: &P,
    ) -> RollcallResult<SubmitClaimResponse> {
        let payload = codec::decode_claim(raw)?;
        let confidence = attestor.measure_proximity(&payload.device_id).await;
        self.submit_claim(SubmitClaimRequest {
            session_id: payload.session_id,
            student_id: payload.student_id,
            device_id: payload.device_id,
            submitted_code: payload.submitted_code,
            proximity_confidence: confidence,
        })
        .await
    }

    /// `CloseSession(sessionId)`. Idempotent.
    pub async fn close_session(&self, session_id: Uuid) -> RollcallResult<CloseSessionResponse> {
        self.lifecycle.close_session(session_id).await?;
        Ok(CloseSessionResponse { closed: true })
    }

    /// Rotate the session's verification code; returns the new code.
    pub async fn rotate_code(&self, session_id: Uuid) -> RollcallResult<String> {
        self.lifecycle.rotate_code(session_id).await
    }

    /// Accepted records for the teacher dashboard, insertion order.
    pub async fn list_attendance(
        &self,
        session_id: Uuid,
    ) -> RollcallResult<Vec<AttendanceRecord>> {
        self.store.list_attendance(session_id).await
    }

    /// Device ids shared across students in this session.
    pub async fn device_reuse(&self, session_id: Uuid) -> RollcallResult<Vec<String>> {
        self.verifier.device_reuse(session_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(status_for(RejectReason::SessionNotFound), 404);
    }

    #[test]
    fn other_rejections_map_to_403() {
        for reason in [
            RejectReason::SessionClosed,
            RejectReason::CodeExpired,
            RejectReason::CodeMismatch,
            RejectReason::DuplicateClaim,
            RejectReason::ProximityCheckFailed,
        ] {
            assert_eq!(status_for(reason), 403);
        }
    }
}
