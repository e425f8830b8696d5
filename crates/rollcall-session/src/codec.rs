//! Wire codec for the broadcast payload and submitted claims.
//!
//! Payloads are `base64url(JSON)` — small enough for a BLE
//! characteristic, structured enough to reject garbage outright.
//! Decoding is all-or-nothing: any structural problem is
//! `MalformedPayload` and nothing is partially parsed.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rollcall_core::error::{RollcallError, RollcallResult};

use crate::code::CODE_LEN;

/// What the teacher device broadcasts to nearby students.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BroadcastPayload {
    pub session_id: Uuid,
    pub beacon_id: String,
    pub code: String,
    pub code_expires_at: DateTime<Utc>,
}

/// What a student device submits back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClaimPayload {
    pub session_id: Uuid,
    pub student_id: String,
    pub device_id: String,
    pub submitted_code: String,
}

pub fn encode_broadcast(payload: &BroadcastPayload) -> RollcallResult<String> {
    let json = serde_json::to_vec(payload)
        .map_err(|e| RollcallError::Internal(format!("broadcast encode: {e}")))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

pub fn decode_broadcast(raw: &str) -> RollcallResult<BroadcastPayload> {
    let bytes = URL_SAFE_NO_PAD
        .decode(raw)
        .map_err(|e| RollcallError::MalformedPayload(format!("base64: {e}")))?;
    serde_json::from_slice(&bytes).map_err(|e| RollcallError::MalformedPayload(format!("json: {e}")))
}

pub fn encode_claim(payload: &ClaimPayload) -> RollcallResult<String> {
    let json = serde_json::to_vec(payload)
        .map_err(|e| RollcallError::Internal(format!("claim encode: {e}")))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Decode a submitted claim payload.
///
/// Beyond JSON shape, the submitted code must be exactly [`CODE_LEN`]
/// ASCII digits — anything else is structural garbage, not a
/// near-miss worth running through verification.
pub fn decode_claim(raw: &str) -> RollcallResult<ClaimPayload> {
    let bytes = URL_SAFE_NO_PAD
        .decode(raw)
        .map_err(|e| RollcallError::MalformedPayload(format!("base64: {e}")))?;
    let payload: ClaimPayload = serde_json::from_slice(&bytes)
        .map_err(|e| RollcallError::MalformedPayload(format!("json: {e}")))?;

    if payload.submitted_code.len() != CODE_LEN
        || !payload.submitted_code.chars().all(|c| c.is_ascii_digit())
    {
        return Err(RollcallError::MalformedPayload(format!(
            "code must be {CODE_LEN} digits"
        )));
    }

    Ok(payload)
}
