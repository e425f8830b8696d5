//! Rejection reason taxonomy for claim verification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a claim was rejected.
///
/// The set is closed so transport adapters can map every reason to a
/// status code. Each variant carries a stable machine-readable code
/// and a human-readable message; no claim is ever silently dropped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RejectReason {
    SessionNotFound,
    SessionClosed,
    CodeExpired,
    CodeMismatch,
    DuplicateClaim,
    ProximityCheckFailed,
}

impl RejectReason {
    /// Stable machine-readable code, safe to match on across versions.
    pub fn code(&self) -> &'static str {
        match self {
            Self::SessionNotFound => "SESSION_NOT_FOUND",
            Self::SessionClosed => "SESSION_CLOSED",
            Self::CodeExpired => "CODE_EXPIRED",
            Self::CodeMismatch => "CODE_MISMATCH",
            Self::DuplicateClaim => "DUPLICATE_CLAIM",
            Self::ProximityCheckFailed => "PROXIMITY_CHECK_FAILED",
        }
    }

    /// Human-readable message for the student/teacher UI.
    pub fn message(&self) -> &'static str {
        match self {
            Self::SessionNotFound => "session does not exist",
            Self::SessionClosed => "session is no longer accepting claims",
            Self::CodeExpired => "the submitted code has expired",
            Self::CodeMismatch => "the submitted code does not match",
            Self::DuplicateClaim => "attendance already recorded for this student",
            Self::ProximityCheckFailed => "device does not appear to be near the session",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_unique() {
        let all = [
            RejectReason::SessionNotFound,
            RejectReason::SessionClosed,
            RejectReason::CodeExpired,
            RejectReason::CodeMismatch,
            RejectReason::DuplicateClaim,
            RejectReason::ProximityCheckFailed,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.code(), b.code());
            }
        }
    }
}
