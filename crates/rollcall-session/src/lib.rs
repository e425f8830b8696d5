//! Rollcall Session — session lifecycle, verification-code generation,
//! broadcast/claim codec, and the claim verification pipeline.

pub mod api;
pub mod code;
pub mod codec;
pub mod config;
pub mod lifecycle;
pub mod verifier;

pub use api::{AttendanceApi, SubmitClaimRequest, SubmitClaimResponse};
pub use config::SessionConfig;
pub use lifecycle::SessionLifecycle;
pub use verifier::{ClaimVerifier, Verdict};
