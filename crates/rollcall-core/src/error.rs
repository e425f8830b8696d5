//! Error types for the Rollcall system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RollcallError {
    #[error("Invalid session duration: must be positive")]
    InvalidDuration,

    #[error("Session is not active")]
    SessionNotActive,

    #[error("Session not found: {id}")]
    SessionNotFound { id: String },

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// The one caller-retryable condition: the store did not answer
    /// within its latency bound. All other errors are terminal for the
    /// claim that triggered them.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type RollcallResult<T> = Result<T, RollcallError>;
