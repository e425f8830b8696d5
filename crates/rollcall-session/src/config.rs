//! Session and verification configuration.

/// Configuration for session lifecycle and claim verification.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Verification-code lifetime in seconds (default: 30).
    pub code_ttl_secs: u64,
    /// Minimum clamped proximity confidence required to accept a claim
    /// (default: 0.5).
    pub proximity_threshold: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            code_ttl_secs: 30,
            proximity_threshold: 0.5,
        }
    }
}
