//! Proximity attestation boundary.
//!
//! The core never measures proximity itself. Whatever the deployment
//! provides — BLE RSSI, an ultrasonic chirp, a fingerprint reader — is
//! behind this trait, and the core only consumes a scalar confidence
//! treated as untrusted input.

pub trait ProximityAttestor: Send + Sync {
    /// Confidence in `[0, 1]` that the device is physically near the
    /// session owner's device.
    fn measure_proximity(&self, device_id: &str) -> impl Future<Output = f64> + Send;
}

/// Clamp an untrusted confidence into `[0, 1]`. NaN clamps to 0.
pub fn clamp_confidence(raw: f64) -> f64 {
    if raw.is_nan() { 0.0 } else { raw.clamp(0.0, 1.0) }
}
