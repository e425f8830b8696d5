//! Verification-code and beacon-id generation, and constant-time code
//! comparison.

use rand::Rng;
use subtle::ConstantTimeEq;

/// Number of digits in a verification code.
pub const CODE_LEN: usize = 6;

const BEACON_LEN: usize = 6;
const BEACON_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a fresh 6-digit verification code, guaranteed distinct
/// from `previous` so a rotation is always observable.
///
/// `rand::rng()` reseeds from the OS; guess probability stays
/// negligible within a code's 30-second validity window.
pub fn generate_code(previous: Option<&str>) -> String {
    let mut rng = rand::rng();
    loop {
        let n: u32 = rng.random_range(0..1_000_000);
        let code = format!("{n:06}");
        if previous != Some(code.as_str()) {
            return code;
        }
    }
}

/// Generate a short identifier for the proximity broadcast.
pub fn generate_beacon_id() -> String {
    let mut rng = rand::rng();
    (0..BEACON_LEN)
        .map(|_| BEACON_ALPHABET[rng.random_range(0..BEACON_ALPHABET.len())] as char)
        .collect()
}

/// Constant-time comparison of a submitted code against the current
/// one. Length is checked first; equal-length inputs compare in
/// constant time.
pub fn codes_match(submitted: &str, current: &str) -> bool {
    submitted.len() == current.len()
        && bool::from(submitted.as_bytes().ct_eq(current.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_is_six_ascii_digits() {
        for _ in 0..100 {
            let code = generate_code(None);
            assert_eq!(code.len(), CODE_LEN);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn code_never_repeats_previous() {
        let mut previous = generate_code(None);
        for _ in 0..1_000 {
            let next = generate_code(Some(&previous));
            assert_ne!(next, previous);
            previous = next;
        }
    }

    #[test]
    fn beacon_id_shape() {
        let id = generate_beacon_id();
        assert_eq!(id.len(), BEACON_LEN);
        assert!(
            id.chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn codes_match_equal() {
        assert!(codes_match("123456", "123456"));
    }

    #[test]
    fn codes_match_rejects_mismatch_and_length() {
        assert!(!codes_match("123456", "123457"));
        assert!(!codes_match("12345", "123456"));
        assert!(!codes_match("", "123456"));
    }
}
