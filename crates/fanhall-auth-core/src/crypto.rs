//! Cryptographic utilities for secure operations
//!
//! This module provides security-critical primitives that must be
//! implemented correctly to prevent timing attacks and other
//! side-channel vulnerabilities.

use hmac::{Hmac, Mac};
use sha1::Sha1;
use std::sync::Arc;

/// Length of an origin fingerprint in bytes
pub const FINGERPRINT_LEN: usize = 4;

/// Pre-computed HMAC key for efficient repeated signing operations.
///
/// Creating an HMAC instance from raw bytes has overhead. This struct
/// pre-validates the key and allows efficient cloning for signing.
#[derive(Clone)]
pub struct HmacKey {
    key_bytes: Arc<[u8]>,
}

impl HmacKey {
    /// Minimum allowed key length in bytes
    pub const MIN_KEY_LENGTH: usize = 32;

    /// Create a new HMAC key from bytes.
    ///
    /// # Errors
    /// Returns error if key is too short (less than 32 bytes).
    pub fn new(key: impl AsRef<[u8]>) -> Result<Self, HmacKeyError> {
        let key_bytes = key.as_ref();
        if key_bytes.len() < Self::MIN_KEY_LENGTH {
            return Err(HmacKeyError::KeyTooShort {
                actual: key_bytes.len(),
                minimum: Self::MIN_KEY_LENGTH,
            });
        }
        Ok(Self {
            key_bytes: Arc::from(key_bytes),
        })
    }

    /// Sign data and return the MAC bytes
    pub fn sign(&self, data: &[u8]) -> [u8; 20] {
        // Cannot fail: HMAC accepts any key length and ours was validated
        let mut mac = Hmac::<Sha1>::new_from_slice(&self.key_bytes)
            .expect("HMAC key length already validated");
        mac.update(data);
        mac.finalize().into_bytes().into()
    }

    /// Verify a signature in constant time
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> bool {
        let expected = self.sign(data);
        constant_time_eq(&expected, signature)
    }
}

impl std::fmt::Debug for HmacKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacKey")
            .field("key_length", &self.key_bytes.len())
            .finish_non_exhaustive()
    }
}

/// Errors that can occur when creating an HMAC key
#[derive(Debug, Clone, thiserror::Error)]
pub enum HmacKeyError {
    #[error("HMAC key too short: got {actual} bytes, need at least {minimum}")]
    KeyTooShort { actual: usize, minimum: usize },
}

/// Constant-time byte slice comparison.
///
/// The comparison time depends only on the length of the slices, not on
/// their contents.
///
/// # Security
/// - Returns `false` immediately if lengths differ (length is not secret)
/// - Compares all bytes even after finding a difference
/// - Uses XOR accumulator to prevent branch prediction attacks
#[inline]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let result = a
        .iter()
        .zip(b.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y));

    result == 0
}

/// Fingerprint of a client's network origin.
///
/// A keyed hash truncated to four bytes; bound into access tokens so a
/// stolen token cannot be replayed from a different network path. The
/// key must be distinct from the token-signing keys.
pub fn origin_fingerprint(key: &HmacKey, origin: &str) -> [u8; FINGERPRINT_LEN] {
    let digest = key.sign(origin.as_bytes());
    let mut fp = [0u8; FINGERPRINT_LEN];
    fp.copy_from_slice(&digest[..FINGERPRINT_LEN]);
    fp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_eq_equal() {
        assert!(constant_time_eq(b"hello world", b"hello world"));
    }

    #[test]
    fn test_constant_time_eq_different() {
        assert!(!constant_time_eq(b"hello world", b"hello worle"));
    }

    #[test]
    fn test_constant_time_eq_different_lengths() {
        assert!(!constant_time_eq(b"hello", b"hello world"));
    }

    #[test]
    fn test_constant_time_eq_empty() {
        assert!(constant_time_eq(b"", b""));
    }

    #[test]
    fn test_hmac_key_too_short() {
        let result = HmacKey::new("short");
        assert!(matches!(result, Err(HmacKeyError::KeyTooShort { .. })));
    }

    #[test]
    fn test_hmac_key_valid() {
        assert!(HmacKey::new("a".repeat(32)).is_ok());
        assert!(HmacKey::new("a".repeat(64)).is_ok());
    }

    #[test]
    fn test_hmac_sign_verify() {
        let key = HmacKey::new("a".repeat(32)).unwrap();
        let data = b"test data to sign";
        let signature = key.sign(data);
        assert!(key.verify(data, &signature));
        assert!(!key.verify(b"wrong data", &signature));
    }

    #[test]
    fn test_sign_is_deterministic() {
        let key = HmacKey::new("b".repeat(32)).unwrap();
        assert_eq!(key.sign(b"data"), key.sign(b"data"));
        assert_ne!(key.sign(b"data"), key.sign(b"datb"));
    }

    #[test]
    fn test_fingerprint_varies_by_origin() {
        let key = HmacKey::new("c".repeat(32)).unwrap();
        let a = origin_fingerprint(&key, "10.0.0.1");
        let b = origin_fingerprint(&key, "10.0.0.2");
        assert_eq!(a, origin_fingerprint(&key, "10.0.0.1"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_fingerprint_varies_by_key() {
        let k1 = HmacKey::new("d".repeat(32)).unwrap();
        let k2 = HmacKey::new("e".repeat(32)).unwrap();
        assert_ne!(
            origin_fingerprint(&k1, "10.0.0.1"),
            origin_fingerprint(&k2, "10.0.0.1")
        );
    }
}
