// ## 📂 File: `src/crypto/types.rs`

use std::fmt;

use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// AES-128-GCM key length.
pub const KEY_LEN_16: usize = 16;

/// AES-256-GCM key length.
pub const KEY_LEN_32: usize = 32;

/// Standard 12-byte nonce length for AES-GCM.
pub const NONCE_LEN_12: usize = 12;

/// Fixed AEAD tag length (bytes).
pub const TAG_LEN: usize = 16;

/// Uncompressed P-256 point without the SEC1 `0x04` tag: X ‖ Y.
pub const EC_POINT_XY_LEN: usize = 64;

/// Symmetric session key derived once per session.
///
/// Wiped on drop; `Debug` never prints the key material.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SessionKey(Vec<u8>);

impl SessionKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        match bytes.len() {
            KEY_LEN_16 | KEY_LEN_32 => Ok(Self(bytes.to_vec())),
            actual => Err(CryptoError::InvalidKeyLen { expected: KEY_LEN_16, actual }),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lower-case hex, as transmitted inside the request framing.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionKey({} bytes, redacted)", self.0.len())
    }
}

#[derive(Debug, Error)]
pub enum CryptoError {
    /// Invalid key length provided to cipher.
    #[error("invalid key length: expected={expected}, actual={actual}")]
    InvalidKeyLen { expected: usize, actual: usize },

    /// Nonce length mismatch (must be 12 bytes).
    #[error("invalid nonce length: expected={expected}, actual={actual}")]
    InvalidNonceLen { expected: usize, actual: usize },

    /// AEAD tag mismatch (authentication failure).
    #[error("AEAD tag mismatch")]
    TagMismatch,

    /// Cipher used before key agreement.
    #[error("session key not established")]
    NotEstablished,

    /// Nonce counter would wrap under the current key.
    #[error("nonce space exhausted for this session key")]
    NonceExhausted,

    /// Peer key is not a point on the curve mandated by the protocol version.
    #[error("invalid peer public key: {0}")]
    InvalidPublicKey(String),

    /// Certificate bytes could not be parsed.
    #[error("invalid certificate: {0}")]
    InvalidCertificate(String),

    /// General derivation or runtime error with context.
    #[error("crypto failure: {0}")]
    Failure(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_key_rejects_odd_lengths() {
        assert!(SessionKey::from_bytes(&[0u8; 16]).is_ok());
        assert!(SessionKey::from_bytes(&[0u8; 32]).is_ok());
        let err = SessionKey::from_bytes(&[0u8; 15]).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidKeyLen { actual: 15, .. }));
    }

    #[test]
    fn session_key_debug_is_redacted() {
        let key = SessionKey::from_bytes(&[0xAB; 16]).unwrap();
        let shown = format!("{key:?}");
        assert!(!shown.contains("ab"));
        assert!(shown.contains("16 bytes"));
        assert_eq!(key.to_hex(), "ab".repeat(16));
    }
}
