// ## src/crypto/kdf.rs

//! crypto/kdf.rs
//! HKDF-based session key derivation from an ECDH shared secret.
//!
//! Design:
//! - HKDF-Extract(salt = none, IKM = shared secret x-coordinate) -> PRK
//! - HKDF-Expand(PRK, info = "ecies-vau-transport") -> AES key
//!
//! Never use the raw shared secret directly as AEAD key; always derive.

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::constants::HKDF_INFO_VAU_TRANSPORT;
use crate::crypto::types::{CryptoError, SessionKey, KEY_LEN_16, KEY_LEN_32};

/// Derive a `key_len`-byte session key from the shared secret.
///
/// Errors:
/// - `InvalidKeyLen` for anything but 16 or 32 bytes.
/// - `Failure` for an all-zero shared secret.
pub fn derive_session_key(shared_secret: &[u8], key_len: usize) -> Result<SessionKey, CryptoError> {
    if key_len != KEY_LEN_16 && key_len != KEY_LEN_32 {
        return Err(CryptoError::InvalidKeyLen { expected: KEY_LEN_16, actual: key_len });
    }
    if shared_secret.iter().all(|&b| b == 0) {
        return Err(CryptoError::Failure("shared secret must not be all-zero".into()));
    }

    let hk = Hkdf::<Sha256>::new(None, shared_secret);
    let mut okm = Zeroizing::new([0u8; KEY_LEN_32]);
    hk.expand(HKDF_INFO_VAU_TRANSPORT, &mut okm[..key_len])
        .map_err(|_| CryptoError::Failure("HKDF expand failed (SHA-256)".into()))?;

    SessionKey::from_bytes(&okm[..key_len])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_requested_length_deterministically() {
        let secret = [0x5au8; 32];
        let a = derive_session_key(&secret, KEY_LEN_16).unwrap();
        let b = derive_session_key(&secret, KEY_LEN_16).unwrap();
        assert_eq!(a.as_bytes().len(), KEY_LEN_16);
        assert_eq!(a, b);
        assert_eq!(derive_session_key(&secret, KEY_LEN_32).unwrap().as_bytes().len(), KEY_LEN_32);
    }

    #[test]
    fn short_key_is_prefix_of_long_key() {
        let secret = [0x11u8; 32];
        let short = derive_session_key(&secret, KEY_LEN_16).unwrap();
        let long = derive_session_key(&secret, KEY_LEN_32).unwrap();
        assert_eq!(short.as_bytes(), &long.as_bytes()[..KEY_LEN_16]);
    }

    #[test]
    fn rejects_bad_length_and_zero_secret() {
        assert!(matches!(
            derive_session_key(&[1u8; 32], 24),
            Err(CryptoError::InvalidKeyLen { actual: 24, .. })
        ));
        assert!(matches!(derive_session_key(&[0u8; 32], KEY_LEN_16), Err(CryptoError::Failure(_))));
    }
}
