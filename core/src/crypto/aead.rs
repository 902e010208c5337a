// ## 📂 File: `src/crypto/aead.rs`

//! src/crypto/aead.rs
//! AEAD interface for AES-128-GCM and AES-256-GCM.
//!
//! Design notes:
//! - Both ciphers use 12-byte nonces and 16-byte tags.
//! - Tag verification is constant-time and must fail closed (no partial plaintext).
//! - Caller provides nonce and AAD (the envelope header) per message.
//! - Cipher selection is driven by the session key length.

use crate::crypto::types::{CryptoError, SessionKey};
use crate::crypto::types::{KEY_LEN_16, KEY_LEN_32, NONCE_LEN_12, TAG_LEN};

use aes_gcm::aead::consts::U12;
use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes128Gcm, Aes256Gcm, Nonce};

/// Unified AEAD cipher implementation selected by key length.
#[derive(Clone)]
pub enum AeadImpl {
    Aes128(Aes128Gcm),
    Aes256(Aes256Gcm),
}

impl AeadImpl {
    /// Construct the AEAD implementation matching the session key.
    pub fn from_key(session_key: &SessionKey) -> Result<Self, CryptoError> {
        let key = session_key.as_bytes();
        let invalid = || CryptoError::InvalidKeyLen { expected: KEY_LEN_16, actual: key.len() };

        match key.len() {
            KEY_LEN_16 => Ok(Self::Aes128(Aes128Gcm::new_from_slice(key).map_err(|_| invalid())?)),
            KEY_LEN_32 => Ok(Self::Aes256(Aes256Gcm::new_from_slice(key).map_err(|_| invalid())?)),
            _ => Err(invalid()),
        }
    }

    /// AEAD seal (encrypt) plaintext with nonce and AAD. Output is ciphertext ‖ tag.
    pub fn seal(&self, nonce_12: &[u8], aad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let nonce = Nonce::<U12>::from(check_nonce(nonce_12)?);
        let payload = Payload { msg: plaintext, aad };

        match self {
            AeadImpl::Aes128(cipher) => cipher.encrypt(&nonce, payload),
            AeadImpl::Aes256(cipher) => cipher.encrypt(&nonce, payload),
        }
        .map_err(|_| CryptoError::Failure("AES-GCM seal failed".into()))
    }

    /// AEAD open (decrypt) ciphertext ‖ tag with nonce and AAD.
    pub fn open(
        &self,
        nonce_12: &[u8],
        aad: &[u8],
        ciphertext_and_tag: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        let nonce = Nonce::<U12>::from(check_nonce(nonce_12)?);
        if ciphertext_and_tag.len() < TAG_LEN {
            return Err(CryptoError::Failure("ciphertext too short".into()));
        }
        let payload = Payload { msg: ciphertext_and_tag, aad };

        match self {
            AeadImpl::Aes128(cipher) => cipher.decrypt(&nonce, payload),
            AeadImpl::Aes256(cipher) => cipher.decrypt(&nonce, payload),
        }
        .map_err(|_| CryptoError::TagMismatch)
    }
}

fn check_nonce(nonce_12: &[u8]) -> Result<[u8; NONCE_LEN_12], CryptoError> {
    <[u8; NONCE_LEN_12]>::try_from(nonce_12)
        .map_err(|_| CryptoError::InvalidNonceLen { expected: NONCE_LEN_12, actual: nonce_12.len() })
}
