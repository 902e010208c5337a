// ## 📂 File: `src/envelope/cipher.rs`

//! envelope/cipher.rs
//! Session-scoped envelope engine.
//!
//! Design notes:
//! - Bound at construction to a protocol version and the peer's static key.
//! - `establish` runs exactly one key agreement; the key is stable afterwards.
//! - `encrypt` frames the bearer with the inner HTTP and seals it under the
//!   session key; `decrypt` opens a response envelope and fails closed on
//!   any version, length or tag problem.

use p256::PublicKey;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::constants::REQUEST_ID_LEN;
use crate::crypto::agreement::agree_ephemeral;
use crate::crypto::types::{CryptoError, SessionKey, EC_POINT_XY_LEN};
use crate::crypto::{AeadImpl, NonceSequence};
use crate::envelope::decode::decode_response_envelope;
use crate::envelope::encode::{assemble_envelope, compose_request_plaintext, encode_request_header};
use crate::envelope::types::{EnvelopeError, VauEncryptionEnvelope, VauVersion};
use crate::types::VauError;

/// Key material present once `establish` succeeded.
struct Established {
    ephemeral_xy: [u8; EC_POINT_XY_LEN],
    session_key: SessionKey,
    aead: AeadImpl,
    nonces: NonceSequence,
}

pub struct VauEnvelopeCipher {
    version: VauVersion,
    peer: PublicKey,
    established: Option<Established>,
}

impl VauEnvelopeCipher {
    pub fn new(version: VauVersion, peer: PublicKey) -> Self {
        Self { version, peer, established: None }
    }

    pub fn version(&self) -> VauVersion {
        self.version
    }

    pub fn peer_public_key(&self) -> &PublicKey {
        &self.peer
    }

    pub fn is_established(&self) -> bool {
        self.established.is_some()
    }

    /// Read-only view of the session key, for diagnostics.
    pub fn session_key(&self) -> Option<&SessionKey> {
        self.established.as_ref().map(|e| &e.session_key)
    }

    /// Ephemeral public point (X ‖ Y) sent with every request.
    pub fn ephemeral_public_xy(&self) -> Option<&[u8; EC_POINT_XY_LEN]> {
        self.established.as_ref().map(|e| &e.ephemeral_xy)
    }

    /// Key agreement against the peer key. Idempotent: a second call returns
    /// the key derived by the first.
    pub fn establish(&mut self) -> Result<&SessionKey, CryptoError> {
        if self.established.is_none() {
            let agreement = agree_ephemeral(&self.peer, self.version.key_len())?;
            let aead = AeadImpl::from_key(&agreement.session_key)?;
            self.established = Some(Established {
                ephemeral_xy: agreement.ephemeral_xy,
                session_key: agreement.session_key,
                aead,
                nonces: NonceSequence::random(),
            });
        }
        self.session_key().ok_or_else(|| CryptoError::Failure("session key missing".into()))
    }

    /// Seal `plaintext` together with the bearer framing into a request envelope.
    pub fn encrypt(&mut self, auth_context: &str, plaintext: &[u8]) -> Result<VauEncryptionEnvelope, VauError> {
        if auth_context.is_empty() || auth_context.chars().any(char::is_whitespace) {
            return Err(EnvelopeError::MalformedPlaintext(
                "authorization context must be a single non-empty token".into(),
            )
            .into());
        }

        let version = self.version;
        let est = self.established.as_mut().ok_or(CryptoError::NotEstablished)?;

        let mut request_id = [0u8; REQUEST_ID_LEN];
        OsRng.fill_bytes(&mut request_id);

        let framed = compose_request_plaintext(
            version,
            auth_context,
            &hex::encode(request_id),
            &est.session_key.to_hex(),
            plaintext,
        );

        let header = encode_request_header(version, &est.ephemeral_xy);
        let nonce = est.nonces.next_nonce()?;
        let sealed = est.aead.seal(&nonce, &header, &framed)?;

        Ok(VauEncryptionEnvelope::new(version, request_id, assemble_envelope(&header, &nonce, &sealed)))
    }

    /// Open a response envelope. No partial plaintext on failure.
    pub fn decrypt(&self, envelope: &[u8]) -> Result<Vec<u8>, VauError> {
        let est = self.established.as_ref().ok_or(CryptoError::NotEstablished)?;
        let parts = decode_response_envelope(envelope, self.version)?;
        Ok(est.aead.open(&parts.nonce, parts.aad, parts.ciphertext)?)
    }
}
