// ## 📂 File: `src/crypto/agreement.rs`

//! crypto/agreement.rs
//! Ephemeral-static ECDH on P-256.
//!
//! - The client side generates one ephemeral key per session.
//! - The peer side (static key holder) derives the same secret from the
//!   ephemeral public point carried in each request envelope.

use p256::ecdh::{diffie_hellman, EphemeralSecret};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::{PublicKey, SecretKey};
use rand::rngs::OsRng;

use crate::crypto::kdf::derive_session_key;
use crate::crypto::types::{CryptoError, SessionKey, EC_POINT_XY_LEN};

/// Result of the client-side agreement.
pub struct Agreement {
    /// Ephemeral public point as X ‖ Y.
    pub ephemeral_xy: [u8; EC_POINT_XY_LEN],
    pub session_key: SessionKey,
}

/// One key agreement against the peer's static key.
pub fn agree_ephemeral(peer: &PublicKey, key_len: usize) -> Result<Agreement, CryptoError> {
    let ephemeral = EphemeralSecret::random(&mut OsRng);
    let ephemeral_xy = point_to_xy(&ephemeral.public_key())?;
    let shared = ephemeral.diffie_hellman(peer);
    let session_key = derive_session_key(&shared.raw_secret_bytes()[..], key_len)?;
    Ok(Agreement { ephemeral_xy, session_key })
}

/// Peer-side counterpart: static secret + ephemeral point from the envelope.
pub fn agree_static(
    secret: &SecretKey,
    ephemeral_xy: &[u8; EC_POINT_XY_LEN],
    key_len: usize,
) -> Result<SessionKey, CryptoError> {
    let ephemeral = point_from_xy(ephemeral_xy)?;
    let shared = diffie_hellman(secret.to_nonzero_scalar(), ephemeral.as_affine());
    derive_session_key(&shared.raw_secret_bytes()[..], key_len)
}

/// Uncompressed SEC1 point without its `0x04` tag.
pub fn point_to_xy(public: &PublicKey) -> Result<[u8; EC_POINT_XY_LEN], CryptoError> {
    let encoded = public.to_encoded_point(false);
    let bytes = encoded.as_bytes();
    if bytes.len() != EC_POINT_XY_LEN + 1 {
        return Err(CryptoError::InvalidPublicKey(format!(
            "unexpected encoded point length {}",
            bytes.len()
        )));
    }
    let mut xy = [0u8; EC_POINT_XY_LEN];
    xy.copy_from_slice(&bytes[1..]);
    Ok(xy)
}

/// Rebuild a public key from X ‖ Y; rejects points off the curve.
pub fn point_from_xy(xy: &[u8; EC_POINT_XY_LEN]) -> Result<PublicKey, CryptoError> {
    let mut sec1 = Vec::with_capacity(EC_POINT_XY_LEN + 1);
    sec1.push(0x04);
    sec1.extend_from_slice(xy);
    PublicKey::from_sec1_bytes(&sec1).map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_sides_derive_the_same_key() {
        let server = SecretKey::random(&mut OsRng);
        let client = agree_ephemeral(&server.public_key(), 16).unwrap();
        let peer_key = agree_static(&server, &client.ephemeral_xy, 16).unwrap();
        assert_eq!(client.session_key, peer_key);
    }

    #[test]
    fn each_agreement_is_fresh() {
        let server = SecretKey::random(&mut OsRng);
        let a = agree_ephemeral(&server.public_key(), 16).unwrap();
        let b = agree_ephemeral(&server.public_key(), 16).unwrap();
        assert_ne!(a.ephemeral_xy, b.ephemeral_xy);
        assert_ne!(a.session_key, b.session_key);
    }

    #[test]
    fn point_off_curve_is_rejected() {
        let err = point_from_xy(&[0x42; EC_POINT_XY_LEN]).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidPublicKey(_)));
    }
}
