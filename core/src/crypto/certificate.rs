// ## 📂 File: `src/crypto/certificate.rs`

//! crypto/certificate.rs
//! Peer public key extraction from the VAU certificate.
//!
//! Only the embedded SubjectPublicKeyInfo is used; chain validation is out
//! of scope here. The SPKI must name the P-256 curve, any other algorithm
//! or curve is rejected.

use p256::pkcs8::DecodePublicKey;
use p256::PublicKey;
use x509_cert::der::{Decode, DecodePem, Encode};
use x509_cert::Certificate;

use crate::crypto::types::CryptoError;

const PEM_MARKER: &[u8] = b"-----BEGIN";

/// Parse a DER or PEM encoded X.509 certificate and return its EC public key.
pub fn public_key_from_certificate(bytes: &[u8]) -> Result<PublicKey, CryptoError> {
    if bytes.is_empty() {
        return Err(CryptoError::InvalidCertificate("certificate is empty".into()));
    }

    let trimmed = trim_ascii_start(bytes);
    let certificate = if trimmed.starts_with(PEM_MARKER) {
        Certificate::from_pem(trimmed)
    } else {
        Certificate::from_der(bytes)
    }
    .map_err(|e| CryptoError::InvalidCertificate(e.to_string()))?;

    let spki = certificate
        .tbs_certificate
        .subject_public_key_info
        .to_der()
        .map_err(|e| CryptoError::InvalidCertificate(e.to_string()))?;

    public_key_from_spki_der(&spki)
}

/// Parse a DER SubjectPublicKeyInfo restricted to P-256.
pub fn public_key_from_spki_der(spki_der: &[u8]) -> Result<PublicKey, CryptoError> {
    PublicKey::from_public_key_der(spki_der).map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))
}

fn trim_ascii_start(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|b| !b.is_ascii_whitespace()).unwrap_or(bytes.len());
    &bytes[start..]
}
