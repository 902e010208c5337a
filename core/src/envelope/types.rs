// ## 📂 File: `src/envelope/types.rs`

//! envelope/types.rs
//! Protocol versions, binary layout and the envelope value.
//!
//! Layout (V1):
//! - Request:  `version(1) ‖ ephemeral X(32) ‖ Y(32) ‖ nonce(12) ‖ ciphertext ‖ tag(16)`
//! - Response: `version(1) ‖ nonce(12) ‖ ciphertext ‖ tag(16)`
//!
//! The bytes in front of the nonce are the AEAD associated data, so a
//! flipped version byte or a swapped ephemeral key fails authentication.

use std::fmt;

use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::REQUEST_ID_LEN;
use crate::crypto::types::{EC_POINT_XY_LEN, KEY_LEN_16, NONCE_LEN_12, TAG_LEN};
use crate::utils::fmt_bytes;

/// Protocol versions; the discriminant is the envelope version byte.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive, Serialize, Deserialize)]
pub enum VauVersion {
    /// P-256 ECDH, HKDF-SHA256, AES-128-GCM.
    V1 = 0x01,
}

impl Default for VauVersion {
    fn default() -> Self {
        VauVersion::V1
    }
}

impl VauVersion {
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Version marker leading the request plaintext framing.
    pub fn inner_version_char(self) -> char {
        match self {
            VauVersion::V1 => '1',
        }
    }

    pub fn key_len(self) -> usize {
        match self {
            VauVersion::V1 => KEY_LEN_16,
        }
    }

    pub fn nonce_len(self) -> usize {
        NONCE_LEN_12
    }

    pub fn tag_len(self) -> usize {
        TAG_LEN
    }

    pub fn curve(self) -> &'static str {
        match self {
            VauVersion::V1 => "P-256",
        }
    }

    /// Parse a version byte.
    pub fn from_tag(raw: u8) -> Result<Self, EnvelopeError> {
        Self::try_from_primitive(raw).map_err(|_| EnvelopeError::UnknownVersion { raw })
    }
}

impl fmt::Display for VauVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VAU-V{}", self.tag())
    }
}

/// version byte + ephemeral point
pub const REQUEST_HEADER_LEN: usize = 1 + EC_POINT_XY_LEN;
pub const REQUEST_MIN_LEN: usize = REQUEST_HEADER_LEN + NONCE_LEN_12 + TAG_LEN;

/// version byte only
pub const RESPONSE_HEADER_LEN: usize = 1;
pub const RESPONSE_MIN_LEN: usize = RESPONSE_HEADER_LEN + NONCE_LEN_12 + TAG_LEN;

/// Borrowed view of a decoded request envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestEnvelopeParts<'a> {
    pub version: VauVersion,
    pub ephemeral_xy: [u8; EC_POINT_XY_LEN],
    pub nonce: [u8; NONCE_LEN_12],
    /// Associated data: everything in front of the nonce.
    pub aad: &'a [u8],
    pub ciphertext: &'a [u8],
}

/// Borrowed view of a decoded response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseEnvelopeParts<'a> {
    pub version: VauVersion,
    pub nonce: [u8; NONCE_LEN_12],
    pub aad: &'a [u8],
    pub ciphertext: &'a [u8],
}

/// Fields of the decrypted request framing
/// `"{v} {bearer} {requestId} {responseKey} {innerHttp}"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPlaintext<'a> {
    pub version_char: char,
    pub bearer: &'a str,
    pub request_id_hex: &'a str,
    pub response_key_hex: &'a str,
    pub inner_http: &'a [u8],
}

/// Ciphertext ready for, or received from, the wire.
///
/// Never holds key material and is never retained by the session.
#[derive(Clone, PartialEq, Eq)]
pub struct VauEncryptionEnvelope {
    version: VauVersion,
    request_id: [u8; REQUEST_ID_LEN],
    bytes: Vec<u8>,
}

impl VauEncryptionEnvelope {
    pub fn new(version: VauVersion, request_id: [u8; REQUEST_ID_LEN], bytes: Vec<u8>) -> Self {
        Self { version, request_id, bytes }
    }

    pub fn version(&self) -> VauVersion {
        self.version
    }

    pub fn request_id(&self) -> &[u8; REQUEST_ID_LEN] {
        &self.request_id
    }

    pub fn request_id_hex(&self) -> String {
        hex::encode(self.request_id)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for VauEncryptionEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VauEncryptionEnvelope")
            .field("version", &self.version)
            .field("request_id", &self.request_id_hex())
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    #[error("envelope is empty")]
    Empty,

    #[error("envelope too short: {have} < {need}")]
    TooShort { have: usize, need: usize },

    #[error("unknown envelope version: 0x{raw:02x}")]
    UnknownVersion { raw: u8 },

    #[error("envelope version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: VauVersion, actual: VauVersion },

    #[error("malformed request framing: {0}")]
    MalformedPlaintext(String),
}

impl EnvelopeError {
    pub(crate) fn malformed(what: &str, bytes: &[u8]) -> Self {
        let shown = &bytes[..bytes.len().min(32)];
        EnvelopeError::MalformedPlaintext(format!("{what} in {}", fmt_bytes(shown)))
    }
}
