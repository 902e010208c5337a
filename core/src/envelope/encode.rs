// ## 📂 File: `src/envelope/encode.rs`
//! src/envelope/encode.rs
//!
//! Envelope and framing encoders.
//!
//! Design notes:
//! - Headers are written first so the exact header bytes can serve as AAD.
//! - Field order must match `decode.rs` exactly.

use crate::crypto::types::{EC_POINT_XY_LEN, NONCE_LEN_12};
use crate::envelope::types::{VauVersion, REQUEST_HEADER_LEN, RESPONSE_HEADER_LEN};

/// `version ‖ X ‖ Y`, also the AAD of the request envelope.
pub fn encode_request_header(
    version: VauVersion,
    ephemeral_xy: &[u8; EC_POINT_XY_LEN],
) -> [u8; REQUEST_HEADER_LEN] {
    let mut out = [0u8; REQUEST_HEADER_LEN];
    out[0] = version.tag();
    out[1..].copy_from_slice(ephemeral_xy);
    out
}

/// `version`, also the AAD of the response envelope.
pub fn encode_response_header(version: VauVersion) -> [u8; RESPONSE_HEADER_LEN] {
    [version.tag()]
}

/// `header ‖ nonce ‖ ciphertext‖tag`
pub fn assemble_envelope(header: &[u8], nonce: &[u8; NONCE_LEN_12], sealed: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(header.len() + NONCE_LEN_12 + sealed.len());
    out.extend_from_slice(header);
    out.extend_from_slice(nonce);
    out.extend_from_slice(sealed);
    out
}

/// `"{v} {bearer} {requestIdHex} {responseKeyHex} {innerHttp}"`
pub fn compose_request_plaintext(
    version: VauVersion,
    bearer: &str,
    request_id_hex: &str,
    response_key_hex: &str,
    inner_http: &[u8],
) -> Vec<u8> {
    let mut out = Vec::with_capacity(
        1 + 1 + bearer.len() + 1 + request_id_hex.len() + 1 + response_key_hex.len() + 1 + inner_http.len(),
    );
    let mut v = [0u8; 4];
    out.extend_from_slice(version.inner_version_char().encode_utf8(&mut v).as_bytes());
    for field in [bearer.as_bytes(), request_id_hex.as_bytes(), response_key_hex.as_bytes(), inner_http] {
        out.push(b' ');
        out.extend_from_slice(field);
    }
    out
}

/// `"{v} {requestIdHex} {innerHttp}"`, the framing a peer answers with.
pub fn compose_response_plaintext(version: VauVersion, request_id_hex: &str, inner_http: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(2 + request_id_hex.len() + 1 + inner_http.len());
    let mut v = [0u8; 4];
    out.extend_from_slice(version.inner_version_char().encode_utf8(&mut v).as_bytes());
    out.push(b' ');
    out.extend_from_slice(request_id_hex.as_bytes());
    out.push(b' ');
    out.extend_from_slice(inner_http);
    out
}
