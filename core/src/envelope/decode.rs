// ## 📂 File: `src/envelope/decode.rs`
//! src/envelope/decode.rs
//!
//! Envelope and framing decoders.
//!
//! Design notes:
//! - Length and version are checked before any slice is taken.
//! - Nothing here authenticates; callers must AEAD-open before trusting
//!   any decoded field.

use crate::crypto::types::{EC_POINT_XY_LEN, NONCE_LEN_12};
use crate::envelope::types::{
    EnvelopeError, RequestEnvelopeParts, RequestPlaintext, ResponseEnvelopeParts, VauVersion,
    REQUEST_HEADER_LEN, REQUEST_MIN_LEN, RESPONSE_HEADER_LEN, RESPONSE_MIN_LEN,
};

fn check_frame(buf: &[u8], need: usize, expected: VauVersion) -> Result<VauVersion, EnvelopeError> {
    if buf.is_empty() {
        return Err(EnvelopeError::Empty);
    }
    let actual = VauVersion::from_tag(buf[0])?;
    if actual != expected {
        return Err(EnvelopeError::VersionMismatch { expected, actual });
    }
    if buf.len() < need {
        return Err(EnvelopeError::TooShort { have: buf.len(), need });
    }
    Ok(actual)
}

fn read_nonce(buf: &[u8], at: usize) -> [u8; NONCE_LEN_12] {
    let mut nonce = [0u8; NONCE_LEN_12];
    nonce.copy_from_slice(&buf[at..at + NONCE_LEN_12]);
    nonce
}

/// Split a request envelope into header, nonce and sealed payload.
pub fn decode_request_envelope(
    buf: &[u8],
    expected: VauVersion,
) -> Result<RequestEnvelopeParts<'_>, EnvelopeError> {
    let version = check_frame(buf, REQUEST_MIN_LEN, expected)?;

    let mut ephemeral_xy = [0u8; EC_POINT_XY_LEN];
    ephemeral_xy.copy_from_slice(&buf[1..REQUEST_HEADER_LEN]);

    Ok(RequestEnvelopeParts {
        version,
        ephemeral_xy,
        nonce: read_nonce(buf, REQUEST_HEADER_LEN),
        aad: &buf[..REQUEST_HEADER_LEN],
        ciphertext: &buf[REQUEST_HEADER_LEN + NONCE_LEN_12..],
    })
}

/// Split a response envelope into header, nonce and sealed payload.
pub fn decode_response_envelope(
    buf: &[u8],
    expected: VauVersion,
) -> Result<ResponseEnvelopeParts<'_>, EnvelopeError> {
    let version = check_frame(buf, RESPONSE_MIN_LEN, expected)?;

    Ok(ResponseEnvelopeParts {
        version,
        nonce: read_nonce(buf, RESPONSE_HEADER_LEN),
        aad: &buf[..RESPONSE_HEADER_LEN],
        ciphertext: &buf[RESPONSE_HEADER_LEN + NONCE_LEN_12..],
    })
}

/// Parse the decrypted request framing. The inner HTTP may contain spaces,
/// the four leading fields may not.
pub fn parse_request_plaintext(buf: &[u8]) -> Result<RequestPlaintext<'_>, EnvelopeError> {
    let mut rest = buf;
    let mut fields: [&str; 4] = [""; 4];

    for (i, name) in ["version", "bearer", "request id", "response key"].iter().enumerate() {
        let end = rest
            .iter()
            .position(|&b| b == b' ')
            .ok_or_else(|| EnvelopeError::malformed(&format!("missing {name}"), buf))?;
        fields[i] = std::str::from_utf8(&rest[..end])
            .map_err(|_| EnvelopeError::malformed(&format!("non UTF-8 {name}"), buf))?;
        rest = &rest[end + 1..];
    }

    let mut chars = fields[0].chars();
    let version_char = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => return Err(EnvelopeError::malformed("version is not a single char", buf)),
    };

    Ok(RequestPlaintext {
        version_char,
        bearer: fields[1],
        request_id_hex: fields[2],
        response_key_hex: fields[3],
        inner_http: rest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::encode::*;

    #[test]
    fn response_envelope_layout() {
        let header = encode_response_header(VauVersion::V1);
        let env = assemble_envelope(&header, &[7u8; 12], &[9u8; 20]);
        let parts = decode_response_envelope(&env, VauVersion::V1).unwrap();
        assert_eq!(parts.aad, &[0x01]);
        assert_eq!(parts.nonce, [7u8; 12]);
        assert_eq!(parts.ciphertext, &[9u8; 20]);
    }

    #[test]
    fn request_envelope_layout() {
        let header = encode_request_header(VauVersion::V1, &[5u8; 64]);
        let env = assemble_envelope(&header, &[7u8; 12], &[9u8; 16]);
        let parts = decode_request_envelope(&env, VauVersion::V1).unwrap();
        assert_eq!(parts.ephemeral_xy, [5u8; 64]);
        assert_eq!(parts.aad.len(), REQUEST_HEADER_LEN);
        assert_eq!(parts.ciphertext.len(), 16);
    }

    #[test]
    fn plain_text_is_not_an_envelope() {
        let err = decode_response_envelope(b"Nobody calls me chicken", VauVersion::V1).unwrap_err();
        assert_eq!(err, EnvelopeError::UnknownVersion { raw: b'N' });
    }

    #[test]
    fn truncated_envelope() {
        let err = decode_response_envelope(&[0x01, 0, 0], VauVersion::V1).unwrap_err();
        assert_eq!(err, EnvelopeError::TooShort { have: 3, need: RESPONSE_MIN_LEN });
        assert_eq!(decode_response_envelope(&[], VauVersion::V1).unwrap_err(), EnvelopeError::Empty);
    }

    #[test]
    fn request_framing_roundtrip() {
        let raw = compose_request_plaintext(VauVersion::V1, "tok", "abcd", "00ff", b"GET / HTTP/1.1\r\n\r\n");
        let parsed = parse_request_plaintext(&raw).unwrap();
        assert_eq!(parsed.version_char, '1');
        assert_eq!(parsed.bearer, "tok");
        assert_eq!(parsed.request_id_hex, "abcd");
        assert_eq!(parsed.response_key_hex, "00ff");
        assert_eq!(parsed.inner_http, b"GET / HTTP/1.1\r\n\r\n");
    }

    #[test]
    fn request_framing_missing_fields() {
        assert!(matches!(
            parse_request_plaintext(b"1 tok"),
            Err(EnvelopeError::MalformedPlaintext(_))
        ));
    }
}
