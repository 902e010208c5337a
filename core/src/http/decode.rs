// ## 📂 File: `src/http/decode.rs`
//! src/http/decode.rs
//!
//! Inner HTTP response decoding.
//!
//! Design notes:
//! - Works on bytes: the head is split off at the first blank line, the body
//!   stays binary.
//! - Everything in the status line before `HTTP/` is the opaque VAU prefix
//!   (protocol version + request id) and is dropped.
//! - Malformed header lines are skipped, never fatal.
//! - A failed decode never yields a partially filled response.

use tracing::debug;

use crate::constants::{header_keys, DOUBLE_LINE_BREAK, HTTP_VERSION_MARKER, LINE_BREAK};
use crate::http::types::{header_value, DecodeError, HttpHeader, HttpResponse};
use crate::utils::find_subsequence;

/// Decode decrypted inner HTTP bytes into a response.
///
/// # Errors
/// - `EmptyBody` for empty input.
/// - `MissingHttpVersion` if the status line has no `HTTP/` token.
/// - `IncompleteStatusLine` if version, status code or reason are missing.
/// - `InvalidStatusCode` if the status code is not a number.
pub fn decode_response(raw: &[u8]) -> Result<HttpResponse, DecodeError> {
    if raw.is_empty() {
        return Err(DecodeError::EmptyBody);
    }

    let (head, body) = match find_subsequence(raw, DOUBLE_LINE_BREAK.as_bytes()) {
        Some(pos) => (&raw[..pos], &raw[pos + DOUBLE_LINE_BREAK.len()..]),
        None => (raw, &raw[raw.len()..]),
    };

    let head = String::from_utf8_lossy(head);
    let mut lines = head.split(LINE_BREAK);
    let start_line = lines.next().unwrap_or_default();

    let (protocol, status_code) = parse_status_line(start_line)?;

    let headers: Vec<HttpHeader> = lines.filter_map(parse_header_line).collect();

    let body = match header_value(&headers, header_keys::CONTENT_LENGTH)
        .and_then(|v| v.trim().parse::<usize>().ok())
    {
        Some(declared) => &body[..declared.min(body.len())],
        None => body,
    };

    Ok(HttpResponse {
        protocol,
        status_code,
        headers,
        body: body.to_vec(),
    })
}

/// Locate `HTTP/` at the start of the line or right after a space.
fn find_version_marker(line: &str) -> Option<usize> {
    if line.starts_with(HTTP_VERSION_MARKER) {
        return Some(0);
    }
    line.find(&format!(" {HTTP_VERSION_MARKER}")).map(|i| i + 1)
}

/// `{prefix} HTTP/{version} {code} {reason}` -> (`HTTP/{version}`, code)
fn parse_status_line(line: &str) -> Result<(String, u16), DecodeError> {
    let start = find_version_marker(line).ok_or_else(|| DecodeError::MissingHttpVersion {
        expected: HTTP_VERSION_MARKER,
        line: line.to_string(),
    })?;

    let status_line = &line[start..];
    let mut items = status_line.splitn(3, ' ');
    let (Some(protocol), Some(code), Some(_reason)) = (items.next(), items.next(), items.next())
    else {
        return Err(DecodeError::IncompleteStatusLine { line: status_line.to_string() });
    };

    if protocol.len() <= HTTP_VERSION_MARKER.len() {
        return Err(DecodeError::IncompleteStatusLine { line: status_line.to_string() });
    }

    let status_code = code
        .parse::<u16>()
        .map_err(|_| DecodeError::InvalidStatusCode { raw: code.to_string() })?;

    Ok((protocol.to_string(), status_code))
}

/// `Key: Value`; lines without colon, key or value are dropped.
fn parse_header_line(line: &str) -> Option<HttpHeader> {
    if line.is_empty() {
        return None;
    }
    let Some((key, value)) = line.split_once(':') else {
        debug!(line, "header structure is invalid, skipping");
        return None;
    };
    let (key, value) = (key.trim(), value.trim());
    if key.is_empty() || value.is_empty() {
        debug!(line, "header without key or value, skipping");
        return None;
    }
    Some(HttpHeader::new(key, value))
}
