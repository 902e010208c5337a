// ## 📂 File: `src/http/encode.rs`
//! src/http/encode.rs
//!
//! Inner HTTP request encoding.
//!
//! Design notes:
//! - Byte-exact: request line, caller headers in supplied order, then a
//!   recomputed lower-case `content-length`, blank line, raw body.
//! - Caller-supplied length headers are written as given; the trailing
//!   `content-length` always reflects the real body.

use tracing::trace;

use crate::constants::{header_keys, INNER_HTTP_VERSION, LINE_BREAK};
use crate::http::types::HttpRequest;

/// Serialize a request into the inner HTTP wire form.
pub fn encode_request(request: &HttpRequest) -> Vec<u8> {
    let mut head = String::with_capacity(64 + request.path.len() + request.headers.len() * 32);

    head.push_str(request.method.as_str());
    head.push(' ');
    head.push_str(&request.path);
    head.push(' ');
    head.push_str(INNER_HTTP_VERSION);
    head.push_str(LINE_BREAK);

    for h in &request.headers {
        head.push_str(&h.key);
        head.push_str(": ");
        head.push_str(&h.value);
        head.push_str(LINE_BREAK);
    }

    head.push_str(header_keys::INNER_CONTENT_LENGTH);
    head.push_str(": ");
    head.push_str(&request.body.len().to_string());
    head.push_str(LINE_BREAK);
    head.push_str(LINE_BREAK);

    trace!(
        method = %request.method,
        path = %request.path,
        body_len = request.body.len(),
        "encoded inner HTTP request head:\n{}",
        head
    );

    let mut out = head.into_bytes();
    out.extend_from_slice(&request.body);
    out
}
