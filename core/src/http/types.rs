// ## 📂 File: `src/http/types.rs`

//! http/types.rs
//! Plaintext request/response views of the inner HTTP message.
//!
//! Design notes:
//! - Headers are an ordered list; repeated keys are kept, lookup is
//!   case-insensitive and the first match wins.
//! - Bodies are raw bytes. String views are lossy UTF-8.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{header_keys, BEARER_PREFIX, INNER_HTTP_VERSION};

/// Request methods understood by the inner HTTP line.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single `Key: Value` pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpHeader {
    pub key: String,
    pub value: String,
}

impl HttpHeader {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: key.into(), value: value.into() }
    }

    /// `Authorization: Bearer {token}`
    pub fn bearer(token: &str) -> Self {
        Self::new(header_keys::AUTHORIZATION, format!("{BEARER_PREFIX}{token}"))
    }

    pub fn matches(&self, key: &str) -> bool {
        self.key.eq_ignore_ascii_case(key)
    }
}

/// First value for `key` (case-insensitive) in an ordered header list.
pub fn header_value<'a>(headers: &'a [HttpHeader], key: &str) -> Option<&'a str> {
    headers.iter().find(|h| h.matches(key)).map(|h| h.value.as_str())
}

/// Caller-side request, encoded into the inner HTTP text form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Path including the query string, written verbatim.
    pub path: String,
    pub headers: Vec<HttpHeader>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), headers: Vec::new(), body: Vec::new() }
    }

    pub fn with_header(mut self, header: HttpHeader) -> Self {
        self.headers.push(header);
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn header_value(&self, key: &str) -> Option<&str> {
        header_value(&self.headers, key)
    }

    /// Token of the first `Authorization: Bearer …` header, if any.
    pub fn bearer_token(&self) -> Option<&str> {
        self.headers
            .iter()
            .filter(|h| h.matches(header_keys::AUTHORIZATION))
            .find_map(|h| {
                let value = h.value.trim();
                let scheme = value.get(..BEARER_PREFIX.len())?;
                if !scheme.eq_ignore_ascii_case(BEARER_PREFIX) {
                    return None;
                }
                let token = value[BEARER_PREFIX.len()..].trim();
                (!token.is_empty()).then_some(token)
            })
    }

    pub fn is_empty_body(&self) -> bool {
        self.body.is_empty()
    }
}

/// Response handed back to the caller, either decoded from the inner HTTP
/// or taken over from a plain outer response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    /// e.g. `HTTP/1.1`
    pub protocol: String,
    pub status_code: u16,
    pub headers: Vec<HttpHeader>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status_code: u16, headers: Vec<HttpHeader>, body: Vec<u8>) -> Self {
        Self { protocol: INNER_HTTP_VERSION.to_string(), status_code, headers, body }
    }

    pub fn header_value(&self, key: &str) -> Option<&str> {
        header_value(&self.headers, key)
    }

    /// True only for a header with a non-blank value.
    pub fn has_header(&self, key: &str) -> bool {
        self.header_value(key).is_some_and(|v| !v.trim().is_empty())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header_value(header_keys::CONTENT_TYPE)
    }

    /// Declared `Content-Length`; 0 when absent or not a number.
    pub fn content_length(&self) -> usize {
        self.header_value(header_keys::CONTENT_LENGTH)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn body_as_string(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn is_empty_body(&self) -> bool {
        self.body.is_empty()
    }
}

/// Failures of the inner HTTP decoder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("inner HTTP response is not parsable: empty body")]
    EmptyBody,

    #[error("http protocol does not match {expected}; given in status line: {line}")]
    MissingHttpVersion { expected: &'static str, line: String },

    #[error("status line is incomplete: {line}")]
    IncompleteStatusLine { line: String },

    #[error("status code MUST be a number but is {raw}")]
    InvalidStatusCode { raw: String },
}
