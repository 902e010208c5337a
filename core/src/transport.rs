// ## 📂 File: `src/transport.rs`

//! transport.rs
//! Outer HTTP collaborator.
//!
//! Design notes:
//! - `VauTransport` is the seam: one blocking request in, one response out.
//! - `HttpTransport` is the production implementation on `reqwest::blocking`.
//! - Errors from the network layer pass through untouched; nothing retries.

use std::time::Duration;

use p256::PublicKey;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderName, HeaderValue};
use thiserror::Error;
use tracing::{info, trace, warn};

use crate::config::VauClientConfig;
use crate::constants::{header_keys, CERTIFICATE_PATH};
use crate::crypto::public_key_from_certificate;
use crate::http::{header_value, HttpHeader, HttpMethod, HttpResponse};
use crate::types::VauError;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("http transport: {0}")]
    Http(#[from] reqwest::Error),

    #[error("transport already shut down")]
    Closed,

    #[error("transport failure: {0}")]
    Failed(String),
}

/// Outer request as handed to the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OuterRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<HttpHeader>,
    pub body: Vec<u8>,
}

impl OuterRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self { method: HttpMethod::Get, url: url.into(), headers: Vec::new(), body: Vec::new() }
    }

    pub fn post(url: impl Into<String>, body: Vec<u8>) -> Self {
        Self { method: HttpMethod::Post, url: url.into(), headers: Vec::new(), body }
    }

    pub fn header_value(&self, key: &str) -> Option<&str> {
        header_value(&self.headers, key)
    }
}

/// Outer response as received from the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OuterResponse {
    pub status_code: u16,
    pub headers: Vec<HttpHeader>,
    pub body: Vec<u8>,
}

impl OuterResponse {
    pub fn new(status_code: u16, headers: Vec<HttpHeader>, body: Vec<u8>) -> Self {
        Self { status_code, headers, body }
    }

    pub fn header_value(&self, key: &str) -> Option<&str> {
        header_value(&self.headers, key)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header_value(header_keys::CONTENT_TYPE)
    }

    /// Take the outer response over as caller-facing response.
    pub fn into_http_response(self) -> HttpResponse {
        HttpResponse::new(self.status_code, self.headers, self.body)
    }
}

/// Blocking outer HTTP capability.
pub trait VauTransport {
    fn execute(&self, request: &OuterRequest) -> Result<OuterResponse, TransportError>;

    /// Release connections; later `execute` calls may fail.
    fn shutdown(&mut self) {}
}

/// `reqwest` backed transport.
#[derive(Debug)]
pub struct HttpTransport {
    client: Option<Client>,
}

impl HttpTransport {
    pub fn from_config(config: &VauClientConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(!config.tls_verification)
            .build()?;
        Ok(Self { client: Some(client) })
    }
}

impl HttpTransport {
    fn prepare(&self, request: &OuterRequest) -> Result<RequestBuilder, TransportError> {
        let client = self.client.as_ref().ok_or(TransportError::Closed)?;
        let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes())
            .map_err(|e| TransportError::Failed(e.to_string()))?;

        let mut builder = client.request(method, &request.url);
        for h in &request.headers {
            match (HeaderName::from_bytes(h.key.as_bytes()), HeaderValue::from_str(&h.value)) {
                (Ok(name), Ok(value)) => {
                    trace!(key = %h.key, value = %h.value, "outer header");
                    builder = builder.header(name, value);
                }
                _ => warn!(key = %h.key, "skipping header not representable on the outer request"),
            }
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body.clone());
        }
        Ok(builder)
    }
}

impl VauTransport for HttpTransport {
    fn execute(&self, request: &OuterRequest) -> Result<OuterResponse, TransportError> {
        let response = self.prepare(request)?.send()?;
        let status_code = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| HttpHeader::new(k.as_str(), v)))
            .collect();
        let body = response.bytes()?.to_vec();

        Ok(OuterResponse { status_code, headers, body })
    }

    fn shutdown(&mut self) {
        self.client = None;
    }
}

/// `GET {base_url}/VAUCertificate` and extract the peer key.
pub fn download_certificate<T: VauTransport + ?Sized>(
    transport: &T,
    base_url: &str,
    api_key: Option<&str>,
) -> Result<PublicKey, VauError> {
    let url = format!("{}{}", base_url.trim_end_matches('/'), CERTIFICATE_PATH);
    let mut request = OuterRequest::get(url.clone());
    if let Some(key) = api_key {
        request.headers.push(HttpHeader::new(header_keys::X_API_KEY, key));
    }

    let response = transport.execute(&request)?;
    if response.body.is_empty() {
        return Err(VauError::Certificate(format!("Remote on {url} returned an empty body")));
    }

    let key = public_key_from_certificate(&response.body)
        .map_err(|e| VauError::Certificate(format!("certificate from {url}: {e}")))?;
    info!(%url, "received VAU certificate");
    Ok(key)
}
