// ## 📂 File: `src/config.rs`

//! config.rs
//! Client configuration, loaded once and validated before a session exists.
//!
//! Design notes:
//! - Plain serde struct; every optional field has a default.
//! - Static outer headers are derived here so their order is fixed in one place.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{header_keys, OCTET_STREAM};
use crate::envelope::VauVersion;
use crate::http::HttpHeader;

pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config: base_url must not be blank")]
    MissingBaseUrl,

    #[error("config: base_url '{0}' must start with http:// or https://")]
    InvalidBaseUrl(String),

    #[error("config: {field} must be greater than zero")]
    ZeroTimeout { field: &'static str },

    #[error("config: header key must not be blank")]
    BlankHeaderKey,

    #[error("config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config: cannot read {path}: {source}")]
    Io { path: String, source: std::io::Error },
}

fn default_connect_timeout() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VauClientConfig {
    /// Service base URL without the `/VAU` suffix.
    pub base_url: String,
    #[serde(default)]
    pub version: VauVersion,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Extra static outer headers, appended after the defaults.
    #[serde(default)]
    pub headers: Vec<HttpHeader>,
    #[serde(default)]
    pub tls_verification: bool,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl VauClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            version: VauVersion::default(),
            api_key: None,
            user_agent: None,
            headers: Vec::new(),
            tls_verification: false,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(HttpHeader::new(key, value));
        self
    }

    /// Parse and validate; trailing `/` on the base URL is dropped.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(json)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.display().to_string(), source })?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::MissingBaseUrl);
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(url.to_string()));
        }
        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout { field: "connect_timeout_secs" });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout { field: "timeout_secs" });
        }
        if self.headers.iter().any(|h| h.key.trim().is_empty()) {
            return Err(ConfigError::BlankHeaderKey);
        }
        Ok(())
    }

    pub(crate) fn normalize(&mut self) {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        self.base_url = trimmed.to_string();
    }

    /// `{base_url}/VAU/{pseudonym}`
    pub fn vau_url(&self, pseudonym: &str) -> String {
        format!("{}{}{}", self.base_url, crate::constants::VAU_PATH, pseudonym)
    }

    pub fn certificate_url(&self) -> String {
        format!("{}{}", self.base_url, crate::constants::CERTIFICATE_PATH)
    }

    /// Outer headers sent with every VAU request, in wire order.
    pub fn static_headers(&self) -> Vec<HttpHeader> {
        let mut headers = vec![
            HttpHeader::new(header_keys::CONTENT_TYPE, OCTET_STREAM),
            HttpHeader::new(header_keys::ACCEPT_CHARSET, "utf-8"),
            HttpHeader::new(header_keys::ACCEPT, OCTET_STREAM),
        ];
        if let Some(key) = &self.api_key {
            headers.push(HttpHeader::new(header_keys::X_API_KEY, key.clone()));
        }
        if let Some(agent) = &self.user_agent {
            headers.push(HttpHeader::new(header_keys::USER_AGENT, agent.clone()));
        }
        headers.extend(self.headers.iter().cloned());
        headers
    }
}
