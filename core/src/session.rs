// ## 📂 File: `src/session.rs`

//! session.rs
//! VAU session: one key agreement, then any number of sequential exchanges.
//!
//! States: `Uninitialized → Ready → Closed`.
//!
//! Design notes:
//! - `send` takes `&mut self`; one session carries one pseudonym chain and
//!   must not be shared between overlapping calls.
//! - The outer response content type decides the path: octet-stream is
//!   opened and decoded, anything else is returned as is.
//! - Failures on the encrypted path never fall back to the plain path.

use std::fmt;

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine as _;
use p256::PublicKey;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::config::VauClientConfig;
use crate::constants::{header_keys, INITIAL_PSEUDONYM, OCTET_STREAM};
use crate::crypto::SessionKey;
use crate::envelope::{VauEncryptionEnvelope, VauEnvelopeCipher};
use crate::http::{decode_response, encode_request, HttpHeader, HttpRequest, HttpResponse};
use crate::telemetry::{
    EnvelopeRequestObserver, EnvelopeResponseObserver, ObserverRegistry, RequestObserver,
    ResponseObserver, SessionCounters, SessionSnapshot, SessionTimer, Stage,
};
use crate::transport::{download_certificate, OuterRequest, OuterResponse, VauTransport};
use crate::types::VauError;
use crate::utils::is_valid_path_segment;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    Uninitialized,
    Ready,
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::Ready => "ready",
            SessionState::Closed => "closed",
        };
        f.write_str(name)
    }
}

pub struct VauSession<T: VauTransport> {
    config: VauClientConfig,
    static_headers: Vec<HttpHeader>,
    cipher: VauEnvelopeCipher,
    transport: T,
    pseudonym: String,
    state: SessionState,
    observers: ObserverRegistry,
    counters: SessionCounters,
    timer: SessionTimer,
}

impl<T: VauTransport> VauSession<T> {
    /// Uninitialized session against a known peer key.
    pub fn new(mut config: VauClientConfig, public_key: PublicKey, transport: T) -> Result<Self, VauError> {
        config.normalize();
        config.validate()?;
        let cipher = VauEnvelopeCipher::new(config.version, public_key);
        Ok(Self {
            static_headers: config.static_headers(),
            config,
            cipher,
            transport,
            pseudonym: INITIAL_PSEUDONYM.to_string(),
            state: SessionState::Uninitialized,
            observers: ObserverRegistry::new(),
            counters: SessionCounters::default(),
            timer: SessionTimer::new(),
        })
    }

    /// Fetch the peer certificate through `transport`, then construct.
    pub fn from_remote(mut config: VauClientConfig, transport: T) -> Result<Self, VauError> {
        config.normalize();
        config.validate()?;
        let public_key = download_certificate(&transport, &config.base_url, config.api_key.as_deref())?;
        Self::new(config, public_key, transport)
    }

    /// Key agreement; `Uninitialized → Ready`.
    pub fn init(&mut self) -> Result<&SessionKey, VauError> {
        self.expect_state(SessionState::Uninitialized)?;
        self.cipher.establish()?;
        self.state = SessionState::Ready;
        info!(version = %self.config.version, base_url = %self.config.base_url, "VAU session ready");
        self.symmetric_key().ok_or(VauError::InvalidState {
            expected: SessionState::Ready,
            actual: self.state,
        })
    }

    /// One full exchange: encode, seal, post, classify, open, decode.
    pub fn send(&mut self, request: &HttpRequest) -> Result<HttpResponse, VauError> {
        self.expect_state(SessionState::Ready)?;
        let bearer = request.bearer_token().ok_or(VauError::MissingAuthorizationBearer)?;

        let inner = self.timer.measure(Stage::Encode, || encode_request(request));
        let envelope = {
            let cipher = &mut self.cipher;
            self.timer.measure(Stage::Encrypt, || cipher.encrypt(bearer, &inner))?
        };

        let outer = self.build_outer_request(request, &envelope);
        self.observers.notify_request(&outer);
        self.observers.notify_envelope_request(&envelope);
        self.counters.add_request(inner.len(), envelope.len());

        info!(url = %outer.url, request_id = %envelope.request_id_hex(), "send VAU request");
        let transport = &self.transport;
        let outer_response = self.timer.measure(Stage::Transport, || transport.execute(&outer))?;

        self.update_pseudonym(&outer_response);
        let status = outer_response.status_code;
        let response = self.classify(outer_response)?;
        self.observers.notify_response(&response);

        info!(
            status,
            request_id = %envelope.request_id_hex(),
            pseudonym = %self.pseudonym,
            "received VAU response"
        );
        Ok(response)
    }

    /// Release the transport; any state → `Closed`.
    pub fn shut_down(&mut self) {
        if self.state != SessionState::Closed {
            self.transport.shutdown();
            self.state = SessionState::Closed;
            info!(exchanges = self.counters.exchanges, "VAU session closed");
        }
    }

    pub fn symmetric_key(&self) -> Option<&SessionKey> {
        self.cipher.session_key()
    }

    pub fn pseudonym(&self) -> &str {
        &self.pseudonym
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &VauClientConfig {
        &self.config
    }

    pub fn peer_public_key(&self) -> &PublicKey {
        self.cipher.peer_public_key()
    }

    pub fn counters(&self) -> &SessionCounters {
        &self.counters
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::from(&self.pseudonym, &self.counters, &self.timer)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn observers(&self) -> &ObserverRegistry {
        &self.observers
    }

    pub fn register_request_observer(&mut self, observer: impl RequestObserver + 'static) {
        self.observers.register_request(observer);
    }

    pub fn register_response_observer(&mut self, observer: impl ResponseObserver + 'static) {
        self.observers.register_response(observer);
    }

    pub fn register_envelope_request_observer(&mut self, observer: impl EnvelopeRequestObserver + 'static) {
        self.observers.register_envelope_request(observer);
    }

    pub fn register_envelope_response_observer(&mut self, observer: impl EnvelopeResponseObserver + 'static) {
        self.observers.register_envelope_response(observer);
    }

    fn expect_state(&self, expected: SessionState) -> Result<(), VauError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(VauError::InvalidState { expected, actual: self.state })
        }
    }

    fn build_outer_request(&self, request: &HttpRequest, envelope: &VauEncryptionEnvelope) -> OuterRequest {
        let mut outer = OuterRequest::post(self.config.vau_url(&self.pseudonym), envelope.as_bytes().to_vec());
        outer.headers.extend(self.static_headers.iter().cloned());
        outer.headers.extend(
            request
                .headers
                .iter()
                .filter(|h| !h.matches(header_keys::CONTENT_TYPE) && !h.matches(header_keys::CONTENT_LENGTH))
                .cloned(),
        );
        outer
    }

    fn update_pseudonym(&mut self, response: &OuterResponse) {
        let Some(raw) = response.header_value(header_keys::USER_PSEUDONYM) else {
            return;
        };
        let value = raw.trim();
        if is_valid_path_segment(value) {
            self.pseudonym = value.to_string();
        } else {
            warn!(value = %raw, kept = %self.pseudonym, "ignoring invalid Userpseudonym");
        }
    }

    fn classify(&mut self, outer: OuterResponse) -> Result<HttpResponse, VauError> {
        let is_encrypted = outer.content_type().is_some_and(|ct| ct.to_ascii_lowercase().contains(OCTET_STREAM));
        if !is_encrypted {
            warn!(
                content_type = outer.content_type().unwrap_or("<none>"),
                body = %String::from_utf8_lossy(&outer.body),
                "VAU response seems not encrypted, forwarding plain content"
            );
            self.counters.add_plain_response(outer.body.len());
            return Ok(outer.into_http_response());
        }

        self.observers.notify_envelope_response(&outer.body);
        let cipher = &self.cipher;
        let opened = self.timer.measure(Stage::Decrypt, || cipher.decrypt(&outer.body));
        let plaintext = match opened {
            Ok(plaintext) => plaintext,
            Err(e) => {
                error!(
                    len = outer.body.len(),
                    body = %B64.encode(&outer.body),
                    "error while decrypting VAU response: {e}"
                );
                self.counters.add_decrypt_failure(outer.body.len());
                return Err(e);
            }
        };
        self.counters.add_encrypted_response(outer.body.len());

        Ok(self.timer.measure(Stage::Decode, || decode_response(&plaintext))?)
    }
}

impl<T: VauTransport> Drop for VauSession<T> {
    fn drop(&mut self) {
        self.shut_down();
    }
}

impl<T: VauTransport> fmt::Debug for VauSession<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VauSession")
            .field("base_url", &self.config.base_url)
            .field("version", &self.config.version)
            .field("state", &self.state)
            .field("pseudonym", &self.pseudonym)
            .field("observers", &self.observers)
            .finish()
    }
}
