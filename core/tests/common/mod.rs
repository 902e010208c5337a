//! Shared fixtures: an in-process VAU peer and a recording transport.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use p256::{PublicKey, SecretKey};
use rand::rngs::OsRng;

use vau_client::constants::{header_keys, OCTET_STREAM};
use vau_client::crypto::{agree_static, AeadImpl, NonceSequence, SessionKey};
use vau_client::envelope::{
    assemble_envelope, compose_response_plaintext, decode_request_envelope, encode_response_header,
    parse_request_plaintext, VauVersion,
};
use vau_client::http::HttpHeader;
use vau_client::transport::{OuterRequest, OuterResponse, TransportError, VauTransport};
use vau_client::types::VauError;

pub const BASE_URL: &str = "https://erp.example.test";

/// Server side of the envelope, holding the static key.
#[derive(Clone)]
pub struct VauPeer {
    secret: SecretKey,
    version: VauVersion,
}

/// A request envelope opened by the peer.
#[derive(Debug)]
pub struct OpenedRequest {
    pub session_key: SessionKey,
    pub bearer: String,
    pub request_id_hex: String,
    pub response_key_hex: String,
    pub inner_http: Vec<u8>,
}

impl VauPeer {
    pub fn new() -> Self {
        Self { secret: SecretKey::random(&mut OsRng), version: VauVersion::V1 }
    }

    pub fn from_secret(secret: SecretKey) -> Self {
        Self { secret, version: VauVersion::V1 }
    }

    pub fn public_key(&self) -> PublicKey {
        self.secret.public_key()
    }

    pub fn open_request(&self, envelope: &[u8]) -> Result<OpenedRequest, VauError> {
        let parts = decode_request_envelope(envelope, self.version)?;
        let session_key = agree_static(&self.secret, &parts.ephemeral_xy, self.version.key_len())?;
        let aead = AeadImpl::from_key(&session_key)?;
        let plaintext = aead.open(&parts.nonce, parts.aad, parts.ciphertext)?;
        let framed = parse_request_plaintext(&plaintext)?;
        Ok(OpenedRequest {
            bearer: framed.bearer.to_string(),
            request_id_hex: framed.request_id_hex.to_string(),
            response_key_hex: framed.response_key_hex.to_string(),
            inner_http: framed.inner_http.to_vec(),
            session_key,
        })
    }

    pub fn seal_response(&self, key: &SessionKey, request_id_hex: &str, inner_http: &[u8]) -> Vec<u8> {
        let plaintext = compose_response_plaintext(self.version, request_id_hex, inner_http);
        let header = encode_response_header(self.version);
        let nonce = NonceSequence::random().next_nonce().unwrap();
        let aead = AeadImpl::from_key(key).unwrap();
        let sealed = aead.seal(&nonce, &header, &plaintext).unwrap();
        assemble_envelope(&header, &nonce, &sealed)
    }
}

type Responder = Box<dyn Fn(&OuterRequest) -> Result<OuterResponse, TransportError> + Send + Sync>;

/// Transport double: records every request and answers from a closure.
pub struct MockTransport {
    responder: Responder,
    calls: Arc<Mutex<Vec<OuterRequest>>>,
    shut_down: Arc<AtomicBool>,
}

impl MockTransport {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&OuterRequest) -> Result<OuterResponse, TransportError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            calls: Arc::new(Mutex::new(Vec::new())),
            shut_down: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Same plain response for every call.
    pub fn fixed(status: u16, content_type: &str, body: &[u8]) -> Self {
        let headers = vec![HttpHeader::new(header_keys::CONTENT_TYPE, content_type)];
        let body = body.to_vec();
        Self::new(move |_req: &OuterRequest| Ok(OuterResponse::new(status, headers.clone(), body.clone())))
    }

    pub fn requests(&self) -> Vec<OuterRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_handle(&self) -> Arc<Mutex<Vec<OuterRequest>>> {
        Arc::clone(&self.calls)
    }

    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shut_down)
    }

    pub fn was_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }
}

impl VauTransport for MockTransport {
    fn execute(&self, request: &OuterRequest) -> Result<OuterResponse, TransportError> {
        self.calls.lock().unwrap().push(request.clone());
        if self.was_shut_down() {
            return Err(TransportError::Closed);
        }
        (self.responder)(request)
    }

    fn shutdown(&mut self) {
        self.shut_down.store(true, Ordering::SeqCst);
    }
}

/// Mock VAU endpoint: opens each request with `peer`, lets `handler` produce
/// extra outer headers and the inner HTTP answer, seals it back.
pub fn vau_server<H>(peer: VauPeer, handler: H) -> MockTransport
where
    H: Fn(&OpenedRequest) -> (Vec<HttpHeader>, Vec<u8>) + Send + Sync + 'static,
{
    MockTransport::new(move |req: &OuterRequest| {
        let opened = peer.open_request(&req.body).map_err(|e| TransportError::Failed(e.to_string()))?;
        let (extra, inner) = handler(&opened);
        let mut headers = vec![HttpHeader::new(header_keys::CONTENT_TYPE, OCTET_STREAM)];
        headers.extend(extra);
        let body = peer.seal_response(&opened.session_key, &opened.request_id_hex, &inner);
        Ok(OuterResponse::new(200, headers, body))
    })
}

pub fn inner_ok(body: &str) -> Vec<u8> {
    format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/fhir+json\r\nContent-Length: {}\r\n\r\n{}",
        body.len(),
        body
    )
    .into_bytes()
}
