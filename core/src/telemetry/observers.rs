// ## 📂 File: `src/telemetry/observers.rs`

//! telemetry/observers.rs
//! Read-only taps on the send pipeline.
//!
//! Design notes:
//! - Four hook points: outer request, final response, envelope request,
//!   raw envelope response.
//! - Called synchronously in registration order on the sending thread.
//! - Observers only ever receive shared references.
//! - Any `Fn(&T) + Send + Sync` closure is an observer.

use crate::envelope::VauEncryptionEnvelope;
use crate::http::HttpResponse;
use crate::transport::OuterRequest;

/// Sees the outer POST right before it goes to the transport.
pub trait RequestObserver: Send + Sync {
    fn on_request(&self, request: &OuterRequest);
}

/// Sees the response handed back to the caller, encrypted or plain path.
pub trait ResponseObserver: Send + Sync {
    fn on_response(&self, response: &HttpResponse);
}

/// Sees the sealed envelope of every request.
pub trait EnvelopeRequestObserver: Send + Sync {
    fn on_envelope_request(&self, envelope: &VauEncryptionEnvelope);
}

/// Sees the still-encrypted response body before it is opened.
pub trait EnvelopeResponseObserver: Send + Sync {
    fn on_envelope_response(&self, envelope: &[u8]);
}

impl<F> RequestObserver for F
where
    F: Fn(&OuterRequest) + Send + Sync,
{
    fn on_request(&self, request: &OuterRequest) {
        self(request)
    }
}

impl<F> ResponseObserver for F
where
    F: Fn(&HttpResponse) + Send + Sync,
{
    fn on_response(&self, response: &HttpResponse) {
        self(response)
    }
}

impl<F> EnvelopeRequestObserver for F
where
    F: Fn(&VauEncryptionEnvelope) + Send + Sync,
{
    fn on_envelope_request(&self, envelope: &VauEncryptionEnvelope) {
        self(envelope)
    }
}

impl<F> EnvelopeResponseObserver for F
where
    F: Fn(&[u8]) + Send + Sync,
{
    fn on_envelope_response(&self, envelope: &[u8]) {
        self(envelope)
    }
}

/// Ordered observer lists for one session.
#[derive(Default)]
pub struct ObserverRegistry {
    requests: Vec<Box<dyn RequestObserver>>,
    responses: Vec<Box<dyn ResponseObserver>>,
    envelope_requests: Vec<Box<dyn EnvelopeRequestObserver>>,
    envelope_responses: Vec<Box<dyn EnvelopeResponseObserver>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_request(&mut self, observer: impl RequestObserver + 'static) {
        self.requests.push(Box::new(observer));
    }

    pub fn register_response(&mut self, observer: impl ResponseObserver + 'static) {
        self.responses.push(Box::new(observer));
    }

    pub fn register_envelope_request(&mut self, observer: impl EnvelopeRequestObserver + 'static) {
        self.envelope_requests.push(Box::new(observer));
    }

    pub fn register_envelope_response(&mut self, observer: impl EnvelopeResponseObserver + 'static) {
        self.envelope_responses.push(Box::new(observer));
    }

    pub fn notify_request(&self, request: &OuterRequest) {
        self.requests.iter().for_each(|o| o.on_request(request));
    }

    pub fn notify_response(&self, response: &HttpResponse) {
        self.responses.iter().for_each(|o| o.on_response(response));
    }

    pub fn notify_envelope_request(&self, envelope: &VauEncryptionEnvelope) {
        self.envelope_requests.iter().for_each(|o| o.on_envelope_request(envelope));
    }

    pub fn notify_envelope_response(&self, envelope: &[u8]) {
        self.envelope_responses.iter().for_each(|o| o.on_envelope_response(envelope));
    }

    pub fn len(&self) -> usize {
        self.requests.len() + self.responses.len() + self.envelope_requests.len() + self.envelope_responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("requests", &self.requests.len())
            .field("responses", &self.responses.len())
            .field("envelope_requests", &self.envelope_requests.len())
            .field("envelope_responses", &self.envelope_responses.len())
            .finish()
    }
}
