//! vau-client
//!
//! Blocking client for the VAU tunnel: inner HTTP sealed into an encrypted
//! envelope and carried by an outer HTTP POST.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;
pub mod config;

// Protocol layers
pub mod http;
pub mod crypto;
pub mod envelope;

// Session and collaborators
pub mod transport;
pub mod telemetry;
pub mod session;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::config::VauClientConfig;
    pub use crate::envelope::{VauEncryptionEnvelope, VauEnvelopeCipher, VauVersion};
    pub use crate::http::{HttpHeader, HttpMethod, HttpRequest, HttpResponse};
    pub use crate::session::{SessionState, VauSession};
    pub use crate::transport::{HttpTransport, OuterRequest, OuterResponse, TransportError, VauTransport};
    pub use crate::types::VauError;
}
