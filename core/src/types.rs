use thiserror::Error;

use crate::{
    config::ConfigError,
    crypto::CryptoError,
    envelope::EnvelopeError,
    http::DecodeError,
    session::SessionState,
    transport::TransportError,
};

/// Unified client error covering codec, crypto, envelope, certificate,
/// configuration and transport failures.
/// - `From<T>` impls enable `?` across the layers.
/// - Transport errors pass through unchanged.
#[derive(Debug, Error)]
pub enum VauError {
    /// Outgoing request has no `Authorization: Bearer` header.
    #[error("request is missing an Authorization bearer token")]
    MissingAuthorizationBearer,

    /// Inner HTTP could not be decoded.
    #[error("vau decode error: {0}")]
    Decode(#[from] DecodeError),

    /// AEAD, key agreement or key derivation failure.
    #[error("vau crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Malformed or foreign binary envelope.
    #[error("vau envelope error: {0}")]
    Envelope(#[from] EnvelopeError),

    /// Peer certificate missing, empty or unparsable.
    #[error("vau certificate error: {0}")]
    Certificate(String),

    /// Operation not allowed in the current session state.
    #[error("invalid session state: expected {expected:?}, actual {actual:?}")]
    InvalidState { expected: SessionState, actual: SessionState },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl VauError {
    /// True for the protocol-level failures: decode, crypto, envelope,
    /// certificate.
    pub fn is_vau_exception(&self) -> bool {
        matches!(
            self,
            VauError::Decode(_)
                | VauError::Crypto(_)
                | VauError::Envelope(_)
                | VauError::Certificate(_)
        )
    }
}
