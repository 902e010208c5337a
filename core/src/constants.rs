//! Protocol constants shared by the codec, the envelope and the session.

/// Outer endpoint serving the peer certificate.
pub const CERTIFICATE_PATH: &str = "/VAUCertificate";

/// Outer endpoint prefix; the pseudonym is appended as last path segment.
pub const VAU_PATH: &str = "/VAU/";

/// Every session starts with this pseudonym.
pub const INITIAL_PSEUDONYM: &str = "0";

/// Protocol string written into every inner request line.
pub const INNER_HTTP_VERSION: &str = "HTTP/1.1";

/// Marker searched for in the inner status line.
pub const HTTP_VERSION_MARKER: &str = "HTTP/";

pub const LINE_BREAK: &str = "\r\n";
pub const DOUBLE_LINE_BREAK: &str = "\r\n\r\n";

/// Media type of every encrypted outer body.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Header names used by the protocol.
pub mod header_keys {
    pub const AUTHORIZATION: &str = "Authorization";
    pub const CONTENT_TYPE: &str = "Content-Type";
    pub const CONTENT_LENGTH: &str = "Content-Length";
    pub const ACCEPT: &str = "Accept";
    pub const ACCEPT_CHARSET: &str = "Accept-Charset";
    pub const USER_AGENT: &str = "User-Agent";
    pub const X_API_KEY: &str = "X-api-key";
    pub const USER_PSEUDONYM: &str = "Userpseudonym";

    /// Inner requests always carry a recomputed, lower-case length header.
    pub const INNER_CONTENT_LENGTH: &str = "content-length";
}

/// Authorization scheme prefix stripped from the bearer header.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Random request id length in bytes (hex encoded on the wire).
pub const REQUEST_ID_LEN: usize = 16;

/// HKDF `info` label binding the derived key to the transport use.
pub const HKDF_INFO_VAU_TRANSPORT: &[u8] = b"ecies-vau-transport";
