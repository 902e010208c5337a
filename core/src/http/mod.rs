//! http/mod.rs
//! Inner HTTP codec: the plaintext request/response carried inside the
//! VAU envelope.
//!
//! Wire form:
//! - Request: `{METHOD} {path} HTTP/1.1\r\n` + headers + `content-length: N\r\n\r\n` + body
//! - Response: `{opaque prefix} HTTP/{v} {code} {reason}\r\n` + headers + `\r\n` + body

pub mod types;
pub mod encode;
pub mod decode;

pub use types::*;
pub use encode::*;
pub use decode::*;
