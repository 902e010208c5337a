//! envelope/mod.rs
//! Versioned binary envelope carrying the encrypted inner HTTP.
//!
//! Notes:
//! - One version byte selects curve, KDF and AEAD parameters.
//! - Header bytes are bound into the AEAD as associated data.
//! - `cipher` owns the session key; the other files are pure framing.

pub mod types;
pub mod encode;
pub mod decode;
pub mod cipher;

pub use types::*;
pub use encode::*;
pub use decode::*;
pub use cipher::*;
