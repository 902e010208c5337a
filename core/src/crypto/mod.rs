
pub mod types;
pub mod aead;
pub mod kdf;
pub mod nonce;
pub mod agreement;
pub mod certificate;

pub use types::*;
pub use aead::*;
pub use kdf::*;
pub use nonce::*;
pub use agreement::*;
pub use certificate::*;
