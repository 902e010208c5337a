// ## 📂 File: `src/crypto/nonce.rs`

//! crypto/nonce.rs
//! Per-message nonce schedule for one session key.
//!
//! Design:
//! - TLS-like scheme: a random 12-byte base IV per session, the low 8 bytes
//!   XORed with a little-endian message counter.
//! - The counter only moves forward; it never wraps under the same key.
//!
//! Security notes:
//! - The base must be random per session. All-zero bases are rejected.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::crypto::types::{CryptoError, NONCE_LEN_12};

/// Derive the nonce for `counter` from a session `base`.
///
/// - nonce[0..4] stays the static prefix of the base.
/// - nonce[4..12] = base[4..12] XOR counter (little-endian).
#[inline]
pub fn derive_nonce_12(base: &[u8; NONCE_LEN_12], counter: u64) -> [u8; NONCE_LEN_12] {
    let mut nonce = *base;
    let ctr = counter.to_le_bytes();
    for (n, c) in nonce[4..].iter_mut().zip(ctr.iter()) {
        *n ^= c;
    }
    nonce
}

/// Stateful nonce source bound to one session key.
#[derive(Debug)]
pub struct NonceSequence {
    base: [u8; NONCE_LEN_12],
    counter: u64,
}

impl NonceSequence {
    /// Fresh sequence with a random base from the OS RNG.
    pub fn random() -> Self {
        let mut base = [0u8; NONCE_LEN_12];
        while base.iter().all(|&b| b == 0) {
            OsRng.fill_bytes(&mut base);
        }
        Self { base, counter: 0 }
    }

    pub fn from_base(base: [u8; NONCE_LEN_12]) -> Result<Self, CryptoError> {
        if base.iter().all(|&b| b == 0) {
            return Err(CryptoError::Failure("nonce base must not be all-zero".into()));
        }
        Ok(Self { base, counter: 0 })
    }

    /// Next unused nonce.
    pub fn next_nonce(&mut self) -> Result<[u8; NONCE_LEN_12], CryptoError> {
        let nonce = derive_nonce_12(&self.base, self.counter);
        self.counter = self.counter.checked_add(1).ok_or(CryptoError::NonceExhausted)?;
        Ok(nonce)
    }

    /// Number of nonces handed out so far.
    pub fn issued(&self) -> u64 {
        self.counter
    }
}
