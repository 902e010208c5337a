// ### `src/telemetry/counters.rs`

//! telemetry/counters.rs
//! Exchange counters for one session.
//!
//! Summary: Counts sends, encrypted vs. plain responses and the bytes that
//! crossed the outer transport. Converted into a `SessionSnapshot` on demand.

use serde::{Deserialize, Serialize};

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCounters {
    /// Outer POSTs handed to the transport.
    pub exchanges: u64,
    pub encrypted_responses: u64,
    pub plain_responses: u64,
    pub decrypt_failures: u64,
    /// Inner request bytes before sealing.
    pub bytes_plaintext_out: u64,
    /// Envelope bytes sent.
    pub bytes_envelope_out: u64,
    /// Outer response body bytes received.
    pub bytes_in: u64,
}

impl SessionCounters {
    /// Record one outer request.
    ///
    /// - `plaintext_len`: encoded inner request length
    /// - `envelope_len`: sealed envelope length on the wire
    pub fn add_request(&mut self, plaintext_len: usize, envelope_len: usize) {
        self.exchanges += 1;
        self.bytes_plaintext_out += plaintext_len as u64;
        self.bytes_envelope_out += envelope_len as u64;
    }

    pub fn add_encrypted_response(&mut self, body_len: usize) {
        self.encrypted_responses += 1;
        self.bytes_in += body_len as u64;
    }

    pub fn add_plain_response(&mut self, body_len: usize) {
        self.plain_responses += 1;
        self.bytes_in += body_len as u64;
    }

    pub fn add_decrypt_failure(&mut self, body_len: usize) {
        self.decrypt_failures += 1;
        self.bytes_in += body_len as u64;
    }

    /// Envelope bytes added on top of the inner plaintext.
    pub fn envelope_overhead_bytes(&self) -> u64 {
        self.bytes_envelope_out.saturating_sub(self.bytes_plaintext_out)
    }
}
