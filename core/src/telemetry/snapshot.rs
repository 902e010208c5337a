// ## src/telemetry/snapshot.rs

//! telemetry/snapshot.rs
//! Immutable, serializable view of a session's counters and timings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::SessionCounters;
use crate::telemetry::timers::{SessionTimer, Stage, StageTimes};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub pseudonym: String,
    pub counters: SessionCounters,
    /// Envelope bytes out / plaintext bytes out; 0.0 before the first send.
    pub envelope_expansion: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
}

impl SessionSnapshot {
    pub fn from(pseudonym: &str, counters: &SessionCounters, timer: &SessionTimer) -> Self {
        let envelope_expansion = if counters.bytes_plaintext_out > 0 {
            counters.bytes_envelope_out as f64 / counters.bytes_plaintext_out as f64
        } else {
            0.0
        };

        Self {
            pseudonym: pseudonym.to_string(),
            counters: counters.clone(),
            envelope_expansion,
            elapsed: timer.elapsed(),
            stage_times: timer.stage_times.clone(),
        }
    }

    pub fn total_stage_time(&self) -> Duration {
        self.stage_times.total()
    }

    pub fn has_all_stages(&self, expected: &[Stage]) -> bool {
        self.stage_times.has_all(expected)
    }

    /// Invariants that must hold for any snapshot taken from a live session.
    pub fn sanity_check(&self) -> bool {
        let c = &self.counters;
        c.encrypted_responses + c.plain_responses + c.decrypt_failures <= c.exchanges
            && (c.exchanges == 0 || c.bytes_envelope_out >= c.bytes_plaintext_out)
            && self.total_stage_time() <= self.elapsed
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
