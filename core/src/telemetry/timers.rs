// ## src/telemetry/timers.rs

//! telemetry/timers.rs
//! Stage timers for the send pipeline.
//!
//! Summary: Accumulates durations for encode, encrypt, transport, decrypt
//! and decode across all exchanges of a session.

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Encode,
    Encrypt,
    Transport,
    Decrypt,
    Decode,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Encode    => "encode",
            Stage::Encrypt   => "encrypt",
            Stage::Transport => "transport",
            Stage::Decrypt   => "decrypt",
            Stage::Decode    => "decode",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageTimes {
    times: HashMap<Stage, Duration>,
}

impl StageTimes {
    /// Add duration to a stage (accumulates if already present).
    pub fn add(&mut self, stage: Stage, dur: Duration) {
        *self.times.entry(stage).or_insert(Duration::ZERO) += dur;
    }

    pub fn get(&self, stage: Stage) -> Duration {
        self.times.get(&stage).copied().unwrap_or(Duration::ZERO)
    }

    pub fn total(&self) -> Duration {
        self.times.values().copied().sum()
    }

    /// True when every stage in `expected` has been measured at least once.
    pub fn has_all(&self, expected: &[Stage]) -> bool {
        expected.iter().all(|s| self.times.contains_key(s))
    }
}

/// Session-lifetime timer plus per-stage accumulators.
#[derive(Clone, Debug)]
pub struct SessionTimer {
    pub start_time: Instant,
    pub stage_times: StageTimes,
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionTimer {
    pub fn new() -> Self {
        Self { start_time: Instant::now(), stage_times: StageTimes::default() }
    }

    /// Run `f`, charging its wall time to `stage`.
    pub fn measure<R>(&mut self, stage: Stage, f: impl FnOnce() -> R) -> R {
        let t = Instant::now();
        let out = f();
        self.stage_times.add(stage, t.elapsed());
        out
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}
