//! telemetry/mod.rs
//! Diagnostics for one VAU session: observer taps, exchange counters,
//! stage timers and a serializable snapshot.
//!
//! Notes:
//! - Observers are read-only and run synchronously on the calling thread.
//! - Counters and timers are plain values owned by the session; no locks.

pub mod observers;
pub mod counters;
pub mod timers;
pub mod snapshot;

pub use observers::*;
pub use counters::*;
pub use timers::*;
pub use snapshot::*;
