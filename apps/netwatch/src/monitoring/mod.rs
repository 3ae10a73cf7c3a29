//! Probing engine: outcome classification, rolling per-host metrics,
//! and the long-lived per-target probe loops.

pub mod checker;
pub mod scheduler;
pub mod types;

pub use checker::{IcmpPinger, Pinger};
pub use scheduler::{ProbeScheduler, ProbeSettings};
pub use types::{HostRecord, HostTable, ProbeOutcome, ProbeStatus, Trend};
