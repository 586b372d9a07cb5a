//! # Vigil Engine
//!
//! Core engine for concurrent HTTP reachability probing: a fixed catalog of
//! targets, one self-pacing request loop per target, one shared client, and a
//! snapshot interface a display layer can poll while the loops keep running.
//!
//! - One [`Prober`] per [`Target`], paced to its `max_frequency_hz`
//! - Every request failure classified into an [`Outcome`], never a loop exit
//! - [`TargetStats`] written by exactly one loop, snapshotted by any reader
//! - [`Orchestrator`] owns the shared client and drains loops on cancellation

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod outcome;
pub mod prober;
pub mod stats;
pub mod target;
pub mod transport;
pub mod urlgen;

/// Re-export key types
pub use config::{DEFAULT_REQUEST_TIMEOUT, DEFAULT_USER_AGENT, ProbeConfig};
pub use error::EngineError;
pub use orchestrator::{Orchestrator, TargetSnapshot};
pub use outcome::{Outcome, REACHABLE_MESSAGE};
pub use prober::Prober;
pub use stats::{StatsSnapshot, TargetStats};
pub use target::{DEFAULT_MAX_FREQUENCY_HZ, Target, strip_scheme};
pub use transport::{HttpTransport, Transport};
