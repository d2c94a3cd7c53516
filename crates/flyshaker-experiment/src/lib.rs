//! Experiment scheduling for the fly shaker: burst timing, cancellable
//! silences, and the start/stop controller around the playback loop.

pub mod burst;
pub mod controller;
pub mod error;
pub mod plan;
pub mod runner;
pub mod wait;

pub use burst::{compute_playback_and_wait, resolve_burst, BurstPolicy, Segment};
pub use controller::{ExperimentController, RunState, Start};
pub use error::{ExperimentError, ExperimentResult};
pub use plan::{ExperimentConfig, ExperimentPlan};
pub use runner::{ElapsedBreakdown, RunOutcome, RunReport};
pub use wait::{wait, WaitOutcome, DEFAULT_TICK};
