use flyshaker_audio::{Fades, OutputConfig};
use flyshaker_wave::WaveSpec;
use std::time::Duration;

use crate::burst::BurstPolicy;
use crate::error::{ExperimentError, ExperimentResult};
use crate::wait::DEFAULT_TICK;

/// Everything the operator chose for one experiment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExperimentPlan {
    pub wave: WaveSpec,
    pub burst: BurstPolicy,
    pub total_run_time_s: f64,
}

impl ExperimentPlan {
    /// Reject the plan before anything is synthesized or played.
    pub fn validate(&self, sample_rate: u32) -> ExperimentResult<()> {
        self.wave.validate(sample_rate)?;
        self.burst.validate()?;
        if !(self.total_run_time_s.is_finite() && self.total_run_time_s > 0.0) {
            return Err(ExperimentError::InvalidRunTime(self.total_run_time_s));
        }
        if Duration::try_from_secs_f64(self.total_run_time_s).is_err() {
            return Err(ExperimentError::RunTimeTooLong);
        }
        Ok(())
    }

    /// Zero for a run time that would not pass validation.
    pub fn total_run_time(&self) -> Duration {
        Duration::try_from_secs_f64(self.total_run_time_s).unwrap_or(Duration::ZERO)
    }
}

/// Settings that stay fixed across experiments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExperimentConfig {
    pub output: OutputConfig,
    pub fades: Fades,
    /// Stop-request polling interval during silences.
    pub tick: Duration,
    /// Seed for random burst draws; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            output: OutputConfig::default(),
            fades: Fades::default(),
            tick: DEFAULT_TICK,
            seed: None,
        }
    }
}
