//! The experiment loop executed on the worker thread.

use flyshaker_audio::{AudioBackend, AudioError, PlaybackDriver};
use flyshaker_wave::SampleBuffer;
use rand::Rng;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use crate::burst::{compute_playback_and_wait, resolve_burst};
use crate::controller::RunState;
use crate::plan::ExperimentPlan;
use crate::wait::{wait, WaitOutcome};

#[derive(Debug)]
pub enum RunOutcome {
    /// The total run time was reached.
    Completed,
    /// The operator stopped the run.
    Cancelled,
    /// The audio device failed mid-run.
    Failed(AudioError),
}

#[derive(Debug)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub elapsed: Duration,
    pub cycles: u32,
}

impl RunReport {
    pub fn elapsed_breakdown(&self) -> ElapsedBreakdown {
        ElapsedBreakdown::from(self.elapsed)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match &self.outcome {
            RunOutcome::Completed => "completed".to_string(),
            RunOutcome::Cancelled => "stopped by operator".to_string(),
            RunOutcome::Failed(err) => format!("failed: {}", err),
        };
        write!(
            f,
            "experiment {} after {} ({} cycles)",
            status,
            self.elapsed_breakdown(),
            self.cycles
        )
    }
}

/// Elapsed time split into hours, minutes and seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElapsedBreakdown {
    pub hours: i64,
    pub minutes: i64,
    pub seconds: f64,
}

impl From<Duration> for ElapsedBreakdown {
    fn from(elapsed: Duration) -> Self {
        let total = time::Duration::try_from(elapsed).unwrap_or(time::Duration::MAX);
        let hours = total.whole_hours();
        let minutes = total.whole_minutes() - hours * 60;
        let seconds = total.as_seconds_f64() - (total.whole_minutes() * 60) as f64;
        Self {
            hours,
            minutes,
            seconds,
        }
    }
}

impl fmt::Display for ElapsedBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} h {:02} min {:04.1} s",
            self.hours, self.minutes, self.seconds
        )
    }
}

/// Play bursts of `buffer` until the plan's run time is reached or `state`
/// stops running. Clears `state` on exit, whatever the outcome.
pub(crate) fn run_experiment<B, R>(
    plan: &ExperimentPlan,
    buffer: &SampleBuffer,
    driver: &mut PlaybackDriver<B>,
    state: &RunState,
    tick: Duration,
    rng: &mut R,
) -> RunReport
where
    B: AudioBackend,
    R: Rng + ?Sized,
{
    let start = Instant::now();
    let total = plan.total_run_time();
    let buffer_s = buffer.duration_s();
    let mut cycles = 0u32;

    let outcome = loop {
        if !state.is_running() {
            break RunOutcome::Cancelled;
        }

        let burst_s = resolve_burst(&plan.burst, rng);
        let segment = compute_playback_and_wait(burst_s, buffer_s);
        debug!(
            cycle = cycles + 1,
            burst_s,
            playback_ms = segment.playback_ms,
            wait_s = segment.wait_s,
            "starting burst"
        );

        if let Err(err) = driver.render(buffer, segment.playback_ms) {
            error!("playback failed: {}", err);
            break RunOutcome::Failed(err);
        }
        cycles += 1;

        if wait(segment.wait_s, tick, || !state.is_running()) == WaitOutcome::Cancelled {
            info!("stop requested");
            break RunOutcome::Cancelled;
        }

        if start.elapsed() >= total {
            break RunOutcome::Completed;
        }
    };

    state.finish();
    let report = RunReport {
        outcome,
        elapsed: start.elapsed(),
        cycles,
    };
    info!("{}", report);
    report
}
