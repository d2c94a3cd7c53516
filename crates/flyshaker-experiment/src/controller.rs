//! Start/stop control of an experiment running on a worker thread.

use flyshaker_audio::{AudioBackend, PlaybackDriver};
use flyshaker_wave::{dominant_frequency, SampleBuffer};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{debug, info, warn, Level};

use crate::error::{ExperimentError, ExperimentResult};
use crate::plan::{ExperimentConfig, ExperimentPlan};
use crate::runner::{run_experiment, RunReport};

/// The flag shared between the control surface and the worker.
///
/// The control surface sets it on start and clears it to request a stop; the
/// worker polls it between segments and clears it when the run ends.
#[derive(Debug, Default)]
pub struct RunState {
    is_running: AtomicBool,
}

impl RunState {
    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Acquire)
    }

    /// Idle to running. Returns `false` if a run was already active.
    pub(crate) fn begin(&self) -> bool {
        self.is_running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn request_stop(&self) {
        self.is_running.store(false, Ordering::Release);
    }

    pub(crate) fn finish(&self) {
        self.is_running.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Start {
    Started,
    /// An experiment is still active or its report has not been collected.
    Ignored,
}

/// Log the synthesized template. The FFT behind the measured frequency only
/// runs when debug logging is enabled; returns that measurement if taken.
fn log_template(plan: &ExperimentPlan, buffer: &SampleBuffer) -> Option<f64> {
    if !tracing::enabled!(Level::DEBUG) {
        return None;
    }
    let measured_hz = dominant_frequency(buffer);
    debug!(
        samples = buffer.len(),
        duration_s = buffer.duration_s(),
        peak = buffer.peak(),
        measured_hz = measured_hz.unwrap_or(0.0),
        requested_hz = plan.wave.frequency_hz(),
        "template synthesized"
    );
    measured_hz
}

/// Owns at most one experiment at a time.
///
/// A finished experiment stays attached until its report is collected with
/// [`poll`](Self::poll) or [`join`](Self::join); only then does the controller
/// accept a new start.
pub struct ExperimentController {
    config: ExperimentConfig,
    state: Arc<RunState>,
    worker: Option<JoinHandle<RunReport>>,
}

impl ExperimentController {
    pub fn new(config: ExperimentConfig) -> Self {
        Self {
            config,
            state: Arc::new(RunState::default()),
            worker: None,
        }
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// `true` from a successful start until the report is collected.
    pub fn is_active(&self) -> bool {
        self.worker.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Validate `plan`, synthesize its template, and launch the run.
    ///
    /// `make_backend` is called on the worker thread, so backends that are
    /// not `Send` (such as a cpal stream) can be used. An invalid plan is
    /// rejected without leaving the idle state.
    pub fn start<B, F>(&mut self, plan: ExperimentPlan, make_backend: F) -> ExperimentResult<Start>
    where
        B: AudioBackend + 'static,
        F: FnOnce() -> B + Send + 'static,
    {
        if self.worker.is_some() {
            warn!("experiment already active, ignoring start");
            return Ok(Start::Ignored);
        }

        let output = self.config.output;
        plan.validate(output.sample_rate)?;
        let buffer = plan.wave.synthesize(output.sample_rate)?;
        log_template(&plan, &buffer);

        if !self.state.begin() {
            warn!("run flag already set, ignoring start");
            return Ok(Start::Ignored);
        }

        let started_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| "<unknown>".to_string());
        info!(
            started_at = %started_at,
            run_time_s = plan.total_run_time_s,
            burst = ?plan.burst,
            wave = ?plan.wave,
            "experiment started"
        );

        let state = Arc::clone(&self.state);
        let fades = self.config.fades;
        let tick = self.config.tick;
        let seed = self.config.seed;
        let spawned = std::thread::Builder::new()
            .name("flyshaker-runner".into())
            .spawn(move || {
                let mut rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                let mut driver = PlaybackDriver::new(make_backend(), output, fades);
                run_experiment(&plan, &buffer, &mut driver, &state, tick, &mut rng)
            });

        match spawned {
            Ok(handle) => {
                self.worker = Some(handle);
                Ok(Start::Started)
            }
            Err(err) => {
                self.state.finish();
                Err(ExperimentError::Spawn(err))
            }
        }
    }

    /// Ask the running experiment to stop at its next wait tick.
    pub fn stop(&self) {
        if self.state.is_running() {
            info!("stop requested by operator");
        }
        self.state.request_stop();
    }

    /// Collect the report if the worker has finished; never blocks.
    pub fn poll(&mut self) -> ExperimentResult<Option<RunReport>> {
        match &self.worker {
            Some(handle) if handle.is_finished() => self.join(),
            _ => Ok(None),
        }
    }

    /// Block until the worker finishes and collect its report.
    pub fn join(&mut self) -> ExperimentResult<Option<RunReport>> {
        let Some(handle) = self.worker.take() else {
            return Ok(None);
        };
        let report = handle.join().map_err(|_| {
            self.state.finish();
            ExperimentError::WorkerPanicked
        })?;
        Ok(Some(report))
    }
}

impl Drop for ExperimentController {
    fn drop(&mut self) {
        self.state.request_stop();
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}
