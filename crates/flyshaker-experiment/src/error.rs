use flyshaker_audio::AudioError;
use flyshaker_wave::WaveError;
use thiserror::Error;

pub type ExperimentResult<T> = Result<T, ExperimentError>;

#[derive(Error, Debug)]
pub enum ExperimentError {
    #[error(transparent)]
    Wave(#[from] WaveError),

    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error("invalid burst: {0}")]
    InvalidBurst(String),

    #[error("total run time must be positive, got {0} s")]
    InvalidRunTime(f64),

    #[error("total run time is too long to schedule")]
    RunTimeTooLong,

    #[error("failed to spawn experiment worker: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("experiment worker panicked")]
    WorkerPanicked,
}
