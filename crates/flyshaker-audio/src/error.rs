use thiserror::Error;

pub type AudioResult<T> = Result<T, AudioError>;

/// Failures of the audio output path.
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("no output device available")]
    NoDevice,

    #[error("no output device matched `{0}`")]
    NoMatchingDevice(String),

    #[error("invalid device pattern: {0}")]
    DeviceRegex(#[from] regex::Error),

    #[error("failed to enumerate audio devices: {0}")]
    Devices(#[from] cpal::DevicesError),

    #[error("failed to query output configurations: {0}")]
    Configs(#[from] cpal::SupportedStreamConfigsError),

    #[error("output device does not support {sample_rate} Hz with a 16-bit or float format")]
    UnsupportedConfig { sample_rate: u32 },

    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("buffer is sampled at {buffer} Hz but the output runs at {output} Hz")]
    SampleRateMismatch { buffer: u32, output: u32 },

    #[error("audio command queue is full")]
    CommandQueueFull,

    #[error("audio output used before initialization")]
    NotInitialized,

    #[error("audio playback failed: {0}")]
    Playback(String),
}
