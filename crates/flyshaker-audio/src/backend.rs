use flyshaker_wave::{SampleBuffer, DEFAULT_SAMPLE_RATE};

use crate::error::AudioResult;

/// Output format requested from an audio backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub sample_rate: u32,
    pub bit_depth: u16,
    pub channels: u16,
    /// Device buffer size in frames. Smaller lowers latency at the risk of dropouts.
    pub buffer_size: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            bit_depth: 16,
            channels: 2,
            buffer_size: 512,
        }
    }
}

/// Minimal mixer interface the playback driver needs.
///
/// `play` returns as soon as playback has started; the caller decides how
/// long it lasts by sleeping with `delay` and then calling `fade_out`. A
/// backend must keep the buffer sounding (looping if necessary) until the
/// fade-out completes.
pub trait AudioBackend {
    /// Open the output. Calling again with an unchanged config is a no-op.
    fn init(&mut self, config: &OutputConfig) -> AudioResult<()>;

    /// Start `buffer` on both channels, ramping up over `fade_in_ms`.
    fn play(&mut self, buffer: &SampleBuffer, fade_in_ms: u32) -> AudioResult<()>;

    /// Ramp the current sound down to silence over `fade_ms` and stop it.
    fn fade_out(&mut self, fade_ms: u32) -> AudioResult<()>;

    /// Block the calling thread while audio keeps playing.
    fn delay(&mut self, ms: u64);
}
