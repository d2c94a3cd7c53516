//! Waveform templates for the fly shaker: parameter mapping, sine and pulse
//! synthesis, and a spectral sanity check.

pub mod buffer;
pub mod error;
pub mod map;
mod oscillator;
pub mod pulse;
pub mod spectrum;
pub mod synth;

pub use buffer::{SampleBuffer, DEFAULT_SAMPLE_RATE};
pub use error::{WaveError, WaveResult};
pub use map::{amplitude_from_percent, map_value, ms_to_seconds, seconds_to_ms};
pub use pulse::PulseTiming;
pub use spectrum::dominant_frequency;
pub use synth::{synthesize_pulse, synthesize_sine, WaveSpec};
