//! Sine and duty-cycle pulse synthesis.
//!
//! Both synthesizers sample on the grid `t = n / sample_rate` for every
//! `t < duration_s` and quantize to signed 16-bit by truncation toward zero.
//! Samples are never clamped: the amplitude must stay within `i16` so that
//! `amplitude * ±1.0` is representable, and callers should keep it at or
//! below 32000 to leave headroom for the fades applied during playback.

use crate::buffer::SampleBuffer;
use crate::error::{require_positive, WaveError, WaveResult};
use crate::oscillator::Oscillator;
use crate::pulse::PulseTiming;

/// Tolerance used when turning `duration_s * sample_rate` into a sample count,
/// so that an exact product like `1.0 * 44100.0` is not rounded up.
const GRID_EPSILON: f64 = 1e-9;

/// One experiment's waveform, already in device units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WaveSpec {
    Sine {
        amplitude: i16,
        frequency_hz: f64,
        duration_s: f64,
    },
    Pulse {
        amplitude: i16,
        frequency_hz: f64,
        duty_cycle: f64,
        duration_s: f64,
    },
}

impl WaveSpec {
    /// Build a pulse spec from a width/period description.
    pub fn pulse_from_timing(amplitude: i16, timing: PulseTiming, duration_s: f64) -> Self {
        WaveSpec::Pulse {
            amplitude,
            frequency_hz: timing.frequency_hz(),
            duty_cycle: timing.duty_cycle(),
            duration_s,
        }
    }

    pub fn duration_s(&self) -> f64 {
        match *self {
            WaveSpec::Sine { duration_s, .. } | WaveSpec::Pulse { duration_s, .. } => duration_s,
        }
    }

    pub fn frequency_hz(&self) -> f64 {
        match *self {
            WaveSpec::Sine { frequency_hz, .. } | WaveSpec::Pulse { frequency_hz, .. } => {
                frequency_hz
            }
        }
    }

    pub fn amplitude(&self) -> i16 {
        match *self {
            WaveSpec::Sine { amplitude, .. } | WaveSpec::Pulse { amplitude, .. } => amplitude,
        }
    }

    /// Check every field without allocating a buffer.
    pub fn validate(&self, sample_rate: u32) -> WaveResult<()> {
        match *self {
            WaveSpec::Sine {
                amplitude,
                frequency_hz,
                duration_s,
            } => check_common(amplitude, frequency_hz, duration_s, sample_rate),
            WaveSpec::Pulse {
                amplitude,
                frequency_hz,
                duty_cycle,
                duration_s,
            } => {
                check_common(amplitude, frequency_hz, duration_s, sample_rate)?;
                check_duty_cycle(duty_cycle)
            }
        }
    }

    pub fn synthesize(&self, sample_rate: u32) -> WaveResult<SampleBuffer> {
        match *self {
            WaveSpec::Sine {
                amplitude,
                frequency_hz,
                duration_s,
            } => synthesize_sine(amplitude, frequency_hz, duration_s, sample_rate),
            WaveSpec::Pulse {
                amplitude,
                frequency_hz,
                duty_cycle,
                duration_s,
            } => synthesize_pulse(amplitude, frequency_hz, duty_cycle, duration_s, sample_rate),
        }
    }
}

/// `amplitude * sin(2π·frequency_hz·t)` sampled at `sample_rate`.
pub fn synthesize_sine(
    amplitude: i16,
    frequency_hz: f64,
    duration_s: f64,
    sample_rate: u32,
) -> WaveResult<SampleBuffer> {
    check_common(amplitude, frequency_hz, duration_s, sample_rate)?;

    let len = sample_count(duration_s, sample_rate);
    let mut osc = Oscillator::new(sample_rate as f64, frequency_hz);
    let level = amplitude as f64;
    let samples = (0..len).map(|_| (level * osc.next_sine()) as i16).collect();
    Ok(SampleBuffer::new(samples, sample_rate))
}

/// Rectangular wave at `+amplitude` for the first `duty_cycle` of every
/// period and `-amplitude` for the remainder.
pub fn synthesize_pulse(
    amplitude: i16,
    frequency_hz: f64,
    duty_cycle: f64,
    duration_s: f64,
    sample_rate: u32,
) -> WaveResult<SampleBuffer> {
    check_common(amplitude, frequency_hz, duration_s, sample_rate)?;
    check_duty_cycle(duty_cycle)?;

    let len = sample_count(duration_s, sample_rate);
    let mut osc = Oscillator::new(sample_rate as f64, frequency_hz);
    let level = amplitude as f64;
    let samples = (0..len)
        .map(|_| (level * osc.next_square(duty_cycle)) as i16)
        .collect();
    Ok(SampleBuffer::new(samples, sample_rate))
}

fn sample_count(duration_s: f64, sample_rate: u32) -> usize {
    (duration_s * sample_rate as f64 - GRID_EPSILON).ceil().max(1.0) as usize
}

fn check_common(
    amplitude: i16,
    frequency_hz: f64,
    duration_s: f64,
    sample_rate: u32,
) -> WaveResult<()> {
    if amplitude <= 0 {
        return Err(WaveError::invalid(
            "amplitude",
            format!("must be positive, got {}", amplitude),
        ));
    }
    if sample_rate == 0 {
        return Err(WaveError::invalid("sample_rate", "must be non-zero"));
    }
    require_positive("frequency_hz", frequency_hz)?;
    require_positive("duration_s", duration_s)?;
    Ok(())
}

fn check_duty_cycle(duty_cycle: f64) -> WaveResult<()> {
    if duty_cycle > 0.0 && duty_cycle < 1.0 {
        Ok(())
    } else {
        Err(WaveError::invalid(
            "duty_cycle",
            format!("must lie strictly between 0 and 1, got {}", duty_cycle),
        ))
    }
}
