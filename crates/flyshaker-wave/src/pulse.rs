//! Pulse-train timing in either of its two common descriptions.
//!
//! Older control surfaces describe a pulse train by pulse width and period;
//! the synthesizer takes frequency and duty cycle. The two are related by
//! `period = 1 / frequency` and `width = duty_cycle * period`.

use crate::error::{require_positive, WaveError, WaveResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseTiming {
    frequency_hz: f64,
    duty_cycle: f64,
}

impl PulseTiming {
    pub fn from_frequency_and_duty(frequency_hz: f64, duty_cycle: f64) -> WaveResult<Self> {
        require_positive("frequency_hz", frequency_hz)?;
        if !(duty_cycle > 0.0 && duty_cycle < 1.0) {
            return Err(WaveError::invalid(
                "duty_cycle",
                format!("must lie strictly between 0 and 1, got {}", duty_cycle),
            ));
        }
        Ok(Self {
            frequency_hz,
            duty_cycle,
        })
    }

    /// Both arguments in seconds; the width must be shorter than the period.
    pub fn from_width_and_period(pulse_width_s: f64, period_s: f64) -> WaveResult<Self> {
        require_positive("period_s", period_s)?;
        require_positive("pulse_width_s", pulse_width_s)?;
        if pulse_width_s >= period_s {
            return Err(WaveError::invalid(
                "pulse_width_s",
                format!(
                    "must be shorter than the period ({} s), got {} s",
                    period_s, pulse_width_s
                ),
            ));
        }
        Ok(Self {
            frequency_hz: 1.0 / period_s,
            duty_cycle: pulse_width_s / period_s,
        })
    }

    pub fn from_width_and_period_ms(pulse_width_ms: f64, period_ms: f64) -> WaveResult<Self> {
        Self::from_width_and_period(pulse_width_ms / 1000.0, period_ms / 1000.0)
    }

    pub fn frequency_hz(&self) -> f64 {
        self.frequency_hz
    }

    pub fn duty_cycle(&self) -> f64 {
        self.duty_cycle
    }

    pub fn period_s(&self) -> f64 {
        1.0 / self.frequency_hz
    }

    pub fn pulse_width_s(&self) -> f64 {
        self.duty_cycle * self.period_s()
    }
}
