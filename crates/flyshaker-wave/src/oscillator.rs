use std::f64::consts::TAU;

/// Sample-indexed oscillator.
///
/// Phase is derived from the absolute sample index rather than accumulated,
/// so long templates do not drift from `t = n / sample_rate`.
pub(super) struct Oscillator {
    cycles_per_sample: f64,
    index: u64,
}

impl Oscillator {
    pub(super) fn new(sample_rate_hz: f64, freq_hz: f64) -> Self {
        Self {
            cycles_per_sample: freq_hz / sample_rate_hz,
            index: 0,
        }
    }

    /// Position within the current period, in `[0, 1)`.
    pub(super) fn phase(&self) -> f64 {
        (self.index as f64 * self.cycles_per_sample).fract()
    }

    pub(super) fn next_sine(&mut self) -> f64 {
        let value = (TAU * self.index as f64 * self.cycles_per_sample).sin();
        self.advance(1);
        value
    }

    /// `+1` for the first `duty` fraction of each period, `-1` for the rest.
    pub(super) fn next_square(&mut self, duty: f64) -> f64 {
        let value = if self.phase() < duty { 1.0 } else { -1.0 };
        self.advance(1);
        value
    }

    pub(super) fn advance(&mut self, samples: u64) {
        self.index += samples;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_switches_at_duty_boundary() {
        // 4 samples per period.
        let mut osc = Oscillator::new(400.0, 100.0);
        let got: Vec<f64> = (0..8).map(|_| osc.next_square(0.25)).collect();
        assert_eq!(got, vec![1.0, -1.0, -1.0, -1.0, 1.0, -1.0, -1.0, -1.0]);
    }

    #[test]
    fn sine_quarter_period_peaks() {
        let mut osc = Oscillator::new(400.0, 100.0);
        osc.advance(1);
        assert!((osc.next_sine() - 1.0).abs() < 1e-12);
        assert!(osc.next_sine().abs() < 1e-12);
    }
}
