//! Burst timing: how long each cycle plays and how long it stays silent.

use flyshaker_wave::seconds_to_ms;
use rand::Rng;

use crate::error::{ExperimentError, ExperimentResult};

/// Length of one on+off cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BurstPolicy {
    /// Every cycle lasts this many seconds.
    Fixed(f64),
    /// Each cycle draws a whole number of seconds uniformly from `1..=max_seconds`.
    Random { max_seconds: u32 },
}

impl BurstPolicy {
    pub fn validate(&self) -> ExperimentResult<()> {
        match *self {
            BurstPolicy::Fixed(seconds) if seconds.is_finite() && seconds > 0.0 => Ok(()),
            BurstPolicy::Fixed(seconds) => Err(ExperimentError::InvalidBurst(format!(
                "burst must be a positive number of seconds, got {}",
                seconds
            ))),
            BurstPolicy::Random { max_seconds } if max_seconds >= 1 => Ok(()),
            BurstPolicy::Random { .. } => Err(ExperimentError::InvalidBurst(
                "random burst needs a maximum of at least 1 s".to_string(),
            )),
        }
    }
}

/// Concrete burst length in seconds for the next cycle.
pub fn resolve_burst<R: Rng + ?Sized>(policy: &BurstPolicy, rng: &mut R) -> f64 {
    match *policy {
        BurstPolicy::Fixed(seconds) => seconds,
        BurstPolicy::Random { max_seconds } => rng.gen_range(1..=max_seconds.max(1)) as f64,
    }
}

/// Split of one cycle into audible and silent parts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub playback_ms: u64,
    pub wait_s: f64,
}

/// A burst shorter than the template cuts playback short with no silence;
/// otherwise the whole template plays and the remainder is silence.
pub fn compute_playback_and_wait(burst_s: f64, buffer_duration_s: f64) -> Segment {
    if burst_s < buffer_duration_s {
        Segment {
            playback_ms: seconds_to_ms(burst_s),
            wait_s: 0.0,
        }
    } else {
        Segment {
            playback_ms: seconds_to_ms(buffer_duration_s),
            wait_s: burst_s - buffer_duration_s,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn short_burst_truncates_playback() {
        assert_eq!(
            compute_playback_and_wait(3.0, 5.0),
            Segment {
                playback_ms: 3_000,
                wait_s: 0.0
            }
        );
    }

    #[test]
    fn long_burst_pads_with_silence() {
        assert_eq!(
            compute_playback_and_wait(5.0, 3.0),
            Segment {
                playback_ms: 3_000,
                wait_s: 2.0
            }
        );
    }

    #[test]
    fn equal_burst_has_no_silence() {
        let seg = compute_playback_and_wait(2.0, 2.0);
        assert_eq!(seg.playback_ms, 2_000);
        assert_eq!(seg.wait_s, 0.0);
    }

    #[test]
    fn fixed_burst_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(1);
        let policy = BurstPolicy::Fixed(2.5);
        assert!((0..10).all(|_| resolve_burst(&policy, &mut rng) == 2.5));
    }

    #[test]
    fn random_burst_covers_whole_seconds_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let policy = BurstPolicy::Random { max_seconds: 4 };
        let mut seen = [false; 5];
        for _ in 0..200 {
            let burst = resolve_burst(&policy, &mut rng);
            assert_eq!(burst.fract(), 0.0);
            assert!((1.0..=4.0).contains(&burst), "burst = {}", burst);
            seen[burst as usize] = true;
        }
        assert_eq!(seen, [false, true, true, true, true]);
    }

    #[test]
    fn validation_rejects_empty_bursts() {
        assert!(BurstPolicy::Fixed(0.0).validate().is_err());
        assert!(BurstPolicy::Fixed(-1.0).validate().is_err());
        assert!(BurstPolicy::Fixed(f64::NAN).validate().is_err());
        assert!(BurstPolicy::Random { max_seconds: 0 }.validate().is_err());
        assert!(BurstPolicy::Random { max_seconds: 1 }.validate().is_ok());
    }
}
