use clap::{Parser, ValueEnum};
use flyshaker_audio::{Fades, OutputConfig};
use flyshaker_experiment::{
    BurstPolicy, ExperimentConfig, ExperimentError, ExperimentPlan, ExperimentResult,
};
use flyshaker_wave::{amplitude_from_percent, PulseTiming, WaveError, WaveSpec};

const DEFAULT_DUTY_CYCLE_PERCENT: u8 = 50;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum WaveKind {
    Sine,
    Pulse,
}

/// Plays sine or pulse stimuli through the shaker for a timed experiment.
#[derive(Parser, Debug)]
#[command(name = "flyshaker", version, about, long_about = None)]
pub struct Args {
    /// Waveform shape.
    #[arg(short = 'w', long, value_enum, default_value_t = WaveKind::Sine)]
    pub wave: WaveKind,

    /// Amplitude in percent of full scale.
    #[arg(short, long, default_value_t = 50, value_parser = clap::value_parser!(i64).range(1..=100))]
    pub amplitude: i64,

    /// Frequency in Hz.
    #[arg(short, long, default_value_t = 200.0)]
    pub frequency: f64,

    /// Pulse duty cycle in percent [default: 50].
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=99))]
    pub duty_cycle: Option<u8>,

    /// Pulse width in ms; with --period-ms replaces --frequency and --duty-cycle.
    #[arg(long, requires = "period_ms", conflicts_with_all = ["frequency", "duty_cycle"])]
    pub pulse_width_ms: Option<f64>,

    /// Pulse period in ms.
    #[arg(long, requires = "pulse_width_ms")]
    pub period_ms: Option<f64>,

    /// Length of the synthesized template in seconds.
    #[arg(long, default_value_t = 1.0)]
    pub duration: f64,

    /// Burst period (sound plus following silence) in seconds.
    #[arg(short, long, default_value_t = 1.0)]
    pub burst: f64,

    /// Draw each burst uniformly from 1..=BURST whole seconds.
    #[arg(short, long)]
    pub random_burst: bool,

    /// Experiment run time, hours part.
    #[arg(long, default_value_t = 0)]
    pub hours: u64,

    /// Experiment run time, minutes part.
    #[arg(long, default_value_t = 0)]
    pub minutes: u64,

    /// Experiment run time, seconds part.
    #[arg(long, default_value_t = 0)]
    pub seconds: u64,

    /// Fade-in at the start of each burst, in ms.
    #[arg(long, default_value_t = 100)]
    pub fade_in: u32,

    /// Fade-out at the end of each burst, in ms.
    #[arg(long, default_value_t = 50)]
    pub fade_out: u32,

    /// Output sample rate in Hz.
    #[arg(long, default_value_t = flyshaker_wave::DEFAULT_SAMPLE_RATE)]
    pub sample_rate: u32,

    /// Regex selecting the output device by name.
    #[arg(long)]
    pub device: Option<String>,

    /// Seed for random bursts.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Run the schedule without opening an audio device.
    #[arg(long)]
    pub dry_run: bool,

    /// Print output device names and exit.
    #[arg(long)]
    pub list_devices: bool,

    /// Debug logging (overridden by RUST_LOG).
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn run_time_s(&self) -> ExperimentResult<f64> {
        self.hours
            .checked_mul(3600)
            .and_then(|h| self.minutes.checked_mul(60).and_then(|m| h.checked_add(m)))
            .and_then(|hm| hm.checked_add(self.seconds))
            .map(|total| total as f64)
            .ok_or(ExperimentError::RunTimeTooLong)
    }

    fn reject_pulse_options(&self) -> ExperimentResult<()> {
        let given = [
            ("duty_cycle", self.duty_cycle.is_some()),
            ("pulse_width_ms", self.pulse_width_ms.is_some()),
            ("period_ms", self.period_ms.is_some()),
        ];
        match given.iter().find(|(_, present)| *present) {
            Some(&(name, _)) => Err(WaveError::InvalidParameter {
                name,
                reason: "only applies to pulse waves".to_string(),
            }
            .into()),
            None => Ok(()),
        }
    }

    pub fn plan(&self) -> ExperimentResult<ExperimentPlan> {
        let amplitude = amplitude_from_percent(self.amplitude)?;
        let wave = match self.wave {
            WaveKind::Sine => {
                self.reject_pulse_options()?;
                WaveSpec::Sine {
                    amplitude,
                    frequency_hz: self.frequency,
                    duration_s: self.duration,
                }
            }
            WaveKind::Pulse => {
                let timing = match (self.pulse_width_ms, self.period_ms) {
                    (Some(width), Some(period)) => {
                        PulseTiming::from_width_and_period_ms(width, period)?
                    }
                    _ => PulseTiming::from_frequency_and_duty(
                        self.frequency,
                        self.duty_cycle.unwrap_or(DEFAULT_DUTY_CYCLE_PERCENT) as f64 / 100.0,
                    )?,
                };
                WaveSpec::pulse_from_timing(amplitude, timing, self.duration)
            }
        };

        let burst = if self.random_burst {
            BurstPolicy::Random {
                max_seconds: self.burst.max(0.0).floor() as u32,
            }
        } else {
            BurstPolicy::Fixed(self.burst)
        };

        Ok(ExperimentPlan {
            wave,
            burst,
            total_run_time_s: self.run_time_s()?,
        })
    }

    pub fn config(&self) -> ExperimentConfig {
        ExperimentConfig {
            output: OutputConfig {
                sample_rate: self.sample_rate,
                ..OutputConfig::default()
            },
            fades: Fades {
                fade_in_ms: self.fade_in,
                fade_out_ms: self.fade_out,
            },
            seed: self.seed,
            ..ExperimentConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        let mut argv = vec!["flyshaker"];
        argv.extend_from_slice(args);
        Args::try_parse_from(argv).expect("parse")
    }

    #[test]
    fn defaults_build_sine_plan() {
        let args = parse(&["--minutes", "2"]);
        let plan = args.plan().expect("plan");
        assert_eq!(plan.total_run_time_s, 120.0);
        assert_eq!(plan.burst, BurstPolicy::Fixed(1.0));
        match plan.wave {
            WaveSpec::Sine {
                amplitude,
                frequency_hz,
                duration_s,
            } => {
                assert_eq!(amplitude, 15_838);
                assert_eq!(frequency_hz, 200.0);
                assert_eq!(duration_s, 1.0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn pulse_from_percent_duty_cycle() {
        let args = parse(&[
            "-w", "pulse", "-a", "100", "-f", "40", "-d", "25", "--hours", "1", "--seconds", "30",
        ]);
        let plan = args.plan().expect("plan");
        assert_eq!(plan.total_run_time_s, 3630.0);
        assert_eq!(
            plan.wave,
            WaveSpec::Pulse {
                amplitude: 32_000,
                frequency_hz: 40.0,
                duty_cycle: 0.25,
                duration_s: 1.0,
            }
        );
    }

    #[test]
    fn pulse_from_width_and_period() {
        let args = parse(&[
            "-w",
            "pulse",
            "--pulse-width-ms",
            "250",
            "--period-ms",
            "500",
            "--seconds",
            "10",
        ]);
        match args.plan().expect("plan").wave {
            WaveSpec::Pulse {
                frequency_hz,
                duty_cycle,
                ..
            } => {
                assert!((frequency_hz - 2.0).abs() < 1e-12);
                assert!((duty_cycle - 0.5).abs() < 1e-12);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn width_requires_period() {
        let argv = ["flyshaker", "--pulse-width-ms", "10"];
        assert!(Args::try_parse_from(argv).is_err());
    }

    #[test]
    fn amplitude_range_is_enforced_by_parser() {
        assert!(Args::try_parse_from(["flyshaker", "-a", "0"]).is_err());
        assert!(Args::try_parse_from(["flyshaker", "-a", "101"]).is_err());
        assert!(Args::try_parse_from(["flyshaker", "-d", "100"]).is_err());
    }

    #[test]
    fn oversized_run_time_is_an_error() {
        let args = parse(&["--hours", "18446744073709551615"]);
        assert!(matches!(args.plan(), Err(ExperimentError::RunTimeTooLong)));
        let args = parse(&["--minutes", "1", "--seconds", "18446744073709551615"]);
        assert!(matches!(args.plan(), Err(ExperimentError::RunTimeTooLong)));
    }

    #[test]
    fn pulse_options_are_rejected_for_sine() {
        for argv in [
            &["--seconds", "5", "-d", "30"][..],
            &["--seconds", "5", "--pulse-width-ms", "10", "--period-ms", "20"][..],
        ] {
            match parse(argv).plan() {
                Err(ExperimentError::Wave(WaveError::InvalidParameter { name, .. })) => {
                    assert!(name == "duty_cycle" || name == "pulse_width_ms", "name = {}", name)
                }
                other => panic!("expected rejection, got {:?}", other),
            }
        }
    }

    #[test]
    fn pulse_duty_cycle_defaults_to_half() {
        let args = parse(&["-w", "pulse", "--seconds", "5"]);
        match args.plan().expect("plan").wave {
            WaveSpec::Pulse { duty_cycle, .. } => assert_eq!(duty_cycle, 0.5),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn random_burst_uses_whole_seconds() {
        let args = parse(&["-r", "-b", "4.7", "--seconds", "5"]);
        assert_eq!(
            args.plan().expect("plan").burst,
            BurstPolicy::Random { max_seconds: 4 }
        );
    }

    #[test]
    fn config_carries_fades_and_rate() {
        let args = parse(&["--fade-in", "20", "--fade-out", "10", "--sample-rate", "48000"]);
        let config = args.config();
        assert_eq!(config.output.sample_rate, 48_000);
        assert_eq!(
            config.fades,
            Fades {
                fade_in_ms: 20,
                fade_out_ms: 10
            }
        );
    }
}
