//! Backend that keeps real time but produces no sound.
//!
//! Used for dry runs and for exercising the experiment loop without an audio
//! device. Every call is recorded in a shared [`PlaybackLog`].

use flyshaker_wave::SampleBuffer;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;

use crate::backend::{AudioBackend, OutputConfig};
use crate::error::{AudioError, AudioResult};

#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    Init(OutputConfig),
    Play { samples: usize, fade_in_ms: u32 },
    FadeOut(u32),
    Delay(u64),
}

/// Cloneable handle to the events recorded by a [`SilentBackend`].
#[derive(Debug, Clone, Default)]
pub struct PlaybackLog {
    events: Arc<Mutex<Vec<BackendEvent>>>,
}

impl PlaybackLog {
    fn lock(&self) -> MutexGuard<'_, Vec<BackendEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn push(&self, event: BackendEvent) {
        self.lock().push(event);
    }

    pub fn events(&self) -> Vec<BackendEvent> {
        self.lock().clone()
    }

    pub fn play_count(&self) -> usize {
        self.lock()
            .iter()
            .filter(|e| matches!(e, BackendEvent::Play { .. }))
            .count()
    }

    pub fn init_count(&self) -> usize {
        self.lock()
            .iter()
            .filter(|e| matches!(e, BackendEvent::Init(_)))
            .count()
    }
}

#[derive(Debug, Default)]
pub struct SilentBackend {
    config: Option<OutputConfig>,
    log: PlaybackLog,
    fail_on_play: Option<usize>,
    plays: usize,
}

impl SilentBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the `nth` call to `play` (1-based) fail as if the device vanished.
    pub fn failing_on_play(nth: usize) -> Self {
        Self {
            fail_on_play: Some(nth),
            ..Self::default()
        }
    }

    pub fn log(&self) -> PlaybackLog {
        self.log.clone()
    }
}

impl AudioBackend for SilentBackend {
    fn init(&mut self, config: &OutputConfig) -> AudioResult<()> {
        if self.config.as_ref() == Some(config) {
            return Ok(());
        }
        debug!(sample_rate = config.sample_rate, "silent output initialized");
        self.config = Some(*config);
        self.log.push(BackendEvent::Init(*config));
        Ok(())
    }

    fn play(&mut self, buffer: &SampleBuffer, fade_in_ms: u32) -> AudioResult<()> {
        let config = self.config.ok_or(AudioError::NotInitialized)?;
        if buffer.sample_rate() != config.sample_rate {
            return Err(AudioError::SampleRateMismatch {
                buffer: buffer.sample_rate(),
                output: config.sample_rate,
            });
        }
        self.plays += 1;
        if self.fail_on_play == Some(self.plays) {
            return Err(AudioError::Playback("simulated device loss".to_string()));
        }
        self.log.push(BackendEvent::Play {
            samples: buffer.len(),
            fade_in_ms,
        });
        Ok(())
    }

    fn fade_out(&mut self, fade_ms: u32) -> AudioResult<()> {
        if self.config.is_none() {
            return Err(AudioError::NotInitialized);
        }
        self.log.push(BackendEvent::FadeOut(fade_ms));
        Ok(())
    }

    fn delay(&mut self, ms: u64) {
        self.log.push(BackendEvent::Delay(ms));
        std::thread::sleep(Duration::from_millis(ms));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        let mut backend = SilentBackend::new();
        let log = backend.log();
        let config = OutputConfig::default();
        backend.init(&config).expect("init");
        backend.init(&config).expect("init again");
        assert_eq!(log.init_count(), 1);
    }

    #[test]
    fn rejects_mismatched_sample_rate() {
        let mut backend = SilentBackend::new();
        backend.init(&OutputConfig::default()).expect("init");
        let buffer = SampleBuffer::new(vec![0; 8], 8_000);
        assert!(matches!(
            backend.play(&buffer, 0),
            Err(AudioError::SampleRateMismatch { buffer: 8_000, .. })
        ));
    }

    #[test]
    fn injected_failure_hits_the_requested_play() {
        let mut backend = SilentBackend::failing_on_play(2);
        backend.init(&OutputConfig::default()).expect("init");
        let buffer = SampleBuffer::new(vec![0; 8], 44_100);
        assert!(backend.play(&buffer, 0).is_ok());
        assert!(matches!(
            backend.play(&buffer, 0),
            Err(AudioError::Playback(_))
        ));
        assert_eq!(backend.log().play_count(), 1);
    }
}
