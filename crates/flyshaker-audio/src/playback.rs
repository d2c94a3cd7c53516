use flyshaker_wave::SampleBuffer;
use tracing::debug;

use crate::backend::{AudioBackend, OutputConfig};
use crate::error::AudioResult;

/// Envelope applied around every rendered segment to avoid clicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fades {
    pub fade_in_ms: u32,
    pub fade_out_ms: u32,
}

impl Default for Fades {
    fn default() -> Self {
        Self {
            fade_in_ms: 100,
            fade_out_ms: 50,
        }
    }
}

/// Plays a template buffer for a requested wall-clock time.
pub struct PlaybackDriver<B> {
    backend: B,
    output: OutputConfig,
    fades: Fades,
}

impl<B: AudioBackend> PlaybackDriver<B> {
    pub fn new(backend: B, output: OutputConfig, fades: Fades) -> Self {
        Self {
            backend,
            output,
            fades,
        }
    }

    /// Render `buffer` for `playback_ms`, then fade out.
    ///
    /// Blocks for `playback_ms + fade_out_ms`. The playback time is
    /// independent of the buffer's own length: a shorter request is cut by the
    /// fade-out, a longer one loops the buffer. The output is opened on first
    /// use and reused afterwards.
    pub fn render(&mut self, buffer: &SampleBuffer, playback_ms: u64) -> AudioResult<()> {
        self.backend.init(&self.output)?;

        debug!(
            playback_ms,
            samples = buffer.len(),
            "rendering segment"
        );
        self.backend.play(buffer, self.fades.fade_in_ms)?;
        self.backend.delay(playback_ms);
        self.backend.fade_out(self.fades.fade_out_ms)?;
        self.backend.delay(self.fades.fade_out_ms as u64);
        Ok(())
    }

    pub fn fades(&self) -> Fades {
        self.fades
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::silent::{BackendEvent, SilentBackend};

    #[test]
    fn render_sequence_matches_mixer_contract() {
        let backend = SilentBackend::new();
        let log = backend.log();
        let mut driver = PlaybackDriver::new(backend, OutputConfig::default(), Fades::default());
        let buffer = SampleBuffer::new(vec![0; 441], 44_100);

        driver.render(&buffer, 20).expect("render");
        driver.render(&buffer, 30).expect("render");

        let config = OutputConfig::default();
        assert_eq!(
            log.events(),
            vec![
                BackendEvent::Init(config),
                BackendEvent::Play {
                    samples: 441,
                    fade_in_ms: 100
                },
                BackendEvent::Delay(20),
                BackendEvent::FadeOut(50),
                BackendEvent::Delay(50),
                BackendEvent::Play {
                    samples: 441,
                    fade_in_ms: 100
                },
                BackendEvent::Delay(30),
                BackendEvent::FadeOut(50),
                BackendEvent::Delay(50),
            ]
        );
    }

    #[test]
    fn device_failure_propagates() {
        let backend = SilentBackend::failing_on_play(1);
        let mut driver = PlaybackDriver::new(backend, OutputConfig::default(), Fades::default());
        let buffer = SampleBuffer::new(vec![0; 10], 44_100);
        assert!(driver.render(&buffer, 10).is_err());
    }
}
