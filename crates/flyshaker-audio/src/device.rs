use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use flyshaker_wave::SampleBuffer;
use regex::Regex;
use ringbuf::HeapProducer;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::backend::{AudioBackend, OutputConfig};
use crate::error::{AudioError, AudioResult};
use crate::mixer::{command_queue, Command, Mixer};

struct ActiveOutput {
    config: OutputConfig,
    commands: HeapProducer<Command>,
    _stream: cpal::Stream,
}

/// Audio backend driving a cpal output stream.
///
/// The stream is opened lazily by `init` and stays open for the lifetime of
/// the backend; between sounds it outputs silence. `cpal::Stream` is not
/// `Send`, so construct the backend on the thread that will use it.
pub struct CpalBackend {
    device_regex: Option<String>,
    output: Option<ActiveOutput>,
}

impl CpalBackend {
    /// `device_regex` selects the first output device whose name matches;
    /// `None` uses the host default.
    pub fn new(device_regex: Option<&str>) -> Self {
        Self {
            device_regex: device_regex.map(str::to_owned),
            output: None,
        }
    }

    fn active(&mut self) -> AudioResult<&mut ActiveOutput> {
        self.output.as_mut().ok_or(AudioError::NotInitialized)
    }

    fn send(&mut self, command: Command) -> AudioResult<()> {
        self.active()?
            .commands
            .push(command)
            .map_err(|_| AudioError::CommandQueueFull)
    }

    fn ms_to_frames(&self, ms: u32) -> u32 {
        let rate = self
            .output
            .as_ref()
            .map(|out| out.config.sample_rate)
            .unwrap_or_default();
        (rate as u64 * ms as u64 / 1000) as u32
    }
}

impl AudioBackend for CpalBackend {
    fn init(&mut self, config: &OutputConfig) -> AudioResult<()> {
        if let Some(active) = &self.output {
            if active.config == *config {
                return Ok(());
            }
            debug!("output config changed, reopening stream");
            self.output = None;
        }

        let host = cpal::default_host();
        let device = select_output_device(&host, self.device_regex.as_deref())?;
        let (stream, commands) = open_output_stream(&device, config)?;
        info!(
            device = %device.name().unwrap_or_else(|_| "<unknown>".to_string()),
            sample_rate = config.sample_rate,
            "audio output initialized"
        );
        self.output = Some(ActiveOutput {
            config: *config,
            commands,
            _stream: stream,
        });
        Ok(())
    }

    fn play(&mut self, buffer: &SampleBuffer, fade_in_ms: u32) -> AudioResult<()> {
        let output_rate = self.active()?.config.sample_rate;
        if buffer.sample_rate() != output_rate {
            return Err(AudioError::SampleRateMismatch {
                buffer: buffer.sample_rate(),
                output: output_rate,
            });
        }
        let fade_in_frames = self.ms_to_frames(fade_in_ms);
        self.send(Command::Play {
            frames: buffer.stereo().into(),
            fade_in_frames,
        })
    }

    fn fade_out(&mut self, fade_ms: u32) -> AudioResult<()> {
        let fade_frames = self.ms_to_frames(fade_ms);
        self.send(Command::FadeOut { fade_frames })
    }

    fn delay(&mut self, ms: u64) {
        std::thread::sleep(Duration::from_millis(ms));
    }
}

fn open_output_stream(
    device: &cpal::Device,
    config: &OutputConfig,
) -> AudioResult<(cpal::Stream, HeapProducer<Command>)> {
    let rate = config.sample_rate;
    let supported = device
        .supported_output_configs()?
        .filter(|cfg| cfg.min_sample_rate().0 <= rate && cfg.max_sample_rate().0 >= rate)
        .filter(|cfg| {
            matches!(
                cfg.sample_format(),
                cpal::SampleFormat::I16 | cpal::SampleFormat::F32
            )
        })
        .max_by_key(|cfg| {
            (
                cfg.channels() == config.channels,
                cfg.sample_format() == cpal::SampleFormat::I16,
            )
        })
        .ok_or(AudioError::UnsupportedConfig { sample_rate: rate })?
        .with_sample_rate(cpal::SampleRate(rate));

    let sample_format = supported.sample_format();
    let buffer_size = match supported.buffer_size() {
        cpal::SupportedBufferSize::Range { min, max }
            if (*min..=*max).contains(&config.buffer_size) =>
        {
            cpal::BufferSize::Fixed(config.buffer_size)
        }
        _ => cpal::BufferSize::Default,
    };
    let mut stream_config: cpal::StreamConfig = supported.into();
    stream_config.buffer_size = buffer_size;
    let channels = stream_config.channels as usize;

    let (producer, consumer) = command_queue();
    let mut mixer = Mixer::new(consumer);
    let err_fn = |err| error!("audio stream error: {}", err);

    let stream = match sample_format {
        cpal::SampleFormat::I16 => device.build_output_stream(
            &stream_config,
            move |data: &mut [i16], _| mixer.fill_i16(data, channels),
            err_fn,
            None,
        )?,
        cpal::SampleFormat::F32 => device.build_output_stream(
            &stream_config,
            move |data: &mut [f32], _| mixer.fill_f32(data, channels),
            err_fn,
            None,
        )?,
        _ => return Err(AudioError::UnsupportedConfig { sample_rate: rate }),
    };

    stream.play()?;
    Ok((stream, producer))
}

/// Names of every output device on the default host.
pub fn output_device_names() -> AudioResult<Vec<String>> {
    let host = cpal::default_host();
    Ok(host
        .output_devices()?
        .map(|dev| dev.name().unwrap_or_else(|_| "<unknown>".to_string()))
        .collect())
}

fn select_output_device(host: &cpal::Host, device_regex: Option<&str>) -> AudioResult<cpal::Device> {
    if let Some(pattern) = device_regex {
        let re = Regex::new(pattern)?;
        for dev in host.output_devices()? {
            let name = dev.name().unwrap_or_else(|_| "<unknown>".to_string());
            if re.is_match(&name) {
                return Ok(dev);
            }
        }
        return Err(AudioError::NoMatchingDevice(pattern.to_string()));
    }

    host.default_output_device().ok_or(AudioError::NoDevice)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_before_init_is_rejected() {
        let mut backend = CpalBackend::new(None);
        let buffer = SampleBuffer::new(vec![0; 16], 44_100);
        assert!(matches!(
            backend.play(&buffer, 100),
            Err(AudioError::NotInitialized)
        ));
        assert!(matches!(backend.fade_out(50), Err(AudioError::NotInitialized)));
    }

    #[test]
    fn bad_device_pattern_is_reported() {
        let mut backend = CpalBackend::new(Some("("));
        assert!(matches!(
            backend.init(&OutputConfig::default()),
            Err(AudioError::DeviceRegex(_))
        ));
    }
}
