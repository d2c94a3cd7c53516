//! Real-time side of the output stream: a single looping stereo voice with
//! linear fade envelopes, fed by commands from the control thread.

use ringbuf::{HeapConsumer, HeapProducer, HeapRb};
use std::sync::Arc;

const COMMAND_QUEUE_CAP: usize = 16;

pub(crate) enum Command {
    Play {
        /// Interleaved left/right frames.
        frames: Arc<[i16]>,
        fade_in_frames: u32,
    },
    FadeOut {
        fade_frames: u32,
    },
}

pub(crate) fn command_queue() -> (HeapProducer<Command>, HeapConsumer<Command>) {
    HeapRb::<Command>::new(COMMAND_QUEUE_CAP).split()
}

struct Voice {
    frames: Arc<[i16]>,
    cursor: usize,
    gain: f32,
    gain_step: f32,
    target: f32,
}

impl Voice {
    fn frame_count(&self) -> usize {
        self.frames.len() / 2
    }

    fn ramp_to(&mut self, target: f32, frames: u32) {
        self.target = target;
        if frames == 0 {
            self.gain = target;
            self.gain_step = 0.0;
        } else {
            self.gain_step = (target - self.gain) / frames as f32;
        }
    }

    fn advance_gain(&mut self) {
        if self.gain_step == 0.0 {
            return;
        }
        self.gain += self.gain_step;
        let reached = (self.gain_step > 0.0 && self.gain >= self.target)
            || (self.gain_step < 0.0 && self.gain <= self.target);
        if reached {
            self.gain = self.target;
            self.gain_step = 0.0;
        }
    }

    fn is_silenced(&self) -> bool {
        self.target == 0.0 && self.gain == 0.0
    }
}

pub(crate) struct Mixer {
    commands: HeapConsumer<Command>,
    voice: Option<Voice>,
}

impl Mixer {
    pub(crate) fn new(commands: HeapConsumer<Command>) -> Self {
        Self {
            commands,
            voice: None,
        }
    }

    fn drain_commands(&mut self) {
        while let Some(command) = self.commands.pop() {
            match command {
                Command::Play {
                    frames,
                    fade_in_frames,
                } => {
                    if frames.len() < 2 {
                        self.voice = None;
                        continue;
                    }
                    let mut voice = Voice {
                        frames,
                        cursor: 0,
                        gain: 0.0,
                        gain_step: 0.0,
                        target: 0.0,
                    };
                    voice.ramp_to(1.0, fade_in_frames);
                    self.voice = Some(voice);
                }
                Command::FadeOut { fade_frames } => {
                    if let Some(voice) = self.voice.as_mut() {
                        voice.ramp_to(0.0, fade_frames);
                    }
                }
            }
        }
    }

    /// Next output frame, left and right, scaled to `[-1, 1]`.
    fn next_frame(&mut self) -> (f32, f32) {
        let Some(voice) = self.voice.as_mut() else {
            return (0.0, 0.0);
        };

        let idx = voice.cursor * 2;
        let gain = voice.gain / 32_768.0;
        let left = voice.frames[idx] as f32 * gain;
        let right = voice.frames[idx + 1] as f32 * gain;

        voice.cursor += 1;
        if voice.cursor >= voice.frame_count() {
            voice.cursor = 0;
        }
        voice.advance_gain();
        if voice.is_silenced() {
            self.voice = None;
        }

        (left, right)
    }

    pub(crate) fn fill_f32(&mut self, data: &mut [f32], channels: usize) {
        self.drain_commands();
        for frame in data.chunks_mut(channels) {
            let (left, right) = self.next_frame();
            write_frame(frame, left, right, 0.0);
        }
    }

    pub(crate) fn fill_i16(&mut self, data: &mut [i16], channels: usize) {
        self.drain_commands();
        for frame in data.chunks_mut(channels) {
            let (left, right) = self.next_frame();
            write_frame(frame, to_i16(left), to_i16(right), 0);
        }
    }
}

fn to_i16(value: f32) -> i16 {
    (value * 32_768.0).round().clamp(i16::MIN as f32, i16::MAX as f32) as i16
}

fn write_frame<T: Copy>(frame: &mut [T], left: T, right: T, silence: T) {
    match frame.len() {
        0 => {}
        1 => frame[0] = left,
        _ => {
            frame[0] = left;
            frame[1] = right;
            for chan in frame.iter_mut().skip(2) {
                *chan = silence;
            }
        }
    }
}
