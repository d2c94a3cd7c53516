use std::sync::Arc;

pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Mono 16-bit PCM template produced by the synthesizers.
///
/// Samples are shared, so cloning a buffer to hand it to a worker thread or
/// an audio callback does not copy the data.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Arc<[i16]>,
    sample_rate: u32,
}

impl SampleBuffer {
    pub fn new(samples: Vec<i16>, sample_rate: u32) -> Self {
        Self {
            samples: samples.into(),
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Intrinsic length in seconds. Playback may run shorter or longer.
    pub fn duration_s(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn peak(&self) -> i16 {
        self.samples
            .iter()
            .map(|s| s.saturating_abs())
            .max()
            .unwrap_or(0)
    }

    /// Left/right interleaved copy with both channels identical.
    pub fn stereo(&self) -> Vec<i16> {
        let mut out = Vec::with_capacity(self.samples.len() * 2);
        for &sample in self.samples.iter() {
            out.push(sample);
            out.push(sample);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stereo_duplicates_each_frame() {
        let buf = SampleBuffer::new(vec![1, -2, 3], 3);
        assert_eq!(buf.stereo(), vec![1, 1, -2, -2, 3, 3]);
        assert_eq!(buf.duration_s(), 1.0);
        assert_eq!(buf.peak(), 3);
    }

    #[test]
    fn peak_of_min_sample_saturates() {
        let buf = SampleBuffer::new(vec![i16::MIN, 0], 2);
        assert_eq!(buf.peak(), i16::MAX);
    }
}
