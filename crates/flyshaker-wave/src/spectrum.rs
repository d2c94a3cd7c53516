//! Spectral self-check for synthesized templates.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::buffer::SampleBuffer;

/// Longest prefix analysed, in samples.
const MAX_ANALYSIS_LEN: usize = 1 << 17;

/// Frequency (Hz) of the strongest non-DC bin in the buffer.
///
/// Resolution is `sample_rate / len` for the analysed prefix. Returns `None`
/// for buffers too short to have a non-DC bin or that are entirely silent.
pub fn dominant_frequency(buffer: &SampleBuffer) -> Option<f64> {
    let len = buffer.len().min(MAX_ANALYSIS_LEN);
    if len < 4 {
        return None;
    }

    let mut bins: Vec<Complex<f32>> = buffer.samples()[..len]
        .iter()
        .map(|&s| Complex::new(s as f32, 0.0))
        .collect();

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(len);
    fft.process(&mut bins);

    let (best_bin, best_power) = bins[1..len / 2]
        .iter()
        .enumerate()
        .map(|(i, c)| (i + 1, c.norm_sqr()))
        .fold((0, 0.0f32), |best, cur| if cur.1 > best.1 { cur } else { best });

    if best_bin == 0 || best_power == 0.0 {
        return None;
    }
    Some(best_bin as f64 * buffer.sample_rate() as f64 / len as f64)
}
