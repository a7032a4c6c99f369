use super::types::{AudioError, SpectrumConfig};
use crate::array::NumericArray;
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::Arc;
use tracing::debug;

/// Computes the magnitude spectrum of the first `fft_size` samples.
///
/// The samples are Hann-windowed before the FFT and only the non-negative
/// frequency bins are kept, so the result has `fft_size / 2 + 1` entries.
///
/// # Arguments
/// * `samples` - Mono input samples
/// * `fft_size` - FFT length in samples
///
/// # Returns
/// * `Result<NumericArray, AudioError>` - 1-D `float32` array of bin magnitudes
///
/// # Errors
/// * If `fft_size` is below 2 or longer than the signal
pub fn magnitude_spectrum(samples: &[f32], fft_size: usize) -> Result<NumericArray, AudioError> {
    let config = SpectrumConfig {
        fft_size,
        hop_size: fft_size,
    };
    config.validate(samples.len())?;

    let fft = FftPlanner::<f32>::new().plan_fft_forward(fft_size);
    let window = hann_window(fft_size);
    Ok(NumericArray::from_vec(frame_magnitudes(
        &samples[..fft_size],
        &window,
        &fft,
    )))
}

/// Computes a magnitude spectrogram with one row per frame.
///
/// Frames start every `hop_size` samples and only frames that fit entirely in
/// the signal are analyzed.
///
/// # Returns
/// * `Result<NumericArray, AudioError>` - 2-D `float32` array of shape
///   `(frames, fft_size / 2 + 1)`
///
/// # Errors
/// * If the configuration is invalid for the signal length
pub fn spectrogram(samples: &[f32], config: &SpectrumConfig) -> Result<NumericArray, AudioError> {
    config.validate(samples.len())?;

    let fft = FftPlanner::<f32>::new().plan_fft_forward(config.fft_size);
    let window = hann_window(config.fft_size);
    let n_frames = (samples.len() - config.fft_size) / config.hop_size + 1;
    let n_bins = config.fft_size / 2 + 1;
    debug!(
        "Spectrogram of {} samples: {} frames x {} bins",
        samples.len(),
        n_frames,
        n_bins
    );

    let mut values = Vec::with_capacity(n_frames * n_bins);
    for frame in 0..n_frames {
        let start = frame * config.hop_size;
        values.extend(frame_magnitudes(
            &samples[start..start + config.fft_size],
            &window,
            &fft,
        ));
    }

    Ok(NumericArray::from_shape_vec(vec![n_frames, n_bins], values)?)
}

/// Hann window coefficients: w(n) = 0.5 * (1 - cos(2πn/(N-1)))
fn hann_window(len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / (len - 1) as f32).cos()))
        .collect()
}

/// Windows one frame, runs the FFT in place and returns the magnitudes of the
/// non-negative frequency bins.
fn frame_magnitudes(frame: &[f32], window: &[f32], fft: &Arc<dyn Fft<f32>>) -> Vec<f32> {
    let mut buffer: Vec<Complex<f32>> = frame
        .iter()
        .zip(window)
        .map(|(&x, &w)| Complex::new(x * w, 0.0))
        .collect();

    fft.process(&mut buffer);

    buffer[..frame.len() / 2 + 1].iter().map(|c| c.norm()).collect()
}
