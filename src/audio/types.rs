use crate::array::ArrayError;

/// Represents the data from a WAV file after reading
#[derive(Debug)]
pub struct WavData {
    /// Interleaved samples normalized to [-1, 1] range
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of audio channels
    pub channels: u16,
}

/// Configuration for short-time spectral analysis
#[derive(Debug, Clone, Copy)]
pub struct SpectrumConfig {
    /// FFT length in samples
    pub fft_size: usize,
    /// Distance between consecutive frames in samples
    pub hop_size: usize,
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        SpectrumConfig {
            fft_size: 2048,
            hop_size: 512,
        }
    }
}

impl SpectrumConfig {
    /// Checks the frame geometry against a signal of `num_samples` samples.
    ///
    /// # Errors
    /// * `AudioError::InvalidParams` if the FFT size is below 2, the hop size
    ///   is zero or the signal is shorter than one frame
    pub fn validate(&self, num_samples: usize) -> Result<(), AudioError> {
        if self.fft_size < 2 {
            return Err(AudioError::InvalidParams(format!(
                "FFT size must be at least 2, got {}",
                self.fft_size
            )));
        }
        if self.hop_size == 0 {
            return Err(AudioError::InvalidParams(
                "Hop size must be greater than zero".to_string(),
            ));
        }
        if num_samples < self.fft_size {
            return Err(AudioError::InvalidParams(format!(
                "Signal has {} samples, fewer than one FFT frame of {}. Try a smaller FFT size.",
                num_samples, self.fft_size
            )));
        }
        Ok(())
    }
}

/// Errors that can occur during audio processing
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    /// IO errors when reading/writing files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors during WAV file parsing
    #[error("WAV parsing error: {0}")]
    WavParse(String),

    /// Invalid parameter values
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// Failed to build the output array
    #[error("Array error: {0}")]
    Array(#[from] ArrayError),
}
