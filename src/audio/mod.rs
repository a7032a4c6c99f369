/// Audio input for the array routines.
///
/// This module provides functionality to:
/// - Read and parse WAV files
/// - Mix WAV data down to a mono sample array
/// - Compute magnitude spectra and spectrograms for peak picking
mod spectrum;
mod types;
mod wav;

pub use spectrum::{magnitude_spectrum, spectrogram};
pub use types::{AudioError, SpectrumConfig, WavData};
pub use wav::{read_wav_file, to_mono_array};
