// Audio input tests
//
// These tests verify that WAV files can be turned into arrays and searched
// for peaks. Fixtures are generated on the fly into the temp directory.
//
// The tests cover:
// - WAV file loading and mono mixdown
// - Magnitude spectrum and spectrogram geometry
// - Peak picking on a pure tone
// - Error handling for invalid parameters and files
#![cfg(feature = "audio")]

use approx::assert_abs_diff_eq;
use arraykit::audio::{self, AudioError, SpectrumConfig};
use arraykit::peaks::{self, PeakIndex, PeakOptions};
use std::f32::consts::PI;
use std::path::Path;
use tempfile::NamedTempFile;

/// Writes a 16-bit WAV file with one sine per channel into a temp file.
fn sine_wav(freqs: &[f32], sample_rate: u32, num_frames: usize) -> NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(".wav")
        .tempfile()
        .expect("Failed to create temp file");
    let spec = hound::WavSpec {
        channels: freqs.len() as u16,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer =
        hound::WavWriter::create(file.path(), spec).expect("Failed to create WAV file");
    for n in 0..num_frames {
        for &freq in freqs {
            let t = n as f32 / sample_rate as f32;
            let sample = (0.5 * (2.0 * PI * freq * t).sin() * i16::MAX as f32) as i16;
            writer.write_sample(sample).expect("Failed to write sample");
        }
    }
    writer.finalize().expect("Failed to finalize WAV file");
    file
}

/// Test WAV file loading functionality.
///
/// This test verifies:
/// - Loading a WAV file from disk
/// - Correct extraction of WAV properties (sample rate, channels)
/// - Samples normalized to [-1, 1]
#[test]
fn test_wav_file_loading() {
    let wav = sine_wav(&[1000.0], 8000, 8000);

    let wav_data = audio::read_wav_file(wav.path()).expect("Failed to load WAV file");

    assert_eq!(wav_data.sample_rate, 8000);
    assert_eq!(wav_data.channels, 1);
    assert_eq!(wav_data.samples.len(), 8000);
    assert!(wav_data.samples.iter().all(|s| (-1.0..=1.0).contains(s)));
}

/// Test mono mixdown of a stereo file.
///
/// This test verifies:
/// - One mono sample per frame
/// - Channels are averaged
#[test]
fn test_mono_mixdown() {
    let wav = sine_wav(&[500.0, 500.0], 8000, 400);

    let wav_data = audio::read_wav_file(wav.path()).expect("Failed to load WAV file");
    let mono = audio::to_mono_array(&wav_data).expect("Failed to mix down");

    assert_eq!(wav_data.channels, 2);
    assert_eq!(mono.shape(), &[400]);
    let samples = mono.as_slice::<f32>().expect("Mono array should be float32");
    for (frame, &mixed) in wav_data.samples.chunks_exact(2).zip(samples) {
        assert_abs_diff_eq!(mixed, (frame[0] + frame[1]) / 2.0, epsilon = 1e-6);
    }
}

/// Test peak picking on the spectrum of a pure tone.
///
/// This test verifies:
/// - The strongest bin of a 1 kHz tone sits at 1000 / (8000 / 1024) = 128
/// - Spectra can be fed straight into the peak finder
#[test]
fn test_spectrum_peak_of_pure_tone() {
    let wav = sine_wav(&[1000.0], 8000, 8000);

    let wav_data = audio::read_wav_file(wav.path()).expect("Failed to load WAV file");
    let mono = audio::to_mono_array(&wav_data).expect("Failed to mix down");
    let samples = mono.as_slice::<f32>().expect("Mono array should be float32");

    let spectrum = audio::magnitude_spectrum(samples, 1024).expect("Failed to compute spectrum");
    assert_eq!(spectrum.shape(), &[513]);

    let indices = peaks::find_peak_indices(&spectrum, 1, &PeakOptions::default())
        .expect("Failed to find peaks");
    assert_eq!(indices, vec![PeakIndex::OneD(128)]);
}

/// Test spectrogram geometry and 2-D peak picking.
///
/// This test verifies:
/// - Frames x bins shape for the given hop size
/// - The strongest cell lies in the tone's frequency bin
#[test]
fn test_spectrogram() {
    let wav = sine_wav(&[1000.0], 8000, 8000);

    let wav_data = audio::read_wav_file(wav.path()).expect("Failed to load WAV file");
    let mono = audio::to_mono_array(&wav_data).expect("Failed to mix down");
    let samples = mono.as_slice::<f32>().expect("Mono array should be float32");

    let config = SpectrumConfig {
        fft_size: 1024,
        hop_size: 512,
    };
    let spectrogram = audio::spectrogram(samples, &config).expect("Failed to compute spectrogram");
    assert_eq!(spectrogram.shape(), &[14, 513]);

    let indices = peaks::find_peak_indices(&spectrogram, 1, &PeakOptions::default())
        .expect("Failed to find peaks");
    match indices.as_slice() {
        [PeakIndex::TwoD(_, bin)] => assert_eq!(*bin, 128),
        other => panic!("Expected one 2-D peak, got {:?}", other),
    }
}

/// Test audio processing error cases.
///
/// This test verifies:
/// - Proper error handling for non-existent WAV files
/// - An FFT longer than the signal is rejected
/// - A zero hop size is rejected
#[test]
fn test_audio_error_cases() {
    let result = audio::read_wav_file(Path::new("non_existent_file.wav"));
    assert!(result.is_err(), "Should return error for non-existent file");

    let samples = vec![0.0f32; 256];
    let result = audio::magnitude_spectrum(&samples, 1024);
    assert!(matches!(result, Err(AudioError::InvalidParams(_))));

    let config = SpectrumConfig {
        fft_size: 128,
        hop_size: 0,
    };
    let result = audio::spectrogram(&samples, &config);
    assert!(matches!(result, Err(AudioError::InvalidParams(_))));
}
