use super::types::{AudioError, WavData};
use crate::array::NumericArray;
use hound::{SampleFormat, WavReader};
use std::io::Read;
use std::path::Path;

/// Reads and parses a WAV file, converting samples to normalized f32 values.
///
/// This function supports the following WAV formats:
/// - 32-bit float
/// - 16-bit integer
/// - 24-bit integer
/// - 32-bit integer
///
/// All integer formats are normalized to the [-1, 1] range.
///
/// # Errors
/// * If the file cannot be read
/// * If the WAV format is unsupported
pub fn read_wav_file(path: &Path) -> Result<WavData, AudioError> {
    let reader = WavReader::open(path).map_err(|e| AudioError::WavParse(e.to_string()))?;
    let spec = reader.spec();

    let samples = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => collect_samples::<f32, _>(reader, 1.0)?,
        (SampleFormat::Int, 16) => collect_samples::<i16, _>(reader, 32768.0)?,
        (SampleFormat::Int, 24) => collect_samples::<i32, _>(reader, 8388608.0)?,
        (SampleFormat::Int, 32) => collect_samples::<i32, _>(reader, 2147483648.0)?,
        _ => {
            return Err(AudioError::WavParse(format!(
                "Unsupported WAV format: {:?} {}-bit",
                spec.sample_format, spec.bits_per_sample
            )))
        }
    };

    Ok(WavData {
        samples,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
    })
}

/// Reads every sample as `S` and divides by `scale`.
fn collect_samples<S, R>(reader: WavReader<R>, scale: f32) -> Result<Vec<f32>, AudioError>
where
    S: hound::Sample + Into<f64>,
    R: Read,
{
    reader
        .into_samples::<S>()
        .map(|s| {
            let value: f64 = s.map_err(|e| AudioError::WavParse(e.to_string()))?.into();
            Ok((value / scale as f64) as f32)
        })
        .collect()
}

/// Averages all channels into a 1-D `float32` array.
///
/// # Errors
/// * If the WAV data reports zero channels
pub fn to_mono_array(wav_data: &WavData) -> Result<NumericArray, AudioError> {
    let channels = wav_data.channels as usize;
    if channels == 0 {
        return Err(AudioError::WavParse("WAV data has no channels".to_string()));
    }

    let mono: Vec<f32> = wav_data
        .samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect();

    Ok(NumericArray::from_vec(mono))
}
