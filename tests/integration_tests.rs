// Integration tests for the array toolkit
//
// These tests run the library end to end the way the CLI does: configuration
// is loaded from TOML, arrays travel through the JSON format, and the merged
// or decoded arrays are searched for peaks.
//
// The integration tests ensure:
// 1. Configuration files override defaults and missing files fall back
// 2. Arrays survive encode -> merge -> encode -> decode unchanged in meaning
// 3. Peaks found on decoded data match peaks found on the original

use arraykit::array::{self, DType};
use arraykit::codec;
use arraykit::config::{self, Config};
use arraykit::peaks::{self, MinDistance, PeakIndex};
use arraykit::NumericArray;
use approx::assert_abs_diff_eq;
use tempfile::TempDir;

/// Test loading configuration from a TOML file.
///
/// This test verifies:
/// - Values present in the file override the defaults
/// - Missing sections keep their defaults
/// - A missing file yields the default configuration
#[test]
fn test_load_config() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[peaks]\nn_peaks = 3\nthreshold = 0.25\n\n[codec]\nwrapper_key = \"mask\"\n",
    )
    .expect("Failed to write config");

    let config = config::load_config_from(&path).expect("Failed to load config");
    assert_eq!(config.peaks.n_peaks, 3);
    assert_abs_diff_eq!(config.peaks.threshold, 0.25, epsilon = 1e-12);
    assert!(!config.peaks.find_minimum);
    assert_eq!(config.codec.wrapper_key, "mask");
    assert_eq!(config.audio.fft_size, 2048);

    let defaults = config::load_config_from(&dir.path().join("missing.toml"))
        .expect("Missing config should fall back to defaults");
    assert_eq!(defaults.codec.wrapper_key, codec::NUMPY_JSON_KEY);
    assert_abs_diff_eq!(defaults.peaks.threshold, 0.5, epsilon = 1e-12);
}

/// Test that malformed configuration is reported.
#[test]
fn test_invalid_config() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[peaks]\nthreshold = \"high\"\n").expect("Failed to write config");

    let result = config::load_config_from(&path);
    assert!(matches!(result, Err(config::ConfigError::Parse(_))));
}

/// Test the full pipeline from two encoded signals to peaks.
///
/// This test verifies:
/// - Encoded inputs decode to the original arrays
/// - Merging in pad mode keeps the longer signal's tail
/// - The merged array round-trips through a configured codec
/// - Peaks on the decoded result match peaks on the merged array
#[test]
fn test_merge_and_find_peaks_pipeline() {
    let config = Config::default();
    let codec = config.codec.codec();

    let first = NumericArray::from_vec(vec![0.0f32, 1.0, 0.0, 2.0, 0.0, 0.0, 0.0, 0.0]);
    let second = NumericArray::from_vec(vec![0.0f64, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 4.0]);

    let first_text = codec.encode_to_text(&first).expect("Failed to encode array");
    let second_text = codec.encode_to_text(&second).expect("Failed to encode array");
    let first_back = codec.decode_from_text(&first_text).expect("Failed to decode array");
    let second_back = codec.decode_from_text(&second_text).expect("Failed to decode array");

    let merged = array::add_mismatched(&first_back, &second_back, false)
        .expect("Failed to merge arrays");
    assert_eq!(merged.dtype(), DType::Float64);
    assert_eq!(
        merged.to_f64_vec(),
        vec![0.0, 1.0, 0.0, 3.0, 0.0, 0.0, 0.0, 0.0, 0.0, 4.0]
    );

    let merged_back = codec
        .decode_from_text(&codec.encode_to_text(&merged).expect("Failed to encode array"))
        .expect("Failed to decode array");

    let options = config.peaks.options().with_min_dist(MinDistance::Uniform(1));
    let expected = peaks::find_peak_indices(&merged, 2, &options).expect("Failed to find peaks");
    let actual = peaks::find_peak_indices(&merged_back, 2, &options).expect("Failed to find peaks");

    assert_eq!(expected, vec![PeakIndex::OneD(9), PeakIndex::OneD(3)]);
    assert_eq!(actual, expected);

    let values = peaks::find_peak_values(&merged_back, 2, &options).expect("Failed to find values");
    assert_eq!(values.dtype(), DType::Float64);
    assert_eq!(values.to_f64_vec(), vec![4.0, 3.0]);
}
