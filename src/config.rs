use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;

use crate::codec::{ArrayCodec, NUMPY_JSON_KEY};
use crate::peaks::{PeakOptions, DEFAULT_THRESHOLD};

/// Default location of the configuration file
pub const CONFIG_FILE: &str = "config.toml";

/// Configuration shared by the library helpers and the CLI
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub peaks: PeakDefaults,
    #[serde(default)]
    pub codec: CodecConfig,
    #[serde(default)]
    pub audio: AudioDefaults,
}

/// Defaults for peak searches
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PeakDefaults {
    /// Number of peaks to look for
    pub n_peaks: usize,
    /// Normalized cut-off below which values are ignored
    pub threshold: f64,
    /// Search for minima instead of maxima
    pub find_minimum: bool,
}

/// Settings for the JSON array format
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Key wrapping each encoded array record
    pub wrapper_key: String,
}

/// Defaults for spectral analysis of WAV input
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioDefaults {
    pub fft_size: usize,
    pub hop_size: usize,
}

impl Default for PeakDefaults {
    fn default() -> Self {
        PeakDefaults {
            n_peaks: 1,
            threshold: DEFAULT_THRESHOLD,
            find_minimum: false,
        }
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            wrapper_key: NUMPY_JSON_KEY.to_string(),
        }
    }
}

impl Default for AudioDefaults {
    fn default() -> Self {
        AudioDefaults {
            fft_size: 2048,
            hop_size: 512,
        }
    }
}

impl PeakDefaults {
    /// Peak options seeded from these defaults.
    pub fn options(&self) -> PeakOptions {
        PeakOptions::default()
            .with_threshold(self.threshold)
            .find_minimum(self.find_minimum)
    }
}

impl CodecConfig {
    /// A codec using the configured wrapper key.
    pub fn codec(&self) -> ArrayCodec {
        ArrayCodec::new(self.wrapper_key.clone())
    }
}

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Load configuration from `config.toml` in the working directory
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(Path::new(CONFIG_FILE))
}

/// Load configuration from `path`, falling back to defaults if it does not exist
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Config::default()),
        Err(e) => Err(e.into()),
    }
}
