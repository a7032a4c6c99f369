use std::fmt;

use crate::array::ArrayError;

/// Default normalized threshold below which values are ignored.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Coordinate of a peak in a 1-D or 2-D array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeakIndex {
    OneD(usize),
    TwoD(usize, usize),
}

impl PeakIndex {
    /// The coordinate as a slice-friendly vector, one entry per axis.
    pub fn to_vec(self) -> Vec<usize> {
        match self {
            PeakIndex::OneD(i) => vec![i],
            PeakIndex::TwoD(i, j) => vec![i, j],
        }
    }
}

impl fmt::Display for PeakIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeakIndex::OneD(i) => write!(f, "({})", i),
            PeakIndex::TwoD(i, j) => write!(f, "({}, {})", i, j),
        }
    }
}

/// Half-width of the suppression window zeroed around each found peak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinDistance {
    /// Same distance along every axis
    Uniform(usize),
    /// One distance per axis of a 2-D array: (rows, columns)
    PerAxis(usize, usize),
}

impl MinDistance {
    /// Builds a distance from a list of one or two values.
    ///
    /// # Errors
    /// * `PeakError::InvalidMinDistance` for any other length
    pub fn from_slice(values: &[usize]) -> Result<Self, PeakError> {
        match values {
            [d] => Ok(MinDistance::Uniform(*d)),
            [d0, d1] => Ok(MinDistance::PerAxis(*d0, *d1)),
            _ => Err(PeakError::InvalidMinDistance(format!(
                "expected 1 or 2 values, got {}",
                values.len()
            ))),
        }
    }

    /// Per-axis distances for an array of rank `ndim`.
    pub(crate) fn per_axis(self, ndim: usize) -> Result<Vec<usize>, PeakError> {
        match (self, ndim) {
            (MinDistance::Uniform(d), n) => Ok(vec![d; n]),
            (MinDistance::PerAxis(d0, d1), 2) => Ok(vec![d0, d1]),
            (MinDistance::PerAxis(..), n) => Err(PeakError::InvalidMinDistance(format!(
                "a per-axis distance needs a 2-D array, got {}-D",
                n
            ))),
        }
    }
}

/// Search parameters shared by `find_peak_indices` and `find_peak_values`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakOptions {
    /// Suppression half-width. `None` means a quarter of the first axis.
    pub min_dist: Option<MinDistance>,
    /// Search for minima instead of maxima
    pub find_minimum: bool,
    /// Cut-off on the normalized scale; smaller values are ignored
    pub threshold: f64,
}

impl Default for PeakOptions {
    fn default() -> Self {
        PeakOptions {
            min_dist: None,
            find_minimum: false,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl PeakOptions {
    pub fn with_min_dist(mut self, min_dist: MinDistance) -> Self {
        self.min_dist = Some(min_dist);
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn find_minimum(mut self, find_minimum: bool) -> Self {
        self.find_minimum = find_minimum;
        self
    }
}

/// Errors that can occur during peak finding
#[derive(Debug, thiserror::Error)]
pub enum PeakError {
    /// Input is not a 1-D or 2-D array
    #[error("Cannot find peaks in a {0}-D array, only 1-D and 2-D arrays are supported")]
    Shape(usize),

    /// Input has no elements
    #[error("Cannot find peaks in an empty array")]
    Empty,

    /// Minimum distance does not fit the array rank
    #[error("Invalid minimum distance: {0}")]
    InvalidMinDistance(String),

    /// Input holds NaN or an infinity, which cannot be normalized
    #[error("Cannot find peaks in an array with a non-finite value at flat position {0}")]
    NonFinite(usize),

    /// Thresholding left no candidate values
    #[error("Threshold set incorrectly, no peaks above threshold {0}")]
    NoPeaksAboveThreshold(f64),

    /// Internal array conversion failed
    #[error("Array error: {0}")]
    Array(#[from] ArrayError),
}
