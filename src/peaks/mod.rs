/// Peak detection over 1-D and 2-D arrays.
///
/// Peaks are found greedily: the largest remaining value is taken and a
/// window around it is zeroed before the next search, so no two peaks are
/// closer than the configured minimum distance along any axis.
mod finder;
mod types;

pub use finder::{find_peak_indices, find_peak_values};
pub use types::{MinDistance, PeakError, PeakIndex, PeakOptions, DEFAULT_THRESHOLD};
