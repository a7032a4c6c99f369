//! Numeric array utilities for audio work.
//!
//! - [`peaks`]: greedy peak picking with non-maximum suppression over 1-D and
//!   2-D arrays
//! - [`array`]: a dtype-tagged array type and addition of arrays with
//!   mismatched lengths
//! - [`codec`]: a JSON format for arrays (dtype, shape and base64 bytes)
//! - [`audio`]: WAV input and magnitude spectra (feature `audio`)

pub mod array;
#[cfg(feature = "audio")]
pub mod audio;
pub mod codec;
pub mod config;
pub mod peaks;

pub use array::{add_mismatched, DType, NumericArray};
pub use codec::{decode_from_text, encode, encode_to_text};
pub use peaks::{find_peak_indices, find_peak_values, MinDistance, PeakIndex, PeakOptions};
