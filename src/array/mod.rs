/// Numeric array container and element-wise array arithmetic.
///
/// This module provides:
/// - `NumericArray`, a row-major array with a runtime dtype
/// - numpy-compatible dtype names and type promotion
/// - addition of arrays whose last axis differs in length
mod element;
mod merge;
mod types;

pub use element::Element;
pub use merge::add_mismatched;
pub(crate) use types::{with_data, with_dtype};
pub use types::{ArrayData, ArrayError, DType, NumericArray};
