use tracing::debug;

use super::element::Element;
use super::types::{with_dtype, ArrayData, ArrayError, NumericArray};

/// Adds two arrays whose last axis has a different length.
///
/// Both inputs are first cast to their promoted dtype, so e.g. `float32` plus
/// `float64` yields `float64` without losing precision. For 2-D arrays the
/// merge axis is the last one and the row counts must agree.
///
/// # Arguments
/// * `array1`, `array2` - 1-D or 2-D arrays of the same rank
/// * `truncate` - If true, the result is as wide as the narrower input and the
///   excess of the wider one is dropped. Otherwise it is as wide as the wider
///   input, whose trailing values are carried over unchanged.
///
/// # Returns
/// * `Result<NumericArray, ArrayError>` - The merged array
///
/// # Errors
/// * `ArrayError::RankMismatch` if the ranks differ
/// * `ArrayError::UnsupportedRank` if the rank is not 1 or 2
/// * `ArrayError::ShapeMismatch` if 2-D inputs have different row counts
pub fn add_mismatched(
    array1: &NumericArray,
    array2: &NumericArray,
    truncate: bool,
) -> Result<NumericArray, ArrayError> {
    let (rows, width1, width2) = merge_geometry(array1, array2)?;

    let dtype = array1.dtype().promote(array2.dtype());
    let a = array1.cast(dtype);
    let b = array2.cast(dtype);

    let width = if truncate {
        width1.min(width2)
    } else {
        width1.max(width2)
    };
    debug!(
        "Merging {:?} and {:?} as {} (truncate: {})",
        array1.shape(),
        array2.shape(),
        dtype,
        truncate
    );

    let data = with_dtype!(dtype, T => {
        match (a.as_slice::<T>(), b.as_slice::<T>()) {
            (Some(x), Some(y)) => merge_rows(x, width1, y, width2, rows, truncate),
            _ => {
                return Err(ArrayError::ShapeMismatch(format!(
                    "operands could not be cast to {}",
                    dtype
                )))
            }
        }
    });

    let shape = if array1.ndim() == 1 {
        vec![width]
    } else {
        vec![rows, width]
    };
    NumericArray::from_data(shape, data)
}

/// Validates ranks and returns `(rows, width1, width2)`, treating 1-D arrays
/// as a single row.
fn merge_geometry(
    array1: &NumericArray,
    array2: &NumericArray,
) -> Result<(usize, usize, usize), ArrayError> {
    if array1.ndim() != array2.ndim() {
        return Err(ArrayError::RankMismatch(array1.ndim(), array2.ndim()));
    }

    match (array1.shape(), array2.shape()) {
        ([w1], [w2]) => Ok((1, *w1, *w2)),
        ([r1, w1], [r2, w2]) => {
            if r1 != r2 {
                return Err(ArrayError::ShapeMismatch(format!(
                    "cannot add arrays with {} and {} rows",
                    r1, r2
                )));
            }
            Ok((*r1, *w1, *w2))
        }
        (shape, _) => Err(ArrayError::UnsupportedRank(shape.len())),
    }
}

/// Row-by-row merge of two row-major buffers.
///
/// The result of each row starts as a copy of the base operand (the narrower
/// one when truncating, the wider one otherwise) and the other operand is added
/// into its overlapping prefix.
fn merge_rows<T: Element>(
    a: &[T],
    width_a: usize,
    b: &[T],
    width_b: usize,
    rows: usize,
    truncate: bool,
) -> ArrayData {
    let a_is_base = if truncate {
        width_a < width_b
    } else {
        width_a >= width_b
    };
    let (base, base_width, other, other_width) = if a_is_base {
        (a, width_a, b, width_b)
    } else {
        (b, width_b, a, width_a)
    };
    let overlap = base_width.min(other_width);

    let mut out = Vec::with_capacity(rows * base_width);
    for row in 0..rows {
        let base_row = &base[row * base_width..(row + 1) * base_width];
        let other_row = &other[row * other_width..row * other_width + overlap];
        out.extend(
            base_row
                .iter()
                .enumerate()
                .map(|(i, &x)| match other_row.get(i) {
                    Some(&y) => x.add(y),
                    None => x,
                }),
        );
    }
    T::wrap(out)
}
