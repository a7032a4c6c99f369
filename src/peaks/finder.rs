use ndarray::{ArrayD, Dimension, IxDyn, Slice};
use tracing::{debug, warn};

use super::types::{MinDistance, PeakError, PeakIndex, PeakOptions};
use crate::array::{ArrayError, NumericArray};

/// Finds the coordinates of up to `n_peaks` peaks in a 1-D or 2-D array.
///
/// The search runs on a normalized `f64` copy of `array`:
/// 1. Shifts the values so the minimum is 0.0 and scales them into [0, 1]
/// 2. Negates them when searching for minima
/// 3. Zeroes every value below `options.threshold`
/// 4. Repeatedly takes the largest value (first in row-major order on ties)
///    and zeroes a window around it, stopping early once nothing is left
///
/// The zeroed window spans `[index - min_dist - 1, index + min_dist + 1)` on
/// each axis, clipped to the array bounds.
///
/// # Arguments
/// * `array` - The 1-D or 2-D array to inspect, left untouched
/// * `n_peaks` - Maximum number of peaks to return
/// * `options` - Minimum distance, min/max mode and threshold
///
/// # Returns
/// * `Result<Vec<PeakIndex>, PeakError>` - Peak coordinates in the order found
///
/// # Errors
/// * `PeakError::Shape` if the array is not 1-D or 2-D
/// * `PeakError::Empty` if the array has no elements
/// * `PeakError::InvalidMinDistance` if `min_dist` does not fit the rank
/// * `PeakError::NonFinite` if the array holds NaN or an infinity
/// * `PeakError::NoPeaksAboveThreshold` if thresholding removes every value
pub fn find_peak_indices(
    array: &NumericArray,
    n_peaks: usize,
    options: &PeakOptions,
) -> Result<Vec<PeakIndex>, PeakError> {
    let ndim = array.ndim();
    if ndim == 0 || ndim > 2 {
        return Err(PeakError::Shape(ndim));
    }
    if array.is_empty() {
        return Err(PeakError::Empty);
    }

    let window = options
        .min_dist
        .unwrap_or(MinDistance::Uniform(array.shape()[0] / 4))
        .per_axis(ndim)?;

    let mut work = normalized_copy(array, options)?;

    let candidates = work.iter().filter(|&&v| v != 0.0).count();
    if candidates == 0 {
        return Err(PeakError::NoPeaksAboveThreshold(options.threshold));
    }
    if candidates < n_peaks {
        warn!(
            "Threshold {} leaves {} candidate values, fewer than the {} peaks requested",
            options.threshold, candidates, n_peaks
        );
    }

    let mut peaks = Vec::with_capacity(n_peaks);
    for _ in 0..n_peaks {
        let peak = argmax(&work);
        debug!("Peak {} at {:?}", peaks.len(), peak);
        peaks.push(to_peak_index(&peak));

        suppress_window(&mut work, &peak, &window);

        if work.iter().all(|&v| v == 0.0) {
            break;
        }
    }

    Ok(peaks)
}

/// Finds the original values of up to `n_peaks` peaks.
///
/// Takes the same arguments as [`find_peak_indices`] and reads the caller's
/// unnormalized values back at the returned coordinates.
///
/// # Returns
/// * `Result<NumericArray, PeakError>` - A 1-D array of the peak values in
///   the order found, keeping the input's dtype
pub fn find_peak_values(
    array: &NumericArray,
    n_peaks: usize,
    options: &PeakOptions,
) -> Result<NumericArray, PeakError> {
    let indices = find_peak_indices(array, n_peaks, options)?;
    let offsets: Vec<usize> = indices
        .iter()
        .filter_map(|idx| array.flat_index(&idx.to_vec()))
        .collect();
    Ok(array.select(&offsets))
}

/// Copies `array` into an `f64` buffer scaled to [0, 1] (or [-1, 0] when
/// searching for minima) with everything below the threshold zeroed.
fn normalized_copy(array: &NumericArray, options: &PeakOptions) -> Result<ArrayD<f64>, PeakError> {
    let values = array.to_f64_vec();
    if let Some(position) = values.iter().position(|v| !v.is_finite()) {
        return Err(PeakError::NonFinite(position));
    }
    let mut work = ArrayD::from_shape_vec(IxDyn(array.shape()), values)
        .map_err(|e| ArrayError::ShapeMismatch(e.to_string()))?;

    let min = work.iter().copied().fold(f64::INFINITY, f64::min);
    work.mapv_inplace(|v| v - min);

    let max = work.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max > 0.0 {
        work.mapv_inplace(|v| v / max);
    }

    if options.find_minimum {
        work.mapv_inplace(|v| -v);
    }

    let threshold = options.threshold;
    work.mapv_inplace(|v| if v < threshold { 0.0 } else { v });

    Ok(work)
}

/// Coordinate of the largest value; ties go to the first in row-major order.
fn argmax(work: &ArrayD<f64>) -> Vec<usize> {
    let mut best: Option<(IxDyn, f64)> = None;
    for (idx, &value) in work.indexed_iter() {
        if best.as_ref().map_or(true, |(_, b)| value > *b) {
            best = Some((idx, value));
        }
    }
    best.map(|(idx, _)| idx.slice().to_vec()).unwrap_or_default()
}

fn to_peak_index(peak: &[usize]) -> PeakIndex {
    match peak {
        [i, j] => PeakIndex::TwoD(*i, *j),
        [i, ..] => PeakIndex::OneD(*i),
        [] => PeakIndex::OneD(0),
    }
}

/// Zeroes the suppression window around `peak`.
fn suppress_window(work: &mut ArrayD<f64>, peak: &[usize], window: &[usize]) {
    work.slice_each_axis_mut(|ax| {
        let axis = ax.axis.index();
        let (lower, upper) = zero_range(peak[axis], window[axis], ax.len);
        Slice::from(lower..upper)
    })
    .fill(0.0);
}

/// Half-open range `[index - distance - 1, index + distance + 1)` clipped to `[0, len)`.
fn zero_range(index: usize, distance: usize, len: usize) -> (usize, usize) {
    let reach = distance.saturating_add(1);
    let lower = index.saturating_sub(reach);
    let upper = index.saturating_add(reach).min(len);
    (lower, upper)
}
