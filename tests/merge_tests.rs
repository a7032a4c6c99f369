// Array merging tests
//
// These tests verify addition of arrays whose last axis differs in length,
// together with the dtype promotion applied before adding.
//
// The tests cover:
// - Pad and truncate modes on 1-D and 2-D arrays
// - Dtype promotion between integer and float types
// - Integer overflow behaviour
// - Error handling for mismatched ranks and row counts

use arraykit::array::{self, ArrayError, DType};
use arraykit::NumericArray;

/// Test 1-D merging when the first array is longer.
///
/// This test verifies:
/// - Pad mode keeps the tail of the longer array
/// - Truncate mode drops it
#[test]
fn test_longer_first_array() {
    let a = NumericArray::from_vec(vec![1i64, 2, 3]);
    let b = NumericArray::from_vec(vec![10i64, 20]);

    let padded = array::add_mismatched(&a, &b, false).expect("Failed to merge arrays");
    assert_eq!(padded.shape(), &[3]);
    assert_eq!(padded.as_slice::<i64>(), Some(&[11i64, 22, 3][..]));

    let truncated = array::add_mismatched(&a, &b, true).expect("Failed to merge arrays");
    assert_eq!(truncated.shape(), &[2]);
    assert_eq!(truncated.as_slice::<i64>(), Some(&[11i64, 22][..]));
}

/// Test 1-D merging when the second array is longer.
#[test]
fn test_longer_second_array() {
    let a = NumericArray::from_vec(vec![1i64, 2]);
    let b = NumericArray::from_vec(vec![10i64, 20, 30]);

    let padded = array::add_mismatched(&a, &b, false).expect("Failed to merge arrays");
    assert_eq!(padded.as_slice::<i64>(), Some(&[11i64, 22, 30][..]));

    let truncated = array::add_mismatched(&a, &b, true).expect("Failed to merge arrays");
    assert_eq!(truncated.as_slice::<i64>(), Some(&[11i64, 22][..]));
}

/// Test that the inputs are not modified by a merge.
#[test]
fn test_inputs_unchanged() {
    let a = NumericArray::from_vec(vec![1.0f64, 2.0]);
    let b = NumericArray::from_vec(vec![0.5f64, 0.5, 0.5]);
    let (a_before, b_before) = (a.clone(), b.clone());

    array::add_mismatched(&a, &b, false).expect("Failed to merge arrays");

    assert_eq!(a, a_before);
    assert_eq!(b, b_before);
}

/// Test dtype promotion before adding.
///
/// This test verifies:
/// - float32 plus float64 yields float64
/// - The float32 values are widened before the addition
#[test]
fn test_float_promotion() {
    let a = NumericArray::from_vec(vec![1.5f32, 2.5]);
    let b = NumericArray::from_vec(vec![0.25f64]);

    let merged = array::add_mismatched(&a, &b, false).expect("Failed to merge arrays");

    assert_eq!(merged.dtype(), DType::Float64);
    assert_eq!(merged.as_slice::<f64>(), Some(&[1.75f64, 2.5][..]));
}

/// Test the promotion table against numpy's rules.
#[test]
fn test_promotion_rules() {
    assert_eq!(DType::Float32.promote(DType::Float64), DType::Float64);
    assert_eq!(DType::Int16.promote(DType::Float32), DType::Float32);
    assert_eq!(DType::Int32.promote(DType::Float32), DType::Float64);
    assert_eq!(DType::UInt8.promote(DType::Int8), DType::Int16);
    assert_eq!(DType::Int32.promote(DType::UInt32), DType::Int64);
    assert_eq!(DType::Int64.promote(DType::UInt32), DType::Int64);
    assert_eq!(DType::UInt64.promote(DType::Int64), DType::Float64);
    assert_eq!(DType::UInt16.promote(DType::UInt64), DType::UInt64);
    assert_eq!(DType::Int8.promote(DType::Int8), DType::Int8);
}

/// Test that mixed integer types are summed in the promoted type.
#[test]
fn test_mixed_integer_merge() {
    let a = NumericArray::from_vec(vec![200u8, 100]);
    let b = NumericArray::from_vec(vec![-50i8]);

    let merged = array::add_mismatched(&a, &b, false).expect("Failed to merge arrays");

    assert_eq!(merged.dtype(), DType::Int16);
    assert_eq!(merged.as_slice::<i16>(), Some(&[150i16, 100][..]));
}

/// Test that integer addition wraps on overflow.
#[test]
fn test_integer_overflow_wraps() {
    let a = NumericArray::from_vec(vec![127i8, 1]);
    let b = NumericArray::from_vec(vec![1i8]);

    let merged = array::add_mismatched(&a, &b, true).expect("Failed to merge arrays");

    assert_eq!(merged.as_slice::<i8>(), Some(&[-128i8][..]));
}

/// Test 2-D merging along the last axis.
///
/// This test verifies:
/// - Each row is merged independently
/// - Pad mode keeps the wider array's trailing columns
/// - Truncate mode keeps the narrower width
#[test]
fn test_two_dimensional_merge() {
    let a = NumericArray::from_rows(vec![vec![1.0f64, 2.0, 3.0], vec![4.0, 5.0, 6.0]])
        .expect("Failed to build array");
    let b = NumericArray::from_rows(vec![vec![10.0f64], vec![20.0]]).expect("Failed to build array");

    let padded = array::add_mismatched(&a, &b, false).expect("Failed to merge arrays");
    assert_eq!(padded.shape(), &[2, 3]);
    assert_eq!(
        padded.as_slice::<f64>(),
        Some(&[11.0f64, 2.0, 3.0, 24.0, 5.0, 6.0][..])
    );

    let truncated = array::add_mismatched(&a, &b, true).expect("Failed to merge arrays");
    assert_eq!(truncated.shape(), &[2, 1]);
    assert_eq!(truncated.as_slice::<f64>(), Some(&[11.0f64, 24.0][..]));
}

/// Test merge errors.
///
/// This test verifies:
/// - Arrays of different rank are rejected
/// - 2-D arrays with different row counts are rejected
/// - Arrays with more than two dimensions are rejected
#[test]
fn test_merge_errors() {
    let line = NumericArray::from_vec(vec![1.0f64, 2.0]);
    let grid = NumericArray::from_rows(vec![vec![1.0f64, 2.0]]).expect("Failed to build array");
    assert!(matches!(
        array::add_mismatched(&line, &grid, false),
        Err(ArrayError::RankMismatch(1, 2))
    ));

    let tall = NumericArray::from_rows(vec![vec![1.0f64], vec![2.0]]).expect("Failed to build array");
    assert!(matches!(
        array::add_mismatched(&grid, &tall, false),
        Err(ArrayError::ShapeMismatch(_))
    ));

    let cube = NumericArray::from_shape_vec(vec![1, 1, 2], vec![1.0f64, 2.0])
        .expect("Failed to build array");
    assert!(matches!(
        array::add_mismatched(&cube, &cube, false),
        Err(ArrayError::UnsupportedRank(3))
    ));
}
