use serde_json::Value;

use super::types::CodecError;
use crate::array::{with_data, with_dtype, DType, Element, NumericArray};

/// Renders `array` as nested JSON lists following its shape.
///
/// Non-finite floats become `null`.
pub fn to_plain_json(array: &NumericArray) -> Result<Value, CodecError> {
    let flat: Vec<Value> = with_data!(array.data(), v => {
        v.iter()
            .map(|x| serde_json::to_value(x))
            .collect::<Result<_, _>>()?
    });
    let mut values = flat.into_iter();
    Ok(nest(&mut values, array.shape()))
}

fn nest(values: &mut impl Iterator<Item = Value>, shape: &[usize]) -> Value {
    match shape.split_first() {
        None => values.next().unwrap_or(Value::Null),
        Some((&len, rest)) => Value::Array((0..len).map(|_| nest(values, rest)).collect()),
    }
}

/// Builds an array of `dtype` from a regular nested list of numbers.
///
/// A bare number becomes a 0-D array. Values are converted with `as`
/// semantics, so integer dtypes truncate and saturate.
///
/// # Errors
/// * `CodecError::InvalidData` for ragged lists or non-numeric entries
pub fn from_plain_json(value: &Value, dtype: DType) -> Result<NumericArray, CodecError> {
    let shape = infer_shape(value);
    let mut flat = Vec::with_capacity(shape.iter().product());
    flatten(value, &shape, &mut flat)?;

    let array = with_dtype!(dtype, T => {
        let values: Vec<T> = flat.iter().map(|&x| T::from_f64(x)).collect();
        NumericArray::from_shape_vec(shape, values)?
    });
    Ok(array)
}

/// Shape taken from the first element at every nesting level.
fn infer_shape(value: &Value) -> Vec<usize> {
    let mut shape = Vec::new();
    let mut current = value;
    while let Value::Array(items) = current {
        shape.push(items.len());
        match items.first() {
            Some(first) => current = first,
            None => break,
        }
    }
    shape
}

fn flatten(value: &Value, shape: &[usize], out: &mut Vec<f64>) -> Result<(), CodecError> {
    match (value, shape.split_first()) {
        (Value::Array(items), Some((&len, rest))) if items.len() == len => {
            for item in items {
                flatten(item, rest, out)?;
            }
            Ok(())
        }
        (Value::Number(n), None) => {
            let x = n
                .as_f64()
                .ok_or_else(|| CodecError::InvalidData(format!("{} is not representable", n)))?;
            out.push(x);
            Ok(())
        }
        (Value::Array(items), Some((&len, _))) => Err(CodecError::InvalidData(format!(
            "ragged list: expected {} items, found {}",
            len,
            items.len()
        ))),
        (other, _) => Err(CodecError::InvalidData(format!(
            "expected a number or a list at this depth, found {}",
            other
        ))),
    }
}
