use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::array::{ArrayError, NumericArray};

/// Key that wraps an encoded array record.
///
/// Shared by every reader and writer of the format, so arrays written here
/// can be loaded by other tools that use the same key.
pub const NUMPY_JSON_KEY: &str = "py/numpy.ndarray";

/// Field holding the base64 payload. Its presence marks an object as an
/// encoded array.
pub const NDARRAY_TAG: &str = "__ndarray__";

/// The inner record of an encoded array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedArray {
    /// Base64 of the row-major little-endian element bytes
    #[serde(rename = "__ndarray__")]
    pub data: String,
    /// numpy dtype name, e.g. "float64"
    pub dtype: String,
    pub shape: Vec<usize>,
}

/// A JSON document with every encoded array replaced by a [`NumericArray`].
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Array(NumericArray),
    Object(BTreeMap<String, Decoded>),
    List(Vec<Decoded>),
    /// Any other JSON value (number, string, bool or null)
    Value(serde_json::Value),
}

impl Decoded {
    /// Looks up `key` if this is an object.
    pub fn get(&self, key: &str) -> Option<&Decoded> {
        match self {
            Decoded::Object(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&NumericArray> {
        match self {
            Decoded::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn into_array(self) -> Option<NumericArray> {
        match self {
            Decoded::Array(array) => Some(array),
            _ => None,
        }
    }
}

/// Errors that can occur while encoding or decoding arrays
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Malformed JSON or a record with missing fields
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload is not valid base64
    #[error("Base64 decoding error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Unknown dtype or a payload that does not fit the shape
    #[error("Array error: {0}")]
    Array(#[from] ArrayError),

    /// The document has no array under the wrapper key
    #[error("No encoded array found under key \"{0}\"")]
    MissingWrapper(String),

    /// Plain JSON that is not a regular nested list of numbers
    #[error("Invalid array data: {0}")]
    InvalidData(String),
}
