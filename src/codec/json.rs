use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::debug;

use super::types::{CodecError, Decoded, EncodedArray, NDARRAY_TAG, NUMPY_JSON_KEY};
use crate::array::{DType, NumericArray};

/// Encoder/decoder for the wrapped array format.
///
/// Both directions share the same wrapper key:
///
/// ```text
/// {"<wrapper_key>": {"__ndarray__": "<base64>", "dtype": "float64", "shape": [4, 5]}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayCodec {
    wrapper_key: String,
}

impl Default for ArrayCodec {
    fn default() -> Self {
        ArrayCodec::new(NUMPY_JSON_KEY)
    }
}

impl ArrayCodec {
    pub fn new(wrapper_key: impl Into<String>) -> Self {
        ArrayCodec {
            wrapper_key: wrapper_key.into(),
        }
    }

    pub fn wrapper_key(&self) -> &str {
        &self.wrapper_key
    }

    /// Builds the wrapped JSON record for `array`.
    pub fn encode(&self, array: &NumericArray) -> Value {
        let mut inner = Map::new();
        inner.insert(
            NDARRAY_TAG.to_string(),
            STANDARD.encode(array.to_le_bytes()).into(),
        );
        inner.insert("dtype".to_string(), array.dtype().name().into());
        inner.insert("shape".to_string(), array.shape().into());

        let mut outer = Map::new();
        outer.insert(self.wrapper_key.clone(), Value::Object(inner));
        Value::Object(outer)
    }

    /// Serializes `array` to JSON text.
    pub fn encode_to_text(&self, array: &NumericArray) -> Result<String, CodecError> {
        Ok(serde_json::to_string(&self.encode(array))?)
    }

    /// Parses JSON text produced by [`ArrayCodec::encode_to_text`].
    ///
    /// # Errors
    /// * `CodecError::Json` for malformed JSON or incomplete records
    /// * `CodecError::Base64` for a bad payload
    /// * `CodecError::Array` for an unknown dtype or a payload/shape mismatch
    /// * `CodecError::MissingWrapper` if no array sits under the wrapper key
    pub fn decode_from_text(&self, text: &str) -> Result<NumericArray, CodecError> {
        let root: Value = serde_json::from_str(text)?;
        self.unwrap_decoded(decode_value(root)?)
    }

    /// Extracts the array under the wrapper key of a decoded document.
    pub fn unwrap_decoded(&self, decoded: Decoded) -> Result<NumericArray, CodecError> {
        match decoded {
            Decoded::Object(mut map) => map
                .remove(&self.wrapper_key)
                .and_then(Decoded::into_array)
                .ok_or_else(|| CodecError::MissingWrapper(self.wrapper_key.clone())),
            _ => Err(CodecError::MissingWrapper(self.wrapper_key.clone())),
        }
    }
}

/// Encodes `array` under [`NUMPY_JSON_KEY`].
pub fn encode(array: &NumericArray) -> Value {
    ArrayCodec::default().encode(array)
}

/// Encodes `array` under [`NUMPY_JSON_KEY`] and renders it as JSON text.
pub fn encode_to_text(array: &NumericArray) -> Result<String, CodecError> {
    ArrayCodec::default().encode_to_text(array)
}

/// Decodes JSON text holding an array under [`NUMPY_JSON_KEY`].
pub fn decode_from_text(text: &str) -> Result<NumericArray, CodecError> {
    ArrayCodec::default().decode_from_text(text)
}

/// Walks a JSON document and turns every object carrying the `__ndarray__`
/// tag into a [`NumericArray`], at any depth.
pub fn decode_value(value: Value) -> Result<Decoded, CodecError> {
    match value {
        Value::Object(map) if map.contains_key(NDARRAY_TAG) => {
            decode_record(Value::Object(map)).map(Decoded::Array)
        }
        Value::Object(map) => map
            .into_iter()
            .map(|(key, v)| decode_value(v).map(|decoded| (key, decoded)))
            .collect::<Result<_, CodecError>>()
            .map(Decoded::Object),
        Value::Array(items) => items
            .into_iter()
            .map(decode_value)
            .collect::<Result<_, CodecError>>()
            .map(Decoded::List),
        other => Ok(Decoded::Value(other)),
    }
}

fn decode_record(record: Value) -> Result<NumericArray, CodecError> {
    let record: EncodedArray = serde_json::from_value(record)?;
    let bytes = STANDARD.decode(record.data.as_bytes())?;
    let dtype: DType = record.dtype.parse()?;
    debug!(
        "Decoding {} array of shape {:?} from {} bytes",
        dtype,
        record.shape,
        bytes.len()
    );
    Ok(NumericArray::from_le_bytes(&bytes, dtype, record.shape)?)
}

/// Serializes as the wrapped record under [`NUMPY_JSON_KEY`], so an absent
/// `Option<NumericArray>` becomes `null`.
impl Serialize for NumericArray {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        encode(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NumericArray {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let decoded = decode_value(value).map_err(D::Error::custom)?;
        ArrayCodec::default()
            .unwrap_decoded(decoded)
            .map_err(D::Error::custom)
    }
}
