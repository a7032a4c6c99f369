/// JSON encoding of numeric arrays.
///
/// An array is stored as its raw little-endian bytes in base64 together with
/// its dtype name and shape, nested under a wrapper key. Decoding restores a
/// bit-identical array.
mod json;
mod plain;
mod types;

pub use json::{decode_from_text, decode_value, encode, encode_to_text, ArrayCodec};
pub use plain::{from_plain_json, to_plain_json};
pub use types::{CodecError, Decoded, EncodedArray, NDARRAY_TAG, NUMPY_JSON_KEY};
