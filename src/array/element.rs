use std::fmt::Debug;

use serde::Serialize;

use super::types::{ArrayData, DType};

/// A Rust scalar type that can live inside a [`NumericArray`](super::NumericArray).
pub trait Element: Copy + Debug + PartialEq + Serialize + Send + Sync + 'static {
    /// The dtype tag for this element type.
    const DTYPE: DType;

    fn to_f64(self) -> f64;

    /// Converts with `as` semantics (saturating for integers).
    fn from_f64(value: f64) -> Self;

    /// Element-wise sum. Integers wrap on overflow, matching numpy.
    fn add(self, other: Self) -> Self;

    fn write_le(self, out: &mut Vec<u8>);

    /// Reads one element from exactly `DTYPE.itemsize()` little-endian bytes.
    fn read_le(bytes: &[u8]) -> Self;

    fn wrap(values: Vec<Self>) -> ArrayData;

    fn unwrap_ref(data: &ArrayData) -> Option<&[Self]>;
}

macro_rules! impl_element {
    ($t:ty, $variant:ident, |$a:ident, $b:ident| $add:expr) => {
        impl Element for $t {
            const DTYPE: DType = DType::$variant;

            fn to_f64(self) -> f64 {
                self as f64
            }

            fn from_f64(value: f64) -> Self {
                value as $t
            }

            fn add(self, other: Self) -> Self {
                let ($a, $b) = (self, other);
                $add
            }

            fn write_le(self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_le_bytes());
            }

            fn read_le(bytes: &[u8]) -> Self {
                let mut buf = [0u8; std::mem::size_of::<$t>()];
                buf.copy_from_slice(bytes);
                <$t>::from_le_bytes(buf)
            }

            fn wrap(values: Vec<Self>) -> ArrayData {
                ArrayData::$variant(values)
            }

            fn unwrap_ref(data: &ArrayData) -> Option<&[Self]> {
                match data {
                    ArrayData::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

impl_element!(i8, Int8, |a, b| a.wrapping_add(b));
impl_element!(i16, Int16, |a, b| a.wrapping_add(b));
impl_element!(i32, Int32, |a, b| a.wrapping_add(b));
impl_element!(i64, Int64, |a, b| a.wrapping_add(b));
impl_element!(u8, UInt8, |a, b| a.wrapping_add(b));
impl_element!(u16, UInt16, |a, b| a.wrapping_add(b));
impl_element!(u32, UInt32, |a, b| a.wrapping_add(b));
impl_element!(u64, UInt64, |a, b| a.wrapping_add(b));
impl_element!(f32, Float32, |a, b| a + b);
impl_element!(f64, Float64, |a, b| a + b);
