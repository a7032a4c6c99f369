use std::fmt;
use std::str::FromStr;

use super::element::Element;

/// Element type of a [`NumericArray`], named the way numpy names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
}

/// Broad category of a dtype, used for promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Signed,
    Unsigned,
    Float,
}

impl DType {
    /// All supported dtypes, narrowest integers first.
    pub const ALL: [DType; 10] = [
        DType::Int8,
        DType::Int16,
        DType::Int32,
        DType::Int64,
        DType::UInt8,
        DType::UInt16,
        DType::UInt32,
        DType::UInt64,
        DType::Float32,
        DType::Float64,
    ];

    /// The numpy name of this dtype, e.g. `"float64"`.
    pub fn name(self) -> &'static str {
        match self {
            DType::Int8 => "int8",
            DType::Int16 => "int16",
            DType::Int32 => "int32",
            DType::Int64 => "int64",
            DType::UInt8 => "uint8",
            DType::UInt16 => "uint16",
            DType::UInt32 => "uint32",
            DType::UInt64 => "uint64",
            DType::Float32 => "float32",
            DType::Float64 => "float64",
        }
    }

    /// Size of one element in bytes.
    pub fn itemsize(self) -> usize {
        self.bits() / 8
    }

    fn bits(self) -> usize {
        match self {
            DType::Int8 | DType::UInt8 => 8,
            DType::Int16 | DType::UInt16 => 16,
            DType::Int32 | DType::UInt32 | DType::Float32 => 32,
            DType::Int64 | DType::UInt64 | DType::Float64 => 64,
        }
    }

    fn kind(self) -> Kind {
        match self {
            DType::Int8 | DType::Int16 | DType::Int32 | DType::Int64 => Kind::Signed,
            DType::UInt8 | DType::UInt16 | DType::UInt32 | DType::UInt64 => Kind::Unsigned,
            DType::Float32 | DType::Float64 => Kind::Float,
        }
    }

    fn from_kind_bits(kind: Kind, bits: usize) -> DType {
        match (kind, bits) {
            (Kind::Signed, 8) => DType::Int8,
            (Kind::Signed, 16) => DType::Int16,
            (Kind::Signed, 32) => DType::Int32,
            (Kind::Signed, _) => DType::Int64,
            (Kind::Unsigned, 8) => DType::UInt8,
            (Kind::Unsigned, 16) => DType::UInt16,
            (Kind::Unsigned, 32) => DType::UInt32,
            (Kind::Unsigned, _) => DType::UInt64,
            (Kind::Float, 32) => DType::Float32,
            (Kind::Float, _) => DType::Float64,
        }
    }

    /// Smallest dtype both `self` and `other` can be cast to without losing
    /// range, following numpy's `promote_types`.
    pub fn promote(self, other: DType) -> DType {
        let (a, b) = (self, other);
        match (a.kind(), b.kind()) {
            (ka, kb) if ka == kb => DType::from_kind_bits(ka, a.bits().max(b.bits())),
            (Kind::Float, _) => promote_float_int(a, b),
            (_, Kind::Float) => promote_float_int(b, a),
            (Kind::Signed, Kind::Unsigned) => promote_signed_unsigned(a, b),
            (Kind::Unsigned, Kind::Signed) => promote_signed_unsigned(b, a),
            _ => DType::Float64,
        }
    }
}

fn promote_float_int(float: DType, int: DType) -> DType {
    if float == DType::Float32 && int.bits() <= 16 {
        DType::Float32
    } else {
        DType::Float64
    }
}

fn promote_signed_unsigned(signed: DType, unsigned: DType) -> DType {
    if signed.bits() > unsigned.bits() {
        signed
    } else if unsigned.bits() < 64 {
        DType::from_kind_bits(Kind::Signed, unsigned.bits() * 2)
    } else {
        DType::Float64
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DType {
    type Err = ArrayError;

    /// Accepts numpy names (`"float64"`) and little-endian or
    /// byte-order-free type strings (`"<f8"`, `"|u1"`, `"i4"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(dtype) = DType::ALL.iter().find(|d| d.name() == s) {
            return Ok(*dtype);
        }

        let code = s.trim_start_matches(['<', '|', '=']);
        let dtype = match code {
            "i1" => DType::Int8,
            "i2" => DType::Int16,
            "i4" => DType::Int32,
            "i8" => DType::Int64,
            "u1" => DType::UInt8,
            "u2" => DType::UInt16,
            "u4" => DType::UInt32,
            "u8" => DType::UInt64,
            "f4" => DType::Float32,
            "f8" => DType::Float64,
            _ => return Err(ArrayError::UnknownDType(s.to_string())),
        };
        Ok(dtype)
    }
}

/// Typed element storage behind a [`NumericArray`].
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    UInt8(Vec<u8>),
    UInt16(Vec<u16>),
    UInt32(Vec<u32>),
    UInt64(Vec<u64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

/// Runs `$body` with `$v` bound to the typed vector inside an [`ArrayData`].
macro_rules! with_data {
    ($data:expr, $v:ident => $body:expr) => {
        match $data {
            $crate::array::ArrayData::Int8($v) => $body,
            $crate::array::ArrayData::Int16($v) => $body,
            $crate::array::ArrayData::Int32($v) => $body,
            $crate::array::ArrayData::Int64($v) => $body,
            $crate::array::ArrayData::UInt8($v) => $body,
            $crate::array::ArrayData::UInt16($v) => $body,
            $crate::array::ArrayData::UInt32($v) => $body,
            $crate::array::ArrayData::UInt64($v) => $body,
            $crate::array::ArrayData::Float32($v) => $body,
            $crate::array::ArrayData::Float64($v) => $body,
        }
    };
}
pub(crate) use with_data;

/// Runs `$body` with the type alias `$t` set to the Rust element type of `$dtype`.
macro_rules! with_dtype {
    ($dtype:expr, $t:ident => $body:expr) => {
        match $dtype {
            $crate::array::DType::Int8 => {
                type $t = i8;
                $body
            }
            $crate::array::DType::Int16 => {
                type $t = i16;
                $body
            }
            $crate::array::DType::Int32 => {
                type $t = i32;
                $body
            }
            $crate::array::DType::Int64 => {
                type $t = i64;
                $body
            }
            $crate::array::DType::UInt8 => {
                type $t = u8;
                $body
            }
            $crate::array::DType::UInt16 => {
                type $t = u16;
                $body
            }
            $crate::array::DType::UInt32 => {
                type $t = u32;
                $body
            }
            $crate::array::DType::UInt64 => {
                type $t = u64;
                $body
            }
            $crate::array::DType::Float32 => {
                type $t = f32;
                $body
            }
            $crate::array::DType::Float64 => {
                type $t = f64;
                $body
            }
        }
    };
}
pub(crate) use with_dtype;

impl ArrayData {
    pub fn dtype(&self) -> DType {
        fn dtype_of<T: Element>(_: &[T]) -> DType {
            T::DTYPE
        }
        with_data!(self, v => dtype_of(v))
    }

    pub fn len(&self) -> usize {
        with_data!(self, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A row-major N-dimensional array of real numbers with a runtime dtype.
///
/// Operations in this crate never mutate a `NumericArray` they are handed;
/// they work on copies and return new arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericArray {
    shape: Vec<usize>,
    data: ArrayData,
}

impl NumericArray {
    /// Builds an array from a shape and row-major elements.
    ///
    /// # Errors
    /// * `ArrayError::ShapeMismatch` if the element count does not equal the
    ///   product of `shape`
    pub fn from_shape_vec<T: Element>(shape: Vec<usize>, values: Vec<T>) -> Result<Self, ArrayError> {
        Self::from_data(shape, T::wrap(values))
    }

    /// Builds an array from already-typed storage.
    pub fn from_data(shape: Vec<usize>, data: ArrayData) -> Result<Self, ArrayError> {
        let expected = checked_size(&shape, 1)?;
        if expected != data.len() {
            return Err(ArrayError::ShapeMismatch(format!(
                "shape {:?} needs {} elements, got {}",
                shape,
                expected,
                data.len()
            )));
        }
        Ok(NumericArray { shape, data })
    }

    /// A 1-D array over `values`.
    pub fn from_vec<T: Element>(values: Vec<T>) -> Self {
        NumericArray {
            shape: vec![values.len()],
            data: T::wrap(values),
        }
    }

    /// A 2-D array from equally long rows.
    pub fn from_rows<T: Element>(rows: Vec<Vec<T>>) -> Result<Self, ArrayError> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().position(|r| r.len() != n_cols) {
            return Err(ArrayError::ShapeMismatch(format!(
                "row {} has {} columns, expected {}",
                bad,
                rows[bad].len(),
                n_cols
            )));
        }
        let values: Vec<T> = rows.into_iter().flatten().collect();
        Self::from_shape_vec(vec![n_rows, n_cols], values)
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }

    pub fn data(&self) -> &ArrayData {
        &self.data
    }

    /// Borrows the elements if the array holds `T`.
    pub fn as_slice<T: Element>(&self) -> Option<&[T]> {
        T::unwrap_ref(&self.data)
    }

    /// All elements converted to `f64`, row-major.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        with_data!(&self.data, v => v.iter().map(|x| x.to_f64()).collect())
    }

    /// Row-major flat offset of `index`, or `None` when out of bounds.
    pub fn flat_index(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut offset = 0;
        for (&i, &dim) in index.iter().zip(&self.shape) {
            if i >= dim {
                return None;
            }
            offset = offset * dim + i;
        }
        Some(offset)
    }

    /// The element at `index` as `f64`.
    pub fn get_f64(&self, index: &[usize]) -> Option<f64> {
        let offset = self.flat_index(index)?;
        Some(with_data!(&self.data, v => v[offset].to_f64()))
    }

    /// A 1-D array of the elements at the given row-major `offsets`, in the
    /// same dtype.
    ///
    /// # Panics
    /// If an offset is out of bounds; callers obtain offsets from
    /// [`NumericArray::flat_index`].
    pub fn select(&self, offsets: &[usize]) -> NumericArray {
        let data = with_data!(&self.data, v => {
            let picked: Vec<_> = offsets.iter().map(|&offset| v[offset]).collect();
            Element::wrap(picked)
        });
        NumericArray {
            shape: vec![offsets.len()],
            data,
        }
    }

    /// A copy of this array converted to `dtype`.
    ///
    /// Same-dtype casts clone the storage so 64-bit integers stay exact.
    pub fn cast(&self, dtype: DType) -> NumericArray {
        if dtype == self.dtype() {
            return self.clone();
        }
        let data = with_dtype!(dtype, T => {
            let values: Vec<T> = with_data!(&self.data, v => {
                v.iter().map(|x| T::from_f64(x.to_f64())).collect()
            });
            T::wrap(values)
        });
        NumericArray {
            shape: self.shape.clone(),
            data,
        }
    }

    /// Little-endian bytes of the elements in row-major order.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len() * self.dtype().itemsize());
        with_data!(&self.data, v => v.iter().for_each(|x| x.write_le(&mut out)));
        out
    }

    /// Reinterprets little-endian `bytes` as `dtype` elements laid out in `shape`.
    pub fn from_le_bytes(bytes: &[u8], dtype: DType, shape: Vec<usize>) -> Result<Self, ArrayError> {
        let itemsize = dtype.itemsize();
        let expected = checked_size(&shape, itemsize)?;
        if bytes.len() != expected {
            return Err(ArrayError::ShapeMismatch(format!(
                "{} bytes cannot hold shape {:?} of {} ({} bytes expected)",
                bytes.len(),
                shape,
                dtype,
                expected
            )));
        }
        let data = with_dtype!(dtype, T => {
            let values: Vec<T> = bytes.chunks_exact(itemsize).map(T::read_le).collect();
            T::wrap(values)
        });
        Self::from_data(shape, data)
    }
}

/// Product of `shape` and `itemsize`, or `ShapeMismatch` if it overflows `usize`.
fn checked_size(shape: &[usize], itemsize: usize) -> Result<usize, ArrayError> {
    shape
        .iter()
        .try_fold(itemsize, |acc, &dim| acc.checked_mul(dim))
        .ok_or_else(|| ArrayError::ShapeMismatch(format!("shape {:?} is too large", shape)))
}

impl<T: Element> From<Vec<T>> for NumericArray {
    fn from(values: Vec<T>) -> Self {
        NumericArray::from_vec(values)
    }
}

/// Errors raised while building or combining arrays
#[derive(Debug, thiserror::Error)]
pub enum ArrayError {
    /// Element count or per-axis lengths disagree with a shape
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// The two operands have different numbers of dimensions
    #[error("Rank mismatch: cannot combine a {0}-D array with a {1}-D array")]
    RankMismatch(usize, usize),

    /// The operation is only defined for 1-D and 2-D arrays
    #[error("Unsupported rank: expected a 1-D or 2-D array, got {0}-D")]
    UnsupportedRank(usize),

    /// A dtype name that is not one of the supported element types
    #[error("Unknown dtype: {0}")]
    UnknownDType(String),
}
