use std::borrow::Cow;

use colbatch_error::{DbError, Result};

use super::bitmap::Bitmap;
use super::datatype::{DataType, PhysicalType};
use super::scalar::ScalarValue;

/// Variable length values stored contiguously.
///
/// Value `i` is `data[offsets[i]..offsets[i + 1]]`, so `offsets` always holds
/// one more entry than there are values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarlenStorage {
    pub(crate) offsets: Vec<usize>,
    pub(crate) data: Vec<u8>,
}

impl VarlenStorage {
    pub fn len(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, idx: usize) -> Option<&[u8]> {
        let start = *self.offsets.get(idx)?;
        let end = *self.offsets.get(idx + 1)?;
        Some(&self.data[start..end])
    }

    /// Total number of bytes of value data.
    pub fn data_len(&self) -> usize {
        self.data.len()
    }
}

/// Storage for an immutable column, one variant per physical type.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    /// Only a length, no values.
    UntypedNull(usize),
    Boolean(Bitmap),
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
    Binary(VarlenStorage),
}

impl ArrayData {
    pub fn physical_type(&self) -> PhysicalType {
        match self {
            Self::UntypedNull(_) => PhysicalType::UntypedNull,
            Self::Boolean(_) => PhysicalType::Boolean,
            Self::Int8(_) => PhysicalType::Int8,
            Self::Int16(_) => PhysicalType::Int16,
            Self::Int32(_) => PhysicalType::Int32,
            Self::Int64(_) => PhysicalType::Int64,
            Self::UInt8(_) => PhysicalType::UInt8,
            Self::UInt16(_) => PhysicalType::UInt16,
            Self::UInt32(_) => PhysicalType::UInt32,
            Self::UInt64(_) => PhysicalType::UInt64,
            Self::Float32(_) => PhysicalType::Float32,
            Self::Float64(_) => PhysicalType::Float64,
            Self::Binary(_) => PhysicalType::Binary,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::UntypedNull(len) => *len,
            Self::Boolean(v) => v.len(),
            Self::Int8(v) => v.len(),
            Self::Int16(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::Int64(v) => v.len(),
            Self::UInt8(v) => v.len(),
            Self::UInt16(v) => v.len(),
            Self::UInt32(v) => v.len(),
            Self::UInt64(v) => v.len(),
            Self::Float32(v) => v.len(),
            Self::Float64(v) => v.len(),
            Self::Binary(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Approximate size in bytes of the values.
    pub fn size_bytes(&self) -> usize {
        fn vec_size<T>(v: &[T]) -> usize {
            std::mem::size_of_val(v)
        }

        match self {
            Self::UntypedNull(_) => 0,
            Self::Boolean(v) => v.len().div_ceil(8),
            Self::Int8(v) => vec_size(v),
            Self::Int16(v) => vec_size(v),
            Self::Int32(v) => vec_size(v),
            Self::Int64(v) => vec_size(v),
            Self::UInt8(v) => vec_size(v),
            Self::UInt16(v) => vec_size(v),
            Self::UInt32(v) => vec_size(v),
            Self::UInt64(v) => vec_size(v),
            Self::Float32(v) => vec_size(v),
            Self::Float64(v) => vec_size(v),
            Self::Binary(v) => vec_size(&v.offsets) + v.data.len(),
        }
    }
}

/// An immutable column of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    pub(crate) datatype: DataType,
    /// Validity mask, `None` if all values are valid.
    pub(crate) validity: Option<Bitmap>,
    pub(crate) data: ArrayData,
}

impl Array {
    /// Create a new array, checking that the data and validity line up with
    /// the datatype.
    pub fn try_new(datatype: DataType, validity: Option<Bitmap>, data: ArrayData) -> Result<Self> {
        if datatype.physical_type() != data.physical_type() {
            return Err(DbError::new("Array data does not match datatype")
                .with_field("datatype", &datatype)
                .with_field("physical_type", data.physical_type()));
        }

        if let Some(validity) = &validity {
            if validity.len() != data.len() {
                return Err(DbError::new("Validity length does not match data length")
                    .with_field("validity", validity.len())
                    .with_field("data", data.len()));
            }
        }

        Ok(Array {
            datatype,
            validity,
            data,
        })
    }

    pub fn datatype(&self) -> &DataType {
        &self.datatype
    }

    pub fn data(&self) -> &ArrayData {
        &self.data
    }

    pub fn validity(&self) -> Option<&Bitmap> {
        self.validity.as_ref()
    }

    pub fn logical_len(&self) -> usize {
        self.data.len()
    }

    pub fn is_valid(&self, idx: usize) -> Option<bool> {
        if idx >= self.logical_len() {
            return None;
        }
        if matches!(self.data, ArrayData::UntypedNull(_)) {
            return Some(false);
        }
        Some(match &self.validity {
            Some(validity) => validity.value(idx),
            None => true,
        })
    }

    /// Get the value at a logical index.
    ///
    /// Errors if the index is out of bounds.
    pub fn logical_value(&self, idx: usize) -> Result<ScalarValue<'_>> {
        let valid = self.is_valid(idx).ok_or_else(|| {
            DbError::new("Index out of bounds")
                .with_field("idx", idx)
                .with_field("len", self.logical_len())
        })?;
        if !valid {
            return Ok(ScalarValue::Null);
        }

        let scalar = match (&self.datatype, &self.data) {
            (DataType::Date32, ArrayData::Int32(v)) => ScalarValue::Date32(v[idx]),
            (DataType::Utf8, ArrayData::Binary(v)) => {
                let bytes = v.get(idx).unwrap_or_default();
                let s = std::str::from_utf8(bytes).map_err(|_| {
                    DbError::new("Utf8 array contains invalid utf8").with_field("idx", idx)
                })?;
                ScalarValue::Utf8(Cow::Borrowed(s))
            }
            (_, ArrayData::Binary(v)) => {
                ScalarValue::Binary(Cow::Borrowed(v.get(idx).unwrap_or_default()))
            }
            (_, ArrayData::UntypedNull(_)) => ScalarValue::Null,
            (_, ArrayData::Boolean(v)) => ScalarValue::Boolean(v.value(idx)),
            (_, ArrayData::Int8(v)) => ScalarValue::Int8(v[idx]),
            (_, ArrayData::Int16(v)) => ScalarValue::Int16(v[idx]),
            (_, ArrayData::Int32(v)) => ScalarValue::Int32(v[idx]),
            (_, ArrayData::Int64(v)) => ScalarValue::Int64(v[idx]),
            (_, ArrayData::UInt8(v)) => ScalarValue::UInt8(v[idx]),
            (_, ArrayData::UInt16(v)) => ScalarValue::UInt16(v[idx]),
            (_, ArrayData::UInt32(v)) => ScalarValue::UInt32(v[idx]),
            (_, ArrayData::UInt64(v)) => ScalarValue::UInt64(v[idx]),
            (_, ArrayData::Float32(v)) => ScalarValue::Float32(v[idx]),
            (_, ArrayData::Float64(v)) => ScalarValue::Float64(v[idx]),
        };

        Ok(scalar)
    }

    /// Iterate over all logical values in the array.
    pub fn iter_values(&self) -> impl Iterator<Item = Result<ScalarValue<'_>>> + '_ {
        (0..self.logical_len()).map(|idx| self.logical_value(idx))
    }

    /// Approximate size in bytes of this array's buffers.
    pub fn size_bytes(&self) -> usize {
        let validity = self
            .validity
            .as_ref()
            .map(|v| v.len().div_ceil(8))
            .unwrap_or(0);
        self.data.size_bytes() + validity
    }
}
