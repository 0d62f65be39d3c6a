use std::any::Any;
use std::fmt::Debug;

use colbatch_error::{DbError, Result};

use super::{ColumnBuilder, calculate_reset_entries};
use crate::arrays::array::{Array, ArrayData};
use crate::arrays::bitmap::Bitmap;
use crate::arrays::datatype::DataType;
use crate::arrays::scalar::ScalarValue;
use crate::size_tracker::ColumnSizeTracker;

/// Native types that can be stored in a [`PrimitiveColumnBuilder`].
pub trait PrimitiveNative: Debug + Default + Copy + 'static {
    /// Try to get a native value from a scalar.
    fn try_from_scalar(scalar: &ScalarValue) -> Option<Self>;

    fn into_array_data(values: Vec<Self>) -> ArrayData;
}

macro_rules! impl_primitive_native {
    ($native:ty, $data_variant:ident, $($scalar_variant:ident),+) => {
        impl PrimitiveNative for $native {
            fn try_from_scalar(scalar: &ScalarValue) -> Option<Self> {
                match scalar {
                    $(ScalarValue::$scalar_variant(v) => Some(*v),)+
                    _ => None,
                }
            }

            fn into_array_data(values: Vec<Self>) -> ArrayData {
                ArrayData::$data_variant(values)
            }
        }
    };
}

impl_primitive_native!(i8, Int8, Int8);
impl_primitive_native!(i16, Int16, Int16);
impl_primitive_native!(i32, Int32, Int32, Date32);
impl_primitive_native!(i64, Int64, Int64);
impl_primitive_native!(u8, UInt8, UInt8);
impl_primitive_native!(u16, UInt16, UInt16);
impl_primitive_native!(u32, UInt32, UInt32);
impl_primitive_native!(u64, UInt64, UInt64);
impl_primitive_native!(f32, Float32, Float32);
impl_primitive_native!(f64, Float64, Float64);

/// Bytes charged for the null flag of each entry.
const NULL_FLAG_BYTES: usize = 1;

/// Builder for fixed width numeric (and date) columns.
#[derive(Debug)]
pub struct PrimitiveColumnBuilder<T> {
    datatype: DataType,
    tracker: ColumnSizeTracker,
    values: Vec<T>,
    validity: Bitmap,
    len: usize,
}

impl<T> PrimitiveColumnBuilder<T>
where
    T: PrimitiveNative,
{
    /// Bytes charged for each appended entry.
    const ENTRY_SIZE: usize = std::mem::size_of::<T>() + NULL_FLAG_BYTES;

    pub fn new(datatype: DataType, tracker: ColumnSizeTracker, capacity: usize) -> Self {
        PrimitiveColumnBuilder {
            datatype,
            tracker,
            values: Vec::with_capacity(capacity),
            validity: Bitmap::with_capacity(capacity),
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.values.capacity()
    }

    pub fn append(&mut self, value: T) {
        self.values.push(value);
        self.validity.push(true);
        self.len += 1;
        self.tracker.add_bytes(Self::ENTRY_SIZE);
    }

    pub fn append_option(&mut self, value: Option<T>) {
        match value {
            Some(v) => self.append(v),
            None => self.append_null(),
        }
    }
}

impl<T> ColumnBuilder for PrimitiveColumnBuilder<T>
where
    T: PrimitiveNative,
{
    fn datatype(&self) -> &DataType {
        &self.datatype
    }

    fn append_value(&mut self, value: &ScalarValue) -> Result<()> {
        if value.is_null() {
            self.append_null();
            return Ok(());
        }

        let v = if value.datatype() == self.datatype {
            T::try_from_scalar(value)
        } else {
            None
        };
        let v = v.ok_or_else(|| {
            DbError::new("Value does not match column type")
                .with_field("datatype", &self.datatype)
                .with_field("value", value)
        })?;
        self.append(v);

        Ok(())
    }

    fn append_null(&mut self) {
        self.values.push(T::default());
        self.validity.push(false);
        self.len += 1;
        self.tracker.add_bytes(Self::ENTRY_SIZE);
    }

    fn len(&self) -> usize {
        self.len
    }

    fn size_bytes(&self) -> usize {
        self.tracker.size_bytes()
    }

    fn retained_size_bytes(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.values.capacity() * std::mem::size_of::<T>()
            + self.validity.capacity_bytes()
    }

    fn new_builder_like(&self, tracker: ColumnSizeTracker) -> Box<dyn ColumnBuilder> {
        Box::new(Self::new(
            self.datatype.clone(),
            tracker,
            calculate_reset_entries(self.len),
        ))
    }

    fn finish(&self) -> Array {
        let validity = if self.validity.is_all_true() {
            None
        } else {
            Some(self.validity.clone())
        };

        Array {
            datatype: self.datatype.clone(),
            validity,
            data: T::into_array_data(self.values.clone()),
        }
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Builder for boolean columns.
///
/// Values are bit packed, but size accounting charges a full byte per value
/// in addition to the null flag.
#[derive(Debug)]
pub struct BooleanColumnBuilder {
    tracker: ColumnSizeTracker,
    values: Bitmap,
    validity: Bitmap,
    len: usize,
}

impl BooleanColumnBuilder {
    const ENTRY_SIZE: usize = 1 + NULL_FLAG_BYTES;

    pub fn new(tracker: ColumnSizeTracker, capacity: usize) -> Self {
        BooleanColumnBuilder {
            tracker,
            values: Bitmap::with_capacity(capacity),
            validity: Bitmap::with_capacity(capacity),
            len: 0,
        }
    }

    pub fn append(&mut self, value: bool) {
        self.values.push(value);
        self.validity.push(true);
        self.len += 1;
        self.tracker.add_bytes(Self::ENTRY_SIZE);
    }
}

impl ColumnBuilder for BooleanColumnBuilder {
    fn datatype(&self) -> &DataType {
        &DataType::Boolean
    }

    fn append_value(&mut self, value: &ScalarValue) -> Result<()> {
        match value {
            ScalarValue::Null => self.append_null(),
            ScalarValue::Boolean(v) => self.append(*v),
            other => {
                return Err(DbError::new("Value does not match column type")
                    .with_field("datatype", DataType::Boolean)
                    .with_field("value", other));
            }
        }
        Ok(())
    }

    fn append_null(&mut self) {
        self.values.push(false);
        self.validity.push(false);
        self.len += 1;
        self.tracker.add_bytes(Self::ENTRY_SIZE);
    }

    fn len(&self) -> usize {
        self.len
    }

    fn size_bytes(&self) -> usize {
        self.tracker.size_bytes()
    }

    fn retained_size_bytes(&self) -> usize {
        std::mem::size_of::<Self>() + self.values.capacity_bytes() + self.validity.capacity_bytes()
    }

    fn new_builder_like(&self, tracker: ColumnSizeTracker) -> Box<dyn ColumnBuilder> {
        Box::new(Self::new(tracker, calculate_reset_entries(self.len)))
    }

    fn finish(&self) -> Array {
        let validity = if self.validity.is_all_true() {
            None
        } else {
            Some(self.validity.clone())
        };

        Array {
            datatype: DataType::Boolean,
            validity,
            data: ArrayData::Boolean(self.values.clone()),
        }
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
