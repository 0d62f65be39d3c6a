use std::fmt;

use super::builder::ColumnBuilder;
use super::builder::null::NullColumnBuilder;
use super::builder::primitive::{BooleanColumnBuilder, PrimitiveColumnBuilder};
use super::builder::varlen::VarlenColumnBuilder;
use crate::size_tracker::ColumnSizeTracker;

/// Physical representation of values for a datatype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhysicalType {
    UntypedNull,
    Boolean,
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
    Binary,
}

impl PhysicalType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UntypedNull => "UntypedNull",
            Self::Boolean => "Boolean",
            Self::Int8 => "Int8",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::UInt8 => "UInt8",
            Self::UInt16 => "UInt16",
            Self::UInt32 => "UInt32",
            Self::UInt64 => "UInt64",
            Self::Float32 => "Float32",
            Self::Float64 => "Float64",
            Self::Binary => "Binary",
        }
    }
}

impl fmt::Display for PhysicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Supported data types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Constant null columns.
    Null,
    Boolean,
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
    /// Days since epoch.
    Date32,
    Utf8,
    Binary,
}

impl DataType {
    pub const fn physical_type(&self) -> PhysicalType {
        match self {
            Self::Null => PhysicalType::UntypedNull,
            Self::Boolean => PhysicalType::Boolean,
            Self::Int8 => PhysicalType::Int8,
            Self::Int16 => PhysicalType::Int16,
            Self::Int32 | Self::Date32 => PhysicalType::Int32,
            Self::Int64 => PhysicalType::Int64,
            Self::UInt8 => PhysicalType::UInt8,
            Self::UInt16 => PhysicalType::UInt16,
            Self::UInt32 => PhysicalType::UInt32,
            Self::UInt64 => PhysicalType::UInt64,
            Self::Float32 => PhysicalType::Float32,
            Self::Float64 => PhysicalType::Float64,
            Self::Utf8 | Self::Binary => PhysicalType::Binary,
        }
    }

    /// Size in bytes of a single value if every value of this type has the
    /// same size.
    ///
    /// Returns `None` for variable width types.
    pub const fn fixed_width(&self) -> Option<usize> {
        match self.physical_type() {
            PhysicalType::UntypedNull => Some(0),
            PhysicalType::Boolean => Some(1),
            PhysicalType::Int8 | PhysicalType::UInt8 => Some(1),
            PhysicalType::Int16 | PhysicalType::UInt16 => Some(2),
            PhysicalType::Int32 | PhysicalType::UInt32 | PhysicalType::Float32 => Some(4),
            PhysicalType::Int64 | PhysicalType::UInt64 | PhysicalType::Float64 => Some(8),
            PhysicalType::Binary => None,
        }
    }

    /// Create a new column builder for this type.
    ///
    /// `expected_rows` is a capacity hint, and `expected_bytes_per_entry` is
    /// only used by variable width types to size their data buffer. Both are
    /// bounded by the column byte budget of `tracker`.
    pub fn create_column_builder(
        &self,
        tracker: ColumnSizeTracker,
        expected_rows: usize,
        expected_bytes_per_entry: usize,
    ) -> Box<dyn ColumnBuilder> {
        let cap = match self.fixed_width() {
            Some(width) => {
                let max_rows = tracker.max_column_bytes() / usize::max(width, 1);
                usize::min(expected_rows, max_rows)
            }
            None => expected_rows,
        };

        match self.physical_type() {
            PhysicalType::UntypedNull => Box::new(NullColumnBuilder::new(tracker)),
            PhysicalType::Boolean => Box::new(BooleanColumnBuilder::new(tracker, cap)),
            PhysicalType::Int8 => {
                Box::new(PrimitiveColumnBuilder::<i8>::new(self.clone(), tracker, cap))
            }
            PhysicalType::Int16 => {
                Box::new(PrimitiveColumnBuilder::<i16>::new(self.clone(), tracker, cap))
            }
            PhysicalType::Int32 => {
                Box::new(PrimitiveColumnBuilder::<i32>::new(self.clone(), tracker, cap))
            }
            PhysicalType::Int64 => {
                Box::new(PrimitiveColumnBuilder::<i64>::new(self.clone(), tracker, cap))
            }
            PhysicalType::UInt8 => {
                Box::new(PrimitiveColumnBuilder::<u8>::new(self.clone(), tracker, cap))
            }
            PhysicalType::UInt16 => {
                Box::new(PrimitiveColumnBuilder::<u16>::new(self.clone(), tracker, cap))
            }
            PhysicalType::UInt32 => {
                Box::new(PrimitiveColumnBuilder::<u32>::new(self.clone(), tracker, cap))
            }
            PhysicalType::UInt64 => {
                Box::new(PrimitiveColumnBuilder::<u64>::new(self.clone(), tracker, cap))
            }
            PhysicalType::Float32 => {
                Box::new(PrimitiveColumnBuilder::<f32>::new(self.clone(), tracker, cap))
            }
            PhysicalType::Float64 => {
                Box::new(PrimitiveColumnBuilder::<f64>::new(self.clone(), tracker, cap))
            }
            PhysicalType::Binary => Box::new(VarlenColumnBuilder::new(
                self.clone(),
                tracker,
                expected_rows,
                expected_bytes_per_entry,
            )),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "Null"),
            Self::Boolean => write!(f, "Boolean"),
            Self::Int8 => write!(f, "Int8"),
            Self::Int16 => write!(f, "Int16"),
            Self::Int32 => write!(f, "Int32"),
            Self::Int64 => write!(f, "Int64"),
            Self::UInt8 => write!(f, "UInt8"),
            Self::UInt16 => write!(f, "UInt16"),
            Self::UInt32 => write!(f, "UInt32"),
            Self::UInt64 => write!(f, "UInt64"),
            Self::Float32 => write!(f, "Float32"),
            Self::Float64 => write!(f, "Float64"),
            Self::Date32 => write!(f, "Date32"),
            Self::Utf8 => write!(f, "Utf8"),
            Self::Binary => write!(f, "Binary"),
        }
    }
}
