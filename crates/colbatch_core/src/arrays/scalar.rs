use std::borrow::Cow;
use std::fmt;

use super::datatype::DataType;

/// A single scalar value.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue<'a> {
    Null,
    Boolean(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Date32(i32),
    Utf8(Cow<'a, str>),
    Binary(Cow<'a, [u8]>),
}

pub type OwnedScalarValue = ScalarValue<'static>;

impl ScalarValue<'_> {
    pub fn datatype(&self) -> DataType {
        match self {
            Self::Null => DataType::Null,
            Self::Boolean(_) => DataType::Boolean,
            Self::Int8(_) => DataType::Int8,
            Self::Int16(_) => DataType::Int16,
            Self::Int32(_) => DataType::Int32,
            Self::Int64(_) => DataType::Int64,
            Self::UInt8(_) => DataType::UInt8,
            Self::UInt16(_) => DataType::UInt16,
            Self::UInt32(_) => DataType::UInt32,
            Self::UInt64(_) => DataType::UInt64,
            Self::Float32(_) => DataType::Float32,
            Self::Float64(_) => DataType::Float64,
            Self::Date32(_) => DataType::Date32,
            Self::Utf8(_) => DataType::Utf8,
            Self::Binary(_) => DataType::Binary,
        }
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn into_owned(self) -> OwnedScalarValue {
        match self {
            Self::Null => OwnedScalarValue::Null,
            Self::Boolean(v) => OwnedScalarValue::Boolean(v),
            Self::Int8(v) => OwnedScalarValue::Int8(v),
            Self::Int16(v) => OwnedScalarValue::Int16(v),
            Self::Int32(v) => OwnedScalarValue::Int32(v),
            Self::Int64(v) => OwnedScalarValue::Int64(v),
            Self::UInt8(v) => OwnedScalarValue::UInt8(v),
            Self::UInt16(v) => OwnedScalarValue::UInt16(v),
            Self::UInt32(v) => OwnedScalarValue::UInt32(v),
            Self::UInt64(v) => OwnedScalarValue::UInt64(v),
            Self::Float32(v) => OwnedScalarValue::Float32(v),
            Self::Float64(v) => OwnedScalarValue::Float64(v),
            Self::Date32(v) => OwnedScalarValue::Date32(v),
            Self::Utf8(v) => OwnedScalarValue::Utf8(Cow::Owned(v.into_owned())),
            Self::Binary(v) => OwnedScalarValue::Binary(Cow::Owned(v.into_owned())),
        }
    }
}

impl fmt::Display for ScalarValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Int8(v) => write!(f, "{v}"),
            Self::Int16(v) => write!(f, "{v}"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::UInt8(v) => write!(f, "{v}"),
            Self::UInt16(v) => write!(f, "{v}"),
            Self::UInt32(v) => write!(f, "{v}"),
            Self::UInt64(v) => write!(f, "{v}"),
            Self::Float32(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::Date32(v) => write!(f, "{v}"),
            Self::Utf8(v) => write!(f, "{v}"),
            Self::Binary(v) => {
                write!(f, "\\x")?;
                for b in v.iter() {
                    write!(f, "{b:02x}")?;
                }
                Ok(())
            }
        }
    }
}

macro_rules! impl_from_native {
    ($native:ty, $variant:ident) => {
        impl From<$native> for ScalarValue<'_> {
            fn from(value: $native) -> Self {
                ScalarValue::$variant(value)
            }
        }
    };
}

impl_from_native!(bool, Boolean);
impl_from_native!(i8, Int8);
impl_from_native!(i16, Int16);
impl_from_native!(i32, Int32);
impl_from_native!(i64, Int64);
impl_from_native!(u8, UInt8);
impl_from_native!(u16, UInt16);
impl_from_native!(u32, UInt32);
impl_from_native!(u64, UInt64);
impl_from_native!(f32, Float32);
impl_from_native!(f64, Float64);

impl<'a> From<&'a str> for ScalarValue<'a> {
    fn from(value: &'a str) -> Self {
        ScalarValue::Utf8(Cow::Borrowed(value))
    }
}

impl From<String> for ScalarValue<'_> {
    fn from(value: String) -> Self {
        ScalarValue::Utf8(Cow::Owned(value))
    }
}

impl<'a> From<&'a [u8]> for ScalarValue<'a> {
    fn from(value: &'a [u8]) -> Self {
        ScalarValue::Binary(Cow::Borrowed(value))
    }
}

impl<T> From<Option<T>> for ScalarValue<'_>
where
    T: Into<OwnedScalarValue>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => {
                let v: OwnedScalarValue = v.into();
                v
            }
            None => ScalarValue::Null,
        }
    }
}
