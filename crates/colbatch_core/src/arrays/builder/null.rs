use std::any::Any;

use colbatch_error::{DbError, Result};

use super::ColumnBuilder;
use crate::arrays::array::{Array, ArrayData};
use crate::arrays::datatype::DataType;
use crate::arrays::scalar::ScalarValue;
use crate::size_tracker::ColumnSizeTracker;

/// Bytes charged for each null entry.
const NULL_ENTRY_BYTES: usize = 1;

/// Builder for columns where every value is null.
///
/// Null columns have no storage, but each entry still charges a byte so that
/// a batch of only null columns fills up like any other.
#[derive(Debug)]
pub struct NullColumnBuilder {
    tracker: ColumnSizeTracker,
    len: usize,
}

impl NullColumnBuilder {
    pub fn new(tracker: ColumnSizeTracker) -> Self {
        NullColumnBuilder { tracker, len: 0 }
    }
}

impl ColumnBuilder for NullColumnBuilder {
    fn datatype(&self) -> &DataType {
        &DataType::Null
    }

    fn append_value(&mut self, value: &ScalarValue) -> Result<()> {
        if !value.is_null() {
            return Err(DbError::new("Value does not match column type")
                .with_field("datatype", DataType::Null)
                .with_field("value", value));
        }
        self.append_null();
        Ok(())
    }

    fn append_null(&mut self) {
        self.len += 1;
        self.tracker.add_bytes(NULL_ENTRY_BYTES);
    }

    fn len(&self) -> usize {
        self.len
    }

    fn size_bytes(&self) -> usize {
        self.tracker.size_bytes()
    }

    fn retained_size_bytes(&self) -> usize {
        std::mem::size_of::<Self>()
    }

    fn new_builder_like(&self, tracker: ColumnSizeTracker) -> Box<dyn ColumnBuilder> {
        Box::new(Self::new(tracker))
    }

    fn finish(&self) -> Array {
        Array {
            datatype: DataType::Null,
            validity: None,
            data: ArrayData::UntypedNull(self.len),
        }
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
