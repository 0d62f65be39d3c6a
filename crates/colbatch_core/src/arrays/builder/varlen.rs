use std::any::Any;

use colbatch_error::{DbError, Result};

use super::{ColumnBuilder, calculate_reset_bytes, calculate_reset_entries};
use crate::arrays::array::{Array, ArrayData, VarlenStorage};
use crate::arrays::bitmap::Bitmap;
use crate::arrays::datatype::DataType;
use crate::arrays::scalar::ScalarValue;
use crate::size_tracker::ColumnSizeTracker;

/// Bytes charged per entry on top of the value bytes: null flag plus offset.
const ENTRY_OVERHEAD_BYTES: usize = 1 + std::mem::size_of::<usize>();

/// Builder for variable length columns (utf8 and binary).
#[derive(Debug)]
pub struct VarlenColumnBuilder {
    datatype: DataType,
    tracker: ColumnSizeTracker,
    offsets: Vec<usize>,
    data: Vec<u8>,
    validity: Bitmap,
    len: usize,
    /// Value bytes appended.
    data_len: usize,
}

impl VarlenColumnBuilder {
    /// Create a new builder.
    ///
    /// The data buffer is sized to hold `expected_rows` values of
    /// `expected_bytes_per_entry` bytes each, bounded by the column budget.
    pub fn new(
        datatype: DataType,
        tracker: ColumnSizeTracker,
        expected_rows: usize,
        expected_bytes_per_entry: usize,
    ) -> Self {
        let max_bytes = tracker.max_column_bytes();
        let data_cap = expected_rows.saturating_mul(expected_bytes_per_entry);
        let data_cap = usize::min(data_cap, max_bytes);
        let entries_cap = if expected_bytes_per_entry == 0 {
            expected_rows
        } else {
            usize::min(expected_rows, max_bytes / expected_bytes_per_entry)
        };
        // Every entry charges at least the overhead, the column can't hold
        // more than this before reaching its budget.
        let entries_cap = usize::min(entries_cap, max_bytes / ENTRY_OVERHEAD_BYTES);

        Self::with_capacities(datatype, tracker, entries_cap, data_cap)
    }

    fn with_capacities(
        datatype: DataType,
        tracker: ColumnSizeTracker,
        entries_cap: usize,
        data_cap: usize,
    ) -> Self {
        let mut offsets = Vec::with_capacity(entries_cap + 1);
        offsets.push(0);

        VarlenColumnBuilder {
            datatype,
            tracker,
            offsets,
            data: Vec::with_capacity(data_cap),
            validity: Bitmap::with_capacity(entries_cap),
            len: 0,
            data_len: 0,
        }
    }

    /// Number of entries the builder can hold before reallocating.
    pub fn entries_capacity(&self) -> usize {
        self.offsets.capacity().saturating_sub(1)
    }

    /// Number of value bytes the builder can hold before reallocating.
    pub fn data_capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Average bytes per value seen by this builder, rounded up.
    pub fn average_entry_bytes(&self) -> usize {
        if self.len == 0 {
            return 0;
        }
        self.data_len.div_ceil(self.len)
    }

    /// Append raw bytes.
    ///
    /// Utf8 builders only accept valid utf8; use `append_str` for those.
    pub fn append_bytes(&mut self, value: &[u8]) -> Result<()> {
        if self.datatype == DataType::Utf8 && std::str::from_utf8(value).is_err() {
            let err = DbError::new("Value is not valid utf8").with_field("idx", self.len);
            return Err(err);
        }
        self.push_unchecked(value);
        Ok(())
    }

    pub fn append_str(&mut self, value: &str) {
        self.push_unchecked(value.as_bytes());
    }

    fn push_unchecked(&mut self, value: &[u8]) {
        self.data.extend_from_slice(value);
        self.offsets.push(self.data.len());
        self.validity.push(true);
        self.len += 1;
        self.data_len += value.len();
        self.tracker.add_bytes(ENTRY_OVERHEAD_BYTES + value.len());
    }
}

impl ColumnBuilder for VarlenColumnBuilder {
    fn datatype(&self) -> &DataType {
        &self.datatype
    }

    fn append_value(&mut self, value: &ScalarValue) -> Result<()> {
        match value {
            ScalarValue::Null => self.append_null(),
            ScalarValue::Utf8(v) if self.datatype == DataType::Utf8 => self.append_str(v),
            ScalarValue::Binary(v) if self.datatype == DataType::Binary => self.push_unchecked(v),
            other => {
                return Err(DbError::new("Value does not match column type")
                    .with_field("datatype", &self.datatype)
                    .with_field("value", other));
            }
        }
        Ok(())
    }

    fn append_null(&mut self) {
        self.offsets.push(self.data.len());
        self.validity.push(false);
        self.len += 1;
        self.tracker.add_bytes(ENTRY_OVERHEAD_BYTES);
    }

    fn len(&self) -> usize {
        self.len
    }

    fn size_bytes(&self) -> usize {
        self.tracker.size_bytes()
    }

    fn retained_size_bytes(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.offsets.capacity() * std::mem::size_of::<usize>()
            + self.data.capacity()
            + self.validity.capacity_bytes()
    }

    fn new_builder_like(&self, tracker: ColumnSizeTracker) -> Box<dyn ColumnBuilder> {
        Box::new(Self::with_capacities(
            self.datatype.clone(),
            tracker,
            calculate_reset_entries(self.len),
            calculate_reset_bytes(self.data_len),
        ))
    }

    fn finish(&self) -> Array {
        let validity = if self.validity.is_all_true() {
            None
        } else {
            Some(self.validity.clone())
        };
        let storage = VarlenStorage {
            offsets: self.offsets.clone(),
            data: self.data.clone(),
        };

        Array {
            datatype: self.datatype.clone(),
            validity,
            data: ArrayData::Binary(storage),
        }
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf8_builder(expected_rows: usize, bytes_per_entry: usize) -> VarlenColumnBuilder {
        VarlenColumnBuilder::new(
            DataType::Utf8,
            ColumnSizeTracker::standalone(1024),
            expected_rows,
            bytes_per_entry,
        )
    }

    #[test]
    fn append_strings() {
        let mut builder = utf8_builder(4, 8);
        builder.append_value(&"a".into()).unwrap();
        builder.append_value(&ScalarValue::Null).unwrap();
        builder.append_str("bb");

        assert_eq!(3, builder.len());
        assert_eq!(3 * ENTRY_OVERHEAD_BYTES + 3, builder.size_bytes());

        let arr = builder.finish();
        let got: Vec<_> = arr.iter_values().map(|v| v.unwrap()).collect();
        let expected = vec![
            ScalarValue::from("a"),
            ScalarValue::Null,
            ScalarValue::from("bb"),
        ];
        assert_eq!(expected, got);
        assert_eq!(arr, builder.finish());
    }

    #[test]
    fn binary_values() {
        let mut builder = VarlenColumnBuilder::new(
            DataType::Binary,
            ColumnSizeTracker::standalone(1024),
            4,
            4,
        );
        builder.append_bytes(&[0xff, 0x00]).unwrap();
        builder
            .append_value(&ScalarValue::from([1_u8].as_slice()))
            .unwrap();
        builder.append_value(&"str".into()).unwrap_err();

        let arr = builder.finish();
        assert_eq!(
            ScalarValue::from([0xff_u8, 0x00].as_slice()),
            arr.logical_value(0).unwrap()
        );
        assert_eq!(2, arr.logical_len());
    }

    #[test]
    fn utf8_rejects_invalid_bytes() {
        let mut builder = utf8_builder(4, 8);
        builder.append_bytes(&[0xff, 0xfe]).unwrap_err();
        assert_eq!(0, builder.len());
    }

    #[test]
    fn initial_capacity_bounded_by_budget() {
        // 1024 byte budget at 32 bytes per entry.
        let builder = utf8_builder(1000, 32);
        assert!(builder.entries_capacity() >= 32);
        assert!(builder.data_capacity() >= 1024);
        assert!(builder.data_capacity() < 32 * 1000);
    }

    #[test]
    fn new_like_carries_average_entry_size() {
        let mut builder = utf8_builder(4, 32);
        for _ in 0..10 {
            builder.append_str("0123456789");
        }
        assert_eq!(10, builder.average_entry_bytes());

        let mut like = builder.new_builder_like(ColumnSizeTracker::standalone(1024));
        let like = like.downcast_mut::<VarlenColumnBuilder>().unwrap();

        assert!(like.is_empty());
        assert!(like.entries_capacity() >= 13);
        assert!(like.data_capacity() >= 125);
    }

    #[test]
    fn finish_then_append() {
        let mut builder = utf8_builder(4, 8);
        builder.append_str("a");
        let first = builder.finish();

        builder.append_null();
        builder.append_str("ccc");
        let second = builder.finish();

        assert_eq!(1, first.logical_len());
        assert_eq!(3, second.logical_len());
        assert_eq!(ScalarValue::from("a"), second.logical_value(0).unwrap());
        assert_eq!(ScalarValue::from("ccc"), second.logical_value(2).unwrap());
    }

    #[test]
    fn finish_empty() {
        let builder = utf8_builder(0, 0);
        let arr = builder.finish();
        assert_eq!(0, arr.logical_len());
        assert!(arr.validity().is_none());
    }
}
