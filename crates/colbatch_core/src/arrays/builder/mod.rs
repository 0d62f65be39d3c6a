//! Column builders for accumulating values of a single column.
pub mod null;
pub mod primitive;
pub mod varlen;

use std::any::Any;
use std::fmt::Debug;

use colbatch_error::Result;

use super::array::Array;
use super::datatype::DataType;
use super::scalar::ScalarValue;
use crate::size_tracker::ColumnSizeTracker;

/// Upper bound on the number of entries a builder will preallocate for.
pub const MAX_BUILDER_ENTRIES: usize = i32::MAX as usize;

/// Growth applied to the previous builder's size when creating a builder
/// "like" it.
const RESET_SKEW: f64 = 1.25;

/// Minimum number of entries to preallocate when resetting.
const MIN_RESET_ENTRIES: usize = 4;

/// Growing, mutable storage for a single column of a batch.
///
/// Builders report every appended value to their [`ColumnSizeTracker`]. They
/// do no coordination with other columns, keeping row counts in sync is the
/// responsibility of the caller.
pub trait ColumnBuilder: Debug + Any {
    fn datatype(&self) -> &DataType;

    /// Append a value, with `ScalarValue::Null` appending a null.
    ///
    /// Errors if the value does not match the builder's datatype.
    fn append_value(&mut self, value: &ScalarValue) -> Result<()>;

    fn append_null(&mut self);

    /// Number of entries appended to this builder.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Logical bytes appended, as reported to the size tracker.
    fn size_bytes(&self) -> usize;

    /// Bytes allocated by this builder, including unused capacity.
    fn retained_size_bytes(&self) -> usize;

    /// Create a new empty builder for the same datatype, sized using the
    /// entries and bytes seen by this builder.
    fn new_builder_like(&self, tracker: ColumnSizeTracker) -> Box<dyn ColumnBuilder>;

    /// Produce an immutable array from the appended values.
    ///
    /// The builder is left unchanged. Values appended afterwards are included
    /// in the next array along with everything appended before.
    fn finish(&self) -> Array;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl dyn ColumnBuilder + '_ {
    /// Try to get the concrete builder type to use its typed append methods.
    pub fn downcast_mut<B: ColumnBuilder>(&mut self) -> Option<&mut B> {
        self.as_any_mut().downcast_mut::<B>()
    }
}

/// Number of entries to preallocate for a builder replacing one that held
/// `entries` entries.
pub(crate) fn calculate_reset_entries(entries: usize) -> usize {
    let new_size = (entries as f64 * RESET_SKEW).ceil();
    if new_size >= MAX_BUILDER_ENTRIES as f64 {
        return MAX_BUILDER_ENTRIES;
    }
    usize::max(new_size as usize, MIN_RESET_ENTRIES)
}

/// Number of data bytes to preallocate for a builder replacing one that held
/// `bytes` bytes of variable length data.
pub(crate) fn calculate_reset_bytes(bytes: usize) -> usize {
    let new_size = (bytes as f64 * RESET_SKEW).ceil();
    if new_size >= MAX_BUILDER_ENTRIES as f64 {
        return MAX_BUILDER_ENTRIES;
    }
    new_size as usize
}
