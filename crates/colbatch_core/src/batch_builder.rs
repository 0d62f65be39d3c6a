//! Size bounded batch building.
//!
//! A [`BatchBuilder`] accumulates rows into one column builder per output
//! column and tracks the total byte size of everything appended. Callers
//! append a value to every column, declare the row, and check `is_full` to
//! know when to `build` the batch.
//!
//! Row capacity is estimated up front from the byte budgets and the column
//! types. On `reset` (or when creating a builder "like" another one), each
//! column builder sizes its replacement from what it actually saw, so
//! estimates for variable length columns improve over successive batches.
use colbatch_error::{DbError, Result};
use tracing::{debug, trace};

use crate::arrays::batch::Batch;
use crate::arrays::builder::ColumnBuilder;
use crate::arrays::datatype::DataType;
use crate::arrays::scalar::ScalarValue;
use crate::config::BatchBuilderConfig;
use crate::size_tracker::{BatchSizeTracker, DEFAULT_MAX_COLUMN_SIZE_BYTES};

/// Declared row count at which a builder always reports itself as full.
pub const MAX_ROW_COUNT: usize = usize::MAX;

/// Bytes per entry assumed for variable length columns before any data has
/// been seen.
const VARLEN_ESTIMATED_ENTRY_BYTES: usize = 32;

/// Builds a batch of rows for a fixed set of column types.
///
/// The builder does not check that every column received a value for each
/// declared row. Mismatches are reported by `build`.
#[derive(Debug)]
pub struct BatchBuilder {
    datatypes: Vec<DataType>,
    builders: Vec<Box<dyn ColumnBuilder>>,
    tracker: BatchSizeTracker,
    /// Configured budgets, the per-column budget in `tracker` is derived from
    /// these and the number of columns.
    config: BatchBuilderConfig,
    declared_rows: usize,
}

impl BatchBuilder {
    /// Create a builder using the default byte budgets.
    pub fn new(datatypes: impl IntoIterator<Item = DataType>) -> Self {
        Self::with_expected_rows(MAX_ROW_COUNT, datatypes)
    }

    /// Create a builder using the default byte budgets, with `expected_rows`
    /// as an upper bound on the initial row capacity.
    pub fn with_expected_rows(
        expected_rows: usize,
        datatypes: impl IntoIterator<Item = DataType>,
    ) -> Self {
        Self::new_estimated(&BatchBuilderConfig::default(), expected_rows, datatypes)
    }

    /// Create a builder with a specific batch byte budget.
    pub fn with_max_batch_size(
        max_batch_bytes: usize,
        datatypes: impl IntoIterator<Item = DataType>,
    ) -> Self {
        let config = BatchBuilderConfig {
            max_batch_bytes,
            max_column_bytes: DEFAULT_MAX_COLUMN_SIZE_BYTES,
        };
        Self::new_estimated(&config, MAX_ROW_COUNT, datatypes)
    }

    /// Create a builder with the byte budgets from `config`.
    pub fn with_config(
        config: &BatchBuilderConfig,
        datatypes: impl IntoIterator<Item = DataType>,
    ) -> Self {
        Self::new_estimated(config, MAX_ROW_COUNT, datatypes)
    }

    /// Create a builder where each column builder is created like the
    /// corresponding template.
    ///
    /// Errors if the number of templates doesn't match the number of
    /// columns.
    pub fn try_with_templates(
        max_batch_bytes: usize,
        datatypes: impl IntoIterator<Item = DataType>,
        templates: &[Box<dyn ColumnBuilder>],
    ) -> Result<Self> {
        let config = BatchBuilderConfig {
            max_batch_bytes,
            max_column_bytes: DEFAULT_MAX_COLUMN_SIZE_BYTES,
        };
        Self::try_new_from_templates(&config, datatypes.into_iter().collect(), templates)
    }

    fn new_estimated(
        config: &BatchBuilderConfig,
        expected_rows: usize,
        datatypes: impl IntoIterator<Item = DataType>,
    ) -> Self {
        let datatypes: Vec<_> = datatypes.into_iter().collect();
        let tracker = Self::new_tracker(config, datatypes.len());
        let column_budget = tracker.max_column_bytes();

        let mut expected = usize::min(column_budget, expected_rows);
        for datatype in &datatypes {
            let entry_bytes = match datatype.fixed_width() {
                Some(width) => usize::max(width, 1),
                None => VARLEN_ESTIMATED_ENTRY_BYTES,
            };
            expected = usize::min(expected, column_budget / entry_bytes);
        }
        // Budgets smaller than a single entry still get room for one row.
        let expected = usize::max(expected, 1);
        let bytes_per_entry = column_budget / expected;

        debug!(
            num_columns = datatypes.len(),
            column_budget,
            expected_rows = expected,
            bytes_per_entry,
            "estimated batch builder capacity"
        );

        let builders = datatypes
            .iter()
            .map(|datatype| {
                let column = tracker.column_tracker();
                datatype.create_column_builder(column, expected, bytes_per_entry)
            })
            .collect();

        BatchBuilder {
            datatypes,
            builders,
            tracker,
            config: *config,
            declared_rows: 0,
        }
    }

    fn try_new_from_templates(
        config: &BatchBuilderConfig,
        datatypes: Vec<DataType>,
        templates: &[Box<dyn ColumnBuilder>],
    ) -> Result<Self> {
        if templates.len() != datatypes.len() {
            return Err(DbError::new("Number of templates and types should match")
                .with_field("templates", templates.len())
                .with_field("types", datatypes.len()));
        }

        let tracker = Self::new_tracker(config, datatypes.len());
        debug!(
            num_columns = datatypes.len(),
            column_budget = tracker.max_column_bytes(),
            "creating batch builder from templates"
        );

        let builders = templates
            .iter()
            .map(|template| template.new_builder_like(tracker.column_tracker()))
            .collect();

        Ok(BatchBuilder {
            datatypes,
            builders,
            tracker,
            config: *config,
            declared_rows: 0,
        })
    }

    /// Create a batch size tracker, splitting the batch budget evenly
    /// between columns.
    fn new_tracker(config: &BatchBuilderConfig, num_columns: usize) -> BatchSizeTracker {
        let column_budget = if num_columns == 0 {
            0
        } else {
            let split = config.max_batch_bytes / num_columns;
            usize::min(config.max_column_bytes, split)
        };
        BatchSizeTracker::new(config.max_batch_bytes, column_budget)
    }

    /// Reset the builder so it can accumulate a new batch.
    ///
    /// Does nothing if no rows have been declared. Otherwise every column
    /// builder is replaced by one sized from the entries it has seen.
    pub fn reset(&mut self) {
        if self.is_empty() {
            return;
        }

        trace!(
            declared_rows = self.declared_rows,
            "resetting batch builder"
        );

        let max_batch_bytes = self.tracker.max_batch_bytes();
        let max_column_bytes = self.tracker.max_column_bytes();
        self.tracker = BatchSizeTracker::new(max_batch_bytes, max_column_bytes);
        self.declared_rows = 0;

        for builder in &mut self.builders {
            *builder = builder.new_builder_like(self.tracker.column_tracker());
        }
    }

    /// Create a new empty builder for the same types and batch budget, using
    /// this builder's column builders as templates.
    pub fn new_batch_builder_like(&self) -> Self {
        let tracker = Self::new_tracker(&self.config, self.datatypes.len());
        debug!(
            num_columns = self.datatypes.len(),
            row_hint = self.declared_rows,
            "creating batch builder like existing builder"
        );

        let builders = self
            .builders
            .iter()
            .map(|builder| builder.new_builder_like(tracker.column_tracker()))
            .collect();

        BatchBuilder {
            datatypes: self.datatypes.clone(),
            builders,
            tracker,
            config: self.config,
            declared_rows: 0,
        }
    }

    /// Get the column builder for a channel.
    pub fn column_builder(&mut self, channel: usize) -> Result<&mut dyn ColumnBuilder> {
        let num_columns = self.builders.len();
        match self.builders.get_mut(channel) {
            Some(builder) => Ok(builder.as_mut()),
            None => Err(DbError::new("Channel out of range")
                .with_field("channel", channel)
                .with_field("num_columns", num_columns)),
        }
    }

    /// All column builders in channel order.
    pub fn column_builders(&self) -> &[Box<dyn ColumnBuilder>] {
        &self.builders
    }

    /// Get the type of the column at a channel.
    pub fn datatype(&self, channel: usize) -> Option<&DataType> {
        self.datatypes.get(channel)
    }

    /// Column types in channel order.
    pub fn datatypes(&self) -> &[DataType] {
        &self.datatypes
    }

    /// Number of columns, fixed at construction.
    pub fn num_columns(&self) -> usize {
        self.datatypes.len()
    }

    /// Append one value to every column and declare the row.
    ///
    /// Values are checked against the column types before anything is
    /// appended, so a rejected row leaves the builder unchanged.
    pub fn append_row(&mut self, row: &[ScalarValue]) -> Result<()> {
        if row.len() != self.datatypes.len() {
            return Err(DbError::new("Row has incorrect number of values")
                .with_field("expected", self.datatypes.len())
                .with_field("got", row.len()));
        }

        for (channel, (value, datatype)) in row.iter().zip(&self.datatypes).enumerate() {
            if !value.is_null() && &value.datatype() != datatype {
                return Err(DbError::new("Value does not match column type")
                    .with_field("channel", channel)
                    .with_field("datatype", datatype)
                    .with_field("value", value));
            }
        }

        for (builder, value) in self.builders.iter_mut().zip(row) {
            builder.append_value(value)?;
        }
        self.declare_row();

        Ok(())
    }

    pub fn declare_row(&mut self) {
        self.declare_rows(1);
    }

    /// Declare that `n` rows have been appended to every column.
    ///
    /// The count saturates at `MAX_ROW_COUNT`.
    pub fn declare_rows(&mut self, n: usize) {
        self.declared_rows = self.declared_rows.saturating_add(n);
    }

    /// If the batch should be built before appending more rows.
    ///
    /// Nothing prevents further appends once full.
    pub fn is_full(&self) -> bool {
        self.declared_rows == MAX_ROW_COUNT || self.tracker.is_full()
    }

    pub fn is_empty(&self) -> bool {
        self.declared_rows == 0
    }

    /// Number of declared rows.
    pub fn num_rows(&self) -> usize {
        self.declared_rows
    }

    /// Logical bytes appended to all columns.
    pub fn size_bytes(&self) -> usize {
        self.tracker.size_bytes()
    }

    /// Bytes allocated by all column builders.
    pub fn retained_size_bytes(&self) -> usize {
        self.builders
            .iter()
            .map(|builder| builder.retained_size_bytes())
            .sum()
    }

    /// Build a batch from everything appended since the last reset.
    ///
    /// Errors if any column has a different number of entries than the
    /// number of declared rows. The builder is left unchanged, so building
    /// again returns the same rows plus anything appended in between.
    pub fn build(&self) -> Result<Batch> {
        trace!(
            declared_rows = self.declared_rows,
            size_bytes = self.size_bytes(),
            "building batch"
        );

        if self.builders.is_empty() {
            return Ok(Batch::empty_with_num_rows(self.declared_rows));
        }

        let mut arrays = Vec::with_capacity(self.builders.len());
        for (idx, builder) in self.builders.iter().enumerate() {
            let array = builder.finish();
            if array.logical_len() != self.declared_rows {
                return Err(
                    DbError::new("Declared rows does not match column's number of entries")
                        .with_field("declared", self.declared_rows)
                        .with_field("column", idx)
                        .with_field("column_rows", array.logical_len()),
                );
            }
            arrays.push(array);
        }

        Batch::try_from_arrays(arrays)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arrays::builder::primitive::PrimitiveColumnBuilder;
    use crate::arrays::builder::varlen::VarlenColumnBuilder;
    use crate::size_tracker::DEFAULT_MAX_BATCH_SIZE_BYTES;

    fn append_int32_utf8(builder: &mut BatchBuilder, v: i32, s: &str) {
        builder
            .column_builder(0)
            .unwrap()
            .append_value(&v.into())
            .unwrap();
        builder
            .column_builder(1)
            .unwrap()
            .append_value(&s.into())
            .unwrap();
        builder.declare_row();
    }

    fn column_values(batch: &Batch, idx: usize) -> Vec<ScalarValue<'_>> {
        batch
            .column(idx)
            .unwrap()
            .iter_values()
            .map(|v| v.unwrap())
            .collect()
    }

    #[test]
    fn build_int_and_utf8() {
        let datatypes = [DataType::Int32, DataType::Utf8];
        let mut builder = BatchBuilder::with_max_batch_size(1024, datatypes);
        append_int32_utf8(&mut builder, 1, "a");
        append_int32_utf8(&mut builder, 2, "bb");

        assert_eq!(2, builder.num_rows());
        assert!(!builder.is_full());

        let batch = builder.build().unwrap();
        assert_eq!(2, batch.num_rows());
        assert_eq!(2, batch.num_columns());
        assert_eq!(
            vec![ScalarValue::Int32(1), ScalarValue::Int32(2)],
            column_values(&batch, 0)
        );
        assert_eq!(
            vec![ScalarValue::from("a"), ScalarValue::from("bb")],
            column_values(&batch, 1)
        );
    }

    #[test]
    fn build_row_count_mismatch() {
        let mut builder = BatchBuilder::new([DataType::Int32]);
        for v in 0..3 {
            builder
                .column_builder(0)
                .unwrap()
                .append_value(&ScalarValue::Int32(v))
                .unwrap();
        }
        builder.declare_rows(2);

        let err = builder.build().unwrap_err();
        assert_eq!(Some("2"), err.get_field("declared"));
        assert_eq!(Some("0"), err.get_field("column"));
        assert_eq!(Some("3"), err.get_field("column_rows"));
    }

    #[test]
    fn build_mismatch_in_later_column() {
        let mut builder = BatchBuilder::new([DataType::Int32, DataType::Int32]);
        builder.column_builder(0).unwrap().append_null();
        builder.declare_row();

        let err = builder.build().unwrap_err();
        assert_eq!(Some("1"), err.get_field("column"));
        assert_eq!(Some("0"), err.get_field("column_rows"));
    }

    #[test]
    fn zero_columns() {
        let mut builder = BatchBuilder::new(Vec::new());
        assert_eq!(0, builder.num_columns());
        assert_eq!(0, builder.retained_size_bytes());

        builder.declare_rows(5);
        assert!(!builder.is_full());

        let batch = builder.build().unwrap();
        assert_eq!(5, batch.num_rows());
        assert_eq!(0, batch.num_columns());
    }

    #[test]
    fn empty_matches_row_count() {
        let mut builder = BatchBuilder::new([DataType::Int8]);
        assert!(builder.is_empty());
        assert_eq!(0, builder.num_rows());

        builder.append_row(&[ScalarValue::Int8(1)]).unwrap();
        assert!(!builder.is_empty());
        assert_eq!(1, builder.num_rows());
    }

    #[test]
    fn reset_empty_is_noop() {
        let mut builder = BatchBuilder::new([DataType::Utf8]);
        let retained = builder.retained_size_bytes();

        builder.reset();
        assert!(builder.is_empty());
        assert_eq!(retained, builder.retained_size_bytes());
        assert_eq!(0, builder.size_bytes());
    }

    #[test]
    fn reset_carries_capacity() {
        let mut builder = BatchBuilder::new([DataType::Int64, DataType::Utf8]);
        for v in 0..100 {
            builder
                .append_row(&[ScalarValue::Int64(v), "0123456789".into()])
                .unwrap();
        }
        assert!(builder.size_bytes() > 0);
        let _ = builder.build().unwrap();

        builder.reset();
        assert!(builder.is_empty());
        assert_eq!(0, builder.num_rows());
        assert_eq!(0, builder.size_bytes());

        let ints = builder
            .column_builder(0)
            .unwrap()
            .downcast_mut::<PrimitiveColumnBuilder<i64>>()
            .unwrap();
        assert!(ints.capacity() >= 125);

        let strings = builder
            .column_builder(1)
            .unwrap()
            .downcast_mut::<VarlenColumnBuilder>()
            .unwrap();
        assert!(strings.entries_capacity() >= 125);
        assert!(strings.data_capacity() >= 1250);
    }

    #[test]
    fn build_twice_same_batch() {
        let mut builder = BatchBuilder::new([DataType::Int32, DataType::Utf8]);
        append_int32_utf8(&mut builder, 1, "a");

        let first = builder.build().unwrap();
        assert_eq!(first, builder.build().unwrap());
        assert_eq!(1, builder.num_rows());
        assert!(builder.size_bytes() > 0);
    }

    #[test]
    fn append_after_build_includes_all_rows() {
        let mut builder = BatchBuilder::new([DataType::Int32]);
        builder.append_row(&[ScalarValue::Int32(1)]).unwrap();
        let first = builder.build().unwrap();

        builder.append_row(&[ScalarValue::Int32(2)]).unwrap();
        let second = builder.build().unwrap();

        assert_eq!(vec![ScalarValue::Int32(1)], column_values(&first, 0));
        assert_eq!(
            vec![ScalarValue::Int32(1), ScalarValue::Int32(2)],
            column_values(&second, 0)
        );
    }

    #[test]
    fn build_after_reset() {
        let mut builder = BatchBuilder::new([DataType::Boolean]);
        builder.append_row(&[ScalarValue::Boolean(true)]).unwrap();
        assert_eq!(1, builder.build().unwrap().num_rows());

        builder.reset();
        builder.append_row(&[ScalarValue::Boolean(false)]).unwrap();
        builder.append_row(&[ScalarValue::Null]).unwrap();

        let batch = builder.build().unwrap();
        assert_eq!(
            vec![ScalarValue::Boolean(false), ScalarValue::Null],
            column_values(&batch, 0)
        );
    }

    #[test]
    fn new_like_is_empty_with_same_types() {
        let datatypes = [DataType::Int32, DataType::Null, DataType::Binary];
        let mut builder = BatchBuilder::with_max_batch_size(4096, datatypes.clone());
        for v in 0..10 {
            builder
                .append_row(&[
                    ScalarValue::Int32(v),
                    ScalarValue::Null,
                    [1_u8, 2].as_slice().into(),
                ])
                .unwrap();
        }

        let mut like = builder.new_batch_builder_like();
        assert_eq!(0, like.num_rows());
        assert!(like.is_empty());
        assert_eq!(&datatypes, like.datatypes());
        assert_eq!(0, like.size_bytes());

        let ints = like
            .column_builder(0)
            .unwrap()
            .downcast_mut::<PrimitiveColumnBuilder<i32>>()
            .unwrap();
        assert!(ints.capacity() >= 13);

        // Source is untouched.
        assert_eq!(10, builder.num_rows());
        assert_eq!(10, builder.build().unwrap().num_rows());
    }

    #[test]
    fn new_like_from_empty() {
        let builder = BatchBuilder::new([DataType::Float64]);
        let like = builder.new_batch_builder_like();
        assert!(like.is_empty());
        assert_eq!(&[DataType::Float64], like.datatypes());
    }

    #[test]
    fn templates() {
        let mut source = BatchBuilder::new([DataType::Int16, DataType::Utf8]);
        let row = [ScalarValue::Int16(4), "hello".into()];
        source.append_row(&row).unwrap();

        let mut builder = BatchBuilder::try_with_templates(
            2048,
            [DataType::Int16, DataType::Utf8],
            source.column_builders(),
        )
        .unwrap();
        assert!(builder.is_empty());

        let row = [ScalarValue::Int16(5), "world".into()];
        builder.append_row(&row).unwrap();
        let batch = builder.build().unwrap();
        assert_eq!(vec![ScalarValue::from("world")], column_values(&batch, 1));
    }

    #[test]
    fn templates_count_mismatch() {
        let source = BatchBuilder::new([DataType::Int16]);
        let err = BatchBuilder::try_with_templates(
            2048,
            [DataType::Int16, DataType::Utf8],
            source.column_builders(),
        )
        .unwrap_err();

        assert_eq!(Some("1"), err.get_field("templates"));
        assert_eq!(Some("2"), err.get_field("types"));
    }

    #[test]
    fn full_from_column_budget() {
        // Column budget is 512 bytes, which the Int64 column (9 bytes per
        // entry) reaches before the batch reaches 1024 bytes.
        let datatypes = [DataType::Int64, DataType::Int8];
        let mut builder = BatchBuilder::with_max_batch_size(1024, datatypes);
        for v in 0..56 {
            builder
                .append_row(&[ScalarValue::Int64(v), ScalarValue::Int8(1)])
                .unwrap();
        }
        assert!(!builder.is_full());
        assert_eq!(56 * 9 + 56 * 2, builder.size_bytes());

        builder
            .append_row(&[ScalarValue::Int64(56), ScalarValue::Int8(1)])
            .unwrap();
        assert!(builder.is_full());
        assert!(builder.size_bytes() < 1024);

        // Full is advisory.
        builder
            .append_row(&[ScalarValue::Int64(57), ScalarValue::Int8(1)])
            .unwrap();
        assert_eq!(58, builder.build().unwrap().num_rows());
    }

    #[test]
    fn full_with_config_budgets() {
        // The batch budget split between columns is below the configured
        // column budget.
        let config = BatchBuilderConfig {
            max_batch_bytes: 100,
            max_column_bytes: 1000,
        };
        let mut builder = BatchBuilder::with_config(&config, [DataType::UInt32]);
        assert_eq!(100, builder.tracker.max_column_bytes());
        for v in 0..19 {
            builder.append_row(&[ScalarValue::UInt32(v)]).unwrap();
        }
        assert!(!builder.is_full());
        builder.append_row(&[ScalarValue::UInt32(19)]).unwrap();
        assert_eq!(100, builder.size_bytes());
        assert!(builder.is_full());
    }

    #[test]
    fn full_from_row_count_sentinel() {
        let mut builder = BatchBuilder::new(Vec::new());
        builder.declare_rows(MAX_ROW_COUNT - 1);
        assert!(!builder.is_full());

        builder.declare_rows(10);
        assert_eq!(MAX_ROW_COUNT, builder.num_rows());
        assert!(builder.is_full());
    }

    #[test]
    fn full_from_null_columns() {
        let mut builder = BatchBuilder::with_max_batch_size(8, [DataType::Null]);
        for _ in 0..7 {
            builder.append_row(&[ScalarValue::Null]).unwrap();
        }
        assert!(!builder.is_full());

        builder.append_row(&[ScalarValue::Null]).unwrap();
        assert_eq!(8, builder.size_bytes());
        assert!(builder.is_full());
    }

    #[test]
    fn reset_clears_full() {
        let mut builder = BatchBuilder::with_max_batch_size(64, [DataType::Utf8]);
        let long = "x".repeat(60);
        builder.append_row(&[ScalarValue::from("short")]).unwrap();
        assert!(!builder.is_full());
        let row = [ScalarValue::from(long.as_str())];
        builder.append_row(&row).unwrap();
        assert!(builder.is_full());

        let _ = builder.build().unwrap();
        builder.reset();
        assert!(!builder.is_full());
        assert_eq!(64, builder.tracker.max_batch_bytes());
    }

    #[test]
    fn append_row_rejects_bad_rows() {
        let mut builder = BatchBuilder::new([DataType::Int32, DataType::Utf8]);

        builder.append_row(&[ScalarValue::Int32(1)]).unwrap_err();
        let row = [ScalarValue::Int32(1), ScalarValue::Int32(2)];
        let err = builder.append_row(&row).unwrap_err();
        assert_eq!(Some("1"), err.get_field("channel"));

        assert!(builder.is_empty());
        assert_eq!(0, builder.size_bytes());
        assert!(builder.column_builders().iter().all(|b| b.is_empty()));
    }

    #[test]
    fn channel_out_of_range() {
        let mut builder = BatchBuilder::new([DataType::Int32]);
        let err = builder.column_builder(1).unwrap_err();
        assert_eq!(Some("1"), err.get_field("num_columns"));
        assert!(builder.datatype(1).is_none());
        assert_eq!(Some(&DataType::Int32), builder.datatype(0));
    }

    #[test]
    fn retained_size_sums_columns() {
        let builder = BatchBuilder::new([DataType::Int32, DataType::Utf8]);
        let sum: usize = builder
            .column_builders()
            .iter()
            .map(|b| b.retained_size_bytes())
            .sum();

        assert!(sum > 0);
        assert_eq!(sum, builder.retained_size_bytes());
    }

    #[test]
    fn default_budgets() {
        let builder = BatchBuilder::new(vec![DataType::Int32; 4]);
        let tracker = &builder.tracker;
        assert_eq!(DEFAULT_MAX_BATCH_SIZE_BYTES, tracker.max_batch_bytes());
        assert_eq!(DEFAULT_MAX_COLUMN_SIZE_BYTES, tracker.max_column_bytes());

        // Many columns split the batch budget.
        let builder = BatchBuilder::new(vec![DataType::Int32; 64]);
        assert_eq!(
            DEFAULT_MAX_BATCH_SIZE_BYTES / 64,
            builder.tracker.max_column_bytes()
        );
    }

    #[test]
    fn expected_rows_bounds_capacity() {
        let mut builder = BatchBuilder::with_expected_rows(4, [DataType::Int32]);
        let ints = builder
            .column_builder(0)
            .unwrap()
            .downcast_mut::<PrimitiveColumnBuilder<i32>>()
            .unwrap();
        assert!(ints.capacity() >= 4);
        assert!(ints.capacity() < 64);

        // Rows past the hint are still accepted.
        for v in 0..10 {
            builder.append_row(&[ScalarValue::Int32(v)]).unwrap();
        }
        assert_eq!(10, builder.build().unwrap().num_rows());
    }

    #[test]
    fn tiny_budget_still_accepts_rows() {
        let datatypes = [DataType::Utf8, DataType::Int64];
        let mut builder = BatchBuilder::with_max_batch_size(4, datatypes);
        builder
            .append_row(&[ScalarValue::from("abc"), ScalarValue::Int64(1)])
            .unwrap();
        assert!(builder.is_full());
        assert_eq!(1, builder.build().unwrap().num_rows());
    }
}
