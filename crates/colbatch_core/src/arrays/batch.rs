use colbatch_error::{DbError, Result};

use super::array::Array;
use super::datatype::DataType;
use super::scalar::ScalarValue;

/// A batch of same-length arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// Columns that make up this batch.
    arrays: Vec<Array>,
    /// Number of rows in this batch. Needed to allow for a batch that has no
    /// columns but a non-zero number of rows.
    num_rows: usize,
}

impl Batch {
    pub const fn empty() -> Self {
        Batch {
            arrays: Vec::new(),
            num_rows: 0,
        }
    }

    /// Create a batch with no columns, only a row count.
    pub const fn empty_with_num_rows(num_rows: usize) -> Self {
        Batch {
            arrays: Vec::new(),
            num_rows,
        }
    }

    /// Create a new batch from some number of arrays.
    ///
    /// All arrays must have the same logical length.
    pub fn try_from_arrays(arrays: impl IntoIterator<Item = Array>) -> Result<Self> {
        let arrays: Vec<_> = arrays.into_iter().collect();
        let num_rows = match arrays.first() {
            Some(arr) => arr.logical_len(),
            None => return Ok(Self::empty()),
        };

        for (idx, arr) in arrays.iter().enumerate() {
            if arr.logical_len() != num_rows {
                return Err(DbError::new("Arrays in batch have different lengths")
                    .with_field("expected", num_rows)
                    .with_field("got", arr.logical_len())
                    .with_field("col_idx", idx));
            }
        }

        Ok(Batch { arrays, num_rows })
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.arrays.len()
    }

    pub fn column(&self, idx: usize) -> Option<&Array> {
        self.arrays.get(idx)
    }

    pub fn arrays(&self) -> &[Array] {
        &self.arrays
    }

    pub fn into_arrays(self) -> Vec<Array> {
        self.arrays
    }

    pub fn datatypes(&self) -> impl Iterator<Item = &DataType> {
        self.arrays.iter().map(|arr| arr.datatype())
    }

    /// Get the row at some index.
    ///
    /// A batch with rows but no columns returns empty rows.
    pub fn row(&self, idx: usize) -> Option<Result<Vec<ScalarValue<'_>>>> {
        if idx >= self.num_rows {
            return None;
        }
        let row = self.arrays.iter().map(|arr| arr.logical_value(idx));
        Some(row.collect())
    }

    /// Approximate size in bytes of all arrays in this batch.
    pub fn size_bytes(&self) -> usize {
        self.arrays.iter().map(|arr| arr.size_bytes()).sum()
    }
}
