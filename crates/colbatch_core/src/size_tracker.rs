//! Byte size accounting for batches being built.
//!
//! A [`BatchSizeTracker`] holds the byte budgets for a single batch. Each
//! column builder gets its own [`ColumnSizeTracker`] which reports the bytes
//! it appends to the shared batch state. Trackers are single threaded.
use std::cell::Cell;
use std::rc::Rc;

/// Default byte budget for a single batch.
pub const DEFAULT_MAX_BATCH_SIZE_BYTES: usize = 1024 * 1024;

/// Default byte budget for a single column within a batch.
pub const DEFAULT_MAX_COLUMN_SIZE_BYTES: usize = 64 * 1024;

#[derive(Debug)]
struct SharedBatchSize {
    max_batch_bytes: usize,
    max_column_bytes: usize,
    /// Sum of bytes reported by all column trackers.
    current_bytes: Cell<usize>,
    /// Set once any single column reaches the column budget.
    full: Cell<bool>,
}

impl SharedBatchSize {
    fn add_bytes(&self, bytes: usize) {
        self.current_bytes
            .set(self.current_bytes.get().saturating_add(bytes));
    }
}

#[derive(Debug)]
pub struct BatchSizeTracker {
    shared: Rc<SharedBatchSize>,
}

impl BatchSizeTracker {
    pub fn new(max_batch_bytes: usize, max_column_bytes: usize) -> Self {
        BatchSizeTracker {
            shared: Rc::new(SharedBatchSize {
                max_batch_bytes,
                max_column_bytes,
                current_bytes: Cell::new(0),
                full: Cell::new(false),
            }),
        }
    }

    /// Create a tracker for a single column that reports into this batch.
    pub fn column_tracker(&self) -> ColumnSizeTracker {
        ColumnSizeTracker {
            batch: self.shared.clone(),
            current_bytes: 0,
        }
    }

    pub fn max_batch_bytes(&self) -> usize {
        self.shared.max_batch_bytes
    }

    pub fn max_column_bytes(&self) -> usize {
        self.shared.max_column_bytes
    }

    pub fn size_bytes(&self) -> usize {
        self.shared.current_bytes.get()
    }

    pub fn is_empty(&self) -> bool {
        self.size_bytes() == 0
    }

    /// If the batch reached its byte budget, or any column reached the column
    /// budget.
    pub fn is_full(&self) -> bool {
        self.shared.full.get() || self.size_bytes() >= self.shared.max_batch_bytes
    }
}

/// Per-column size accounting.
#[derive(Debug)]
pub struct ColumnSizeTracker {
    batch: Rc<SharedBatchSize>,
    current_bytes: usize,
}

impl ColumnSizeTracker {
    /// Create a tracker not attached to any batch builder.
    ///
    /// Only the column budget applies.
    pub fn standalone(max_column_bytes: usize) -> Self {
        BatchSizeTracker::new(usize::MAX, max_column_bytes).column_tracker()
    }

    /// Record bytes appended to the column.
    ///
    /// Marks the batch as full once this column reaches the column budget.
    pub fn add_bytes(&mut self, bytes: usize) {
        self.current_bytes = self.current_bytes.saturating_add(bytes);
        self.batch.add_bytes(bytes);
        if self.current_bytes >= self.batch.max_column_bytes {
            self.batch.full.set(true);
        }
    }

    pub fn size_bytes(&self) -> usize {
        self.current_bytes
    }

    pub fn max_column_bytes(&self) -> usize {
        self.batch.max_column_bytes
    }

    /// If this column alone reached the column budget.
    pub fn is_full(&self) -> bool {
        self.current_bytes >= self.batch.max_column_bytes
    }
}
