//! A single chunk of columnar storage: one `Vec<Value>` per column, all
//! the same length. Chunks are the unit of sealing, zone-map pruning,
//! and FIFO eviction.

use crate::schema::TableSchema;
use crate::value::Value;

#[derive(Debug, Clone)]
pub struct Chunk {
    pub columns: Vec<Vec<Value>>,
    pub row_count: usize,
    pub capacity: usize,
}

impl Chunk {
    pub fn new(schema: TableSchema, capacity: usize) -> Self {
        Self {
            columns: (0..schema.len()).map(|_| Vec::with_capacity(capacity)).collect(),
            row_count: 0,
            capacity,
        }
    }

    pub fn is_full(&self) -> bool {
        self.row_count >= self.capacity
    }

    pub fn column(&self, idx: usize) -> &[Value] {
        &self.columns[idx]
    }

    /// Appends one fully-formed row. `values.len()` must equal the
    /// column count; callers going through `Appender` always satisfy
    /// this since it is seeded from the same schema.
    pub fn push_row(&mut self, values: Vec<Value>) {
        debug_assert_eq!(values.len(), self.columns.len());
        for (col, value) in self.columns.iter_mut().zip(values) {
            col.push(value);
        }
        self.row_count += 1;
    }
}
