//! The scoped, write-locked row builder. One `Appender` borrows its
//! `RingBuffer` exclusively for its whole lifetime (spec.md §4.2: "a
//! scoped writer-lock-holding handle"), so a receiver handling one
//! export request at a time never contends with itself, and two
//! concurrent exports into the same table serialize at the lock
//! rather than interleave partial rows.

use parking_lot::RwLockWriteGuard;

use super::ring::{RingBuffer, RingInner};
use crate::schema::TableSchema;
use crate::value::{nanos_to_micros, Value};

pub struct Appender<'a> {
    ring: &'a RingBuffer,
    guard: RwLockWriteGuard<'a, RingInner>,
    schema: TableSchema,
    row: Vec<Value>,
    row_open: bool,
}

impl<'a> Appender<'a> {
    pub(super) fn new(ring: &'a RingBuffer) -> Self {
        let schema = ring.schema();
        let guard = ring.lock();
        Self {
            ring,
            guard,
            row: vec![Value::Null; schema.len()],
            schema,
            row_open: false,
        }
    }

    pub fn column_count(&self) -> usize {
        self.schema.len()
    }

    /// Starts a new row; every column defaults to NULL until set.
    pub fn begin_row(&mut self) {
        self.row.iter_mut().for_each(|v| *v = Value::Null);
        self.row_open = true;
    }

    pub fn set_null(&mut self, col: usize) {
        self.row[col] = Value::Null;
    }

    /// Sets a TIMESTAMP column from nanoseconds since the epoch,
    /// rounding half-up to microsecond precision.
    pub fn set_timestamp_ns(&mut self, col: usize, nanos: i64) {
        self.row[col] = Value::Timestamp(nanos_to_micros(nanos, true));
    }

    pub fn set_double(&mut self, col: usize, v: f64) {
        self.row[col] = Value::Double(v);
    }

    pub fn set_ubigint(&mut self, col: usize, v: u64) {
        self.row[col] = Value::UBigint(v);
    }

    pub fn set_bigint(&mut self, col: usize, v: i64) {
        self.row[col] = Value::Bigint(v);
    }

    pub fn set_integer(&mut self, col: usize, v: i32) {
        self.row[col] = Value::Integer(v);
    }

    pub fn set_uinteger(&mut self, col: usize, v: u32) {
        self.row[col] = Value::UInteger(v);
    }

    pub fn set_boolean(&mut self, col: usize, v: bool) {
        self.row[col] = Value::Boolean(v);
    }

    pub fn set_varchar(&mut self, col: usize, v: impl Into<String>) {
        self.row[col] = Value::Varchar(v.into());
    }

    /// Escape hatch for MAP/LIST columns (and anything else already
    /// shaped as a `Value`), used by the row builders for attribute
    /// bags and the Events/Links/bucket-count list columns.
    pub fn set_value(&mut self, col: usize, v: Value) {
        self.row[col] = v;
    }

    /// Finalizes the open row, appending it to the in-flight chunk and
    /// sealing (with FIFO eviction) if that fills the chunk.
    pub fn commit_row(&mut self) {
        debug_assert!(self.row_open, "commit_row called without begin_row");
        self.row_open = false;
        let values = std::mem::replace(&mut self.row, vec![Value::Null; self.schema.len()]);
        RingBuffer::append_row_locked(&mut self.guard, self.ring, values);
    }
}
