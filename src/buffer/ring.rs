//! The columnar ring buffer: a bounded deque of sealed, immutable chunks
//! plus one mutable in-flight chunk, with FIFO eviction once the sealed
//! deque exceeds `max_chunks`. Pinned from the original engine's
//! `ColumnarRingBuffer`.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::RwLock;

use super::appender::Appender;
use super::chunk::Chunk;
use super::zone_map::ZoneMap;
use crate::schema::TableSchema;

/// A 2048-row ceiling on chunk size, matching the host storage engine's
/// standard vector size; a buffer smaller than this shrinks the chunk
/// to fit so a tiny `buffer_size` doesn't allocate one oversized chunk.
pub const DEFAULT_VECTOR_SIZE: usize = 2048;

/// One immutable, sealed chunk plus its precomputed zone map.
#[derive(Debug)]
pub struct StoredChunk {
    pub chunk: Chunk,
    pub zone: ZoneMap,
}

pub(super) struct RingInner {
    pub(super) sealed: VecDeque<Arc<StoredChunk>>,
    pub(super) current: Chunk,
    pub(super) current_zone: ZoneMap,
}

/// A point-in-time, read-consistent view of a ring buffer's contents:
/// the sealed chunks it held plus (if any rows were in flight) a
/// freshly materialized chunk holding a value-by-value copy of them.
/// Scans never observe writes that happen after `snapshot()` returns.
pub type Snapshot = Vec<Arc<StoredChunk>>;

pub struct RingBuffer {
    schema: TableSchema,
    chunk_capacity: usize,
    max_chunks: usize,
    service_col: Option<usize>,
    metric_col: Option<usize>,
    inner: RwLock<RingInner>,
}

impl RingBuffer {
    /// `buffer_capacity` is the total row budget for this table, split
    /// across `max_chunks` chunks of at most `DEFAULT_VECTOR_SIZE` rows
    /// each (matching the original engine's `chunk_capacity =
    /// min(vector_size, buffer_capacity)` / `max_chunks =
    /// ceil(buffer_capacity / chunk_capacity)`).
    pub fn new(schema: TableSchema, buffer_capacity: usize) -> Self {
        let buffer_capacity = buffer_capacity.max(1);
        let chunk_capacity = buffer_capacity.min(DEFAULT_VECTOR_SIZE);
        let max_chunks = buffer_capacity.div_ceil(chunk_capacity).max(1);
        let service_col = schema.index_of("ServiceName");
        let metric_col = schema.index_of("MetricName");
        Self {
            schema,
            chunk_capacity,
            max_chunks,
            service_col,
            metric_col,
            inner: RwLock::new(RingInner {
                sealed: VecDeque::new(),
                current: Chunk::new(schema, chunk_capacity),
                current_zone: ZoneMap::empty(),
            }),
        }
    }

    pub fn schema(&self) -> TableSchema {
        self.schema
    }

    pub fn chunk_capacity(&self) -> usize {
        self.chunk_capacity
    }

    /// Total row count currently resident: sealed chunks plus the
    /// in-flight chunk. Evicted rows are gone and do not count.
    pub fn len(&self) -> usize {
        let inner = self.inner.read();
        inner.sealed.iter().map(|c| c.chunk.row_count).sum::<usize>() + inner.current.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn chunk_count(&self) -> usize {
        let inner = self.inner.read();
        inner.sealed.len() + usize::from(inner.current.row_count > 0)
    }

    /// Opens a write-locked appender. Only one appender may exist at a
    /// time per table; the lock enforces that at compile time via the
    /// guard's lifetime.
    pub fn appender(&self) -> Appender<'_> {
        Appender::new(self)
    }

    /// Appends one row given as a bare value-per-column vector (spec.md
    /// §4.2's `append_row`); any column past `values.len()` stays NULL.
    /// A thin convenience over [`RingBuffer::appender`] for callers that
    /// already have a fully-formed row rather than building one
    /// column-by-column through the typed setters.
    pub fn append_row(&self, values: Vec<crate::value::Value>) {
        let mut app = self.appender();
        app.begin_row();
        for (col, value) in values.into_iter().enumerate() {
            app.set_value(col, value);
        }
        app.commit_row();
    }

    /// Appends many rows under a single writer acquisition (spec.md
    /// §4.2's `append_rows`), so a caller writing a whole batch never
    /// releases and re-takes the lock between rows.
    pub fn append_rows(&self, rows: Vec<Vec<crate::value::Value>>) {
        let mut app = self.appender();
        for values in rows {
            app.begin_row();
            for (col, value) in values.into_iter().enumerate() {
                app.set_value(col, value);
            }
            app.commit_row();
        }
    }

    /// Takes a read-consistent snapshot: the sealed chunk list by Arc
    /// clone (cheap, immutable, shared with the live ring) plus — if
    /// rows are in flight — a freshly sealed copy of just those rows.
    /// This never perturbs the live ring's own eviction schedule.
    pub fn snapshot(&self) -> Snapshot {
        let inner = self.inner.read();
        let mut out: Snapshot = inner.sealed.iter().cloned().collect();
        if inner.current.row_count > 0 {
            out.push(Arc::new(StoredChunk {
                chunk: inner.current.clone(),
                zone: inner.current_zone.clone(),
            }));
        }
        out
    }

    pub(crate) fn service_col(&self) -> Option<usize> {
        self.service_col
    }

    pub(crate) fn metric_col(&self) -> Option<usize> {
        self.metric_col
    }

    /// Appends one row to the in-flight chunk, sealing and evicting as
    /// needed. Called only through `Appender::commit_row` while the
    /// write lock is already held by the appender's guard.
    pub(super) fn append_row_locked(inner: &mut RingInner, ring: &RingBuffer, values: Vec<crate::value::Value>) {
        if let Some(col) = ring.service_col {
            inner.current_zone.observe_service(values[col].as_varchar());
        }
        if let Some(col) = ring.metric_col {
            inner.current_zone.observe_metric(values[col].as_varchar());
        }
        if let Some(ts_us) = values[0].as_timestamp_us() {
            inner.current_zone.observe_timestamp(ts_us);
        }
        inner.current.push_row(values);
        if inner.current.is_full() {
            Self::seal_locked(inner, ring);
        }
    }

    fn seal_locked(inner: &mut RingInner, ring: &RingBuffer) {
        if inner.current.row_count == 0 {
            return;
        }
        let sealed_chunk = std::mem::replace(&mut inner.current, Chunk::new(ring.schema, ring.chunk_capacity));
        let sealed_zone = std::mem::replace(&mut inner.current_zone, ZoneMap::empty());
        inner.sealed.push_back(Arc::new(StoredChunk {
            chunk: sealed_chunk,
            zone: sealed_zone,
        }));
        while inner.sealed.len() > ring.max_chunks {
            inner.sealed.pop_front();
        }
    }

    pub(super) fn lock(&self) -> parking_lot::RwLockWriteGuard<'_, RingInner> {
        self.inner.write()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TableKind;

    #[test]
    fn chunk_sizing_shrinks_to_buffer_capacity() {
        let ring = RingBuffer::new(TableKind::Traces.schema(), 4);
        assert_eq!(ring.chunk_capacity(), 4);
        assert_eq!(ring.max_chunks, 1);
    }

    #[test]
    fn chunk_sizing_caps_at_default_vector_size() {
        let ring = RingBuffer::new(TableKind::Traces.schema(), 10_000);
        assert_eq!(ring.chunk_capacity(), DEFAULT_VECTOR_SIZE);
        assert_eq!(ring.max_chunks, 10_000_usize.div_ceil(DEFAULT_VECTOR_SIZE));
    }

    #[test]
    fn empty_ring_has_no_rows() {
        let ring = RingBuffer::new(TableKind::Logs.schema(), 16);
        assert!(ring.is_empty());
        assert_eq!(ring.snapshot().len(), 0);
    }

    #[test]
    fn append_row_fills_missing_trailing_columns_with_null() {
        use crate::schema::traces::col;
        use crate::value::Value;

        let ring = RingBuffer::new(TableKind::Traces.schema(), 16);
        let mut row = vec![Value::Null; ring.schema().len()];
        row[col::TIMESTAMP] = Value::Timestamp(1);
        row[col::SERVICE_NAME] = Value::Varchar("checkout".to_string());
        ring.append_row(row);

        assert_eq!(ring.len(), 1);
        let snap = ring.snapshot();
        assert_eq!(snap[0].chunk.column(col::SERVICE_NAME)[0].as_varchar(), Some("checkout"));
        assert!(snap[0].chunk.column(col::STATUS_CODE)[0].is_null());
    }

    #[test]
    fn append_rows_commits_a_whole_batch_under_one_acquisition() {
        use crate::schema::traces::col;
        use crate::value::Value;

        let ring = RingBuffer::new(TableKind::Traces.schema(), 16);
        let make_row = |ts: i64, service: &str| {
            let mut row = vec![Value::Null; ring.schema().len()];
            row[col::TIMESTAMP] = Value::Timestamp(ts);
            row[col::SERVICE_NAME] = Value::Varchar(service.to_string());
            row
        };
        ring.append_rows(vec![make_row(1, "a"), make_row(2, "b"), make_row(3, "c")]);

        assert_eq!(ring.len(), 3);
        let snap = ring.snapshot();
        let names: Vec<&str> = snap[0].chunk.column(col::SERVICE_NAME).iter().map(|v| v.as_varchar().unwrap()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
