//! The snapshot-based scan operator: projection pushdown, predicate
//! pushdown, and zone-map chunk pruning over a single table's ring
//! buffer. Grounded on `original_source/src/table/otlp_columnar_scan.cpp`
//! (`OTLPColumnarScanFunction`): a shared atomic chunk cursor handed out
//! to worker threads, a fast zero-filter path per chunk, and a
//! selection-vector-based filtered path that applies timestamp bounds
//! first and any remaining predicates row-wise.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::buffer::{RingBuffer, Snapshot};
use crate::value::Value;

/// One pushed-down comparison operator, matching the constant-comparison
/// shape spec.md §6 says the host may push: `{=, <, <=, >, >=}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
}

/// The constant side of a pushed comparison. Kept separate from
/// [`Value`] (rather than reusing it directly) because a filter constant
/// is never `Null`/`Map`/`List` — those shapes can only ever appear as
/// a column value, never as a comparison literal.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Timestamp(i64),
    Bigint(i64),
    UBigint(u64),
    Double(f64),
    Varchar(String),
    Boolean(bool),
}

/// One `(column_id, filter)` pair as described in spec.md §6's push-down
/// interface. `IsNull` and `Compare` are the only two shapes the scan
/// understands; anything else the host might construct is outside this
/// crate's contract (no SQL expression evaluator lives here — see
/// spec.md §1 non-goals) and never reaches this type.
#[derive(Debug, Clone, PartialEq)]
pub enum RowFilter {
    Compare { column: usize, op: CompareOp, value: FilterValue },
    IsNull { column: usize },
}

impl RowFilter {
    pub fn eq(column: usize, value: FilterValue) -> Self {
        RowFilter::Compare { column, op: CompareOp::Eq, value }
    }
}

/// One output batch: a projected subset of columns, all the same
/// length. A batch with `row_count() == 0` signals end-of-stream
/// (spec.md §4.5 "Termination").
#[derive(Debug, Clone, Default)]
pub struct RecordBatch {
    pub columns: Vec<Vec<Value>>,
}

impl RecordBatch {
    fn empty(projected_columns: usize) -> Self {
        Self { columns: vec![Vec::new(); projected_columns] }
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }
}

fn compare_values(lhs: &Value, op: CompareOp, rhs: &FilterValue) -> bool {
    fn ord<T: PartialOrd>(a: T, op: CompareOp, b: T) -> bool {
        match op {
            CompareOp::Eq => a == b,
            CompareOp::Lt => a < b,
            CompareOp::Le => a <= b,
            CompareOp::Gt => a > b,
            CompareOp::Ge => a >= b,
        }
    }
    match (lhs, rhs) {
        // NULL never satisfies a comparison (spec.md §6 / original
        // engine's `row_passes_filters`: a filter that isn't IS NULL
        // always rejects a null cell).
        (Value::Null, _) => false,
        (Value::Timestamp(a), FilterValue::Timestamp(b)) => ord(*a, op, *b),
        (Value::Bigint(a), FilterValue::Bigint(b)) => ord(*a, op, *b),
        (Value::Integer(a), FilterValue::Bigint(b)) => ord(i64::from(*a), op, *b),
        (Value::UBigint(a), FilterValue::UBigint(b)) => ord(*a, op, *b),
        (Value::UInteger(a), FilterValue::UBigint(b)) => ord(u64::from(*a), op, *b),
        (Value::Double(a), FilterValue::Double(b)) => ord(*a, op, *b),
        (Value::Varchar(a), FilterValue::Varchar(b)) => ord(a.as_str(), op, b.as_str()),
        (Value::Boolean(a), FilterValue::Boolean(b)) if op == CompareOp::Eq => a == b,
        // A filter kind this scan doesn't understand for the cell's
        // actual type — spec.md §4.5 "Error semantics": treat
        // conservatively as always-true rather than erroring.
        _ => true,
    }
}

fn row_matches_filter(chunk: &crate::buffer::chunk::Chunk, row: usize, filter: &RowFilter) -> bool {
    match filter {
        RowFilter::IsNull { column } => chunk.column(*column)[row].is_null(),
        RowFilter::Compare { column, op, value } => compare_values(&chunk.column(*column)[row], *op, value),
    }
}

/// Precomputed, absorbed filter state plus whatever is left over as a
/// residual. Built once in [`Scanner::new`] from the raw pushed filter
/// list (spec.md §4.5 "Initialization").
struct Pushdown {
    ts_min_us: Option<i64>,
    ts_max_us: Option<i64>,
    service_eq: Option<String>,
    metric_eq: Option<String>,
    residual: Vec<RowFilter>,
}

impl Pushdown {
    fn build(filters: Vec<RowFilter>, service_col: Option<usize>, metric_col: Option<usize>) -> Self {
        let mut ts_min_us = None;
        let mut ts_max_us = None;
        let mut service_eq = None;
        let mut metric_eq = None;
        let mut residual = Vec::new();

        let tighten_min = |cur: &mut Option<i64>, v: i64| *cur = Some(cur.map_or(v, |c| c.max(v)));
        let tighten_max = |cur: &mut Option<i64>, v: i64| *cur = Some(cur.map_or(v, |c| c.min(v)));

        for filter in filters {
            match &filter {
                RowFilter::Compare { column: 0, op, value: FilterValue::Timestamp(v) }
                | RowFilter::Compare { column: 0, op, value: FilterValue::Bigint(v) } => {
                    match op {
                        CompareOp::Gt | CompareOp::Ge => tighten_min(&mut ts_min_us, *v),
                        CompareOp::Lt | CompareOp::Le => tighten_max(&mut ts_max_us, *v),
                        CompareOp::Eq => {
                            tighten_min(&mut ts_min_us, *v);
                            tighten_max(&mut ts_max_us, *v);
                        }
                    }
                    // The bound itself is only an approximation (it
                    // ignores strict vs. non-strict); re-check exactly
                    // as a residual predicate so `>`/`<` stay exact.
                    residual.push(filter);
                }
                RowFilter::Compare { column, op: CompareOp::Eq, value: FilterValue::Varchar(v) }
                    if Some(*column) == service_col =>
                {
                    service_eq = Some(v.clone());
                    residual.push(filter);
                }
                RowFilter::Compare { column, op: CompareOp::Eq, value: FilterValue::Varchar(v) }
                    if Some(*column) == metric_col =>
                {
                    metric_eq = Some(v.clone());
                    residual.push(filter);
                }
                _ => residual.push(filter),
            }
        }

        Self { ts_min_us, ts_max_us, service_eq, metric_eq, residual }
    }

    fn chunk_survives(&self, zone: &crate::buffer::ZoneMap) -> bool {
        if !zone.intersects_timestamp(self.ts_min_us, self.ts_max_us) {
            return false;
        }
        if let Some(eq) = &self.service_eq {
            if !zone.could_match_service(eq) {
                return false;
            }
        }
        if let Some(eq) = &self.metric_eq {
            if !zone.could_match_metric(eq) {
                return false;
            }
        }
        true
    }

    fn is_unfiltered(&self) -> bool {
        self.ts_min_us.is_none() && self.ts_max_us.is_none() && self.residual.is_empty()
    }
}

/// A point-in-time scan over one table's ring buffer. Cheap to clone: a
/// clone shares the same captured snapshot and the same chunk cursor, so
/// handing out clones to worker threads is exactly the "shared atomic
/// counter" parallelism model of spec.md §4.5 — each clone is a
/// [`ScanShard`].
#[derive(Clone)]
pub struct Scanner {
    snapshot: Arc<Snapshot>,
    projection: Arc<[usize]>,
    pushdown: Arc<Pushdown>,
    cursor: Arc<AtomicUsize>,
    pruned: Arc<AtomicUsize>,
}

/// A worker's handle onto a shared [`Scanner`]; claiming chunks via the
/// same atomic cursor as every other shard. `ScanShard` and `Scanner`
/// are the same type — cloning a `Scanner` *is* making a shard.
pub type ScanShard = Scanner;

impl Scanner {
    /// Captures a point-in-time snapshot of `ring` and precomputes the
    /// pushdown state from `filters`. Everything appended to `ring`
    /// after this call is invisible to this scan.
    pub fn new(ring: &RingBuffer, projection: Vec<usize>, filters: Vec<RowFilter>) -> Self {
        let snapshot = ring.snapshot();
        let pushdown = Pushdown::build(filters, ring.service_col(), ring.metric_col());
        Self {
            snapshot: Arc::new(snapshot),
            projection: projection.into(),
            pushdown: Arc::new(pushdown),
            cursor: Arc::new(AtomicUsize::new(0)),
            pruned: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Clones this scanner into an independent shard sharing the same
    /// chunk cursor — see [`ScanShard`].
    pub fn shard(&self) -> ScanShard {
        self.clone()
    }

    pub fn total_chunks(&self) -> usize {
        self.snapshot.len()
    }

    /// Chunks skipped by zone-map pruning so far, across every shard
    /// sharing this scanner — the instrumentation counter spec.md §8
    /// scenario 4 checks.
    pub fn pruned_chunks(&self) -> usize {
        self.pruned.load(Ordering::Relaxed)
    }

    /// Claims the next chunk (skipping any the zone map proves can't
    /// match) and emits it as one batch, or an empty batch once every
    /// chunk has been claimed (spec.md §4.5 "Termination"). Safe to call
    /// from multiple shards concurrently — each chunk index is claimed
    /// by exactly one caller.
    pub fn next_batch(&self) -> RecordBatch {
        loop {
            let idx = self.cursor.fetch_add(1, Ordering::SeqCst);
            if idx >= self.snapshot.len() {
                return RecordBatch::empty(self.projection.len());
            }
            let stored = &self.snapshot[idx];
            if !self.pushdown.chunk_survives(&stored.zone) {
                self.pruned.fetch_add(1, Ordering::Relaxed);
                continue;
            }
            return self.emit_chunk(stored);
        }
    }

    fn emit_chunk(&self, stored: &crate::buffer::ring::StoredChunk) -> RecordBatch {
        let chunk = &stored.chunk;
        if self.pushdown.is_unfiltered() {
            let columns = self.projection.iter().map(|&c| chunk.column(c).to_vec()).collect();
            return RecordBatch { columns };
        }

        let mut selected: Vec<usize> = (0..chunk.row_count).collect();
        if let Some(lo) = self.pushdown.ts_min_us {
            selected.retain(|&r| chunk.column(0)[r].as_timestamp_us().is_some_and(|t| t >= lo));
        }
        if let Some(hi) = self.pushdown.ts_max_us {
            selected.retain(|&r| chunk.column(0)[r].as_timestamp_us().is_some_and(|t| t <= hi));
        }
        for filter in &self.pushdown.residual {
            selected.retain(|&r| row_matches_filter(chunk, r, filter));
        }

        let columns = self
            .projection
            .iter()
            .map(|&c| selected.iter().map(|&r| chunk.column(c)[r].clone()).collect())
            .collect();
        RecordBatch { columns }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::ring::DEFAULT_VECTOR_SIZE;
    use crate::schema::traces::col as trace_col;
    use crate::schema::TableKind;

    fn seed_traces(ring: &RingBuffer, rows: &[(i64, &str)]) {
        let mut app = ring.appender();
        for (ts_ns, service) in rows {
            app.begin_row();
            app.set_timestamp_ns(trace_col::TIMESTAMP, *ts_ns);
            app.set_varchar(trace_col::SERVICE_NAME, *service);
            app.commit_row();
        }
    }

    #[test]
    fn unfiltered_scan_returns_every_row_then_terminates() {
        let ring = RingBuffer::new(TableKind::Traces.schema(), 16);
        seed_traces(&ring, &[(1_000_000_000, "a"), (2_000_000_000, "b"), (3_000_000_000, "c")]);
        let scan = Scanner::new(&ring, vec![trace_col::SERVICE_NAME], Vec::new());
        let batch = scan.next_batch();
        assert_eq!(batch.row_count(), 3);
        assert_eq!(batch.columns[0][1], Value::Varchar("b".to_string()));
        assert!(scan.next_batch().is_empty());
    }

    #[test]
    fn timestamp_bounds_prune_and_filter_rows() {
        let ring = RingBuffer::new(TableKind::Traces.schema(), 16);
        seed_traces(
            &ring,
            &[
                (1_000_000_000, "a"), // 1s -> below bound
                (5_500_000_000, "b"), // 5.5s -> in bounds
                (9_000_000_000, "c"), // 9s -> above bound
            ],
        );
        let filters = vec![
            RowFilter::Compare { column: 0, op: CompareOp::Ge, value: FilterValue::Timestamp(5_000_000) },
            RowFilter::Compare { column: 0, op: CompareOp::Lt, value: FilterValue::Timestamp(6_000_000) },
        ];
        let scan = Scanner::new(&ring, vec![trace_col::SERVICE_NAME], filters);
        let batch = scan.next_batch();
        assert_eq!(batch.row_count(), 1);
        assert_eq!(batch.columns[0][0], Value::Varchar("b".to_string()));
    }

    #[test]
    fn service_equality_pushdown_prunes_uniform_chunks_and_filters_mixed_ones() {
        // Two chunks actually retained requires buffer_capacity above
        // DEFAULT_VECTOR_SIZE: chunk_capacity only ever shrinks below it
        // by shrinking buffer_capacity to match, which collapses
        // max_chunks back to 1. So both chunks here are a full
        // DEFAULT_VECTOR_SIZE rows.
        let ring = RingBuffer::new(TableKind::Traces.schema(), 2 * DEFAULT_VECTOR_SIZE);
        assert_eq!(ring.chunk_capacity(), DEFAULT_VECTOR_SIZE);

        // chunk 0: uniform "checkout" for the whole chunk.
        let mut app = ring.appender();
        for i in 0..DEFAULT_VECTOR_SIZE {
            app.begin_row();
            app.set_timestamp_ns(trace_col::TIMESTAMP, i as i64);
            app.set_varchar(trace_col::SERVICE_NAME, "checkout");
            app.commit_row();
        }
        drop(app);
        // chunk 1: mixed "checkout"/"billing" (not prunable, needs residual filter)
        let mut app = ring.appender();
        for i in 0..DEFAULT_VECTOR_SIZE {
            app.begin_row();
            app.set_timestamp_ns(trace_col::TIMESTAMP, (DEFAULT_VECTOR_SIZE + i) as i64);
            app.set_varchar(trace_col::SERVICE_NAME, if i % 2 == 0 { "billing" } else { "checkout" });
            app.commit_row();
        }
        drop(app);
        assert_eq!(ring.chunk_count(), 2);

        let filters = vec![RowFilter::eq(trace_col::SERVICE_NAME, FilterValue::Varchar("checkout".to_string()))];
        let scan = Scanner::new(&ring, vec![trace_col::SERVICE_NAME], filters);

        let mut total_checkout_rows = 0;
        loop {
            let batch = scan.next_batch();
            if batch.is_empty() {
                break;
            }
            for v in &batch.columns[0] {
                assert_eq!(v, &Value::Varchar("checkout".to_string()));
                total_checkout_rows += 1;
            }
        }
        assert_eq!(total_checkout_rows, DEFAULT_VECTOR_SIZE + DEFAULT_VECTOR_SIZE / 2);
        assert_eq!(scan.pruned_chunks(), 0, "both chunks match the equality zone map and must not be pruned");
    }

    #[test]
    fn is_null_filter_selects_only_null_cells() {
        let ring = RingBuffer::new(TableKind::Traces.schema(), 16);
        let mut app = ring.appender();
        app.begin_row();
        app.set_timestamp_ns(trace_col::TIMESTAMP, 1);
        app.set_varchar(trace_col::SERVICE_NAME, "svc");
        app.commit_row();
        app.begin_row();
        app.set_timestamp_ns(trace_col::TIMESTAMP, 2);
        app.set_null(trace_col::SERVICE_NAME);
        app.commit_row();
        drop(app);

        let scan = Scanner::new(
            &ring,
            vec![trace_col::TIMESTAMP],
            vec![RowFilter::IsNull { column: trace_col::SERVICE_NAME }],
        );
        let batch = scan.next_batch();
        assert_eq!(batch.row_count(), 1);
        assert_eq!(batch.columns[0][0], Value::Timestamp(2));
    }

    #[test]
    fn scan_shards_share_the_same_cursor() {
        // buffer_size=1 seals-and-evicts on every append (spec.md §8's
        // buffer_size=1 boundary), so only a buffer spanning multiple
        // full DEFAULT_VECTOR_SIZE chunks actually retains more than one
        // sealed chunk at once. Three retained chunks needs three chunks'
        // worth of capacity.
        let ring = RingBuffer::new(TableKind::Traces.schema(), 3 * DEFAULT_VECTOR_SIZE);
        assert_eq!(ring.chunk_capacity(), DEFAULT_VECTOR_SIZE);
        let mut app = ring.appender();
        for i in 0..(3 * DEFAULT_VECTOR_SIZE) {
            app.begin_row();
            app.set_timestamp_ns(trace_col::TIMESTAMP, i as i64);
            app.set_varchar(trace_col::SERVICE_NAME, "a");
            app.commit_row();
        }
        drop(app);
        assert_eq!(ring.chunk_count(), 3);

        let scan = Scanner::new(&ring, vec![trace_col::SERVICE_NAME], Vec::new());
        assert_eq!(scan.total_chunks(), 3);
        let shard_a = scan.shard();
        let shard_b = scan.shard();
        let mut seen = 0;
        while !shard_a.next_batch().is_empty() {
            seen += 1;
        }
        // shard_b shares the cursor, so it sees nothing left.
        assert!(shard_b.next_batch().is_empty());
        assert_eq!(seen, 3);
    }
}
