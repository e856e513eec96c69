//! The `otel_metrics_union` view: every metrics row transformed into the
//! common 28-column shape with a `MetricType` discriminator and null
//! padding for whichever family-specific columns don't apply. Grounded
//! on `original_source/src/otlp_metrics_union_scan.cpp`
//! (`OTLPMetricsUnionScanInitGlobal`/`OTLPMetricsUnionScanFunction`):
//! unlike the per-table [`crate::scan::Scanner`], the original performs
//! no zone-map pruning or predicate pushdown here at all — it reads
//! every row from all five buffers eagerly, transforms it, and pages the
//! buffered result out in fixed-size batches. This scanner keeps that
//! same shape; the only addition is an optional row-wise residual filter
//! (evaluated after transformation, never pushed into the per-table
//! scan), since the read-only query surface otherwise has no way to
//! narrow a union scan at all.

use crate::buffer::ring::DEFAULT_VECTOR_SIZE;
use crate::schema::metrics::{base_col, exp_histogram_col, gauge_col, histogram_col, summary_col, sum_col};
use crate::schema::{union::col as u, TableKind};
use crate::scan::{RecordBatch, RowFilter};
use crate::tables::Tables;
use crate::value::Value;

const UNION_COLUMN_COUNT: usize = crate::schema::union::UNION_COLUMNS.len();

fn base_columns(row: &[Value]) -> [Value; 9] {
    [
        row[base_col::TIMESTAMP].clone(),
        row[base_col::SERVICE_NAME].clone(),
        row[base_col::METRIC_NAME].clone(),
        row[base_col::METRIC_DESCRIPTION].clone(),
        row[base_col::METRIC_UNIT].clone(),
        row[base_col::RESOURCE_ATTRIBUTES].clone(),
        row[base_col::SCOPE_NAME].clone(),
        row[base_col::SCOPE_VERSION].clone(),
        row[base_col::ATTRIBUTES].clone(),
    ]
}

fn transform_row(kind: TableKind, row: &[Value]) -> Vec<Value> {
    let mut out = vec![Value::Null; UNION_COLUMN_COUNT];
    let base = base_columns(row);
    out[u::TIMESTAMP..=u::ATTRIBUTES].clone_from_slice(&base);
    out[u::METRIC_TYPE] = Value::Varchar(crate::schema::union::metric_type_label(kind).to_string());

    match kind {
        TableKind::MetricsGauge => {
            out[u::VALUE] = row[gauge_col::VALUE].clone();
            out[u::FLAGS] = row[gauge_col::FLAGS].clone();
        }
        TableKind::MetricsSum => {
            out[u::VALUE] = row[sum_col::VALUE].clone();
            out[u::FLAGS] = row[sum_col::FLAGS].clone();
            out[u::AGGREGATION_TEMPORALITY] = row[sum_col::AGGREGATION_TEMPORALITY].clone();
            out[u::IS_MONOTONIC] = row[sum_col::IS_MONOTONIC].clone();
        }
        TableKind::MetricsHistogram => {
            out[u::COUNT] = row[histogram_col::COUNT].clone();
            out[u::SUM] = row[histogram_col::SUM].clone();
            out[u::BUCKET_COUNTS] = row[histogram_col::BUCKET_COUNTS].clone();
            out[u::EXPLICIT_BOUNDS] = row[histogram_col::EXPLICIT_BOUNDS].clone();
            out[u::MIN] = row[histogram_col::MIN].clone();
            out[u::MAX] = row[histogram_col::MAX].clone();
            out[u::AGGREGATION_TEMPORALITY] = row[histogram_col::AGGREGATION_TEMPORALITY].clone();
            out[u::FLAGS] = row[histogram_col::FLAGS].clone();
        }
        TableKind::MetricsExpHistogram => {
            out[u::COUNT] = row[exp_histogram_col::COUNT].clone();
            out[u::SUM] = row[exp_histogram_col::SUM].clone();
            out[u::SCALE] = row[exp_histogram_col::SCALE].clone();
            out[u::ZERO_COUNT] = row[exp_histogram_col::ZERO_COUNT].clone();
            out[u::POSITIVE_OFFSET] = row[exp_histogram_col::POSITIVE_OFFSET].clone();
            out[u::POSITIVE_BUCKET_COUNTS] = row[exp_histogram_col::POSITIVE_BUCKET_COUNTS].clone();
            out[u::NEGATIVE_OFFSET] = row[exp_histogram_col::NEGATIVE_OFFSET].clone();
            out[u::NEGATIVE_BUCKET_COUNTS] = row[exp_histogram_col::NEGATIVE_BUCKET_COUNTS].clone();
            out[u::MIN] = row[exp_histogram_col::MIN].clone();
            out[u::MAX] = row[exp_histogram_col::MAX].clone();
            out[u::AGGREGATION_TEMPORALITY] = row[exp_histogram_col::AGGREGATION_TEMPORALITY].clone();
            out[u::FLAGS] = row[exp_histogram_col::FLAGS].clone();
        }
        TableKind::MetricsSummary => {
            out[u::COUNT] = row[summary_col::COUNT].clone();
            out[u::SUM] = row[summary_col::SUM].clone();
            out[u::QUANTILE_QUANTILES] = row[summary_col::QUANTILE_QUANTILES].clone();
            out[u::QUANTILE_VALUES] = row[summary_col::QUANTILE_VALUES].clone();
            out[u::FLAGS] = row[summary_col::FLAGS].clone();
        }
        TableKind::Traces | TableKind::Logs => unreachable!("not a metrics table"),
    }
    out
}

fn row_matches(row: &[Value], filter: &RowFilter) -> bool {
    use crate::scan::{CompareOp, FilterValue};
    let cell = match filter {
        RowFilter::IsNull { column } => return row[*column].is_null(),
        RowFilter::Compare { column, .. } => &row[*column],
    };
    let RowFilter::Compare { op, value, .. } = filter else { unreachable!() };
    fn ord<T: PartialOrd>(a: T, op: CompareOp, b: T) -> bool {
        match op {
            CompareOp::Eq => a == b,
            CompareOp::Lt => a < b,
            CompareOp::Le => a <= b,
            CompareOp::Gt => a > b,
            CompareOp::Ge => a >= b,
        }
    }
    match (cell, value) {
        (Value::Null, _) => false,
        (Value::Timestamp(a), FilterValue::Timestamp(b)) => ord(*a, *op, *b),
        (Value::Varchar(a), FilterValue::Varchar(b)) => ord(a.as_str(), *op, b.as_str()),
        (Value::Double(a), FilterValue::Double(b)) => ord(*a, *op, *b),
        (Value::UBigint(a), FilterValue::UBigint(b)) => ord(*a, *op, *b),
        (Value::Boolean(a), FilterValue::Boolean(b)) if *op == CompareOp::Eq => a == b,
        _ => true,
    }
}

/// A one-shot, eagerly materialized scan over the metrics union view.
/// Built once per query (spec.md §4.6); unlike [`crate::scan::Scanner`]
/// it is not meant to be sharded across worker threads, matching the
/// original's single-threaded union scan state.
pub struct UnionScanner {
    projection: Vec<usize>,
    rows: Vec<Vec<Value>>,
    cursor: usize,
}

impl UnionScanner {
    pub fn new(tables: &Tables, projection: Vec<usize>, filters: Vec<RowFilter>) -> Self {
        let mut rows = Vec::new();
        for (kind, ring) in tables.metric_tables() {
            for stored in ring.snapshot() {
                for r in 0..stored.chunk.row_count {
                    let raw_row: Vec<Value> = (0..stored.chunk.columns.len()).map(|c| stored.chunk.column(c)[r].clone()).collect();
                    let row = transform_row(kind, &raw_row);
                    if filters.iter().all(|f| row_matches(&row, f)) {
                        rows.push(row);
                    }
                }
            }
        }
        Self { projection, rows, cursor: 0 }
    }

    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }

    /// Emits the next `DEFAULT_VECTOR_SIZE`-row slice, or an empty batch
    /// once every row has been emitted.
    pub fn next_batch(&mut self) -> RecordBatch {
        let remaining = self.rows.len() - self.cursor;
        let take = remaining.min(DEFAULT_VECTOR_SIZE);
        if take == 0 {
            return RecordBatch { columns: vec![Vec::new(); self.projection.len()] };
        }
        let slice = &self.rows[self.cursor..self.cursor + take];
        let columns = self.projection.iter().map(|&c| slice.iter().map(|row| row[c].clone()).collect()).collect();
        self.cursor += take;
        RecordBatch { columns }
    }
}
