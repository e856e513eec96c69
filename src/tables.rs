//! Owns the seven per-table ring buffers backing one attach. Grounded
//! on `OTLPStorageInfo` in the original engine: one struct the receiver
//! and the scan operator both hold a shared reference to, with no
//! back-reference from a `RingBuffer` to this owner (spec.md §3
//! "Ownership").

use crate::buffer::RingBuffer;
use crate::schema::TableKind;

/// The seven columnar ring buffers a single attach creates, one per
/// table in the schema registry. All seven share the same
/// `buffer_capacity`; spec.md does not provide for per-table sizing.
pub struct Tables {
    pub traces: RingBuffer,
    pub logs: RingBuffer,
    pub metrics_gauge: RingBuffer,
    pub metrics_sum: RingBuffer,
    pub metrics_histogram: RingBuffer,
    pub metrics_exp_histogram: RingBuffer,
    pub metrics_summary: RingBuffer,
}

impl Tables {
    pub fn new(buffer_capacity: usize) -> Self {
        Self {
            traces: RingBuffer::new(TableKind::Traces.schema(), buffer_capacity),
            logs: RingBuffer::new(TableKind::Logs.schema(), buffer_capacity),
            metrics_gauge: RingBuffer::new(TableKind::MetricsGauge.schema(), buffer_capacity),
            metrics_sum: RingBuffer::new(TableKind::MetricsSum.schema(), buffer_capacity),
            metrics_histogram: RingBuffer::new(TableKind::MetricsHistogram.schema(), buffer_capacity),
            metrics_exp_histogram: RingBuffer::new(TableKind::MetricsExpHistogram.schema(), buffer_capacity),
            metrics_summary: RingBuffer::new(TableKind::MetricsSummary.schema(), buffer_capacity),
        }
    }

    pub fn get(&self, kind: TableKind) -> &RingBuffer {
        match kind {
            TableKind::Traces => &self.traces,
            TableKind::Logs => &self.logs,
            TableKind::MetricsGauge => &self.metrics_gauge,
            TableKind::MetricsSum => &self.metrics_sum,
            TableKind::MetricsHistogram => &self.metrics_histogram,
            TableKind::MetricsExpHistogram => &self.metrics_exp_histogram,
            TableKind::MetricsSummary => &self.metrics_summary,
        }
    }

    /// The five metrics tables in schema-registry order, paired with
    /// their kind — used by the union scan (spec.md §6) and by the
    /// metrics row-builder dispatch (spec.md §4.3).
    pub fn metric_tables(&self) -> [(TableKind, &RingBuffer); 5] {
        [
            (TableKind::MetricsGauge, &self.metrics_gauge),
            (TableKind::MetricsSum, &self.metrics_sum),
            (TableKind::MetricsHistogram, &self.metrics_histogram),
            (TableKind::MetricsExpHistogram, &self.metrics_exp_histogram),
            (TableKind::MetricsSummary, &self.metrics_summary),
        ]
    }
}
