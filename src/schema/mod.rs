//! The fixed schema registry: the seven OTLP tables plus the metrics
//! union view, each pinned to an exact column name/type/order. Nothing
//! here is configurable — a host attaching this crate gets these
//! tables and no others (spec.md §4.1: no DDL, no ALTER).

use crate::value::ColumnType;

/// One column's static name and logical type.
pub type ColumnDef = (&'static str, ColumnType);

/// A fixed, ordered column list for one table.
#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [ColumnDef],
}

impl TableSchema {
    pub fn column_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|(name, _)| *name)
    }

    pub fn column_types(&self) -> impl Iterator<Item = ColumnType> + '_ {
        self.columns.iter().map(|(_, ty)| *ty)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|(n, _)| *n == name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// The seven table kinds this crate exposes, one ring buffer each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Traces,
    Logs,
    MetricsGauge,
    MetricsSum,
    MetricsHistogram,
    MetricsExpHistogram,
    MetricsSummary,
}

impl TableKind {
    pub const ALL: [TableKind; 7] = [
        TableKind::Traces,
        TableKind::Logs,
        TableKind::MetricsGauge,
        TableKind::MetricsSum,
        TableKind::MetricsHistogram,
        TableKind::MetricsExpHistogram,
        TableKind::MetricsSummary,
    ];

    pub fn table_name(self) -> &'static str {
        match self {
            TableKind::Traces => "otel_traces",
            TableKind::Logs => "otel_logs",
            TableKind::MetricsGauge => "otel_metrics_gauge",
            TableKind::MetricsSum => "otel_metrics_sum",
            TableKind::MetricsHistogram => "otel_metrics_histogram",
            TableKind::MetricsExpHistogram => "otel_metrics_exponential_histogram",
            TableKind::MetricsSummary => "otel_metrics_summary",
        }
    }

    pub fn from_table_name(name: &str) -> Option<TableKind> {
        TableKind::ALL.into_iter().find(|k| k.table_name() == name)
    }

    pub fn schema(self) -> TableSchema {
        match self {
            TableKind::Traces => traces::SCHEMA,
            TableKind::Logs => logs::SCHEMA,
            TableKind::MetricsGauge => metrics::GAUGE_SCHEMA,
            TableKind::MetricsSum => metrics::SUM_SCHEMA,
            TableKind::MetricsHistogram => metrics::HISTOGRAM_SCHEMA,
            TableKind::MetricsExpHistogram => metrics::EXP_HISTOGRAM_SCHEMA,
            TableKind::MetricsSummary => metrics::SUMMARY_SCHEMA,
        }
    }

    /// Whether scans against this table support zone-map pruning on
    /// equality filters over a well-known string column — ServiceName
    /// for every table, MetricName only for the five metric tables.
    pub fn metric_name_column(self) -> Option<&'static str> {
        match self {
            TableKind::Traces | TableKind::Logs => None,
            _ => Some("MetricName"),
        }
    }
}

pub mod logs;
pub mod metrics;
pub mod traces;
pub mod union;

pub use union::UNION_SCHEMA;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_table_kind_round_trips_its_name() {
        for kind in TableKind::ALL {
            assert_eq!(TableKind::from_table_name(kind.table_name()), Some(kind));
        }
    }

    #[test]
    fn unknown_table_name_is_none() {
        assert_eq!(TableKind::from_table_name("otel_spans"), None);
    }

    #[test]
    fn traces_schema_has_22_columns() {
        assert_eq!(TableKind::Traces.schema().len(), 22);
    }

    #[test]
    fn logs_schema_has_15_columns() {
        assert_eq!(TableKind::Logs.schema().len(), 15);
    }

    #[test]
    fn service_name_is_column_7_on_traces() {
        let schema = TableKind::Traces.schema();
        assert_eq!(schema.index_of("ServiceName"), Some(7));
    }
}
