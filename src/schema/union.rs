//! The read-only union view over all five metrics tables
//! (`OTLPMetricsUnionSchema` in the original engine): the base metrics
//! columns, a `MetricType` discriminator, and the superset of every
//! family's type-specific columns. A row from `otel_metrics_gauge`
//! carries `NULL` in every column it has no value for (`Count`,
//! `BucketCounts`, `QuantileValues`, ...).

use super::metrics::BASE_COLUMNS;
use super::{ColumnDef, TableKind, TableSchema};
use crate::value::ColumnType as T;

pub const UNION_COLUMNS: &[ColumnDef] = &[
    ("Timestamp", T::Timestamp),
    ("ServiceName", T::Varchar),
    ("MetricName", T::Varchar),
    ("MetricDescription", T::Varchar),
    ("MetricUnit", T::Varchar),
    ("ResourceAttributes", T::Map),
    ("ScopeName", T::Varchar),
    ("ScopeVersion", T::Varchar),
    ("Attributes", T::Map),
    ("MetricType", T::Varchar),
    ("Value", T::Double),
    ("Flags", T::UInteger),
    ("AggregationTemporality", T::Varchar),
    ("IsMonotonic", T::Boolean),
    ("Count", T::UBigint),
    ("Sum", T::Double),
    ("BucketCounts", T::List(&T::UBigint)),
    ("ExplicitBounds", T::List(&T::Double)),
    ("Min", T::Double),
    ("Max", T::Double),
    ("Scale", T::Integer),
    ("ZeroCount", T::UBigint),
    ("PositiveOffset", T::Integer),
    ("PositiveBucketCounts", T::List(&T::UBigint)),
    ("NegativeOffset", T::Integer),
    ("NegativeBucketCounts", T::List(&T::UBigint)),
    ("QuantileQuantiles", T::List(&T::Double)),
    ("QuantileValues", T::List(&T::Double)),
];

pub const SCHEMA: TableSchema = TableSchema {
    name: "otel_metrics_union",
    columns: UNION_COLUMNS,
};

pub mod col {
    pub const TIMESTAMP: usize = 0;
    pub const SERVICE_NAME: usize = 1;
    pub const METRIC_NAME: usize = 2;
    pub const METRIC_DESCRIPTION: usize = 3;
    pub const METRIC_UNIT: usize = 4;
    pub const RESOURCE_ATTRIBUTES: usize = 5;
    pub const SCOPE_NAME: usize = 6;
    pub const SCOPE_VERSION: usize = 7;
    pub const ATTRIBUTES: usize = 8;
    pub const METRIC_TYPE: usize = 9;
    pub const VALUE: usize = 10;
    pub const FLAGS: usize = 11;
    pub const AGGREGATION_TEMPORALITY: usize = 12;
    pub const IS_MONOTONIC: usize = 13;
    pub const COUNT: usize = 14;
    pub const SUM: usize = 15;
    pub const BUCKET_COUNTS: usize = 16;
    pub const EXPLICIT_BOUNDS: usize = 17;
    pub const MIN: usize = 18;
    pub const MAX: usize = 19;
    pub const SCALE: usize = 20;
    pub const ZERO_COUNT: usize = 21;
    pub const POSITIVE_OFFSET: usize = 22;
    pub const POSITIVE_BUCKET_COUNTS: usize = 23;
    pub const NEGATIVE_OFFSET: usize = 24;
    pub const NEGATIVE_BUCKET_COUNTS: usize = 25;
    pub const QUANTILE_QUANTILES: usize = 26;
    pub const QUANTILE_VALUES: usize = 27;
}

/// Human-readable discriminator written into the `MetricType` column,
/// keyed on which of the five metrics tables a row came from.
pub fn metric_type_label(kind: TableKind) -> &'static str {
    match kind {
        TableKind::MetricsGauge => "gauge",
        TableKind::MetricsSum => "sum",
        TableKind::MetricsHistogram => "histogram",
        TableKind::MetricsExpHistogram => "exponential_histogram",
        TableKind::MetricsSummary => "summary",
        TableKind::Traces | TableKind::Logs => unreachable!("not a metrics table"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_schema_starts_with_base_columns() {
        assert_eq!(&UNION_COLUMNS[..BASE_COLUMNS.len()], BASE_COLUMNS);
    }

    #[test]
    fn union_schema_has_no_duplicate_column_names() {
        let mut names: Vec<_> = SCHEMA.column_names().collect();
        let before = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), before);
    }
}
