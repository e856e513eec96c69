//! The five `otel_metrics_*` tables. Each shares the same nine-column
//! prefix (`OTLPMetricsBaseSchema` in the original engine) and appends
//! the columns specific to its OTLP datapoint family.

use super::{ColumnDef, TableSchema};
use crate::value::ColumnType as T;

/// Shared prefix every metrics table starts with.
pub const BASE_COLUMNS: &[ColumnDef] = &[
    ("Timestamp", T::Timestamp),
    ("ServiceName", T::Varchar),
    ("MetricName", T::Varchar),
    ("MetricDescription", T::Varchar),
    ("MetricUnit", T::Varchar),
    ("ResourceAttributes", T::Map),
    ("ScopeName", T::Varchar),
    ("ScopeVersion", T::Varchar),
    ("Attributes", T::Map),
];

pub const BASE_COLUMN_COUNT: usize = BASE_COLUMNS.len();

pub mod base_col {
    pub const TIMESTAMP: usize = 0;
    pub const SERVICE_NAME: usize = 1;
    pub const METRIC_NAME: usize = 2;
    pub const METRIC_DESCRIPTION: usize = 3;
    pub const METRIC_UNIT: usize = 4;
    pub const RESOURCE_ATTRIBUTES: usize = 5;
    pub const SCOPE_NAME: usize = 6;
    pub const SCOPE_VERSION: usize = 7;
    pub const ATTRIBUTES: usize = 8;
}

pub const GAUGE_COLUMNS: &[ColumnDef] = &[
    ("Timestamp", T::Timestamp),
    ("ServiceName", T::Varchar),
    ("MetricName", T::Varchar),
    ("MetricDescription", T::Varchar),
    ("MetricUnit", T::Varchar),
    ("ResourceAttributes", T::Map),
    ("ScopeName", T::Varchar),
    ("ScopeVersion", T::Varchar),
    ("Attributes", T::Map),
    ("Value", T::Double),
    ("Flags", T::UInteger),
];

pub const SUM_COLUMNS: &[ColumnDef] = &[
    ("Timestamp", T::Timestamp),
    ("ServiceName", T::Varchar),
    ("MetricName", T::Varchar),
    ("MetricDescription", T::Varchar),
    ("MetricUnit", T::Varchar),
    ("ResourceAttributes", T::Map),
    ("ScopeName", T::Varchar),
    ("ScopeVersion", T::Varchar),
    ("Attributes", T::Map),
    ("Value", T::Double),
    ("Flags", T::UInteger),
    ("AggregationTemporality", T::Varchar),
    ("IsMonotonic", T::Boolean),
];

pub const HISTOGRAM_COLUMNS: &[ColumnDef] = &[
    ("Timestamp", T::Timestamp),
    ("ServiceName", T::Varchar),
    ("MetricName", T::Varchar),
    ("MetricDescription", T::Varchar),
    ("MetricUnit", T::Varchar),
    ("ResourceAttributes", T::Map),
    ("ScopeName", T::Varchar),
    ("ScopeVersion", T::Varchar),
    ("Attributes", T::Map),
    ("Count", T::UBigint),
    ("Sum", T::Double),
    ("BucketCounts", T::List(&T::UBigint)),
    ("ExplicitBounds", T::List(&T::Double)),
    ("Min", T::Double),
    ("Max", T::Double),
    ("AggregationTemporality", T::Varchar),
    ("Flags", T::UInteger),
];

pub const EXP_HISTOGRAM_COLUMNS: &[ColumnDef] = &[
    ("Timestamp", T::Timestamp),
    ("ServiceName", T::Varchar),
    ("MetricName", T::Varchar),
    ("MetricDescription", T::Varchar),
    ("MetricUnit", T::Varchar),
    ("ResourceAttributes", T::Map),
    ("ScopeName", T::Varchar),
    ("ScopeVersion", T::Varchar),
    ("Attributes", T::Map),
    ("Count", T::UBigint),
    ("Sum", T::Double),
    ("Scale", T::Integer),
    ("ZeroCount", T::UBigint),
    ("PositiveOffset", T::Integer),
    ("PositiveBucketCounts", T::List(&T::UBigint)),
    ("NegativeOffset", T::Integer),
    ("NegativeBucketCounts", T::List(&T::UBigint)),
    ("Min", T::Double),
    ("Max", T::Double),
    ("AggregationTemporality", T::Varchar),
    ("Flags", T::UInteger),
];

pub const SUMMARY_COLUMNS: &[ColumnDef] = &[
    ("Timestamp", T::Timestamp),
    ("ServiceName", T::Varchar),
    ("MetricName", T::Varchar),
    ("MetricDescription", T::Varchar),
    ("MetricUnit", T::Varchar),
    ("ResourceAttributes", T::Map),
    ("ScopeName", T::Varchar),
    ("ScopeVersion", T::Varchar),
    ("Attributes", T::Map),
    ("Count", T::UBigint),
    ("Sum", T::Double),
    ("QuantileQuantiles", T::List(&T::Double)),
    ("QuantileValues", T::List(&T::Double)),
    ("Flags", T::UInteger),
];

/// Column indices specific to `otel_metrics_gauge`, starting right
/// after [`BASE_COLUMN_COUNT`].
pub mod gauge_col {
    pub const VALUE: usize = 9;
    pub const FLAGS: usize = 10;
}

pub mod sum_col {
    pub const VALUE: usize = 9;
    pub const FLAGS: usize = 10;
    pub const AGGREGATION_TEMPORALITY: usize = 11;
    pub const IS_MONOTONIC: usize = 12;
}

pub mod histogram_col {
    pub const COUNT: usize = 9;
    pub const SUM: usize = 10;
    pub const BUCKET_COUNTS: usize = 11;
    pub const EXPLICIT_BOUNDS: usize = 12;
    pub const MIN: usize = 13;
    pub const MAX: usize = 14;
    pub const AGGREGATION_TEMPORALITY: usize = 15;
    pub const FLAGS: usize = 16;
}

pub mod exp_histogram_col {
    pub const COUNT: usize = 9;
    pub const SUM: usize = 10;
    pub const SCALE: usize = 11;
    pub const ZERO_COUNT: usize = 12;
    pub const POSITIVE_OFFSET: usize = 13;
    pub const POSITIVE_BUCKET_COUNTS: usize = 14;
    pub const NEGATIVE_OFFSET: usize = 15;
    pub const NEGATIVE_BUCKET_COUNTS: usize = 16;
    pub const MIN: usize = 17;
    pub const MAX: usize = 18;
    pub const AGGREGATION_TEMPORALITY: usize = 19;
    pub const FLAGS: usize = 20;
}

pub mod summary_col {
    pub const COUNT: usize = 9;
    pub const SUM: usize = 10;
    pub const QUANTILE_QUANTILES: usize = 11;
    pub const QUANTILE_VALUES: usize = 12;
    pub const FLAGS: usize = 13;
}

pub const GAUGE_SCHEMA: TableSchema = TableSchema {
    name: "otel_metrics_gauge",
    columns: GAUGE_COLUMNS,
};

pub const SUM_SCHEMA: TableSchema = TableSchema {
    name: "otel_metrics_sum",
    columns: SUM_COLUMNS,
};

pub const HISTOGRAM_SCHEMA: TableSchema = TableSchema {
    name: "otel_metrics_histogram",
    columns: HISTOGRAM_COLUMNS,
};

pub const EXP_HISTOGRAM_SCHEMA: TableSchema = TableSchema {
    name: "otel_metrics_exponential_histogram",
    columns: EXP_HISTOGRAM_COLUMNS,
};

pub const SUMMARY_SCHEMA: TableSchema = TableSchema {
    name: "otel_metrics_summary",
    columns: SUMMARY_COLUMNS,
};
