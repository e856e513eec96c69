//! `otel_logs` column layout, pinned from `OTLPLogsSchema`.

use super::{ColumnDef, TableSchema};
use crate::value::ColumnType as T;

pub const COLUMNS: &[ColumnDef] = &[
    ("Timestamp", T::Timestamp),
    ("TraceId", T::Varchar),
    ("SpanId", T::Varchar),
    ("TraceFlags", T::UInteger),
    ("SeverityText", T::Varchar),
    ("SeverityNumber", T::Integer),
    ("ServiceName", T::Varchar),
    ("Body", T::Varchar),
    ("ResourceSchemaUrl", T::Varchar),
    ("ResourceAttributes", T::Map),
    ("ScopeSchemaUrl", T::Varchar),
    ("ScopeName", T::Varchar),
    ("ScopeVersion", T::Varchar),
    ("ScopeAttributes", T::Map),
    ("LogAttributes", T::Map),
];

pub const SCHEMA: TableSchema = TableSchema {
    name: "otel_logs",
    columns: COLUMNS,
};

pub mod col {
    pub const TIMESTAMP: usize = 0;
    pub const TRACE_ID: usize = 1;
    pub const SPAN_ID: usize = 2;
    pub const TRACE_FLAGS: usize = 3;
    pub const SEVERITY_TEXT: usize = 4;
    pub const SEVERITY_NUMBER: usize = 5;
    pub const SERVICE_NAME: usize = 6;
    pub const BODY: usize = 7;
    pub const RESOURCE_SCHEMA_URL: usize = 8;
    pub const RESOURCE_ATTRIBUTES: usize = 9;
    pub const SCOPE_SCHEMA_URL: usize = 10;
    pub const SCOPE_NAME: usize = 11;
    pub const SCOPE_VERSION: usize = 12;
    pub const SCOPE_ATTRIBUTES: usize = 13;
    pub const LOG_ATTRIBUTES: usize = 14;
}
