//! `otel_traces` column layout, pinned from the original engine's
//! `OTLPTracesSchema` header.

use super::{ColumnDef, TableSchema};
use crate::value::ColumnType as T;

pub const COLUMNS: &[ColumnDef] = &[
    ("Timestamp", T::Timestamp),
    ("TraceId", T::Varchar),
    ("SpanId", T::Varchar),
    ("ParentSpanId", T::Varchar),
    ("TraceState", T::Varchar),
    ("SpanName", T::Varchar),
    ("SpanKind", T::Varchar),
    ("ServiceName", T::Varchar),
    ("ResourceAttributes", T::Map),
    ("ScopeName", T::Varchar),
    ("ScopeVersion", T::Varchar),
    ("SpanAttributes", T::Map),
    ("Duration", T::Bigint),
    ("StatusCode", T::Varchar),
    ("StatusMessage", T::Varchar),
    ("Events.Timestamp", T::List(&T::Timestamp)),
    ("Events.Name", T::List(&T::Varchar)),
    ("Events.Attributes", T::List(&T::Map)),
    ("Links.TraceId", T::List(&T::Varchar)),
    ("Links.SpanId", T::List(&T::Varchar)),
    ("Links.TraceState", T::List(&T::Varchar)),
    ("Links.Attributes", T::List(&T::Map)),
];

pub const SCHEMA: TableSchema = TableSchema {
    name: "otel_traces",
    columns: COLUMNS,
};

pub mod col {
    pub const TIMESTAMP: usize = 0;
    pub const TRACE_ID: usize = 1;
    pub const SPAN_ID: usize = 2;
    pub const PARENT_SPAN_ID: usize = 3;
    pub const TRACE_STATE: usize = 4;
    pub const SPAN_NAME: usize = 5;
    pub const SPAN_KIND: usize = 6;
    pub const SERVICE_NAME: usize = 7;
    pub const RESOURCE_ATTRIBUTES: usize = 8;
    pub const SCOPE_NAME: usize = 9;
    pub const SCOPE_VERSION: usize = 10;
    pub const SPAN_ATTRIBUTES: usize = 11;
    pub const DURATION: usize = 12;
    pub const STATUS_CODE: usize = 13;
    pub const STATUS_MESSAGE: usize = 14;
    pub const EVENTS_TIMESTAMP: usize = 15;
    pub const EVENTS_NAME: usize = 16;
    pub const EVENTS_ATTRIBUTES: usize = 17;
    pub const LINKS_TRACE_ID: usize = 18;
    pub const LINKS_SPAN_ID: usize = 19;
    pub const LINKS_TRACE_STATE: usize = 20;
    pub const LINKS_ATTRIBUTES: usize = 21;
}
