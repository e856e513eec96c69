//! JSON front end for the three OTLP export services. Parses into the
//! exact same `opentelemetry-proto` request types the protobuf front
//! end uses — enabled by that crate's `with-serde` feature — and then
//! calls straight into [`super::protobuf`]'s row builders, so a JSON
//! payload and the protobuf encoding of the same data produce
//! identical rows (spec.md §4.4 "Decoders").
//!
//! The OTLP JSON mapping follows proto3 JSON rules: 64-bit integer
//! fields (`timeUnixNano`, `count`, `asInt`, ...) are encoded as JSON
//! strings. Some exporters emit malformed numeric strings for these
//! fields (empty string, non-digit garbage); rather than rejecting the
//! whole payload, those fields are sanitized to `"0"` before strict
//! typed deserialization, matching the original engine's lenient
//! `TryParseInt64Value`/`TryParseDoubleValue` fallbacks.

use serde_json::Value as Json;

use opentelemetry_proto::tonic::collector::logs::v1::ExportLogsServiceRequest;
use opentelemetry_proto::tonic::collector::metrics::v1::ExportMetricsServiceRequest;
use opentelemetry_proto::tonic::collector::trace::v1::ExportTraceServiceRequest;

use crate::buffer::Appender;
use crate::error::DecodeError;

use super::protobuf::{self, MetricAppenders};

/// 64-bit integer fields that OTLP JSON encodes as strings, across all
/// three signals. Keyed by the exact JSON field name (camelCase, as
/// `prost`'s serde impl expects).
const NUMERIC_STRING_FIELDS: &[&str] = &[
    "timeUnixNano",
    "startTimeUnixNano",
    "endTimeUnixNano",
    "observedTimeUnixNano",
    "asInt",
    "count",
    "zeroCount",
];

fn is_well_formed_numeric_string(s: &str) -> bool {
    !s.is_empty() && s.strip_prefix('-').unwrap_or(s).chars().all(|c| c.is_ascii_digit())
}

/// Recursively walks a parsed JSON tree, replacing malformed values
/// under a known numeric-string field name with `"0"`. Leaves every
/// other field untouched; a field that isn't in [`NUMERIC_STRING_FIELDS`]
/// is someone else's problem (strict deserialization will reject it as
/// it should).
fn sanitize_numeric_strings(value: &mut Json) {
    match value {
        Json::Object(map) => {
            for (key, v) in map.iter_mut() {
                if NUMERIC_STRING_FIELDS.contains(&key.as_str()) {
                    if let Json::String(s) = v {
                        if !is_well_formed_numeric_string(s) {
                            *v = Json::String("0".to_string());
                        }
                    }
                }
                sanitize_numeric_strings(v);
            }
        }
        Json::Array(items) => {
            for item in items.iter_mut() {
                sanitize_numeric_strings(item);
            }
        }
        _ => {}
    }
}

fn parse_sanitized<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, DecodeError> {
    let mut value: Json = serde_json::from_slice(body)?;
    sanitize_numeric_strings(&mut value);
    Ok(serde_json::from_value(value)?)
}

pub fn append_traces_json(body: &[u8], app: &mut Appender) -> Result<(), DecodeError> {
    let req: ExportTraceServiceRequest = parse_sanitized(body)?;
    protobuf::append_traces(&req, app)
}

pub fn append_logs_json(body: &[u8], app: &mut Appender) -> Result<(), DecodeError> {
    let req: ExportLogsServiceRequest = parse_sanitized(body)?;
    protobuf::append_logs(&req, app)
}

pub fn append_metrics_json(body: &[u8], appenders: &mut MetricAppenders) -> Result<(), DecodeError> {
    let req: ExportMetricsServiceRequest = parse_sanitized(body)?;
    protobuf::append_metrics(&req, appenders)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_time_unix_nano_string_sanitizes_to_zero_instead_of_erroring() {
        let mut value: Json = serde_json::from_str(
            r#"{"timeUnixNano": "not-a-number", "nested": {"startTimeUnixNano": "garbage"}}"#,
        )
        .unwrap();
        sanitize_numeric_strings(&mut value);
        assert_eq!(value["timeUnixNano"], Json::String("0".to_string()));
        assert_eq!(value["nested"]["startTimeUnixNano"], Json::String("0".to_string()));
    }

    #[test]
    fn well_formed_numeric_strings_pass_through_unchanged() {
        let mut value: Json = serde_json::from_str(r#"{"timeUnixNano": "1700000000000000000"}"#).unwrap();
        sanitize_numeric_strings(&mut value);
        assert_eq!(value["timeUnixNano"], Json::String("1700000000000000000".to_string()));
    }

    #[test]
    fn minimal_trace_json_decodes_to_one_row() {
        use crate::buffer::RingBuffer;
        use crate::schema::TableKind;
        let body = br#"{
            "resourceSpans": [{
                "resource": {"attributes": [{"key": "service.name", "value": {"stringValue": "api"}}]},
                "scopeSpans": [{
                    "spans": [{
                        "traceId": "AQIDBAUGBwgJCgsMDQ4PEA==",
                        "spanId": "qqqqqqqqqqo=",
                        "name": "GET /",
                        "startTimeUnixNano": "1000000000",
                        "endTimeUnixNano": "2000000000"
                    }]
                }]
            }]
        }"#;
        let ring = RingBuffer::new(TableKind::Traces.schema(), 16);
        {
            let mut app = ring.appender();
            append_traces_json(body, &mut app).unwrap();
        }
        assert_eq!(ring.len(), 1);
    }
}
