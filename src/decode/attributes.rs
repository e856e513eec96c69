//! Attribute/AnyValue stringification, id hex-encoding, and the small
//! enum-to-string mappings (SpanKind, StatusCode) every row builder
//! needs. Grounded on the teacher's `utils/otlp.rs::any_value_to_string`
//! and the original engine's `ConvertAttributesToMap`/`SpanKindToString`.

use opentelemetry_proto::tonic::common::v1::{any_value::Value as AnyValueInner, AnyValue, KeyValue};
use opentelemetry_proto::tonic::trace::v1::span::SpanKind;
use opentelemetry_proto::tonic::trace::v1::status::StatusCode;

/// Stringifies one `AnyValue` the way every attribute bag in every
/// table renders its values: scalars print as their natural text form,
/// bytes as lowercase hex, and compound values (array/kvlist) as
/// JSON-shaped text built from the same stringification recursively.
pub fn any_value_to_string(value: &AnyValue) -> String {
    match &value.value {
        None => String::new(),
        Some(inner) => match inner {
            AnyValueInner::StringValue(s) => s.clone(),
            AnyValueInner::BoolValue(b) => b.to_string(),
            AnyValueInner::IntValue(i) => i.to_string(),
            AnyValueInner::DoubleValue(d) => d.to_string(),
            AnyValueInner::BytesValue(b) => hex::encode(b),
            AnyValueInner::ArrayValue(arr) => {
                let items: Vec<String> = arr
                    .values
                    .iter()
                    .map(|v| format!("{:?}", any_value_to_string(v)))
                    .collect();
                format!("[{}]", items.join(","))
            }
            AnyValueInner::KvlistValue(kv) => {
                let items: Vec<String> = kv
                    .values
                    .iter()
                    .map(|kv| format!("{:?}:{:?}", kv.key, any_value_to_string(kv.value.as_ref().unwrap_or(&AnyValue { value: None }))))
                    .collect();
                format!("{{{}}}", items.join(","))
            }
        },
    }
}

/// Builds the `MAP<VARCHAR,VARCHAR>` value for an attribute bag,
/// stringifying every value with `any_value_to_string` and skipping
/// keys whose value is entirely absent (an empty `AnyValue{}`, which
/// the wire format allows but which carries no information to store).
pub fn attributes_to_pairs(attrs: &[KeyValue]) -> Vec<(String, String)> {
    attrs
        .iter()
        .filter_map(|kv| {
            let value = kv.value.as_ref()?;
            Some((kv.key.clone(), any_value_to_string(value)))
        })
        .collect()
}

/// Scans resource attributes for `service.name`, defaulting to
/// `unknown_service` when absent — matching `ExtractServiceName`.
pub fn extract_service_name(attrs: &[KeyValue]) -> String {
    for kv in attrs {
        if kv.key == "service.name" {
            if let Some(AnyValue {
                value: Some(AnyValueInner::StringValue(s)),
            }) = &kv.value
            {
                return s.clone();
            }
        }
    }
    "unknown_service".to_string()
}

pub fn span_kind_to_string(kind: i32) -> &'static str {
    match SpanKind::try_from(kind).unwrap_or(SpanKind::Unspecified) {
        SpanKind::Unspecified => "SPAN_KIND_UNSPECIFIED",
        SpanKind::Internal => "SPAN_KIND_INTERNAL",
        SpanKind::Server => "SPAN_KIND_SERVER",
        SpanKind::Client => "SPAN_KIND_CLIENT",
        SpanKind::Producer => "SPAN_KIND_PRODUCER",
        SpanKind::Consumer => "SPAN_KIND_CONSUMER",
    }
}

pub fn status_code_to_string(code: i32) -> &'static str {
    match StatusCode::try_from(code).unwrap_or(StatusCode::Unset) {
        StatusCode::Unset => "STATUS_CODE_UNSET",
        StatusCode::Ok => "STATUS_CODE_OK",
        StatusCode::Error => "STATUS_CODE_ERROR",
    }
}

/// Hex-encodes a raw id field (TraceId/SpanId), matching the original
/// engine's `BytesToHex` with one interop allowance spec'd on top: some
/// exporters place the textual hex of an id into what is nominally a
/// raw-bytes field instead of actually encoding it. When the bytes are
/// themselves an even-length run of ASCII hex digits, that text IS the
/// id — re-hex-encoding it would double-encode, so it passes through
/// lowercased instead of through `hex::encode`.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return String::new();
    }
    if bytes.len() % 2 == 0 && bytes.iter().all(u8::is_ascii_hexdigit) {
        return String::from_utf8_lossy(bytes).to_ascii_lowercase();
    }
    hex::encode(bytes)
}

/// Renders the OTLP `AggregationTemporality` enum the way this crate's
/// `AggregationTemporality` columns store it: a human-readable label in
/// the same `ENUM_MEMBER_STYLE` as `SpanKind`/`StatusCode` rather than
/// the raw integer spec.md's table names — see DESIGN.md for why.
pub fn aggregation_temporality_to_string(value: i32) -> &'static str {
    match value {
        1 => "AGGREGATION_TEMPORALITY_DELTA",
        2 => "AGGREGATION_TEMPORALITY_CUMULATIVE",
        _ => "AGGREGATION_TEMPORALITY_UNSPECIFIED",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry_proto::tonic::common::v1::KeyValueList;

    fn scalar(v: AnyValueInner) -> AnyValue {
        AnyValue { value: Some(v) }
    }

    #[test]
    fn string_value_passes_through() {
        assert_eq!(
            any_value_to_string(&scalar(AnyValueInner::StringValue("hi".into()))),
            "hi"
        );
    }

    #[test]
    fn bool_and_numeric_values_stringify() {
        assert_eq!(any_value_to_string(&scalar(AnyValueInner::BoolValue(true))), "true");
        assert_eq!(any_value_to_string(&scalar(AnyValueInner::IntValue(42))), "42");
        assert_eq!(any_value_to_string(&scalar(AnyValueInner::DoubleValue(1.5))), "1.5");
    }

    #[test]
    fn bytes_render_as_lowercase_hex() {
        assert_eq!(
            any_value_to_string(&scalar(AnyValueInner::BytesValue(vec![0xde, 0xad]))),
            "dead"
        );
    }

    #[test]
    fn kvlist_renders_as_json_shaped_text() {
        let inner = scalar(AnyValueInner::KvlistValue(KeyValueList {
            values: vec![KeyValue {
                key: "retry".into(),
                value: Some(scalar(AnyValueInner::IntValue(3))),
            }],
        }));
        assert_eq!(any_value_to_string(&inner), "{\"retry\":\"3\"}");
    }

    #[test]
    fn missing_service_name_defaults() {
        assert_eq!(extract_service_name(&[]), "unknown_service");
    }

    #[test]
    fn hex_encodes_trace_ids() {
        assert_eq!(bytes_to_hex(&[0xab, 0xcd]), "abcd");
        assert_eq!(bytes_to_hex(&[]), "");
    }

    #[test]
    fn ascii_hex_bytes_pass_through_instead_of_double_encoding() {
        let ascii_hex = b"0102030405060708090a0b0c0d0e0f10";
        assert_eq!(ascii_hex.len(), 32);
        assert_eq!(bytes_to_hex(ascii_hex), "0102030405060708090a0b0c0d0e0f10");
    }

    #[test]
    fn uppercase_ascii_hex_bytes_are_lowercased_on_passthrough() {
        assert_eq!(bytes_to_hex(b"ABCD"), "abcd");
    }

    #[test]
    fn odd_length_ascii_hex_is_treated_as_real_bytes_not_passthrough() {
        // "abc" as raw bytes hex-encodes to 6 hex chars; it must not be
        // mistaken for an already-hex id just because its chars happen
        // to be hex digits.
        assert_eq!(bytes_to_hex(b"abc"), hex::encode(b"abc"));
    }

    #[test]
    fn aggregation_temporality_labels() {
        assert_eq!(aggregation_temporality_to_string(0), "AGGREGATION_TEMPORALITY_UNSPECIFIED");
        assert_eq!(aggregation_temporality_to_string(1), "AGGREGATION_TEMPORALITY_DELTA");
        assert_eq!(aggregation_temporality_to_string(2), "AGGREGATION_TEMPORALITY_CUMULATIVE");
        assert_eq!(aggregation_temporality_to_string(99), "AGGREGATION_TEMPORALITY_UNSPECIFIED");
    }

    #[test]
    fn span_kind_round_trips_known_values() {
        assert_eq!(span_kind_to_string(2), "SPAN_KIND_SERVER");
        assert_eq!(span_kind_to_string(99), "SPAN_KIND_UNSPECIFIED");
    }
}
