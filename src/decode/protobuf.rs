//! Row-building from the wire-decoded OTLP message tree (spec.md
//! §4.3). These functions are the single source of truth for turning
//! `resource -> scope -> signal -> datapoint` nesting into rows; the
//! JSON front end ([`super::json`]) parses into these exact same
//! `opentelemetry-proto` types and then calls straight back into this
//! module, so both front ends are guaranteed to produce identical rows
//! for identical data rather than maintaining two parallel row
//! builders (original engine's `protobuf_parser.cpp`/`json_parser.cpp`
//! duplicate this logic; `opentelemetry-proto`'s `with-serde` feature
//! lets this crate avoid that duplication).

use opentelemetry_proto::tonic::collector::logs::v1::ExportLogsServiceRequest;
use opentelemetry_proto::tonic::collector::metrics::v1::ExportMetricsServiceRequest;
use opentelemetry_proto::tonic::collector::trace::v1::ExportTraceServiceRequest;
use opentelemetry_proto::tonic::common::v1::{InstrumentationScope, KeyValue};
use opentelemetry_proto::tonic::metrics::v1::{metric::Data as MetricData, number_data_point::Value as NumberValue};
use opentelemetry_proto::tonic::resource::v1::Resource;

use crate::buffer::Appender;
use crate::error::DecodeError;
use crate::schema::metrics::{exp_histogram_col, gauge_col, histogram_col, summary_col, sum_col};
use crate::schema::traces::col as trace_col;
use crate::schema::{logs::col as log_col, TableKind};
use crate::value::{clamp_unix_nano_to_i64, duration_ns, Value};

use super::attributes::{
    aggregation_temporality_to_string, any_value_to_string, attributes_to_pairs, bytes_to_hex,
    extract_service_name, span_kind_to_string, status_code_to_string,
};

fn resource_fields(resource: Option<&Resource>) -> (String, Vec<(String, String)>) {
    match resource {
        Some(r) => (extract_service_name(&r.attributes), attributes_to_pairs(&r.attributes)),
        None => ("unknown_service".to_string(), Vec::new()),
    }
}

fn scope_fields(scope: Option<&InstrumentationScope>) -> (&str, &str, &[KeyValue]) {
    match scope {
        Some(s) => (s.name.as_str(), s.version.as_str(), &s.attributes),
        None => ("", "", &[]),
    }
}

/// Decodes one `ExportTraceServiceRequest` into `otel_traces` rows,
/// appending each span as it is visited. The whole request is drained
/// before `app` (and the writer lock it holds) is released, so a
/// decode error partway through still leaves no rows committed: the
/// caller must only construct `app` once this function is known to
/// succeed, or accept that earlier spans in the same request are
/// already visible (spec.md §4.3 "Idempotence/ordering" — a request's
/// own rows are always contiguous, never interleaved with another).
pub fn append_traces(req: &ExportTraceServiceRequest, app: &mut Appender) -> Result<(), DecodeError> {
    for rs in &req.resource_spans {
        let (service_name, resource_attrs) = resource_fields(rs.resource.as_ref());
        for ss in &rs.scope_spans {
            let (scope_name, scope_version, _) = scope_fields(ss.scope.as_ref());
            for span in &ss.spans {
                app.begin_row();
                app.set_timestamp_ns(trace_col::TIMESTAMP, clamp_unix_nano_to_i64(span.start_time_unix_nano));
                app.set_varchar(trace_col::TRACE_ID, bytes_to_hex(&span.trace_id));
                app.set_varchar(trace_col::SPAN_ID, bytes_to_hex(&span.span_id));
                app.set_varchar(trace_col::PARENT_SPAN_ID, bytes_to_hex(&span.parent_span_id));
                app.set_varchar(trace_col::TRACE_STATE, span.trace_state.clone());
                app.set_varchar(trace_col::SPAN_NAME, span.name.clone());
                app.set_varchar(trace_col::SPAN_KIND, span_kind_to_string(span.kind));
                app.set_varchar(trace_col::SERVICE_NAME, service_name.clone());
                app.set_value(trace_col::RESOURCE_ATTRIBUTES, Value::Map(resource_attrs.clone()));
                app.set_varchar(trace_col::SCOPE_NAME, scope_name);
                app.set_varchar(trace_col::SCOPE_VERSION, scope_version);
                app.set_value(trace_col::SPAN_ATTRIBUTES, Value::Map(attributes_to_pairs(&span.attributes)));
                app.set_bigint(
                    trace_col::DURATION,
                    duration_ns(span.start_time_unix_nano, span.end_time_unix_nano),
                );
                let (status_code, status_message) = match &span.status {
                    Some(status) => (status_code_to_string(status.code), status.message.clone()),
                    None => (status_code_to_string(0), String::new()),
                };
                app.set_varchar(trace_col::STATUS_CODE, status_code);
                app.set_varchar(trace_col::STATUS_MESSAGE, status_message);

                let mut event_ts = Vec::with_capacity(span.events.len());
                let mut event_names = Vec::with_capacity(span.events.len());
                let mut event_attrs = Vec::with_capacity(span.events.len());
                for event in &span.events {
                    event_ts.push(Value::Timestamp(crate::value::nanos_to_micros(
                        clamp_unix_nano_to_i64(event.time_unix_nano),
                        true,
                    )));
                    event_names.push(Value::Varchar(event.name.clone()));
                    event_attrs.push(Value::Map(attributes_to_pairs(&event.attributes)));
                }
                app.set_value(trace_col::EVENTS_TIMESTAMP, Value::List(event_ts));
                app.set_value(trace_col::EVENTS_NAME, Value::List(event_names));
                app.set_value(trace_col::EVENTS_ATTRIBUTES, Value::List(event_attrs));

                let mut link_trace_ids = Vec::with_capacity(span.links.len());
                let mut link_span_ids = Vec::with_capacity(span.links.len());
                let mut link_trace_states = Vec::with_capacity(span.links.len());
                let mut link_attrs = Vec::with_capacity(span.links.len());
                for link in &span.links {
                    link_trace_ids.push(Value::Varchar(bytes_to_hex(&link.trace_id)));
                    link_span_ids.push(Value::Varchar(bytes_to_hex(&link.span_id)));
                    link_trace_states.push(Value::Varchar(link.trace_state.clone()));
                    link_attrs.push(Value::Map(attributes_to_pairs(&link.attributes)));
                }
                app.set_value(trace_col::LINKS_TRACE_ID, Value::List(link_trace_ids));
                app.set_value(trace_col::LINKS_SPAN_ID, Value::List(link_span_ids));
                app.set_value(trace_col::LINKS_TRACE_STATE, Value::List(link_trace_states));
                app.set_value(trace_col::LINKS_ATTRIBUTES, Value::List(link_attrs));

                app.commit_row();
            }
        }
    }
    Ok(())
}

/// Decodes one `ExportLogsServiceRequest` into `otel_logs` rows.
pub fn append_logs(req: &ExportLogsServiceRequest, app: &mut Appender) -> Result<(), DecodeError> {
    for rl in &req.resource_logs {
        let (service_name, resource_attrs) = resource_fields(rl.resource.as_ref());
        for sl in &rl.scope_logs {
            let (scope_name, scope_version, scope_attrs) = scope_fields(sl.scope.as_ref());
            let scope_attrs = attributes_to_pairs(scope_attrs);
            for record in &sl.log_records {
                app.begin_row();
                app.set_timestamp_ns(log_col::TIMESTAMP, clamp_unix_nano_to_i64(record.time_unix_nano));
                app.set_varchar(log_col::TRACE_ID, bytes_to_hex(&record.trace_id));
                app.set_varchar(log_col::SPAN_ID, bytes_to_hex(&record.span_id));
                app.set_uinteger(log_col::TRACE_FLAGS, record.flags);
                app.set_varchar(log_col::SEVERITY_TEXT, record.severity_text.clone());
                app.set_integer(log_col::SEVERITY_NUMBER, record.severity_number);
                app.set_varchar(log_col::SERVICE_NAME, service_name.clone());
                let body = record.body.as_ref().map(any_value_to_string).unwrap_or_default();
                app.set_varchar(log_col::BODY, body);
                app.set_varchar(log_col::RESOURCE_SCHEMA_URL, rl.schema_url.clone());
                app.set_value(log_col::RESOURCE_ATTRIBUTES, Value::Map(resource_attrs.clone()));
                app.set_varchar(log_col::SCOPE_SCHEMA_URL, sl.schema_url.clone());
                app.set_varchar(log_col::SCOPE_NAME, scope_name);
                app.set_varchar(log_col::SCOPE_VERSION, scope_version);
                app.set_value(log_col::SCOPE_ATTRIBUTES, Value::Map(scope_attrs.clone()));
                app.set_value(log_col::LOG_ATTRIBUTES, Value::Map(attributes_to_pairs(&record.attributes)));
                app.commit_row();
            }
        }
    }
    Ok(())
}

/// Lazily-opened writer handles onto the five metrics ring buffers: a
/// single metrics export request may carry datapoints for any subset
/// of {gauge, sum, histogram, exponential histogram, summary}, and
/// each Appender should only be constructed (taking that table's
/// writer lock) the first time a datapoint of its kind is actually
/// seen, not unconditionally for all five.
pub struct MetricAppenders<'a> {
    tables: &'a crate::tables::Tables,
    open: [Option<Appender<'a>>; 5],
}

impl<'a> MetricAppenders<'a> {
    pub fn new(tables: &'a crate::tables::Tables) -> Self {
        Self {
            tables,
            open: [None, None, None, None, None],
        }
    }

    fn slot(&mut self, kind: TableKind) -> &mut Appender<'a> {
        let idx = match kind {
            TableKind::MetricsGauge => 0,
            TableKind::MetricsSum => 1,
            TableKind::MetricsHistogram => 2,
            TableKind::MetricsExpHistogram => 3,
            TableKind::MetricsSummary => 4,
            TableKind::Traces | TableKind::Logs => unreachable!("not a metrics table"),
        };
        let tables = self.tables;
        self.open[idx].get_or_insert_with(|| tables.get(kind).appender())
    }
}

struct MetricContext<'a> {
    service_name: &'a str,
    resource_attrs: &'a [(String, String)],
    scope_name: &'a str,
    scope_version: &'a str,
    metric_name: &'a str,
    metric_description: &'a str,
    metric_unit: &'a str,
}

fn set_base_metric_columns(app: &mut Appender, ts_nanos: u64, ctx: &MetricContext) {
    use crate::schema::metrics::base_col;
    app.set_timestamp_ns(base_col::TIMESTAMP, clamp_unix_nano_to_i64(ts_nanos));
    app.set_varchar(base_col::SERVICE_NAME, ctx.service_name);
    app.set_varchar(base_col::METRIC_NAME, ctx.metric_name);
    app.set_varchar(base_col::METRIC_DESCRIPTION, ctx.metric_description);
    app.set_varchar(base_col::METRIC_UNIT, ctx.metric_unit);
    app.set_value(base_col::RESOURCE_ATTRIBUTES, Value::Map(ctx.resource_attrs.to_vec()));
    app.set_varchar(base_col::SCOPE_NAME, ctx.scope_name);
    app.set_varchar(base_col::SCOPE_VERSION, ctx.scope_version);
}

fn number_value(value: &Option<NumberValue>, metric_name: &str) -> Result<f64, DecodeError> {
    match value {
        Some(NumberValue::AsDouble(d)) => Ok(*d),
        Some(NumberValue::AsInt(i)) => Ok(*i as f64),
        None => Err(DecodeError::UnknownMetricType {
            metric_name: metric_name.to_string(),
        }),
    }
}

fn ubigint_list(values: &[u64]) -> Value {
    Value::List(values.iter().map(|v| Value::UBigint(*v)).collect())
}

fn double_list(values: &[f64]) -> Value {
    Value::List(values.iter().map(|v| Value::Double(*v)).collect())
}

/// Walks the same tree `append_metrics` does, checking only for the
/// conditions that function can fail on (a gauge/sum datapoint with
/// neither `as_double` nor `as_int` set, or a metric with no `data` set
/// at all) without opening any appender. There is no rollback for a
/// partially-committed request — an Appender holds its writer lock for
/// the request's whole row sequence and has already mutated the ring
/// buffer by the time `commit_row` returns — so the receiver must call
/// this and return the error to the caller before constructing any
/// `MetricAppenders` at all.
pub fn validate_metrics(req: &ExportMetricsServiceRequest) -> Result<(), DecodeError> {
    for rm in &req.resource_metrics {
        for sm in &rm.scope_metrics {
            for metric in &sm.metrics {
                match &metric.data {
                    Some(MetricData::Gauge(gauge)) => {
                        for dp in &gauge.data_points {
                            number_value(&dp.value, &metric.name)?;
                        }
                    }
                    Some(MetricData::Sum(sum)) => {
                        for dp in &sum.data_points {
                            number_value(&dp.value, &metric.name)?;
                        }
                    }
                    Some(
                        MetricData::Histogram(_) | MetricData::ExponentialHistogram(_) | MetricData::Summary(_),
                    ) => {}
                    None => {
                        return Err(DecodeError::UnknownMetricType {
                            metric_name: metric.name.clone(),
                        })
                    }
                }
            }
        }
    }
    Ok(())
}

/// Decodes one `ExportMetricsServiceRequest`, dispatching each
/// datapoint to its matching one of the five metrics ring buffers by
/// the OTLP `metric.data` discriminator (spec.md §4.3 "Dispatch").
/// Callers must run [`validate_metrics`] first and propagate its error
/// without calling this function — see that function's doc comment.
pub fn append_metrics(req: &ExportMetricsServiceRequest, appenders: &mut MetricAppenders) -> Result<(), DecodeError> {
    for rm in &req.resource_metrics {
        let (service_name, resource_attrs) = resource_fields(rm.resource.as_ref());
        for sm in &rm.scope_metrics {
            let (scope_name, scope_version, _) = scope_fields(sm.scope.as_ref());
            for metric in &sm.metrics {
                let ctx = MetricContext {
                    service_name: &service_name,
                    resource_attrs: &resource_attrs,
                    scope_name,
                    scope_version,
                    metric_name: &metric.name,
                    metric_description: &metric.description,
                    metric_unit: &metric.unit,
                };
                match &metric.data {
                    Some(MetricData::Gauge(gauge)) => {
                        for dp in &gauge.data_points {
                            let value = number_value(&dp.value, &metric.name)?;
                            let app = appenders.slot(TableKind::MetricsGauge);
                            app.begin_row();
                            set_base_metric_columns(app, dp.time_unix_nano, &ctx);
                            app.set_value(
                                crate::schema::metrics::base_col::ATTRIBUTES,
                                Value::Map(attributes_to_pairs(&dp.attributes)),
                            );
                            app.set_double(gauge_col::VALUE, value);
                            app.set_uinteger(gauge_col::FLAGS, dp.flags);
                            app.commit_row();
                        }
                    }
                    Some(MetricData::Sum(sum)) => {
                        for dp in &sum.data_points {
                            let value = number_value(&dp.value, &metric.name)?;
                            let app = appenders.slot(TableKind::MetricsSum);
                            app.begin_row();
                            set_base_metric_columns(app, dp.time_unix_nano, &ctx);
                            app.set_value(
                                crate::schema::metrics::base_col::ATTRIBUTES,
                                Value::Map(attributes_to_pairs(&dp.attributes)),
                            );
                            app.set_double(sum_col::VALUE, value);
                            app.set_uinteger(sum_col::FLAGS, dp.flags);
                            app.set_varchar(
                                sum_col::AGGREGATION_TEMPORALITY,
                                aggregation_temporality_to_string(sum.aggregation_temporality),
                            );
                            app.set_boolean(sum_col::IS_MONOTONIC, sum.is_monotonic);
                            app.commit_row();
                        }
                    }
                    Some(MetricData::Histogram(hist)) => {
                        for dp in &hist.data_points {
                            let app = appenders.slot(TableKind::MetricsHistogram);
                            app.begin_row();
                            set_base_metric_columns(app, dp.time_unix_nano, &ctx);
                            app.set_value(
                                crate::schema::metrics::base_col::ATTRIBUTES,
                                Value::Map(attributes_to_pairs(&dp.attributes)),
                            );
                            app.set_ubigint(histogram_col::COUNT, dp.count);
                            match dp.sum {
                                Some(sum) => app.set_double(histogram_col::SUM, sum),
                                None => app.set_null(histogram_col::SUM),
                            }
                            app.set_value(histogram_col::BUCKET_COUNTS, ubigint_list(&dp.bucket_counts));
                            app.set_value(histogram_col::EXPLICIT_BOUNDS, double_list(&dp.explicit_bounds));
                            match dp.min {
                                Some(min) => app.set_double(histogram_col::MIN, min),
                                None => app.set_null(histogram_col::MIN),
                            }
                            match dp.max {
                                Some(max) => app.set_double(histogram_col::MAX, max),
                                None => app.set_null(histogram_col::MAX),
                            }
                            app.set_varchar(
                                histogram_col::AGGREGATION_TEMPORALITY,
                                aggregation_temporality_to_string(hist.aggregation_temporality),
                            );
                            app.set_uinteger(histogram_col::FLAGS, dp.flags);
                            app.commit_row();
                        }
                    }
                    Some(MetricData::ExponentialHistogram(exp)) => {
                        for dp in &exp.data_points {
                            let app = appenders.slot(TableKind::MetricsExpHistogram);
                            app.begin_row();
                            set_base_metric_columns(app, dp.time_unix_nano, &ctx);
                            app.set_value(
                                crate::schema::metrics::base_col::ATTRIBUTES,
                                Value::Map(attributes_to_pairs(&dp.attributes)),
                            );
                            app.set_ubigint(exp_histogram_col::COUNT, dp.count);
                            match dp.sum {
                                Some(sum) => app.set_double(exp_histogram_col::SUM, sum),
                                None => app.set_null(exp_histogram_col::SUM),
                            }
                            app.set_integer(exp_histogram_col::SCALE, dp.scale);
                            app.set_ubigint(exp_histogram_col::ZERO_COUNT, dp.zero_count);
                            // Open Question (spec.md §9 / SPEC_FULL §9.3): when `positive`/
                            // `negative` are absent, emit offset 0 and an empty bucket list.
                            match &dp.positive {
                                Some(b) => {
                                    app.set_integer(exp_histogram_col::POSITIVE_OFFSET, b.offset);
                                    app.set_value(exp_histogram_col::POSITIVE_BUCKET_COUNTS, ubigint_list(&b.bucket_counts));
                                }
                                None => {
                                    app.set_integer(exp_histogram_col::POSITIVE_OFFSET, 0);
                                    app.set_value(exp_histogram_col::POSITIVE_BUCKET_COUNTS, Value::List(Vec::new()));
                                }
                            }
                            match &dp.negative {
                                Some(b) => {
                                    app.set_integer(exp_histogram_col::NEGATIVE_OFFSET, b.offset);
                                    app.set_value(exp_histogram_col::NEGATIVE_BUCKET_COUNTS, ubigint_list(&b.bucket_counts));
                                }
                                None => {
                                    app.set_integer(exp_histogram_col::NEGATIVE_OFFSET, 0);
                                    app.set_value(exp_histogram_col::NEGATIVE_BUCKET_COUNTS, Value::List(Vec::new()));
                                }
                            }
                            match dp.min {
                                Some(min) => app.set_double(exp_histogram_col::MIN, min),
                                None => app.set_null(exp_histogram_col::MIN),
                            }
                            match dp.max {
                                Some(max) => app.set_double(exp_histogram_col::MAX, max),
                                None => app.set_null(exp_histogram_col::MAX),
                            }
                            app.set_varchar(
                                exp_histogram_col::AGGREGATION_TEMPORALITY,
                                aggregation_temporality_to_string(exp.aggregation_temporality),
                            );
                            app.set_uinteger(exp_histogram_col::FLAGS, dp.flags);
                            app.commit_row();
                        }
                    }
                    Some(MetricData::Summary(summary)) => {
                        for dp in &summary.data_points {
                            let app = appenders.slot(TableKind::MetricsSummary);
                            app.begin_row();
                            set_base_metric_columns(app, dp.time_unix_nano, &ctx);
                            app.set_value(
                                crate::schema::metrics::base_col::ATTRIBUTES,
                                Value::Map(attributes_to_pairs(&dp.attributes)),
                            );
                            app.set_ubigint(summary_col::COUNT, dp.count);
                            app.set_double(summary_col::SUM, dp.sum);
                            let quantiles: Vec<f64> = dp.quantile_values.iter().map(|q| q.quantile).collect();
                            let values: Vec<f64> = dp.quantile_values.iter().map(|q| q.value).collect();
                            app.set_value(summary_col::QUANTILE_QUANTILES, double_list(&quantiles));
                            app.set_value(summary_col::QUANTILE_VALUES, double_list(&values));
                            app.set_uinteger(summary_col::FLAGS, dp.flags);
                            app.commit_row();
                        }
                    }
                    None => {
                        return Err(DecodeError::UnknownMetricType {
                            metric_name: metric.name.clone(),
                        })
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::RingBuffer;
    use opentelemetry_proto::tonic::common::v1::any_value::Value as AnyValueInner;
    use opentelemetry_proto::tonic::common::v1::AnyValue;
    use opentelemetry_proto::tonic::resource::v1::Resource;
    use opentelemetry_proto::tonic::trace::v1::{ResourceSpans, ScopeSpans, Span};

    fn service_name_kv(name: &str) -> KeyValue {
        KeyValue {
            key: "service.name".to_string(),
            value: Some(AnyValue {
                value: Some(AnyValueInner::StringValue(name.to_string())),
            }),
        }
    }

    #[test]
    fn one_span_becomes_one_row_with_clamped_duration_and_hex_ids() {
        let req = ExportTraceServiceRequest {
            resource_spans: vec![ResourceSpans {
                resource: Some(Resource {
                    attributes: vec![service_name_kv("api")],
                    dropped_attributes_count: 0,
                }),
                scope_spans: vec![ScopeSpans {
                    scope: None,
                    spans: vec![Span {
                        trace_id: vec![0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f, 0x10],
                        span_id: vec![0xaa; 8],
                        start_time_unix_nano: 1_000_000_000,
                        end_time_unix_nano: 2_000_000_000,
                        name: "GET /".to_string(),
                        ..Default::default()
                    }],
                    schema_url: String::new(),
                }],
                schema_url: String::new(),
            }],
        };
        let ring = RingBuffer::new(TableKind::Traces.schema(), 16);
        {
            let mut app = ring.appender();
            append_traces(&req, &mut app).unwrap();
        }
        let snap = ring.snapshot();
        assert_eq!(snap.len(), 1);
        let chunk = &snap[0].chunk;
        assert_eq!(chunk.row_count, 1);
        assert_eq!(chunk.column(trace_col::TRACE_ID)[0].as_varchar(), Some("0102030405060708090a0b0c0d0e0f10"));
        assert_eq!(chunk.column(trace_col::SERVICE_NAME)[0].as_varchar(), Some("api"));
        assert_eq!(chunk.column(trace_col::DURATION)[0], Value::Bigint(1_000_000_000));
        assert_eq!(chunk.column(trace_col::TIMESTAMP)[0], Value::Timestamp(1_000_000));
    }

    #[test]
    fn missing_numeric_gauge_value_is_a_decode_error() {
        use opentelemetry_proto::tonic::metrics::v1::{Gauge, Metric, NumberDataPoint, ResourceMetrics, ScopeMetrics};
        let req = ExportMetricsServiceRequest {
            resource_metrics: vec![ResourceMetrics {
                resource: None,
                scope_metrics: vec![ScopeMetrics {
                    scope: None,
                    metrics: vec![Metric {
                        name: "cpu".to_string(),
                        data: Some(MetricData::Gauge(Gauge {
                            data_points: vec![NumberDataPoint {
                                value: None,
                                ..Default::default()
                            }],
                        })),
                        ..Default::default()
                    }],
                    schema_url: String::new(),
                }],
                schema_url: String::new(),
            }],
        };
        let tables = crate::tables::Tables::new(16);
        let mut appenders = MetricAppenders::new(&tables);
        let err = append_metrics(&req, &mut appenders).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownMetricType { .. }));
    }

    #[test]
    fn validate_metrics_catches_missing_gauge_value_before_any_appender_opens() {
        use opentelemetry_proto::tonic::metrics::v1::{Gauge, Metric, NumberDataPoint, ResourceMetrics, ScopeMetrics};
        let req = ExportMetricsServiceRequest {
            resource_metrics: vec![ResourceMetrics {
                resource: None,
                scope_metrics: vec![ScopeMetrics {
                    scope: None,
                    metrics: vec![Metric {
                        name: "cpu".to_string(),
                        data: Some(MetricData::Gauge(Gauge {
                            data_points: vec![NumberDataPoint { value: None, ..Default::default() }],
                        })),
                        ..Default::default()
                    }],
                    schema_url: String::new(),
                }],
                schema_url: String::new(),
            }],
        };
        assert!(matches!(validate_metrics(&req), Err(DecodeError::UnknownMetricType { .. })));
    }

    #[test]
    fn validate_metrics_accepts_a_well_formed_mixed_request() {
        use opentelemetry_proto::tonic::metrics::v1::{
            Gauge, Histogram, HistogramDataPoint, Metric, NumberDataPoint, ResourceMetrics, ScopeMetrics,
        };
        let req = ExportMetricsServiceRequest {
            resource_metrics: vec![ResourceMetrics {
                resource: None,
                scope_metrics: vec![ScopeMetrics {
                    scope: None,
                    metrics: vec![
                        Metric {
                            name: "cpu".to_string(),
                            data: Some(MetricData::Gauge(Gauge {
                                data_points: vec![NumberDataPoint {
                                    value: Some(NumberValue::AsDouble(1.0)),
                                    ..Default::default()
                                }],
                            })),
                            ..Default::default()
                        },
                        Metric {
                            name: "latency".to_string(),
                            data: Some(MetricData::Histogram(Histogram {
                                data_points: vec![HistogramDataPoint::default()],
                                aggregation_temporality: 0,
                            })),
                            ..Default::default()
                        },
                    ],
                    schema_url: String::new(),
                }],
                schema_url: String::new(),
            }],
        };
        assert!(validate_metrics(&req).is_ok());
        let tables = crate::tables::Tables::new(16);
        let mut appenders = MetricAppenders::new(&tables);
        assert!(append_metrics(&req, &mut appenders).is_ok());
    }
}
