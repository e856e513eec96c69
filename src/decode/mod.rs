//! OTLP wire decoding: protobuf bytes or JSON text in, table rows out.
//!
//! Both front ends parse into the same `opentelemetry-proto` request
//! types (JSON via that crate's `with-serde` feature) and then hand
//! off to the identical row builders in [`protobuf`], so a payload
//! expressed in either wire form produces byte-identical rows.

pub mod attributes;
pub mod json;
pub mod protobuf;

pub use protobuf::{validate_metrics, MetricAppenders};
