//! Error types for the attach, receiver, and decode boundaries.
//!
//! Mirrors the error taxonomy of spec.md §7: attach-time configuration
//! errors are distinct from receiver startup/bind errors, which are
//! distinct from per-request decode errors. None of these are ever a
//! panic — a malformed OTLP payload surfaces as a `DecodeError`, turned
//! into a `tonic::Status` by the gRPC handlers.

use thiserror::Error;

/// Errors raised while parsing attach options or constructing the
/// columnar ring buffers backing a table set.
#[derive(Error, Debug)]
pub enum AttachError {
    #[error("invalid host:port in attach target: {0}")]
    InvalidHostPort(String),

    #[error("invalid buffer_size option: {0}")]
    InvalidBufferSize(String),

    #[error("receiver failed to start: {0}")]
    ReceiverStart(#[from] ReceiverError),
}

/// Errors raised by the OTLP gRPC receiver's lifecycle operations.
#[derive(Error, Debug)]
pub enum ReceiverError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("receiver did not report ready within the startup deadline")]
    StartupTimeout,

    #[error("receiver task ended unexpectedly: {0}")]
    TaskJoin(String),

    #[error("server transport error: {0}")]
    Transport(#[from] tonic::transport::Error),
}

impl ReceiverError {
    /// Whether retrying the same bind target could plausibly succeed.
    /// Bind failures on an address already in use are not transient
    /// from this process's perspective; everything else might clear up.
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::Bind { .. })
    }
}

/// Errors raised while decoding an incoming OTLP export request into
/// row data, whether the wire form was protobuf or JSON.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("malformed protobuf payload: {0}")]
    Protobuf(#[from] prost::DecodeError),

    #[error("malformed JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported or missing metric datapoint type for metric {metric_name:?}")]
    UnknownMetricType { metric_name: String },

    #[error("attribute value had no recognized variant")]
    EmptyAnyValue,

    #[error("hex id field {field} had odd length or invalid characters: {value}")]
    MalformedId { field: &'static str, value: String },
}

impl DecodeError {
    pub fn malformed_id(field: &'static str, value: impl Into<String>) -> Self {
        Self::MalformedId {
            field,
            value: value.into(),
        }
    }
}

impl From<DecodeError> for tonic::Status {
    fn from(e: DecodeError) -> Self {
        // spec.md §4.4/§7: decode failures surface as an internal-error
        // status, not an invalid-argument one — the request was well
        // formed gRPC, just not a row this buffer's schema can hold.
        tonic::Status::internal(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receiver_bind_error_is_not_transient() {
        let err = ReceiverError::Bind {
            addr: "127.0.0.1:4317".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use"),
        };
        assert!(!err.is_transient());
        assert!(err.to_string().contains("127.0.0.1:4317"));
    }

    #[test]
    fn startup_timeout_is_transient() {
        assert!(ReceiverError::StartupTimeout.is_transient());
    }

    #[test]
    fn decode_error_becomes_internal_status() {
        let err = DecodeError::EmptyAnyValue;
        let status: tonic::Status = err.into();
        assert_eq!(status.code(), tonic::Code::Internal);
    }

    #[test]
    fn malformed_id_message_includes_field_and_value() {
        let err = DecodeError::malformed_id("TraceId", "zz");
        assert!(err.to_string().contains("TraceId"));
        assert!(err.to_string().contains("zz"));
    }
}
