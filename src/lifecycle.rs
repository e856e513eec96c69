//! `attach()`/`detach()`: the embedding API a host calls synchronously
//! to stand up (and tear down) one OTLP sink. Grounded on
//! `original_source`'s `otlp_storage_extension.cpp` (`AttachOptions`
//! parsing) and spec.md §3's ownership invariant: the receiver must
//! stop taking requests before the ring buffers it writes into go away.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::buffer::RingBuffer;
use crate::error::AttachError;
use crate::receiver::Receiver;
use crate::schema::TableKind;
use crate::tables::Tables;

const DEFAULT_PORT: u16 = 4317;
const DEFAULT_BUFFER_CAPACITY: usize = 10_000;

/// Parses an attach target of the shape `[otlp://]host[:port]`. `host`
/// must be a literal IP address or the `localhost` alias — no DNS
/// resolution happens here, since `attach()` is synchronous and a
/// blocking resolver call has no place on a hot embedding path.
fn parse_target(target: &str) -> Result<SocketAddr, AttachError> {
    let body = target.trim();
    let body = body.strip_prefix("otlp://").or_else(|| body.strip_prefix("otlp:")).unwrap_or(body);

    let (host, port) = if body.is_empty() {
        ("localhost".to_string(), DEFAULT_PORT.to_string())
    } else {
        match body.rsplit_once(':') {
            Some((h, p)) if !p.is_empty() => {
                let host = if h.is_empty() { "localhost" } else { h };
                (host.to_string(), p.to_string())
            }
            _ => (body.to_string(), DEFAULT_PORT.to_string()),
        }
    };
    let host = if host.eq_ignore_ascii_case("localhost") { "127.0.0.1".to_string() } else { host };

    format!("{host}:{port}").parse().map_err(|_| AttachError::InvalidHostPort(target.to_string()))
}

/// Reads the single recognized `buffer_size` option, matching
/// `otlp_storage_extension.cpp`'s behavior of ignoring any other key
/// rather than rejecting the attach call outright.
fn parse_buffer_size(options: &HashMap<String, String>) -> Result<usize, AttachError> {
    match options.get("buffer_size") {
        None => Ok(DEFAULT_BUFFER_CAPACITY),
        Some(raw) => raw
            .parse::<usize>()
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| AttachError::InvalidBufferSize(raw.clone())),
    }
}

/// One attach's worth of state: the seven ring buffers and the gRPC
/// receiver writing into them. `attach()` starts the receiver inline,
/// so a caller holding an `Ok(AttachHandle)` knows the listener is
/// already serving (spec.md §7: attach-time errors surface
/// synchronously, never discovered later).
pub struct AttachHandle {
    tables: Arc<Tables>,
    receiver: Receiver,
}

impl AttachHandle {
    pub fn attach(target: &str, options: &HashMap<String, String>) -> Result<Self, AttachError> {
        let addr = parse_target(target)?;
        let buffer_capacity = parse_buffer_size(options)?;
        let tables = Arc::new(Tables::new(buffer_capacity));
        let receiver = Receiver::new(addr, tables.clone());
        receiver.start()?;
        Ok(Self { tables, receiver })
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    pub fn table(&self, kind: TableKind) -> &RingBuffer {
        self.tables.get(kind)
    }

    /// The address the receiver actually bound to — resolves the
    /// requested port to its OS-assigned value when `:0` was used.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.receiver.local_addr()
    }

    /// Explicit teardown, equivalent to dropping the handle. Exists so
    /// a host can stop the receiver on its own schedule without also
    /// needing to juggle when the handle itself goes out of scope.
    pub fn detach(self) {}
}

impl Drop for AttachHandle {
    fn drop(&mut self) {
        // The receiver must stop taking requests before its ring
        // buffers go away — calling this explicitly here (rather than
        // relying on declaration-order field drop) makes that ordering
        // a property of this impl, not an accident of struct layout.
        self.receiver.stop();
    }
}
