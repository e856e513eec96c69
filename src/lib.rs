//! An embedded OTLP sink and query layer: gRPC ingest into a columnar
//! ring buffer per signal, with snapshot-consistent, zone-map-pruned
//! scans over the result. A host calls [`attach`] once to start a
//! receiver and get back the seven tables it fills; everything else —
//! a SQL planner, a catalog, transactions, file-based ingest — is the
//! host's problem, not this crate's.
//!
//! ```no_run
//! use std::collections::HashMap;
//! use otlp_embed::{attach, TableKind};
//!
//! let handle = attach("otlp://127.0.0.1:4317", &HashMap::new()).unwrap();
//! let traces = handle.table(TableKind::Traces);
//! println!("{} trace rows buffered", traces.len());
//! ```

pub mod buffer;
pub mod decode;
pub mod error;
pub mod lifecycle;
pub mod receiver;
pub mod scan;
pub mod schema;
pub mod tables;
pub mod union_scan;
pub mod value;

pub use error::{AttachError, DecodeError, ReceiverError};
pub use lifecycle::AttachHandle;
pub use receiver::{Receiver, ReceiverState};
pub use scan::{CompareOp, FilterValue, RecordBatch, RowFilter, ScanShard, Scanner};
pub use schema::{TableKind, TableSchema};
pub use tables::Tables;
pub use union_scan::UnionScanner;

/// Starts one OTLP receiver and returns the handle owning it plus the
/// seven tables it writes into. Equivalent to
/// `AttachHandle::attach(target, options)`, re-exported at the crate
/// root since it's the entire embedding surface a host needs.
pub fn attach(
    target: &str,
    options: &std::collections::HashMap<String, String>,
) -> Result<AttachHandle, AttachError> {
    AttachHandle::attach(target, options)
}
