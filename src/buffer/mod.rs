//! The columnar ring buffer: append-only storage with FIFO eviction,
//! zone-map pruning, and snapshot-consistent reads. See spec.md §4.2.

pub mod appender;
pub mod chunk;
pub mod ring;
pub mod zone_map;

pub use appender::Appender;
pub use ring::{RingBuffer, Snapshot, StoredChunk};
pub use zone_map::ZoneMap;
