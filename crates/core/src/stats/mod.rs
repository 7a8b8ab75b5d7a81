//! Allocator statistics types
//!
//! - [`counters`]: running counters maintained by the timed allocation wrapper
//! - [`snapshot`]: point-in-time view of the external allocator
//! - [`record`]: the 14-field CSV record emitted after every operation

pub mod counters;
pub mod record;
pub mod snapshot;

pub use counters::AllocatorCounters;
pub use record::{RecordParseError, StatsRecord, FIELD_COUNT, MAX_LINE_LEN};
pub use snapshot::HeapSnapshot;
