//! Instrumented heap access
//!
//! - [`timed`]: allocate/free wrapper with shared counters
//! - [`recorder`]: record line writer with settle delay
//! - [`report`]: one-shot startup heap report

pub mod recorder;
pub mod report;
pub mod timed;

pub use recorder::StatsRecorder;
pub use report::log_startup_report;
pub use timed::{SharedCounters, TimedHeap, ALLOCATOR_COUNTERS};
