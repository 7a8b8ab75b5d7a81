//! Core traits for platform-agnostic harness functionality.
//!
//! The time abstraction itself lives in `pico_heapscope_core`; this module
//! re-exports it and adds the Embassy-backed implementation.
//!
//! # Features
//!
//! - **`embassy`**: Enables `EmbassyTime`
//! - `MockTime` is always available for host testing

#[cfg(feature = "embassy")]
pub mod time;

pub use pico_heapscope_core::traits::{MockTime, TimeSource};

#[cfg(feature = "embassy")]
pub use time::EmbassyTime;
