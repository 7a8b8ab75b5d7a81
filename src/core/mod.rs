//! Core harness functionality
//!
//! This module contains the runtime pieces of the harness that sit between
//! the pure state machines of `pico_heapscope_core` and the platform layer:
//! logging, the instrumented heap, the pool manager and the scenario worker.

pub mod harness;
pub mod heap;
pub mod logging;
pub mod scheduler;
pub mod traits;

pub use harness::Harness;
