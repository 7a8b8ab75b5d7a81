//! Mock platform implementation for testing
//!
//! This module provides mock implementations of platform traits that can be used
//! for unit testing without requiring actual hardware.
//!
//! # Feature Gate
//!
//! This module is available in two contexts:
//! - During test builds (`#[cfg(test)]`)
//! - When the `mock` feature is enabled
//!
//! # Example
//!
//! ```
//! use pico_heapscope::platform::mock::MockHeap;
//! use pico_heapscope::platform::traits::HeapInterface;
//!
//! let heap = MockHeap::with_capacity(4096);
//! let block = heap.allocate(100).unwrap();
//! heap.free(block);
//! assert_eq!(heap.stats().successful_frees, 1);
//! ```

#![cfg(any(test, feature = "mock"))]

mod delay;
mod gpio;
mod heap;
mod timer;
mod uart;

pub use delay::MockDelay;
pub use gpio::MockGpio;
pub use heap::MockHeap;
pub use timer::MockOneShotTimer;
pub use uart::MockUart;
