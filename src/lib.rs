#![cfg_attr(not(any(test, feature = "mock")), no_std)]

//! pico_heapscope - Heap allocator instrumentation harness for Raspberry Pi Pico 2 W
//!
//! Two debounced buttons grow and shrink a LIFO pool of scenario tasks. Each
//! task runs a scripted sequence of allocations and frees against an
//! instrumented heap, and every operation emits one CSV line of allocator
//! statistics on the record stream.

// Platform abstraction layer
pub mod platform;

// Device drivers using platform abstraction
pub mod devices;

// Harness runtime: timed heap, recorder, pool manager, scenario tasks
pub mod core;
