//! pico_heapscope_core - Pure no_std logic for the pico_heapscope harness
//!
//! This crate contains the platform-agnostic state machines and record types
//! of the allocator instrumentation harness. Everything here can be tested on
//! host without any feature flags or embassy dependencies.
//!
//! # Design Principles
//!
//! - **Zero cfg**: No `#[cfg(feature = ...)]` directives allowed
//! - **Pure no_std**: No std library dependencies
//! - **Trait abstractions**: Platform services injected via traits
//!
//! # Modules
//!
//! - [`config`]: Compile-time harness constants and task profiles
//! - [`debounce`]: Per-button debounce state machine
//! - [`error`]: Harness error taxonomy
//! - [`heap`]: First-fit block allocator with free-block introspection
//! - [`pool`]: Fixed-capacity LIFO task slot arena
//! - [`scenario`]: Data-driven allocate/free scripts and their cursor
//! - [`stats`]: Allocator counters, heap snapshots and the CSV stats record
//! - [`traits`]: Platform-agnostic trait abstractions (TimeSource)

#![no_std]

pub mod config;
pub mod debounce;
pub mod error;
pub mod heap;
pub mod pool;
pub mod scenario;
pub mod stats;
pub mod traits;

pub use error::HarnessError;
