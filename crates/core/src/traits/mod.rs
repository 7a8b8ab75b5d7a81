//! Core traits for platform-agnostic harness functionality.
//!
//! This module provides trait abstractions that decouple the harness logic
//! from platform-specific implementations (Embassy, etc.).
//!
//! # Design
//!
//! - Trait definitions are pure and have no feature gates
//! - Mock implementations are always available for host testing
//! - The Embassy implementation lives in `pico_heapscope` (`embassy` feature)

pub mod time;

pub use time::{MockTime, TimeSource};
