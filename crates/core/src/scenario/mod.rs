//! Data-driven allocation scenarios
//!
//! A scenario is a [`Script`] of typed steps executed once per worker task.
//! Every allocate or free step is followed by one stats emission; the single
//! `AwaitTeardown` step parks the worker until the pool manager signals it.
//!
//! - [`script`]: step and script types, built-in scripts, validation
//! - [`cursor`]: one-way progress tracking through a script

pub mod cursor;
pub mod script;

pub use cursor::{Phase, ScenarioCursor};
pub use script::{Script, ScriptError, Step, MAX_BLOCKS, SINGLE_BLOCK, STANDARD};
