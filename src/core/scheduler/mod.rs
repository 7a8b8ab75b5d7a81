//! Scenario task scheduling
//!
//! - [`pool`]: slot arena, teardown notifications and the grow/shrink control loops
//! - [`scenario`]: the scripted allocate/free worker
//!
//! Task creation itself is delegated to a [`ScenarioSpawner`]: an Embassy
//! spawner on target, a `tokio` local spawner in host tests.

pub mod pool;
pub mod scenario;

pub use pool::{Notification, PoolManager, ScenarioSpawner, TaskHandle};
pub use scenario::{Progress, ScenarioTask};
