//! Device drivers
//!
//! Drivers written against the platform abstraction traits.
//!
//! ## Modules
//!
//! - `button`: debounced push button feeding a control loop
//! - `led`: heartbeat LED

pub mod button;
pub mod led;

pub use button::ButtonDebouncer;
pub use led::Heartbeat;
