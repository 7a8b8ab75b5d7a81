//! Platform abstraction traits
//!
//! This module defines the traits that platform implementations must provide.

pub mod gpio;
pub mod heap;
pub mod timer;
pub mod uart;

// Re-export trait interfaces
pub use gpio::{GpioInterface, GpioMode};
pub use heap::{HeapBlock, HeapInterface};
pub use timer::OneShotTimer;
pub use uart::UartInterface;
