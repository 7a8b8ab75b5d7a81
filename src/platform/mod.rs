//! Platform abstraction layer
//!
//! Hardware access for the harness. Everything target-specific lives under
//! this module; the rest of the crate only sees the traits.

pub mod error;
pub mod traits;

// Platform implementations (feature-gated)
#[cfg(feature = "pico2_w")]
pub mod rp2350;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{PlatformError, Result};
pub use traits::{GpioInterface, HeapBlock, HeapInterface, OneShotTimer, UartInterface};
