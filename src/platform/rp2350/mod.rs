//! RP2350 platform implementation for Raspberry Pi Pico 2 W
//!
//! Concrete implementations of the platform abstraction traits on top of
//! `embassy-rp`.
//!
//! # Feature Gate
//!
//! This module is only available when the `pico2_w` feature is enabled:
//!
//! ```toml
//! [dependencies]
//! pico_heapscope = { version = "0.1", default-features = false, features = ["pico2_w"] }
//! ```

mod gpio;
mod heap;
mod timer;
mod uart;

pub use gpio::{Rp2350Led, SioInputPin};
pub use heap::{Rp2350Heap, INSTRUMENTED_HEAP};
pub use timer::EmbassyOneShot;
pub use uart::Rp2350Uart;
