//! Mock GPIO implementation for testing

use core::sync::atomic::{AtomicBool, Ordering};

use crate::platform::{
    error::{GpioError, PlatformError},
    traits::{GpioInterface, GpioMode},
    Result,
};

/// Mock GPIO implementation
///
/// Tracks pin level and mode for test verification. The level is atomic so a
/// test can move a button line while the debouncer holds the pin.
#[derive(Debug)]
pub struct MockGpio {
    state: AtomicBool,
    mode: GpioMode,
    writes: u32,
}

impl MockGpio {
    /// Create a new mock GPIO in output mode
    pub fn new_output() -> Self {
        Self {
            state: AtomicBool::new(false),
            mode: GpioMode::OutputPushPull,
            writes: 0,
        }
    }

    /// Create a new mock button input (pulled down, so initially low)
    pub fn new_input() -> Self {
        Self {
            state: AtomicBool::new(false),
            mode: GpioMode::InputPullDown,
            writes: 0,
        }
    }

    /// Set the input level (for simulating a button line)
    pub fn set_input_state(&self, high: bool) {
        self.state.store(high, Ordering::SeqCst);
    }

    /// Number of successful level changes driven through the trait
    pub fn writes(&self) -> u32 {
        self.writes
    }

    fn drive(&mut self, level: impl FnOnce(bool) -> bool) -> Result<()> {
        if !self.mode.is_output() {
            return Err(PlatformError::Gpio(GpioError::InvalidMode));
        }
        let next = level(self.state.load(Ordering::SeqCst));
        self.state.store(next, Ordering::SeqCst);
        self.writes += 1;
        Ok(())
    }
}

impl GpioInterface for MockGpio {
    fn set_high(&mut self) -> Result<()> {
        self.drive(|_| true)
    }

    fn set_low(&mut self) -> Result<()> {
        self.drive(|_| false)
    }

    fn toggle(&mut self) -> Result<()> {
        self.drive(|level| !level)
    }

    fn read(&self) -> bool {
        self.state.load(Ordering::SeqCst)
    }

    fn mode(&self) -> GpioMode {
        self.mode
    }
}
