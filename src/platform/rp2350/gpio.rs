//! RP2350 GPIO implementation
//!
//! Button pins are owned by their edge-detection task (which needs `&mut`
//! access to wait for edges), while the debounce expiry samples the level
//! from another context. [`SioInputPin`] reads the level straight from the
//! SIO input register, so both can coexist.

use embassy_rp::gpio::{Level, Output};
use embassy_rp::pac;

use crate::platform::{
    error::{GpioError, PlatformError},
    traits::{GpioInterface, GpioMode},
    Result,
};

/// Read-only view of a bank 0 input pin
#[derive(Debug, Clone, Copy)]
pub struct SioInputPin {
    pin: u8,
    mode: GpioMode,
}

impl SioInputPin {
    /// View of GPIO `pin` configured with `mode`
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Gpio(GpioError::InvalidPin)` for pins outside
    /// bank 0 and `GpioError::InvalidMode` for output modes.
    pub fn new(pin: u8, mode: GpioMode) -> Result<Self> {
        if pin >= 32 {
            return Err(PlatformError::Gpio(GpioError::InvalidPin));
        }
        if mode.is_output() {
            return Err(PlatformError::Gpio(GpioError::InvalidMode));
        }
        Ok(Self { pin, mode })
    }
}

impl GpioInterface for SioInputPin {
    fn set_high(&mut self) -> Result<()> {
        Err(PlatformError::Gpio(GpioError::InvalidMode))
    }

    fn set_low(&mut self) -> Result<()> {
        Err(PlatformError::Gpio(GpioError::InvalidMode))
    }

    fn toggle(&mut self) -> Result<()> {
        Err(PlatformError::Gpio(GpioError::InvalidMode))
    }

    fn read(&self) -> bool {
        pac::SIO.gpio_in(0).read() & (1 << self.pin) != 0
    }

    fn mode(&self) -> GpioMode {
        self.mode
    }
}

/// Output pin driving an LED
pub struct Rp2350Led {
    pin: Output<'static>,
}

impl Rp2350Led {
    /// Wrap an output pin
    pub fn new(pin: Output<'static>) -> Self {
        Self { pin }
    }
}

impl GpioInterface for Rp2350Led {
    fn set_high(&mut self) -> Result<()> {
        self.pin.set_level(Level::High);
        Ok(())
    }

    fn set_low(&mut self) -> Result<()> {
        self.pin.set_level(Level::Low);
        Ok(())
    }

    fn toggle(&mut self) -> Result<()> {
        self.pin.toggle();
        Ok(())
    }

    fn read(&self) -> bool {
        self.pin.is_set_high()
    }

    fn mode(&self) -> GpioMode {
        GpioMode::OutputPushPull
    }
}
