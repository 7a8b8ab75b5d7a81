//! Heartbeat LED
//!
//! Liveness indicator: the LED is on for one period and off for the next,
//! forever. Runs at the lowest task priority so a stalled heartbeat means the
//! scheduler itself is starved.

use embedded_hal_async::delay::DelayNs;
use pico_heapscope_core::config::HEARTBEAT_PERIOD_MS;

use crate::platform::traits::GpioInterface;
use crate::platform::Result;

/// Heartbeat driver over an output pin
pub struct Heartbeat<P> {
    led: P,
    period_ms: u32,
}

impl<P: GpioInterface> Heartbeat<P> {
    /// Heartbeat with the standard period
    pub fn new(led: P) -> Self {
        Self::with_period(led, HEARTBEAT_PERIOD_MS)
    }

    /// Heartbeat with a custom half-period in milliseconds
    pub fn with_period(led: P, period_ms: u32) -> Self {
        Self { led, period_ms }
    }

    /// LED pin
    pub fn led(&self) -> &P {
        &self.led
    }

    /// One on/off cycle
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Gpio` if the pin cannot be driven.
    pub async fn cycle<D: DelayNs>(&mut self, delay: &mut D) -> Result<()> {
        self.led.set_high()?;
        delay.delay_ms(self.period_ms).await;
        self.led.set_low()?;
        delay.delay_ms(self.period_ms).await;
        Ok(())
    }

    /// Blink forever
    ///
    /// A pin error is logged once and ends the heartbeat.
    pub async fn run<D: DelayNs>(mut self, delay: &mut D) {
        loop {
            if let Err(e) = self.cycle(delay).await {
                crate::log_error!("Heartbeat stopped: {}", e);
                return;
            }
        }
    }
}
