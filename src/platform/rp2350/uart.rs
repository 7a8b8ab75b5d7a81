//! RP2350 UART record transport
//!
//! Wraps `embassy_rp::uart::BufferedUart`. Writes block until the whole line
//! is queued, matching the blocking character output the record stream is
//! specified against.

use embassy_rp::uart::BufferedUart;
use embedded_io::Write;

use crate::platform::{
    error::{PlatformError, UartError},
    traits::UartInterface,
    Result,
};

/// Buffered UART used as the record stream
pub struct Rp2350Uart {
    uart: BufferedUart,
}

impl Rp2350Uart {
    /// Wrap an already configured UART
    pub fn new(uart: BufferedUart) -> Self {
        Self { uart }
    }
}

impl UartInterface for Rp2350Uart {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        self.uart
            .write_all(data)
            .map_err(|_| PlatformError::Uart(UartError::WriteFailed))?;
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<()> {
        self.uart
            .flush()
            .map_err(|_| PlatformError::Uart(UartError::Timeout))
    }
}
