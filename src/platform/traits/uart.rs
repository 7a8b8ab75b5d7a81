//! UART interface trait
//!
//! The record stream is transmit-only, so only the write side is modelled.

use crate::platform::Result;

/// UART transmit interface
///
/// # Safety Invariants
///
/// - UART must be initialized before use
/// - Only one writer at a time (callers serialize through a mutex)
pub trait UartInterface {
    /// Write data to UART
    ///
    /// Returns the number of bytes accepted.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Uart(UartError::WriteFailed)` if the transfer fails.
    fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Block until every queued byte has left the transmitter
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Uart(UartError::Timeout)` if the FIFO does not drain.
    fn flush(&mut self) -> Result<()>;
}
