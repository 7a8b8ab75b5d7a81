//! Mock UART implementation for testing

use std::string::String;
use std::vec::Vec;

use crate::platform::{
    error::{PlatformError, UartError},
    traits::UartInterface,
    Result,
};

/// Mock UART implementation
///
/// Captures transmitted bytes so tests can inspect the record stream.
///
/// # Example
///
/// ```
/// use pico_heapscope::platform::mock::MockUart;
/// use pico_heapscope::platform::traits::UartInterface;
///
/// let mut uart = MockUart::new();
/// uart.write(b"1,2\n3,4\n").unwrap();
/// assert_eq!(uart.lines(), vec!["1,2", "3,4"]);
/// ```
#[derive(Debug, Default)]
pub struct MockUart {
    tx_buffer: Vec<u8>,
    flushes: u32,
    fail_writes: bool,
}

impl MockUart {
    /// Create a new mock UART
    pub fn new() -> Self {
        Self::default()
    }

    /// Get transmitted data (for test verification)
    pub fn tx_buffer(&self) -> &[u8] {
        &self.tx_buffer
    }

    /// Transmitted data split into newline-terminated lines
    ///
    /// A trailing partial line is not returned.
    pub fn lines(&self) -> Vec<String> {
        let text = String::from_utf8_lossy(&self.tx_buffer);
        let complete = match text.rfind('\n') {
            Some(end) => &text[..end],
            None => return Vec::new(),
        };
        complete.split('\n').map(String::from).collect()
    }

    /// Number of flushes requested
    pub fn flushes(&self) -> u32 {
        self.flushes
    }

    /// Make subsequent writes fail
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl UartInterface for MockUart {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        if self.fail_writes {
            return Err(PlatformError::Uart(UartError::WriteFailed));
        }
        self.tx_buffer.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<()> {
        self.flushes += 1;
        Ok(())
    }
}
