//! Statistics recorder
//!
//! Formats a [`StatsRecord`] into a fixed-capacity line and writes it to the
//! record transport, then holds the caller for the settle delay. The
//! transport has no flow control; the delay is the only backpressure.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embedded_hal_async::delay::DelayNs;
use heapless::String;
use pico_heapscope_core::config::SETTLE_DELAY_MS;
use pico_heapscope_core::stats::{StatsRecord, MAX_LINE_LEN};

use crate::platform::traits::UartInterface;
use crate::platform::Result;

/// Record writer over an exclusively locked transport
pub struct StatsRecorder<U> {
    transport: Mutex<CriticalSectionRawMutex, U>,
    settle_ms: u32,
}

impl<U: UartInterface> StatsRecorder<U> {
    /// Recorder with the standard settle delay
    pub fn new(transport: U) -> Self {
        Self::with_settle_delay(transport, SETTLE_DELAY_MS)
    }

    /// Recorder with a custom settle delay in milliseconds
    pub fn with_settle_delay(transport: U, settle_ms: u32) -> Self {
        Self {
            transport: Mutex::new(transport),
            settle_ms,
        }
    }

    /// Settle delay applied after every emission
    pub fn settle_ms(&self) -> u32 {
        self.settle_ms
    }

    /// Write one record line, then wait out the settle delay
    ///
    /// A transport failure drops the line and is logged; the delay still
    /// applies so the caller's pacing does not change.
    pub async fn emit<D: DelayNs>(&self, record: &StatsRecord, delay: &mut D) {
        if let Err(e) = self.write_record(record).await {
            crate::log_warn!("Record dropped: {}", e);
        }
        delay.delay_ms(self.settle_ms).await;
    }

    async fn write_record(&self, record: &StatsRecord) -> Result<()> {
        let mut line: String<MAX_LINE_LEN> = String::new();
        // Capacity covers the widest possible record
        let _ = record.write_line(&mut line);

        let mut transport = self.transport.lock().await;
        transport.write(line.as_bytes())?;
        transport.flush()
    }

    /// Run `f` with exclusive access to the transport
    pub async fn with_transport<R>(&self, f: impl FnOnce(&mut U) -> R) -> R {
        let mut transport = self.transport.lock().await;
        f(&mut transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{MockDelay, MockUart};
    use pico_heapscope_core::stats::FIELD_COUNT;

    #[tokio::test]
    async fn test_emit_writes_one_line_and_settles() {
        let recorder = StatsRecorder::new(MockUart::new());
        let mut delay = MockDelay::new();
        let record = StatsRecord {
            timestamp_ms: 42,
            active_tasks: 1,
            ..Default::default()
        };

        recorder.emit(&record, &mut delay).await;

        let lines = recorder.with_transport(|uart| uart.lines()).await;
        assert_eq!(lines, vec!["42,0,0,0,0,0,0,0,1,0,0,0,0,0"]);
        assert_eq!(lines[0].split(',').count(), FIELD_COUNT);
        assert_eq!(delay.total_ms(), SETTLE_DELAY_MS as u64);
        assert_eq!(recorder.with_transport(|uart| uart.flushes()).await, 1);
    }

    #[tokio::test]
    async fn test_transport_failure_still_settles() {
        let mut uart = MockUart::new();
        uart.fail_writes(true);
        let recorder = StatsRecorder::with_settle_delay(uart, 7);
        let mut delay = MockDelay::new();

        recorder.emit(&StatsRecord::default(), &mut delay).await;

        assert!(recorder.with_transport(|uart| uart.tx_buffer().is_empty()).await);
        assert_eq!(delay.total_ms(), 7);
    }
}
