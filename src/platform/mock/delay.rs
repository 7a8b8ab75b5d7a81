//! Mock async delay for testing

use embedded_hal_async::delay::DelayNs;

/// Mock delay
///
/// Does not sleep. Each delay records its duration and yields once to the
/// executor, so concurrently running tasks interleave at the same points as
/// on target.
#[derive(Debug, Default, Clone)]
pub struct MockDelay {
    total_ns: u64,
    calls: u32,
}

impl MockDelay {
    /// Create a delay with nothing recorded
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of all requested delays in milliseconds
    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }

    /// Number of delays requested
    pub fn calls(&self) -> u32 {
        self.calls
    }
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
        self.calls += 1;
        embassy_futures::yield_now().await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.total_ns += ms as u64 * 1_000_000;
        self.calls += 1;
        embassy_futures::yield_now().await;
    }
}
