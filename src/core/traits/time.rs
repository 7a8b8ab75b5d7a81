//! Embassy implementation of [`TimeSource`].

use pico_heapscope_core::traits::TimeSource;

/// Time source backed by the Embassy time driver.
///
/// Zero-sized; every instance reads the same monotonic uptime counter.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyTime;

impl TimeSource for EmbassyTime {
    fn now_ms(&self) -> u64 {
        embassy_time::Instant::now().as_millis()
    }

    fn now_us(&self) -> u64 {
        embassy_time::Instant::now().as_micros()
    }
}
