//! One-shot timer interface
//!
//! Debounce windows are measured by a single-shot timer that can be
//! (re)started from interrupt context. Restarting a running timer pushes its
//! expiry out by a full period.

use crate::platform::Result;

/// Restartable single-shot timer
///
/// The expiry itself is delivered by the implementation (an Embassy task on
/// RP2350, the test body on host); this trait only covers the control side.
pub trait OneShotTimer {
    /// Timer period in milliseconds
    fn period_ms(&self) -> u32;

    /// Start the timer, or restart it if already running
    ///
    /// Must not block; callable from interrupt context.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Timer(TimerError::CommandRejected)` if the
    /// restart could not be issued.
    fn restart(&self) -> Result<()>;
}
