//! Time abstraction traits for platform-agnostic timing operations.
//!
//! This module provides the `TimeSource` trait that abstracts over different
//! time providers (Embassy, mock, etc.) so that allocation timing and record
//! timestamps can be tested on host without embedded dependencies.

use core::cell::Cell;

/// Platform-agnostic monotonic time source.
///
/// This trait abstracts over different time providers:
/// - `EmbassyTime` (`pico_heapscope`, `embassy` feature) for embedded targets
/// - `MockTime` for host testing with controllable time
///
/// # Example
///
/// ```
/// use pico_heapscope_core::traits::{TimeSource, MockTime};
///
/// fn measure<T: TimeSource>(time: &T, work: impl FnOnce()) -> u64 {
///     let start = time.now_us();
///     work();
///     time.elapsed_since(start)
/// }
///
/// let time = MockTime::with_step(3);
/// assert_eq!(measure(&time, || {}), 3);
/// ```
pub trait TimeSource: Clone + Send + Sync {
    /// Returns current time in milliseconds since system start.
    fn now_ms(&self) -> u64;

    /// Returns current time in microseconds since system start.
    fn now_us(&self) -> u64;

    /// Returns elapsed time in microseconds since a reference point.
    ///
    /// Uses saturating subtraction to handle potential overflow.
    fn elapsed_since(&self, reference_us: u64) -> u64 {
        self.now_us().saturating_sub(reference_us)
    }
}

// ============================================================================
// Mock Implementation (always available for testing)
// ============================================================================

/// Mock time source for testing with controllable time advancement.
///
/// Every call to [`TimeSource::now_us`] advances the clock by `step_us`
/// after reading it, which lets tests observe non-zero durations around
/// otherwise instantaneous mock operations.
///
/// # Example
///
/// ```
/// use pico_heapscope_core::traits::{MockTime, TimeSource};
///
/// let time = MockTime::new();
/// assert_eq!(time.now_us(), 0);
///
/// time.advance(1000); // Advance 1ms
/// assert_eq!(time.now_us(), 1000);
/// assert_eq!(time.now_ms(), 1);
/// ```
#[derive(Clone, Default)]
pub struct MockTime {
    current_us: Cell<u64>,
    step_us: Cell<u64>,
}

// Safety: MockTime is only used in single-threaded test contexts
// where Cell is safe. The Send+Sync bounds on TimeSource trait
// are required for embedded contexts, but MockTime is not used there.
unsafe impl Send for MockTime {}
unsafe impl Sync for MockTime {}

impl MockTime {
    /// Creates a new `MockTime` starting at time 0.
    pub fn new() -> Self {
        Self {
            current_us: Cell::new(0),
            step_us: Cell::new(0),
        }
    }

    /// Creates a new `MockTime` starting at the specified time.
    pub fn with_initial(us: u64) -> Self {
        Self {
            current_us: Cell::new(us),
            step_us: Cell::new(0),
        }
    }

    /// Creates a new `MockTime` that advances by `step_us` on every read.
    pub fn with_step(step_us: u64) -> Self {
        Self {
            current_us: Cell::new(0),
            step_us: Cell::new(step_us),
        }
    }

    /// Sets the current time to an absolute value.
    pub fn set(&self, us: u64) {
        self.current_us.set(us);
    }

    /// Advances the current time by the specified amount.
    pub fn advance(&self, us: u64) {
        self.current_us.set(self.current_us.get() + us);
    }
}

impl TimeSource for MockTime {
    fn now_ms(&self) -> u64 {
        self.current_us.get() / 1000
    }

    fn now_us(&self) -> u64 {
        let now = self.current_us.get();
        self.current_us.set(now + self.step_us.get());
        now
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
