//! Timed allocation wrapper
//!
//! Every allocate and free issued by a scenario task goes through
//! [`TimedHeap`], which measures the call and accounts it in the shared
//! [`AllocatorCounters`]. Counter updates happen inside a critical section;
//! the allocator call itself is not wrapped by any extra lock.

use core::cell::Cell;

use critical_section::Mutex;
use pico_heapscope_core::stats::{AllocatorCounters, HeapSnapshot};
use pico_heapscope_core::traits::TimeSource;
use pico_heapscope_core::HarnessError;

use crate::platform::traits::{HeapBlock, HeapInterface};

/// Process-wide allocator counters
///
/// Created once, never reset, never torn down. Only [`TimedHeap`] mutates
/// them, so they stay monotonically non-decreasing.
pub struct SharedCounters {
    inner: Mutex<Cell<AllocatorCounters>>,
}

impl SharedCounters {
    /// Zeroed counters (const fn for static initialization)
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(Cell::new(AllocatorCounters::new())),
        }
    }

    /// Copy of the current counters
    pub fn snapshot(&self) -> AllocatorCounters {
        critical_section::with(|cs| self.inner.borrow(cs).get())
    }

    fn update(&self, f: impl FnOnce(&mut AllocatorCounters)) {
        critical_section::with(|cs| {
            let cell = self.inner.borrow(cs);
            let mut counters = cell.get();
            f(&mut counters);
            cell.set(counters);
        });
    }
}

impl Default for SharedCounters {
    fn default() -> Self {
        Self::new()
    }
}

/// Counters used by the firmware
pub static ALLOCATOR_COUNTERS: SharedCounters = SharedCounters::new();

/// Instrumented heap with timing
pub struct TimedHeap<'a, H, T> {
    heap: H,
    time: T,
    counters: &'a SharedCounters,
}

impl<'a, H: HeapInterface, T: TimeSource> TimedHeap<'a, H, T> {
    /// Wrap `heap`, timing with `time` and accounting into `counters`
    pub fn new(heap: H, time: T, counters: &'a SharedCounters) -> Self {
        Self {
            heap,
            time,
            counters,
        }
    }

    /// Allocate `size` bytes and account the call
    ///
    /// On failure nothing is counted and the failure is logged.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::AllocationFailed` if the heap returned no memory.
    pub fn timed_allocate(&self, size: usize) -> Result<HeapBlock, HarnessError> {
        let start = self.time.now_us();
        let block = self.heap.allocate(size);
        let elapsed = self.time.elapsed_since(start);

        match block {
            Some(block) => {
                self.counters.update(|c| c.record_alloc(elapsed));
                Ok(block)
            }
            None => {
                let err = HarnessError::AllocationFailed { size };
                crate::log_error!("{}", crate::core::logging::display(&err));
                Err(err)
            }
        }
    }

    /// Free `block` and account the call
    ///
    /// `None` is the empty placeholder left by a failed allocation: the heap
    /// is not touched, but the call is still timed and counted.
    pub fn timed_free(&self, block: Option<HeapBlock>) {
        let start = self.time.now_us();
        if let Some(block) = block {
            self.heap.free(block);
        }
        let elapsed = self.time.elapsed_since(start);

        self.counters.update(|c| c.record_free(elapsed));
    }

    /// Current heap introspection figures
    pub fn snapshot(&self) -> HeapSnapshot {
        self.heap.stats()
    }

    /// Current counters
    pub fn counters(&self) -> AllocatorCounters {
        self.counters.snapshot()
    }

    /// Uptime in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.time.now_ms()
    }

    /// Underlying heap
    pub fn heap(&self) -> &H {
        &self.heap
    }
}
