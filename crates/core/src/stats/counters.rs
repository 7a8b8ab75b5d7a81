//! Running allocation counters
//!
//! Counts and cumulative durations of successful allocations and of frees.
//! Values only ever grow; there is no reset.

/// Counters maintained alongside the external allocator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocatorCounters {
    /// Successful allocations
    pub alloc_count: u32,
    /// Total time spent in successful allocations, in microseconds
    pub alloc_time_total_us: u64,
    /// Frees
    pub free_count: u32,
    /// Total time spent in frees, in microseconds
    pub free_time_total_us: u64,
}

impl AllocatorCounters {
    /// All counters at zero (const fn for static initialization)
    pub const fn new() -> Self {
        Self {
            alloc_count: 0,
            alloc_time_total_us: 0,
            free_count: 0,
            free_time_total_us: 0,
        }
    }

    /// Account one successful allocation that took `elapsed_us`
    pub fn record_alloc(&mut self, elapsed_us: u64) {
        self.alloc_count = self.alloc_count.saturating_add(1);
        self.alloc_time_total_us = self.alloc_time_total_us.saturating_add(elapsed_us);
    }

    /// Account one free that took `elapsed_us`
    pub fn record_free(&mut self, elapsed_us: u64) {
        self.free_count = self.free_count.saturating_add(1);
        self.free_time_total_us = self.free_time_total_us.saturating_add(elapsed_us);
    }

    /// Allocations not yet matched by a free
    pub fn outstanding(&self) -> u32 {
        self.alloc_count.saturating_sub(self.free_count)
    }

    /// Average allocation time in microseconds, or 0 before the first allocation
    pub fn avg_alloc_us(&self) -> u64 {
        if self.alloc_count == 0 {
            0
        } else {
            self.alloc_time_total_us / self.alloc_count as u64
        }
    }

    /// Average free time in microseconds, or 0 before the first free
    pub fn avg_free_us(&self) -> u64 {
        if self.free_count == 0 {
            0
        } else {
            self.free_time_total_us / self.free_count as u64
        }
    }
}
