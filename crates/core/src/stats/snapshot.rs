//! Heap introspection snapshot
//!
//! Field set of the external allocator's statistics call. The harness never
//! keeps a shadow copy; a snapshot is read, emitted and dropped.

/// Point-in-time allocator statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeapSnapshot {
    /// Total free bytes
    pub available_bytes: usize,
    /// Smallest free block in bytes
    pub smallest_free_block: usize,
    /// Largest free block in bytes
    pub largest_free_block: usize,
    /// Bytes lost to block rounding and headers across live allocations
    pub internal_fragmentation: usize,
    /// Successful allocations seen by the allocator
    pub successful_allocations: usize,
    /// Successful frees seen by the allocator
    pub successful_frees: usize,
    /// Low-water mark of free bytes since start
    pub minimum_ever_free: usize,
    /// Number of free blocks
    pub free_block_count: usize,
}

impl HeapSnapshot {
    /// Bytes in use out of `total_bytes`
    pub fn used_bytes(&self, total_bytes: usize) -> usize {
        total_bytes.saturating_sub(self.available_bytes)
    }

    /// Free space outside the largest free block, in bytes
    ///
    /// Zero means all free memory is one contiguous block.
    pub fn scattered_free_bytes(&self) -> usize {
        self.available_bytes.saturating_sub(self.largest_free_block)
    }
}
