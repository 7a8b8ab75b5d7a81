//! Mock instrumented heap
//!
//! Host-side region managed by the same [`HarnessAllocator`] the firmware
//! uses, plus a switch to force allocation failures.

use std::boxed::Box;
use std::sync::{Mutex, MutexGuard};
use std::vec::Vec;

use core::ptr::NonNull;

use pico_heapscope_core::config::INSTRUMENTED_HEAP_SIZE;
use pico_heapscope_core::heap::{HarnessAllocator, ALIGNMENT};
use pico_heapscope_core::stats::HeapSnapshot;

use crate::platform::traits::{HeapBlock, HeapInterface};

#[derive(Debug)]
struct HeapState {
    allocator: Box<HarnessAllocator>,
    fail_next: u32,
}

/// Mock heap over an owned region
#[derive(Debug)]
pub struct MockHeap {
    // u64 elements keep the base 8-byte aligned
    region: Vec<u64>,
    base: usize,
    state: Mutex<HeapState>,
}

impl MockHeap {
    /// Heap with the firmware's instrumented region size
    pub fn new() -> Self {
        Self::with_capacity(INSTRUMENTED_HEAP_SIZE)
    }

    /// Heap managing `capacity` bytes (rounded down to the alignment)
    pub fn with_capacity(capacity: usize) -> Self {
        let allocator = Box::new(HarnessAllocator::new(capacity));
        let mut region = vec![0u64; allocator.capacity() / ALIGNMENT];
        let base = region.as_mut_ptr() as usize;

        Self {
            region,
            base,
            state: Mutex::new(HeapState {
                allocator,
                fail_next: 0,
            }),
        }
    }

    /// Make the next `count` allocations fail regardless of free space
    pub fn fail_next_allocations(&self, count: u32) {
        self.lock().fail_next = count;
    }

    /// Number of blocks currently handed out
    pub fn live_blocks(&self) -> usize {
        self.lock().allocator.live_blocks()
    }

    fn lock(&self) -> MutexGuard<'_, HeapState> {
        // A panicking test must not poison the heap for the others
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn offset_of(&self, ptr: NonNull<u8>) -> Option<usize> {
        let offset = (ptr.as_ptr() as usize).checked_sub(self.base)?;
        (offset < self.region.len() * ALIGNMENT).then_some(offset)
    }
}

impl Default for MockHeap {
    fn default() -> Self {
        Self::new()
    }
}

impl HeapInterface for MockHeap {
    fn allocate(&self, size: usize) -> Option<HeapBlock> {
        let mut state = self.lock();
        if state.fail_next > 0 {
            state.fail_next -= 1;
            return None;
        }

        let offset = state.allocator.allocate(size)?;
        let ptr = NonNull::new((self.base + offset) as *mut u8)?;
        Some(HeapBlock::new(ptr, size))
    }

    fn free(&self, block: HeapBlock) {
        if let Some(offset) = self.offset_of(block.as_ptr()) {
            self.lock().allocator.free(offset);
        }
    }

    fn stats(&self) -> HeapSnapshot {
        self.lock().allocator.stats()
    }

    fn capacity(&self) -> usize {
        self.lock().allocator.capacity()
    }
}
