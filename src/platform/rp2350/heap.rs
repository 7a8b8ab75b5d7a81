//! RP2350 instrumented heap
//!
//! A dedicated RAM region managed by [`HarnessAllocator`]. The region is
//! separate from any global allocator, so nothing but the scenario tasks
//! ever allocates from it and the figures it reports stay clean.

use core::cell::RefCell;
use core::ptr::NonNull;

use critical_section::Mutex;
use pico_heapscope_core::config::INSTRUMENTED_HEAP_SIZE;
use pico_heapscope_core::heap::{HarnessAllocator, ALIGNMENT};
use pico_heapscope_core::stats::HeapSnapshot;

use crate::platform::traits::{HeapBlock, HeapInterface};

// u64 elements keep the base 8-byte aligned
static mut REGION: [u64; INSTRUMENTED_HEAP_SIZE / ALIGNMENT] = [0; INSTRUMENTED_HEAP_SIZE / ALIGNMENT];

/// The firmware's instrumented heap
pub static INSTRUMENTED_HEAP: Rp2350Heap = Rp2350Heap::new();

/// Heap over the static instrumented region
///
/// There is one region, so there is one meaningful instance:
/// [`INSTRUMENTED_HEAP`]. Pass it by reference.
pub struct Rp2350Heap {
    allocator: Mutex<RefCell<HarnessAllocator>>,
}

impl Rp2350Heap {
    const fn new() -> Self {
        Self {
            allocator: Mutex::new(RefCell::new(HarnessAllocator::new(INSTRUMENTED_HEAP_SIZE))),
        }
    }

    fn base() -> usize {
        core::ptr::addr_of_mut!(REGION) as usize
    }
}

impl HeapInterface for Rp2350Heap {
    fn allocate(&self, size: usize) -> Option<HeapBlock> {
        let offset = critical_section::with(|cs| self.allocator.borrow_ref_mut(cs).allocate(size))?;
        let ptr = NonNull::new((Self::base() + offset) as *mut u8)?;
        Some(HeapBlock::new(ptr, size))
    }

    fn free(&self, block: HeapBlock) {
        let Some(offset) = (block.as_ptr().as_ptr() as usize).checked_sub(Self::base()) else {
            return;
        };
        let released = critical_section::with(|cs| self.allocator.borrow_ref_mut(cs).free(offset));
        if !released {
            crate::log_warn!("Free of unknown block at offset {}", offset);
        }
    }

    fn stats(&self) -> HeapSnapshot {
        critical_section::with(|cs| self.allocator.borrow_ref(cs).stats())
    }

    fn capacity(&self) -> usize {
        critical_section::with(|cs| self.allocator.borrow_ref(cs).capacity())
    }
}
