//! External allocator interface
//!
//! The harness never allocates through the global allocator for its
//! measurements. It drives an instrumented heap region through this trait
//! and reads that region's introspection figures back.

use core::ptr::NonNull;

use pico_heapscope_core::stats::HeapSnapshot;

/// A block handed out by a [`HeapInterface`]
///
/// Only the allocator that produced a block may free it. The harness never
/// dereferences the pointer.
#[derive(Debug, PartialEq, Eq)]
pub struct HeapBlock {
    ptr: NonNull<u8>,
    size: usize,
}

// SAFETY: a block is an exclusive claim on a region of the instrumented heap;
// moving the claim between tasks does not alias it.
unsafe impl Send for HeapBlock {}

impl HeapBlock {
    /// Wrap a pointer returned by an allocator for a request of `size` bytes
    pub fn new(ptr: NonNull<u8>, size: usize) -> Self {
        Self { ptr, size }
    }

    /// Start of the block
    pub fn as_ptr(&self) -> NonNull<u8> {
        self.ptr
    }

    /// Requested size in bytes
    pub fn size(&self) -> usize {
        self.size
    }
}

/// Instrumented heap
///
/// Implementations synchronize internally; every method takes `&self` so
/// concurrently running scenario tasks can share one heap.
pub trait HeapInterface {
    /// Allocate `size` bytes, or `None` if the heap cannot satisfy the request
    fn allocate(&self, size: usize) -> Option<HeapBlock>;

    /// Return a block to the heap
    fn free(&self, block: HeapBlock);

    /// Current introspection figures
    fn stats(&self) -> HeapSnapshot;

    /// Size of the managed region in bytes
    fn capacity(&self) -> usize;
}

impl<H: HeapInterface + ?Sized> HeapInterface for &H {
    fn allocate(&self, size: usize) -> Option<HeapBlock> {
        (**self).allocate(size)
    }

    fn free(&self, block: HeapBlock) {
        (**self).free(block)
    }

    fn stats(&self) -> HeapSnapshot {
        (**self).stats()
    }

    fn capacity(&self) -> usize {
        (**self).capacity()
    }
}
