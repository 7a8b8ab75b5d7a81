//! First-fit block allocator with coalescing
//!
//! Bookkeeping for the instrumented heap region. The allocator works on
//! offsets into a region it never touches; the platform layer turns offsets
//! into pointers. All metadata lives in fixed side tables, so the region
//! holds payload only and the struct can be placed in a `static`.
//!
//! Block rules:
//!
//! - every block is charged an [`HEADER_SIZE`]-byte header and rounded up to
//!   [`ALIGNMENT`]
//! - a free block is split only if the remainder can hold a
//!   [`MIN_BLOCK_SIZE`] block; otherwise the whole block is handed out
//! - free blocks are kept in address order and merged with adjacent free
//!   neighbours on every free
//!
//! Internal fragmentation is the sum, over live blocks, of the bytes charged
//! beyond the requested size.

use crate::config::POOL_CAPACITY;
use crate::scenario::MAX_BLOCKS;
use crate::stats::HeapSnapshot;

/// Block alignment in bytes
pub const ALIGNMENT: usize = 8;

/// Per-block header charge in bytes
pub const HEADER_SIZE: usize = 8;

/// Smallest block worth splitting off
pub const MIN_BLOCK_SIZE: usize = HEADER_SIZE * 2;

/// Live block table size: every scenario slot holding its full block table,
/// plus headroom
pub const MAX_LIVE_BLOCKS: usize = POOL_CAPACITY * MAX_BLOCKS + 32;

/// Free block table size
///
/// Coalescing keeps at most one free block between two live blocks, so one
/// more entry than the live table can never overflow.
pub const MAX_FREE_BLOCKS: usize = MAX_LIVE_BLOCKS + 1;

/// Allocator sized for the harness
pub type HarnessAllocator = BlockAllocator<MAX_FREE_BLOCKS, MAX_LIVE_BLOCKS>;

#[derive(Debug, Clone, Copy)]
struct Span {
    offset: usize,
    size: usize,
}

#[derive(Debug, Clone, Copy)]
struct LiveBlock {
    offset: usize,
    size: usize,
    requested: usize,
}

const EMPTY_SPAN: Span = Span { offset: 0, size: 0 };
const EMPTY_LIVE: LiveBlock = LiveBlock {
    offset: 0,
    size: 0,
    requested: 0,
};

fn block_size_for(requested: usize) -> Option<usize> {
    let raw = requested.checked_add(HEADER_SIZE)?;
    Some(raw.checked_add(ALIGNMENT - 1)? & !(ALIGNMENT - 1))
}

/// Fixed-table first-fit allocator over `capacity` bytes
///
/// `F` bounds the number of free blocks, `L` the number of live blocks.
#[derive(Debug, Clone)]
pub struct BlockAllocator<const F: usize, const L: usize> {
    capacity: usize,
    free: [Span; F],
    free_len: usize,
    live: [LiveBlock; L],
    live_len: usize,
    available: usize,
    minimum_ever_free: usize,
    allocations: usize,
    frees: usize,
}

impl<const F: usize, const L: usize> BlockAllocator<F, L> {
    /// Allocator over a region of `capacity` bytes, rounded down to the alignment
    pub const fn new(capacity: usize) -> Self {
        let capacity = capacity & !(ALIGNMENT - 1);
        let mut free = [EMPTY_SPAN; F];
        let mut free_len = 0;
        let mut available = 0;
        if capacity >= MIN_BLOCK_SIZE && F > 0 {
            free[0] = Span {
                offset: 0,
                size: capacity,
            };
            free_len = 1;
            available = capacity;
        }

        Self {
            capacity,
            free,
            free_len,
            live: [EMPTY_LIVE; L],
            live_len: 0,
            available,
            minimum_ever_free: available,
            allocations: 0,
            frees: 0,
        }
    }

    /// Managed bytes
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of live blocks
    pub fn live_blocks(&self) -> usize {
        self.live_len
    }

    /// Allocate `size` bytes
    ///
    /// Returns the payload offset (block offset plus header), or `None` for a
    /// zero-sized request, an exhausted region or a full live table.
    pub fn allocate(&mut self, size: usize) -> Option<usize> {
        if size == 0 || self.live_len >= L {
            return None;
        }
        let needed = block_size_for(size)?;

        let index = self.free[..self.free_len]
            .iter()
            .position(|span| span.size >= needed)?;
        let chosen = self.free[index];

        let block_size = if chosen.size - needed >= MIN_BLOCK_SIZE {
            self.free[index] = Span {
                offset: chosen.offset + needed,
                size: chosen.size - needed,
            };
            needed
        } else {
            self.remove_free(index);
            chosen.size
        };

        self.live[self.live_len] = LiveBlock {
            offset: chosen.offset,
            size: block_size,
            requested: size,
        };
        self.live_len += 1;

        self.available -= block_size;
        self.minimum_ever_free = self.minimum_ever_free.min(self.available);
        self.allocations += 1;

        Some(chosen.offset + HEADER_SIZE)
    }

    /// Free the block whose payload starts at `payload_offset`
    ///
    /// Returns `false` (and changes nothing) if no live block starts there.
    pub fn free(&mut self, payload_offset: usize) -> bool {
        let Some(offset) = payload_offset.checked_sub(HEADER_SIZE) else {
            return false;
        };
        let Some(live_index) = self.live[..self.live_len]
            .iter()
            .position(|b| b.offset == offset)
        else {
            return false;
        };
        let size = self.live[live_index].size;

        let index = self.free[..self.free_len].partition_point(|span| span.offset < offset);
        let merge_prev = index > 0 && {
            let prev = self.free[index - 1];
            prev.offset + prev.size == offset
        };
        let merge_next = index < self.free_len && offset + size == self.free[index].offset;

        match (merge_prev, merge_next) {
            (true, true) => {
                self.free[index - 1].size += size + self.free[index].size;
                self.remove_free(index);
            }
            (true, false) => self.free[index - 1].size += size,
            (false, true) => {
                self.free[index].offset = offset;
                self.free[index].size += size;
            }
            (false, false) => {
                if self.free_len >= F {
                    return false;
                }
                self.free.copy_within(index..self.free_len, index + 1);
                self.free[index] = Span { offset, size };
                self.free_len += 1;
            }
        }

        self.live_len -= 1;
        self.live[live_index] = self.live[self.live_len];

        self.available += size;
        self.frees += 1;
        true
    }

    /// Current introspection figures
    pub fn stats(&self) -> HeapSnapshot {
        let free = &self.free[..self.free_len];
        HeapSnapshot {
            available_bytes: self.available,
            smallest_free_block: free.iter().map(|s| s.size).min().unwrap_or(0),
            largest_free_block: free.iter().map(|s| s.size).max().unwrap_or(0),
            internal_fragmentation: self.live[..self.live_len]
                .iter()
                .map(|b| b.size - b.requested)
                .sum(),
            successful_allocations: self.allocations,
            successful_frees: self.frees,
            minimum_ever_free: self.minimum_ever_free,
            free_block_count: self.free_len,
        }
    }

    fn remove_free(&mut self, index: usize) {
        self.free.copy_within(index + 1..self.free_len, index);
        self.free_len -= 1;
    }
}
