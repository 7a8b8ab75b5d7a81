//! Fixed-capacity task slot arena
//!
//! Scenario tasks are tracked in a fixed array of optional handles with the
//! active count as the exclusive boundary. Slots are filled in order by grow
//! and vacated in reverse order by shrink, so teardown is strictly LIFO.
//!
//! # Invariant
//!
//! Slot `i` holds a handle iff `i < active()`. Every slot at or beyond the
//! active count is `None`; a vacated slot never keeps a stale handle.

use crate::error::HarnessError;

/// Fixed-capacity LIFO registry of task handles
#[derive(Debug)]
pub struct TaskPool<H, const N: usize> {
    slots: [Option<H>; N],
    active: usize,
}

impl<H, const N: usize> TaskPool<H, N> {
    /// Create an empty pool (const fn for static initialization)
    pub const fn new() -> Self {
        Self {
            slots: [const { None }; N],
            active: 0,
        }
    }

    /// Maximum number of tasks
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of occupied slots, which is also the index of the next free slot
    pub fn active(&self) -> usize {
        self.active
    }

    /// Whether every slot is occupied
    pub fn is_full(&self) -> bool {
        self.active >= N
    }

    /// Whether no slot is occupied
    pub fn is_empty(&self) -> bool {
        self.active == 0
    }

    /// Occupy the next slot with a handle produced by `create`
    ///
    /// `create` receives the slot index and is only called when a slot is
    /// available. If it fails, the pool is left unchanged.
    ///
    /// # Errors
    ///
    /// - `HarnessError::PoolSaturated` if every slot is occupied
    /// - any error returned by `create`
    pub fn try_grow<F>(&mut self, create: F) -> Result<usize, HarnessError>
    where
        F: FnOnce(usize) -> Result<H, HarnessError>,
    {
        if self.is_full() {
            return Err(HarnessError::PoolSaturated { capacity: N });
        }

        let slot = self.active;
        let handle = create(slot)?;
        self.slots[slot] = Some(handle);
        self.active += 1;
        Ok(slot)
    }

    /// Vacate the most recently occupied slot
    ///
    /// Returns the slot index and the handle that lived there.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::PoolEmpty` if no slot is occupied.
    pub fn shrink(&mut self) -> Result<(usize, H), HarnessError> {
        if self.is_empty() {
            return Err(HarnessError::PoolEmpty);
        }

        let slot = self.active - 1;
        // Invariant: slots below `active` are always occupied
        let handle = self.slots[slot].take().ok_or(HarnessError::PoolEmpty)?;
        self.active = slot;
        Ok((slot, handle))
    }

    /// Handle in `slot`, if the slot is occupied
    pub fn get(&self, slot: usize) -> Option<&H> {
        if slot < self.active {
            self.slots[slot].as_ref()
        } else {
            None
        }
    }

    /// Handle that the next shrink would target
    pub fn top(&self) -> Option<&H> {
        self.active.checked_sub(1).and_then(|slot| self.get(slot))
    }

    /// Iterate over occupied slots in creation order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &H)> {
        self.slots[..self.active]
            .iter()
            .enumerate()
            .filter_map(|(i, h)| h.as_ref().map(|h| (i, h)))
    }
}

impl<H, const N: usize> Default for TaskPool<H, N> {
    fn default() -> Self {
        Self::new()
    }
}
