//! Dynamic task pool manager
//!
//! Owns the slot arena and a bank of teardown mailboxes. Every spawned task
//! gets its own mailbox and keeps it until it terminates, so a task that was
//! shrunk but has not reached its teardown wait yet still finds its
//! notification, even after its slot has been reused. Grow and shrink each
//! run inside a single critical section, so the active count and the slot
//! table always change together.
//!
//! ## Control loops
//!
//! Each button has a consumer loop that waits (indefinitely) for a confirmed
//! press and applies one grow or shrink. Saturated and empty pools absorb the
//! press silently.

use core::cell::{Cell, RefCell};

use critical_section::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use pico_heapscope_core::config::POOL_CAPACITY;
use pico_heapscope_core::pool::TaskPool;
use pico_heapscope_core::HarnessError;

/// Binary, interrupt-safe wake-up for one waiting task
pub type Notification = Signal<CriticalSectionRawMutex, ()>;

/// Handle to a live scenario task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskHandle {
    /// Slot the task occupies
    pub slot: usize,
    /// Spawn sequence number, unique for the process lifetime
    pub id: u32,
    /// Teardown mailbox owned by this task until it terminates
    pub mailbox: usize,
}

/// Creates scenario tasks on behalf of the pool manager
///
/// Called inside the grow critical section; must not block.
pub trait ScenarioSpawner {
    /// Start a scenario task for `task`
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::TaskCreationFailed` if the scheduler has no
    /// room for another task.
    fn spawn(&self, task: TaskHandle) -> Result<(), HarnessError>;
}

/// Fixed-capacity LIFO manager of scenario tasks
pub struct PoolManager {
    pool: Mutex<RefCell<TaskPool<TaskHandle, POOL_CAPACITY>>>,
    mailboxes: [Notification; POOL_CAPACITY],
    mailbox_owned: Mutex<Cell<[bool; POOL_CAPACITY]>>,
    next_id: Mutex<Cell<u32>>,
}

impl PoolManager {
    /// Empty pool (const fn for static initialization)
    pub const fn new() -> Self {
        Self {
            pool: Mutex::new(RefCell::new(TaskPool::new())),
            mailboxes: [const { Signal::new() }; POOL_CAPACITY],
            mailbox_owned: Mutex::new(Cell::new([false; POOL_CAPACITY])),
            next_id: Mutex::new(Cell::new(0)),
        }
    }

    /// Number of live scenario tasks
    pub fn active_count(&self) -> usize {
        critical_section::with(|cs| self.pool.borrow_ref(cs).active())
    }

    /// Handle of the task the next shrink would tear down
    pub fn top(&self) -> Option<TaskHandle> {
        critical_section::with(|cs| self.pool.borrow_ref(cs).top().copied())
    }

    /// Teardown notification of `task`
    ///
    /// `None` if the handle names a mailbox outside the bank.
    pub fn teardown_signal(&self, task: &TaskHandle) -> Option<&Notification> {
        self.mailboxes.get(task.mailbox)
    }

    /// Tasks that were spawned and have not terminated yet
    ///
    /// Includes shrunk tasks still running their teardown steps.
    pub fn running_count(&self) -> usize {
        critical_section::with(|cs| {
            self.mailbox_owned
                .borrow(cs)
                .get()
                .iter()
                .filter(|owned| **owned)
                .count()
        })
    }

    /// Create a scenario task in the next free slot
    ///
    /// The task receives an unowned mailbox, cleared before it starts.
    ///
    /// # Errors
    ///
    /// - `HarnessError::PoolSaturated` if every slot is occupied
    /// - `HarnessError::TaskCreationFailed` if every mailbox is still held by
    ///   a terminating task, or the spawner fails
    pub fn grow<S: ScenarioSpawner + ?Sized>(&self, spawner: &S) -> Result<TaskHandle, HarnessError> {
        critical_section::with(|cs| {
            let mut pool = self.pool.borrow_ref_mut(cs);
            let owned = self.mailbox_owned.borrow(cs);
            let slot = pool.try_grow(|slot| {
                let mut taken = owned.get();
                let mailbox = taken
                    .iter()
                    .position(|held| !held)
                    .ok_or(HarnessError::TaskCreationFailed { slot })?;

                let ids = self.next_id.borrow(cs);
                let task = TaskHandle {
                    slot,
                    id: ids.get(),
                    mailbox,
                };
                self.mailboxes[mailbox].reset();
                spawner.spawn(task)?;

                ids.set(task.id.wrapping_add(1));
                taken[mailbox] = true;
                owned.set(taken);
                Ok(task)
            })?;
            pool.get(slot).copied().ok_or(HarnessError::TaskCreationFailed { slot })
        })
    }

    /// Tear down the most recently created live task
    ///
    /// Signals the task's mailbox and vacates its slot; does not wait for the
    /// task to finish its teardown steps.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::PoolEmpty` if no task is live.
    pub fn shrink(&self) -> Result<TaskHandle, HarnessError> {
        critical_section::with(|cs| {
            let (_, task) = self.pool.borrow_ref_mut(cs).shrink()?;
            if let Some(mailbox) = self.mailboxes.get(task.mailbox) {
                mailbox.signal(());
            }
            Ok(task)
        })
    }

    /// Return `task`'s mailbox to the bank
    ///
    /// Called by the scenario task as its last action.
    pub fn release(&self, task: &TaskHandle) {
        critical_section::with(|cs| {
            let owned = self.mailbox_owned.borrow(cs);
            let mut taken = owned.get();
            if let Some(held) = taken.get_mut(task.mailbox) {
                *held = false;
            }
            owned.set(taken);
        });
    }

    /// Grow control loop
    ///
    /// Waits for a confirmed press and grows the pool, forever.
    pub async fn run_grow_control<S: ScenarioSpawner + ?Sized>(
        &self,
        press: &Notification,
        spawner: &S,
    ) -> ! {
        loop {
            press.wait().await;
            let outcome = self.grow(spawner);
            self.report("grow", outcome);
        }
    }

    /// Shrink control loop
    ///
    /// Waits for a confirmed press and shrinks the pool, forever.
    pub async fn run_shrink_control(&self, press: &Notification) -> ! {
        loop {
            press.wait().await;
            let outcome = self.shrink();
            self.report("shrink", outcome);
        }
    }

    fn report(&self, action: &'static str, outcome: Result<TaskHandle, HarnessError>) {
        match outcome {
            Ok(handle) => crate::log_info!(
                "{}: scenario #{} slot {} ({} active)",
                action,
                handle.id,
                handle.slot,
                self.active_count()
            ),
            Err(e) if e.is_silent() => {
                crate::log_debug!("{} ignored: {}", action, crate::core::logging::display(&e))
            }
            Err(e) => crate::log_error!("{} failed: {}", action, crate::core::logging::display(&e)),
        }
    }
}

impl Default for PoolManager {
    fn default() -> Self {
        Self::new()
    }
}
