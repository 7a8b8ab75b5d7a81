//! Allocation scenario task
//!
//! Executes the harness script step by step. Every allocate or free is
//! followed by one record emission. At the teardown wait the task parks on
//! its own mailbox; once released it runs the remaining steps, hands the
//! mailbox back and terminates for good.
//!
//! A failed allocation leaves an empty placeholder in the block table; the
//! matching free later leaves the heap alone but is still counted and emits.

use embedded_hal_async::delay::DelayNs;
use pico_heapscope_core::scenario::{Phase, ScenarioCursor, Step, MAX_BLOCKS};
use pico_heapscope_core::traits::TimeSource;
use pico_heapscope_core::HarnessError;

use crate::core::harness::Harness;
use crate::core::scheduler::TaskHandle;
use crate::platform::traits::{HeapBlock, HeapInterface, UartInterface};

/// Result of one [`ScenarioTask::advance`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// One operation ran and was recorded
    Stepped,
    /// Parked until the teardown notification arrives
    AwaitingTeardown,
    /// Script finished; the task must exit
    Terminated,
}

/// One scenario worker
pub struct ScenarioTask<'h, 'a, H, T, U> {
    harness: &'h Harness<'a, H, T, U>,
    task: TaskHandle,
    cursor: ScenarioCursor,
    blocks: [Option<HeapBlock>; MAX_BLOCKS],
}

impl<'h, 'a, H, T, U> ScenarioTask<'h, 'a, H, T, U>
where
    H: HeapInterface,
    T: TimeSource,
    U: UartInterface,
{
    /// Worker for `task`, positioned at the first step of the harness script
    pub fn new(harness: &'h Harness<'a, H, T, U>, task: TaskHandle) -> Self {
        Self {
            harness,
            task,
            cursor: ScenarioCursor::new(harness.script()),
            blocks: [const { None }; MAX_BLOCKS],
        }
    }

    /// Slot this worker occupies
    pub fn slot(&self) -> usize {
        self.task.slot
    }


    /// Lifecycle phase
    pub fn phase(&self) -> Phase {
        self.cursor.phase()
    }

    /// Number of blocks currently held
    pub fn held_blocks(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_some()).count()
    }

    /// Execute the next step
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Terminated` once the script has finished; a
    /// terminated worker accepts no further operations.
    pub async fn advance<D: DelayNs>(&mut self, delay: &mut D) -> Result<Progress, HarnessError> {
        if self.cursor.is_terminated() {
            return Err(HarnessError::Terminated);
        }

        match self.cursor.next_step() {
            Some(Step::Allocate { block, size }) => {
                let allocated = self.harness.heap().timed_allocate(size).ok();
                if let Some(entry) = self.blocks.get_mut(block as usize) {
                    *entry = allocated;
                } else if let Some(orphan) = allocated {
                    // Unreachable for validated scripts; never leak the block
                    self.harness.heap().timed_free(Some(orphan));
                }
                self.harness.emit(delay).await;
                Ok(Progress::Stepped)
            }
            Some(Step::Free { block }) => {
                let held = self.blocks.get_mut(block as usize).and_then(Option::take);
                self.harness.heap().timed_free(held);
                self.harness.emit(delay).await;
                Ok(Progress::Stepped)
            }
            Some(Step::AwaitTeardown) => Ok(Progress::AwaitingTeardown),
            None if self.cursor.phase() == Phase::AwaitingTeardown => {
                Ok(Progress::AwaitingTeardown)
            }
            None => Ok(Progress::Terminated),
        }
    }

    /// Release the teardown wait
    ///
    /// Returns `false` if the worker was not parked.
    pub fn teardown_received(&mut self) -> bool {
        self.cursor.teardown_received()
    }

    /// Run the script to completion
    ///
    /// Parks on the task's mailbox when the script asks for it, and returns
    /// the mailbox to the pool on exit.
    pub async fn run<D: DelayNs>(mut self, delay: &mut D) {
        let harness = self.harness;
        let pool = harness.pool();
        crate::log_info!(
            "Scenario #{} in slot {} started ({})",
            self.task.id,
            self.task.slot,
            harness.script().name
        );

        loop {
            match self.advance(delay).await {
                Ok(Progress::Stepped) => {}
                Ok(Progress::AwaitingTeardown) => {
                    match pool.teardown_signal(&self.task) {
                        Some(mailbox) => mailbox.wait().await,
                        None => crate::log_warn!(
                            "Scenario #{} has no mailbox, tearing down now",
                            self.task.id
                        ),
                    }
                    self.teardown_received();
                }
                Ok(Progress::Terminated) | Err(_) => break,
            }
        }

        pool.release(&self.task);
        crate::log_info!("Scenario #{} in slot {} terminated", self.task.id, self.task.slot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::heap::SharedCounters;
    use crate::platform::mock::{MockDelay, MockHeap, MockUart};
    use pico_heapscope_core::scenario::{SINGLE_BLOCK, STANDARD};
    use pico_heapscope_core::stats::StatsRecord;
    use pico_heapscope_core::traits::MockTime;

    type TestHarness<'a> = Harness<'a, MockHeap, MockTime, MockUart>;

    fn task(slot: usize) -> TaskHandle {
        TaskHandle {
            slot,
            id: slot as u32,
            mailbox: slot,
        }
    }

    fn harness(counters: &SharedCounters) -> TestHarness<'_> {
        Harness::new(
            MockHeap::new(),
            MockTime::with_step(3),
            MockUart::new(),
            counters,
            STANDARD,
        )
        .unwrap()
    }

    async fn lines(harness: &TestHarness<'_>) -> Vec<String> {
        harness.recorder().with_transport(|uart| uart.lines()).await
    }

    #[tokio::test]
    async fn test_runs_until_teardown_wait() {
        let counters = SharedCounters::new();
        let harness = harness(&counters);
        let mut task = ScenarioTask::new(&harness, task(0));
        let mut delay = MockDelay::new();

        let mut steps = 0;
        while task.advance(&mut delay).await.unwrap() == Progress::Stepped {
            steps += 1;
        }

        assert_eq!(steps, 24);
        assert_eq!(task.phase(), Phase::AwaitingTeardown);
        assert_eq!(task.held_blocks(), 6);
        assert_eq!(lines(&harness).await.len(), 24);
        assert_eq!(delay.calls(), 24);

        // Parked: nothing happens until teardown arrives
        assert_eq!(
            task.advance(&mut delay).await,
            Ok(Progress::AwaitingTeardown)
        );
        assert_eq!(lines(&harness).await.len(), 24);
    }

    #[tokio::test]
    async fn test_teardown_frees_remaining_blocks() {
        let counters = SharedCounters::new();
        let harness = harness(&counters);
        let mut task = ScenarioTask::new(&harness, task(0));
        let mut delay = MockDelay::new();

        while task.advance(&mut delay).await.unwrap() == Progress::Stepped {}
        assert!(task.teardown_received());

        let mut steps = 0;
        while task.advance(&mut delay).await.unwrap() == Progress::Stepped {
            steps += 1;
        }

        assert_eq!(steps, 6);
        assert_eq!(task.phase(), Phase::Terminated);
        assert_eq!(task.held_blocks(), 0);
        assert_eq!(task.advance(&mut delay).await, Err(HarnessError::Terminated));

        let all = lines(&harness).await;
        assert_eq!(all.len(), 30);
        let last = StatsRecord::parse_line(&all[29]).unwrap();
        assert_eq!(last.alloc_count, 15);
        assert_eq!(last.free_count, 15);
        assert_eq!(last.available_bytes, harness.heap().heap().capacity());
    }

    #[tokio::test]
    async fn test_counters_step_with_operations() {
        let counters = SharedCounters::new();
        let harness = harness(&counters);
        let mut task = ScenarioTask::new(&harness, task(0));
        let mut delay = MockDelay::new();

        while task.advance(&mut delay).await.unwrap() == Progress::Stepped {}

        let records: Vec<StatsRecord> = lines(&harness)
            .await
            .iter()
            .map(|l| StatsRecord::parse_line(l).unwrap())
            .collect();

        // Five allocations, then five frees
        assert_eq!(records[4].alloc_count, 5);
        assert_eq!(records[4].free_count, 0);
        assert_eq!(records[9].free_count, 5);
        // Ten more allocations, then four frees
        assert_eq!(records[19].alloc_count, 15);
        assert_eq!(records[23].free_count, 9);

        for pair in records.windows(2) {
            assert!(pair[1].alloc_count >= pair[0].alloc_count);
            assert!(pair[1].free_count >= pair[0].free_count);
            assert!(pair[1].timestamp_ms >= pair[0].timestamp_ms);
        }
    }

    #[tokio::test]
    async fn test_failed_allocation_leaves_placeholder() {
        let counters = SharedCounters::new();
        let heap = MockHeap::new();
        heap.fail_next_allocations(1);
        let harness =
            Harness::new(heap, MockTime::new(), MockUart::new(), &counters, SINGLE_BLOCK).unwrap();
        let mut task = ScenarioTask::new(&harness, task(0));
        let mut delay = MockDelay::new();

        assert_eq!(task.advance(&mut delay).await, Ok(Progress::Stepped));
        assert_eq!(task.held_blocks(), 0);
        assert_eq!(task.advance(&mut delay).await, Ok(Progress::AwaitingTeardown));
        assert!(task.teardown_received());

        // Free of the placeholder leaves the heap alone but is counted
        assert_eq!(task.advance(&mut delay).await, Ok(Progress::Stepped));
        assert_eq!(task.advance(&mut delay).await, Ok(Progress::Terminated));

        let records: Vec<StatsRecord> = lines(&harness)
            .await
            .iter()
            .map(|l| StatsRecord::parse_line(l).unwrap())
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].alloc_count, 0);
        assert_eq!(records[1].free_count, 1);
        assert_eq!(harness.heap().heap().live_blocks(), 0);
    }

    #[tokio::test]
    async fn test_run_exits_after_teardown_signal() {
        let counters = SharedCounters::new();
        let harness =
            Harness::new(MockHeap::new(), MockTime::new(), MockUart::new(), &counters, SINGLE_BLOCK)
                .unwrap();

        // Teardown already pending when the task reaches its wait
        harness.pool().teardown_signal(&task(4)).unwrap().signal(());
        let mut delay = MockDelay::new();
        ScenarioTask::new(&harness, task(4)).run(&mut delay).await;

        assert_eq!(lines(&harness).await.len(), 2);
        assert_eq!(harness.heap().counters().free_count, 1);
    }
}
