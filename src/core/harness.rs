//! Harness context shared by every task
//!
//! Bundles the timed heap, the recorder, the pool manager and the script the
//! scenario tasks execute. Firmware keeps one instance for the whole process
//! lifetime and hands out `&'static` references to it.

use embedded_hal_async::delay::DelayNs;
use pico_heapscope_core::scenario::{Script, ScriptError};
use pico_heapscope_core::stats::StatsRecord;
use pico_heapscope_core::traits::TimeSource;

use crate::core::heap::{SharedCounters, StatsRecorder, TimedHeap};
use crate::core::scheduler::pool::PoolManager;
use crate::platform::traits::{HeapInterface, UartInterface};

/// Shared harness state
pub struct Harness<'a, H, T, U> {
    heap: TimedHeap<'a, H, T>,
    recorder: StatsRecorder<U>,
    pool: PoolManager,
    script: Script,
}

impl<'a, H, T, U> Harness<'a, H, T, U>
where
    H: HeapInterface,
    T: TimeSource,
    U: UartInterface,
{
    /// Build a harness running `script`
    ///
    /// # Errors
    ///
    /// Returns the first [`ScriptError`] if `script` is not well formed.
    pub fn new(
        heap: H,
        time: T,
        transport: U,
        counters: &'a SharedCounters,
        script: Script,
    ) -> Result<Self, ScriptError> {
        Self::with_recorder(heap, time, StatsRecorder::new(transport), counters, script)
    }

    /// Build a harness around an existing recorder
    ///
    /// # Errors
    ///
    /// Returns the first [`ScriptError`] if `script` is not well formed.
    pub fn with_recorder(
        heap: H,
        time: T,
        recorder: StatsRecorder<U>,
        counters: &'a SharedCounters,
        script: Script,
    ) -> Result<Self, ScriptError> {
        script.validate()?;
        Ok(Self {
            heap: TimedHeap::new(heap, time, counters),
            recorder,
            pool: PoolManager::new(),
            script,
        })
    }

    /// Timed heap
    pub fn heap(&self) -> &TimedHeap<'a, H, T> {
        &self.heap
    }

    /// Record writer
    pub fn recorder(&self) -> &StatsRecorder<U> {
        &self.recorder
    }

    /// Pool manager
    pub fn pool(&self) -> &PoolManager {
        &self.pool
    }

    /// Script executed by every scenario task
    pub fn script(&self) -> Script {
        self.script
    }

    /// Assemble the current record
    pub fn record(&self) -> StatsRecord {
        StatsRecord::new(
            self.heap.now_ms(),
            &self.heap.snapshot(),
            &self.heap.counters(),
            self.pool.active_count() as u32,
        )
    }

    /// Emit the current record, then settle
    pub async fn emit<D: DelayNs>(&self, delay: &mut D) {
        let record = self.record();
        self.recorder.emit(&record, delay).await;
    }
}
