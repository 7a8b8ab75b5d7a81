//! Property tests for the pure harness state machines

use pico_heapscope_core::debounce::{Debounce, ExpiryOutcome, TimerCommand};
use pico_heapscope_core::heap::BlockAllocator;
use pico_heapscope_core::pool::TaskPool;
use pico_heapscope_core::stats::{AllocatorCounters, HeapSnapshot, StatsRecord, FIELD_COUNT};
use pico_heapscope_core::HarnessError;
use proptest::prelude::*;

const CAPACITY: usize = 35;

#[derive(Debug, Clone, Copy)]
enum PoolOp {
    Grow,
    Shrink,
}

fn pool_op() -> impl Strategy<Value = PoolOp> {
    prop_oneof![Just(PoolOp::Grow), Just(PoolOp::Shrink)]
}

proptest! {
    #[test]
    fn burst_within_one_window_confirms_once(edges in 1u32..200) {
        let mut machine = Debounce::new();

        let mut starts = 0;
        for _ in 0..edges {
            if machine.on_edge() == TimerCommand::Start {
                starts += 1;
            }
        }

        prop_assert_eq!(starts, 1);
        prop_assert_eq!(machine.on_expiry(true), ExpiryOutcome::Confirmed);
        prop_assert_eq!(machine.on_expiry(true), ExpiryOutcome::Spurious);
        prop_assert_eq!(machine.confirmed(), 1);
    }

    #[test]
    fn released_burst_never_confirms(edges in 1u32..200) {
        let mut machine = Debounce::new();
        for _ in 0..edges {
            machine.on_edge();
        }

        prop_assert_eq!(machine.on_expiry(false), ExpiryOutcome::Discarded);
        prop_assert_eq!(machine.confirmed(), 0);
    }

    #[test]
    fn pool_stays_bounded_and_lifo(ops in proptest::collection::vec(pool_op(), 0..200)) {
        let mut pool: TaskPool<u32, CAPACITY> = TaskPool::new();
        let mut model: Vec<u32> = Vec::new();
        let mut next_id = 0u32;

        for op in ops {
            match op {
                PoolOp::Grow => {
                    let before = pool.active();
                    let result = pool.try_grow(|_| Ok(next_id));
                    if before == CAPACITY {
                        prop_assert_eq!(result, Err(HarnessError::PoolSaturated { capacity: CAPACITY }));
                        prop_assert_eq!(pool.active(), CAPACITY);
                    } else {
                        prop_assert_eq!(result, Ok(before));
                        model.push(next_id);
                    }
                    next_id += 1;
                }
                PoolOp::Shrink => {
                    match model.pop() {
                        Some(expected) => {
                            let (slot, id) = pool.shrink().unwrap();
                            prop_assert_eq!(id, expected);
                            prop_assert_eq!(slot, model.len());
                        }
                        None => {
                            prop_assert_eq!(pool.shrink(), Err(HarnessError::PoolEmpty));
                        }
                    }
                }
            }

            prop_assert!(pool.active() <= CAPACITY);
            prop_assert_eq!(pool.active(), model.len());
            prop_assert_eq!(pool.top().copied(), model.last().copied());
        }
    }

    #[test]
    fn counters_never_decrease(steps in proptest::collection::vec((any::<bool>(), 0u64..10_000), 0..100)) {
        let mut counters = AllocatorCounters::new();

        for (is_alloc, elapsed) in steps {
            let before = counters;
            if is_alloc {
                counters.record_alloc(elapsed);
            } else {
                counters.record_free(elapsed);
            }
            prop_assert!(counters.alloc_count >= before.alloc_count);
            prop_assert!(counters.free_count >= before.free_count);
            prop_assert!(counters.alloc_time_total_us >= before.alloc_time_total_us);
            prop_assert!(counters.free_time_total_us >= before.free_time_total_us);
        }
    }

    #[test]
    fn every_line_has_fourteen_integer_fields(
        timestamp in any::<u64>(),
        available in any::<usize>(),
        largest in any::<usize>(),
        alloc_count in any::<u32>(),
        alloc_time in any::<u64>(),
        active in 0u32..=35,
    ) {
        let snapshot = HeapSnapshot {
            available_bytes: available,
            largest_free_block: largest,
            ..Default::default()
        };
        let counters = AllocatorCounters {
            alloc_count,
            alloc_time_total_us: alloc_time,
            ..Default::default()
        };
        let record = StatsRecord::new(timestamp, &snapshot, &counters, active);

        let mut line = String::new();
        record.write_line(&mut line).unwrap();

        prop_assert!(line.ends_with('\n'));
        let fields: Vec<&str> = line.trim_end_matches('\n').split(',').collect();
        prop_assert_eq!(fields.len(), FIELD_COUNT);
        for field in &fields {
            prop_assert!(!field.is_empty());
            prop_assert!(field.bytes().all(|b| b.is_ascii_digit()));
        }
        prop_assert_eq!(StatsRecord::parse_line(&line), Ok(record));
    }

    #[test]
    fn allocator_conserves_bytes_and_coalesces(
        ops in proptest::collection::vec((any::<bool>(), 1usize..3000, any::<prop::sample::Index>()), 0..200)
    ) {
        const REGION: usize = 32 * 1024;
        let mut heap = BlockAllocator::<65, 64>::new(REGION);
        let mut held: Vec<usize> = Vec::new();

        for (allocate, size, pick) in ops {
            if allocate || held.is_empty() {
                if let Some(payload) = heap.allocate(size) {
                    held.push(payload);
                }
            } else {
                let payload = held.swap_remove(pick.index(held.len()));
                prop_assert!(heap.free(payload));
            }

            let stats = heap.stats();
            prop_assert!(stats.available_bytes <= REGION);
            prop_assert!(stats.minimum_ever_free <= stats.available_bytes);
            prop_assert!(stats.largest_free_block <= stats.available_bytes);
            prop_assert!(stats.smallest_free_block <= stats.largest_free_block);
            prop_assert_eq!(stats.successful_allocations - stats.successful_frees, held.len());
        }

        for payload in held.drain(..) {
            prop_assert!(heap.free(payload));
        }
        let stats = heap.stats();
        prop_assert_eq!(stats.available_bytes, REGION);
        prop_assert_eq!(stats.free_block_count, 1);
        prop_assert_eq!(stats.internal_fragmentation, 0);
    }
}
