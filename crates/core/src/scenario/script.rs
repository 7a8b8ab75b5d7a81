//! Scenario step and script definitions
//!
//! Blocks are referenced by index into a per-task table of at most
//! [`MAX_BLOCKS`] entries. A block index may be reused once the block it
//! named has been freed, which is how the standard script replays the same
//! pointers across its two allocation rounds.

use core::fmt;

/// Size of the per-task block table
pub const MAX_BLOCKS: usize = 10;

/// One scripted operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Allocate `size` bytes into block `block`
    Allocate { block: u8, size: usize },
    /// Free block `block`
    Free { block: u8 },
    /// Park until the teardown signal arrives
    AwaitTeardown,
}

impl Step {
    /// Whether the step touches the allocator (and is followed by an emission)
    pub const fn is_operation(&self) -> bool {
        !matches!(self, Step::AwaitTeardown)
    }
}

/// A named, fixed sequence of steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Script {
    /// Human-readable script name for logging
    pub name: &'static str,
    /// Steps in execution order
    pub steps: &'static [Step],
}

/// Reasons a script is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptError {
    /// Block index does not fit the block table
    BlockOutOfRange { step: usize, block: u8 },
    /// Allocation into a block that still holds memory
    BlockInUse { step: usize, block: u8 },
    /// Free of a block that holds no memory
    BlockNotAllocated { step: usize, block: u8 },
    /// More than one teardown wait
    DuplicateTeardown { step: usize },
    /// Blocks still outstanding when the script ends
    LeakedBlocks { count: u32 },
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::BlockOutOfRange { step, block } => {
                write!(f, "Step {}: block {} exceeds table of {}", step, block, MAX_BLOCKS)
            }
            ScriptError::BlockInUse { step, block } => {
                write!(f, "Step {}: block {} allocated twice", step, block)
            }
            ScriptError::BlockNotAllocated { step, block } => {
                write!(f, "Step {}: block {} freed while not allocated", step, block)
            }
            ScriptError::DuplicateTeardown { step } => {
                write!(f, "Step {}: second teardown wait", step)
            }
            ScriptError::LeakedBlocks { count } => {
                write!(f, "{} blocks outstanding at end of script", count)
            }
        }
    }
}

impl Script {
    /// Number of allocate/free steps, which equals the number of emissions
    pub fn operations(&self) -> usize {
        self.steps.iter().filter(|s| s.is_operation()).count()
    }

    /// Number of allocate/free steps executed before the teardown wait
    pub fn operations_before_teardown(&self) -> usize {
        self.steps
            .iter()
            .take_while(|s| **s != Step::AwaitTeardown)
            .filter(|s| s.is_operation())
            .count()
    }

    /// Number of allocation steps
    pub fn allocations(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, Step::Allocate { .. }))
            .count()
    }

    /// Check that every free targets an outstanding block and nothing leaks
    ///
    /// # Errors
    ///
    /// Returns the first [`ScriptError`] found, in step order.
    pub fn validate(&self) -> Result<(), ScriptError> {
        let mut outstanding: u16 = 0;
        let mut seen_teardown = false;

        for (step, op) in self.steps.iter().enumerate() {
            match *op {
                Step::Allocate { block, .. } => {
                    let bit = block_bit(step, block)?;
                    if outstanding & bit != 0 {
                        return Err(ScriptError::BlockInUse { step, block });
                    }
                    outstanding |= bit;
                }
                Step::Free { block } => {
                    let bit = block_bit(step, block)?;
                    if outstanding & bit == 0 {
                        return Err(ScriptError::BlockNotAllocated { step, block });
                    }
                    outstanding &= !bit;
                }
                Step::AwaitTeardown => {
                    if seen_teardown {
                        return Err(ScriptError::DuplicateTeardown { step });
                    }
                    seen_teardown = true;
                }
            }
        }

        if outstanding != 0 {
            return Err(ScriptError::LeakedBlocks {
                count: outstanding.count_ones(),
            });
        }
        Ok(())
    }
}

fn block_bit(step: usize, block: u8) -> Result<u16, ScriptError> {
    if (block as usize) < MAX_BLOCKS {
        Ok(1 << block)
    } else {
        Err(ScriptError::BlockOutOfRange { step, block })
    }
}

const fn alloc(block: u8, size: usize) -> Step {
    Step::Allocate { block, size }
}

const fn free(block: u8) -> Step {
    Step::Free { block }
}

/// Standard fragmentation scenario
///
/// Five ascending allocations freed out of order, ten mixed-size
/// allocations of which four are freed out of order, then the remaining six
/// are released in a third order after teardown.
pub const STANDARD: Script = Script {
    name: "standard",
    steps: &[
        // Round one: five allocations
        alloc(0, 1000),
        alloc(1, 200),
        alloc(2, 400),
        alloc(3, 800),
        alloc(4, 1600),
        // Freed in permuted order
        free(2),
        free(0),
        free(4),
        free(1),
        free(3),
        // Round two: ten allocations
        alloc(0, 1000),
        alloc(1, 200),
        alloc(2, 2000),
        alloc(3, 800),
        alloc(4, 1600),
        alloc(5, 3200),
        alloc(6, 50),
        alloc(7, 100),
        alloc(8, 400),
        alloc(9, 800),
        // Four released immediately
        free(2),
        free(0),
        free(4),
        free(1),
        Step::AwaitTeardown,
        // Remaining six released on teardown
        free(3),
        free(5),
        free(6),
        free(7),
        free(8),
        free(9),
    ],
};

/// Single long-lived block held until teardown
pub const SINGLE_BLOCK: Script = Script {
    name: "single_block",
    steps: &[alloc(0, 400), Step::AwaitTeardown, free(0)],
};
