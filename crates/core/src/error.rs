//! Harness Error Types
//!
//! Every condition here is terminal to the operation that raised it, never
//! to the process.

use core::fmt;

/// Errors raised by the harness engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessError {
    /// The external allocator returned no memory
    AllocationFailed {
        /// Requested size in bytes
        size: usize,
    },
    /// Grow request received while every task slot is occupied
    PoolSaturated {
        /// Pool capacity
        capacity: usize,
    },
    /// Shrink request received with no active scenario task
    PoolEmpty,
    /// A debounce timer could not be created at start-up
    TimerCreationFailed {
        /// Name of the affected button
        button: &'static str,
    },
    /// The scheduler refused to create a scenario task
    TaskCreationFailed {
        /// Slot the task was meant to occupy
        slot: usize,
    },
    /// Operation attempted on a scenario that already terminated
    Terminated,
}

impl HarnessError {
    /// Whether the condition is absorbed without any observable signal
    ///
    /// Saturated and empty pools are deliberate, non-fatal boundaries.
    pub const fn is_silent(&self) -> bool {
        matches!(self, HarnessError::PoolSaturated { .. } | HarnessError::PoolEmpty)
    }
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarnessError::AllocationFailed { size } => {
                write!(f, "Malloc failed ({} bytes)", size)
            }
            HarnessError::PoolSaturated { capacity } => {
                write!(f, "Task pool saturated ({} tasks)", capacity)
            }
            HarnessError::PoolEmpty => write!(f, "Task pool empty"),
            HarnessError::TimerCreationFailed { button } => {
                write!(f, "Timer creation failed for {}", button)
            }
            HarnessError::TaskCreationFailed { slot } => {
                write!(f, "Scenario task creation failed for slot {}", slot)
            }
            HarnessError::Terminated => write!(f, "Scenario already terminated"),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::format;

    use super::*;

    #[test]
    fn test_harness_error_display() {
        assert_eq!(
            format!("{}", HarnessError::AllocationFailed { size: 3200 }),
            "Malloc failed (3200 bytes)"
        );
        assert_eq!(
            format!("{}", HarnessError::TimerCreationFailed { button: "grow" }),
            "Timer creation failed for grow"
        );
        assert_eq!(format!("{}", HarnessError::PoolEmpty), "Task pool empty");
    }

    #[test]
    fn test_only_pool_boundaries_are_silent() {
        assert!(HarnessError::PoolSaturated { capacity: 35 }.is_silent());
        assert!(HarnessError::PoolEmpty.is_silent());
        assert!(!HarnessError::AllocationFailed { size: 1 }.is_silent());
        assert!(!HarnessError::TaskCreationFailed { slot: 0 }.is_silent());
        assert!(!HarnessError::Terminated.is_silent());
    }
}
