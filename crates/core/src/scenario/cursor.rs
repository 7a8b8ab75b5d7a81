//! One-way progress through a scenario script

use super::script::{Script, Step};

/// Lifecycle phase of a scenario worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Executing steps before the teardown wait
    Running,
    /// Parked on the teardown wait
    AwaitingTeardown,
    /// Executing the steps after the teardown wait
    TearingDown,
    /// Script exhausted; absorbing state
    Terminated,
}

/// Cursor over a script's steps
///
/// Phases only move forward: `Running → AwaitingTeardown → TearingDown →
/// Terminated`. Once terminated the cursor yields nothing ever again.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioCursor {
    script: Script,
    position: usize,
    phase: Phase,
}

impl ScenarioCursor {
    /// Start at the first step of `script`
    pub const fn new(script: Script) -> Self {
        Self {
            script,
            position: 0,
            phase: Phase::Running,
        }
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Index of the next step to execute
    pub fn position(&self) -> usize {
        self.position
    }

    /// Script being executed
    pub fn script(&self) -> &Script {
        &self.script
    }

    /// Whether the cursor reached its absorbing state
    pub fn is_terminated(&self) -> bool {
        self.phase == Phase::Terminated
    }

    /// Take the next step
    ///
    /// Returns `None` while parked on the teardown wait and forever after
    /// termination. Returning `Step::AwaitTeardown` moves the cursor into
    /// `Phase::AwaitingTeardown`.
    pub fn next_step(&mut self) -> Option<Step> {
        match self.phase {
            Phase::Running | Phase::TearingDown => {
                let Some(step) = self.script.steps.get(self.position).copied() else {
                    self.phase = Phase::Terminated;
                    return None;
                };
                self.position += 1;
                if step == Step::AwaitTeardown {
                    self.phase = Phase::AwaitingTeardown;
                }
                Some(step)
            }
            Phase::AwaitingTeardown | Phase::Terminated => None,
        }
    }

    /// Record that the teardown signal arrived
    ///
    /// Returns `false` if the cursor was not parked on the teardown wait.
    pub fn teardown_received(&mut self) -> bool {
        if self.phase == Phase::AwaitingTeardown {
            self.phase = Phase::TearingDown;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::script::{SINGLE_BLOCK, STANDARD};

    #[test]
    fn test_cursor_parks_on_teardown() {
        let mut cursor = ScenarioCursor::new(SINGLE_BLOCK);

        assert_eq!(
            cursor.next_step(),
            Some(Step::Allocate { block: 0, size: 400 })
        );
        assert_eq!(cursor.phase(), Phase::Running);

        assert_eq!(cursor.next_step(), Some(Step::AwaitTeardown));
        assert_eq!(cursor.phase(), Phase::AwaitingTeardown);

        // Parked: nothing until teardown arrives
        assert_eq!(cursor.next_step(), None);
        assert_eq!(cursor.phase(), Phase::AwaitingTeardown);
    }

    #[test]
    fn test_cursor_runs_to_termination() {
        let mut cursor = ScenarioCursor::new(SINGLE_BLOCK);
        cursor.next_step();
        cursor.next_step();

        assert!(cursor.teardown_received());
        assert_eq!(cursor.phase(), Phase::TearingDown);
        assert_eq!(cursor.next_step(), Some(Step::Free { block: 0 }));

        assert_eq!(cursor.next_step(), None);
        assert!(cursor.is_terminated());
    }

    #[test]
    fn test_terminated_is_absorbing() {
        let mut cursor = ScenarioCursor::new(SINGLE_BLOCK);
        while cursor.next_step().is_some() {}
        cursor.teardown_received();
        while cursor.next_step().is_some() {}
        assert!(cursor.is_terminated());

        assert!(!cursor.teardown_received());
        for _ in 0..3 {
            assert_eq!(cursor.next_step(), None);
        }
        assert_eq!(cursor.phase(), Phase::Terminated);
    }

    #[test]
    fn test_teardown_before_wait_is_ignored() {
        let mut cursor = ScenarioCursor::new(STANDARD);
        cursor.next_step();

        assert!(!cursor.teardown_received());
        assert_eq!(cursor.phase(), Phase::Running);
    }

    #[test]
    fn test_standard_operations_before_wait() {
        let mut cursor = ScenarioCursor::new(STANDARD);
        let mut operations = 0;
        while let Some(step) = cursor.next_step() {
            if step.is_operation() {
                operations += 1;
            }
        }

        assert_eq!(operations, 24);
        assert_eq!(cursor.phase(), Phase::AwaitingTeardown);
    }
}
