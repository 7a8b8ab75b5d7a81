//! Button debounce state machine
//!
//! A raw rising edge never counts as a press by itself. It (re)arms a
//! single-shot timer, and only when that timer expires with the input line
//! still asserted is a confirmed press produced. A burst of bounce edges
//! therefore collapses into at most one press, at the cost of one debounce
//! window of latency.
//!
//! | state | event        | action                              | next  |
//! |-------|--------------|-------------------------------------|-------|
//! | Idle  | rising edge  | start timer                         | Armed |
//! | Armed | rising edge  | restart timer (extends window)      | Armed |
//! | Armed | timer expiry | confirm if still asserted, else drop | Idle  |
//!
//! The machine is `Copy` and never blocks so it can live inside a
//! critical-section cell and be driven from interrupt context.

/// Debounce state of one button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DebounceState {
    /// No edge pending
    #[default]
    Idle,
    /// Timer running; `edges` counts the raw edges seen in this window
    Armed { edges: u32 },
}

/// Timer command requested by a rising edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    /// Timer was idle and must be started
    Start,
    /// Timer was running and must be restarted to extend the window
    Restart,
}

/// Result of a debounce timer expiry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryOutcome {
    /// Input still asserted: deliver one confirmed press
    Confirmed,
    /// Input released before the window closed: transient, dropped
    Discarded,
    /// Expiry arrived with no armed window (late or duplicate callback)
    Spurious,
}

/// Per-button debounce state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Debounce {
    state: DebounceState,
    confirmed: u32,
    discarded: u32,
}

impl Debounce {
    /// Create a machine in the `Idle` state (const fn for static initialization)
    pub const fn new() -> Self {
        Self {
            state: DebounceState::Idle,
            confirmed: 0,
            discarded: 0,
        }
    }

    /// Current state
    pub fn state(&self) -> DebounceState {
        self.state
    }

    /// Number of presses confirmed so far
    pub fn confirmed(&self) -> u32 {
        self.confirmed
    }

    /// Number of windows that closed with the input released
    pub fn discarded(&self) -> u32 {
        self.discarded
    }

    /// Feed a raw rising edge
    ///
    /// Returns the timer command the caller must issue.
    pub fn on_edge(&mut self) -> TimerCommand {
        match self.state {
            DebounceState::Idle => {
                self.state = DebounceState::Armed { edges: 1 };
                TimerCommand::Start
            }
            DebounceState::Armed { edges } => {
                self.state = DebounceState::Armed {
                    edges: edges.saturating_add(1),
                };
                TimerCommand::Restart
            }
        }
    }

    /// Feed a timer expiry together with the current input level
    pub fn on_expiry(&mut self, asserted: bool) -> ExpiryOutcome {
        match self.state {
            DebounceState::Idle => ExpiryOutcome::Spurious,
            DebounceState::Armed { .. } => {
                self.state = DebounceState::Idle;
                if asserted {
                    self.confirmed = self.confirmed.saturating_add(1);
                    ExpiryOutcome::Confirmed
                } else {
                    self.discarded = self.discarded.saturating_add(1);
                    ExpiryOutcome::Discarded
                }
            }
        }
    }

    /// Drop an armed window without confirming it
    ///
    /// Used when the timer could not be (re)started, so no expiry will come.
    pub fn disarm(&mut self) {
        self.state = DebounceState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_edge_starts_timer() {
        let mut machine = Debounce::new();
        assert_eq!(machine.state(), DebounceState::Idle);

        assert_eq!(machine.on_edge(), TimerCommand::Start);
        assert_eq!(machine.state(), DebounceState::Armed { edges: 1 });
    }

    #[test]
    fn test_edges_while_armed_restart_timer() {
        let mut machine = Debounce::new();
        machine.on_edge();

        assert_eq!(machine.on_edge(), TimerCommand::Restart);
        assert_eq!(machine.on_edge(), TimerCommand::Restart);
        assert_eq!(machine.state(), DebounceState::Armed { edges: 3 });
    }

    #[test]
    fn test_bounce_burst_yields_single_press() {
        let mut machine = Debounce::new();
        for _ in 0..12 {
            machine.on_edge();
        }

        assert_eq!(machine.on_expiry(true), ExpiryOutcome::Confirmed);
        assert_eq!(machine.state(), DebounceState::Idle);

        // A second expiry for the same window is ignored
        assert_eq!(machine.on_expiry(true), ExpiryOutcome::Spurious);
        assert_eq!(machine.confirmed(), 1);
    }

    #[test]
    fn test_released_input_is_discarded() {
        let mut machine = Debounce::new();
        machine.on_edge();

        assert_eq!(machine.on_expiry(false), ExpiryOutcome::Discarded);
        assert_eq!(machine.state(), DebounceState::Idle);
        assert_eq!(machine.confirmed(), 0);
        assert_eq!(machine.discarded(), 1);
    }

    #[test]
    fn test_expiry_without_edge_is_spurious() {
        let mut machine = Debounce::new();
        assert_eq!(machine.on_expiry(true), ExpiryOutcome::Spurious);
        assert_eq!(machine.confirmed(), 0);
    }

    #[test]
    fn test_disarm_returns_to_idle() {
        let mut machine = Debounce::new();
        machine.on_edge();
        machine.disarm();

        assert_eq!(machine.state(), DebounceState::Idle);
        assert_eq!(machine.on_expiry(true), ExpiryOutcome::Spurious);
    }

    #[test]
    fn test_consecutive_presses() {
        let mut machine = Debounce::new();

        machine.on_edge();
        machine.on_edge();
        assert_eq!(machine.on_expiry(true), ExpiryOutcome::Confirmed);

        machine.on_edge();
        assert_eq!(machine.on_expiry(true), ExpiryOutcome::Confirmed);

        assert_eq!(machine.confirmed(), 2);
    }
}
