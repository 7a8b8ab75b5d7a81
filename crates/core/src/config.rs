//! Compile-time harness configuration
//!
//! The harness has no runtime configuration. Every tunable is a named
//! constant here so that firmware, mocks and tests agree on the same values.

/// Debounce window applied to each button, in milliseconds
pub const DEBOUNCE_PERIOD_MS: u32 = 50;

/// Maximum number of concurrently alive scenario tasks
pub const POOL_CAPACITY: usize = 35;

/// Delay after each record emission so the transport can drain, in milliseconds
pub const SETTLE_DELAY_MS: u32 = 100;

/// Heartbeat LED on/off half-period, in milliseconds
pub const HEARTBEAT_PERIOD_MS: u32 = 10_000;

/// Size of the instrumented heap region in bytes
///
/// Analysis tooling computes heap usage as a percentage of this value.
pub const INSTRUMENTED_HEAP_SIZE: usize = 128 * 1024;

/// GPIO pin of the button that adds a scenario task
pub const GROW_BUTTON_PIN: u8 = 15;

/// GPIO pin of the button that tears down the newest scenario task
pub const SHRINK_BUTTON_PIN: u8 = 14;

/// GPIO pin of the heartbeat LED (board default LED)
pub const HEARTBEAT_LED_PIN: u8 = 25;

/// UART baud rate of the record stream
pub const RECORD_BAUD_RATE: u32 = 115_200;

/// Scheduling profile of a spawned task
///
/// The scheduler collaborator receives this when a task is created. On the
/// cooperative Embassy executor the priority is advisory and only reported
/// at spawn; the stack budget documents the worst-case frame size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskProfile {
    /// Human-readable task name for logging
    pub name: &'static str,

    /// Priority hint (higher = more important)
    pub priority: u8,

    /// Stack budget in 32-bit words
    pub stack_words: u16,
}

/// Idle priority baseline
pub const IDLE_PRIORITY: u8 = 0;

/// Button control tasks (grow/shrink consumers)
pub const CONTROL_TASK: TaskProfile = TaskProfile {
    name: "button_control",
    priority: IDLE_PRIORITY + 4,
    stack_words: 256,
};

/// Allocation scenario worker tasks
pub const SCENARIO_TASK: TaskProfile = TaskProfile {
    name: "heap_scenario",
    priority: IDLE_PRIORITY + 2,
    stack_words: 1000,
};

/// Heartbeat LED task
pub const HEARTBEAT_TASK: TaskProfile = TaskProfile {
    name: "heartbeat",
    priority: IDLE_PRIORITY + 1,
    stack_words: 256,
};
