//! Heap instrumentation firmware for RP2350
//!
//! Grow button (GPIO15) adds a scenario task, shrink button (GPIO14) tears
//! down the newest one. Every allocation or free performed by a scenario
//! emits one 14-field CSV line on UART0 (GPIO0 TX, 115200 baud). Logs go to
//! defmt over RTT and never touch the record stream.
//!
//! # Hardware
//!
//! Raspberry Pi Pico 2 W
//! - Buttons between GPIO15 / GPIO14 and 3V3 (internal pull-downs)
//! - UART0 TX (GPIO 0) → USB-serial RX
//! - On-board LED (GPIO25) blinks as heartbeat
//!
//! # Usage
//!
//! ```bash
//! cargo build --release --target thumbv8m.main-none-eabihf \
//!     --no-default-features --features pico2_w --example heapscope_firmware
//! ```

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_rp as hal;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::uart::BufferedUart;
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use pico_heapscope::core::heap::{log_startup_report, ALLOCATOR_COUNTERS};
use pico_heapscope::core::logging::display;
use pico_heapscope::core::scheduler::{ScenarioSpawner, ScenarioTask, TaskHandle};
use pico_heapscope::core::traits::EmbassyTime;
use pico_heapscope::core::Harness;
use pico_heapscope::devices::{ButtonDebouncer, Heartbeat};
use pico_heapscope::platform::rp2350::{
    EmbassyOneShot, Rp2350Heap, Rp2350Led, Rp2350Uart, SioInputPin, INSTRUMENTED_HEAP,
};
use pico_heapscope::platform::traits::{GpioMode, HeapInterface};
use pico_heapscope_core::config::{
    TaskProfile, CONTROL_TASK, DEBOUNCE_PERIOD_MS, GROW_BUTTON_PIN, HEARTBEAT_TASK,
    POOL_CAPACITY, RECORD_BAUD_RATE, SCENARIO_TASK, SHRINK_BUTTON_PIN,
};
use pico_heapscope_core::scenario::STANDARD;
use pico_heapscope_core::HarnessError;

hal::bind_interrupts!(struct Irqs {
    UART0_IRQ => embassy_rp::uart::BufferedInterruptHandler<hal::peripherals::UART0>;
});

type FirmwareHarness = Harness<'static, &'static Rp2350Heap, EmbassyTime, Rp2350Uart>;
type Button = ButtonDebouncer<SioInputPin, EmbassyOneShot>;

static HARNESS: StaticCell<FirmwareHarness> = StaticCell::new();
static GROW_BUTTON: StaticCell<Button> = StaticCell::new();
static SHRINK_BUTTON: StaticCell<Button> = StaticCell::new();

/// Spawns scenario tasks into the Embassy task pool
struct FirmwareSpawner {
    spawner: Spawner,
    harness: &'static FirmwareHarness,
}

impl ScenarioSpawner for FirmwareSpawner {
    fn spawn(&self, task: TaskHandle) -> Result<(), HarnessError> {
        let token = scenario_task(self.harness, task)
            .map_err(|_| HarnessError::TaskCreationFailed { slot: task.slot })?;
        self.spawner.spawn(token);
        Ok(())
    }
}

fn announce(profile: &TaskProfile) {
    pico_heapscope::log_info!(
        "Spawning {} (priority {}, stack {} words)",
        profile.name,
        profile.priority,
        profile.stack_words
    );
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());

    pico_heapscope::log_info!("=== pico_heapscope ===");

    let heap: &'static Rp2350Heap = &INSTRUMENTED_HEAP;
    log_startup_report(&heap.stats());

    // Record stream: UART0 (GPIO 0 TX, GPIO 1 RX)
    let mut uart_config = embassy_rp::uart::Config::default();
    uart_config.baudrate = RECORD_BAUD_RATE;

    static mut UART0_TX_BUF: [u8; 512] = [0; 512];
    static mut UART0_RX_BUF: [u8; 16] = [0; 16];

    let uart0 = BufferedUart::new(
        p.UART0,
        p.PIN_0,
        p.PIN_1,
        Irqs,
        unsafe { &mut *core::ptr::addr_of_mut!(UART0_TX_BUF) },
        unsafe { &mut *core::ptr::addr_of_mut!(UART0_RX_BUF) },
        uart_config,
    );

    let harness = match Harness::new(
        heap,
        EmbassyTime,
        Rp2350Uart::new(uart0),
        &ALLOCATOR_COUNTERS,
        STANDARD,
    ) {
        Ok(harness) => HARNESS.init(harness),
        Err(e) => {
            pico_heapscope::log_error!("Script '{}' rejected: {}", STANDARD.name, display(&e));
            return;
        }
    };

    // Buttons: edge detection owns the pin, the debounce expiry samples SIO
    let (Ok(grow_level), Ok(shrink_level)) = (
        SioInputPin::new(GROW_BUTTON_PIN, GpioMode::InputPullDown),
        SioInputPin::new(SHRINK_BUTTON_PIN, GpioMode::InputPullDown),
    ) else {
        pico_heapscope::log_error!("Button pins outside bank 0");
        return;
    };

    let grow = GROW_BUTTON.init(ButtonDebouncer::new(
        "grow",
        grow_level,
        EmbassyOneShot::create(DEBOUNCE_PERIOD_MS),
    ));
    let shrink = SHRINK_BUTTON.init(ButtonDebouncer::new(
        "shrink",
        shrink_level,
        EmbassyOneShot::create(DEBOUNCE_PERIOD_MS),
    ));

    let grow_input = Input::new(p.PIN_15, Pull::Down);
    let shrink_input = Input::new(p.PIN_14, Pull::Down);

    announce(&CONTROL_TASK);
    spawner.spawn(edge_task(grow_input, grow).unwrap());
    spawner.spawn(debounce_timer_task(grow).unwrap());
    spawner.spawn(grow_control_task(harness, grow).unwrap());

    announce(&CONTROL_TASK);
    spawner.spawn(edge_task(shrink_input, shrink).unwrap());
    spawner.spawn(debounce_timer_task(shrink).unwrap());
    spawner.spawn(shrink_control_task(harness, shrink).unwrap());

    announce(&HEARTBEAT_TASK);
    let led = Rp2350Led::new(Output::new(p.PIN_25, Level::Low));
    spawner.spawn(heartbeat_task(led).unwrap());

    pico_heapscope::log_info!(
        "Ready: {} scenario slots, script '{}' ({} steps)",
        POOL_CAPACITY,
        STANDARD.name,
        STANDARD.steps.len()
    );
}

/// Raw rising edges of one button
#[embassy_executor::task(pool_size = 2)]
async fn edge_task(mut input: Input<'static>, button: &'static Button) {
    loop {
        input.wait_for_rising_edge().await;
        button.on_rising_edge();
    }
}

/// Debounce window expiries of one button
#[embassy_executor::task(pool_size = 2)]
async fn debounce_timer_task(button: &'static Button) {
    let Some(timer) = button.timer() else {
        pico_heapscope::log_warn!("{} button inert", button.name());
        return;
    };
    loop {
        timer.wait_expiry().await;
        button.on_timer_expired();
    }
}

#[embassy_executor::task]
async fn grow_control_task(harness: &'static FirmwareHarness, button: &'static Button) {
    let spawner = FirmwareSpawner {
        spawner: Spawner::for_current_executor().await,
        harness,
    };
    announce(&SCENARIO_TASK);
    harness
        .pool()
        .run_grow_control(button.press_signal(), &spawner)
        .await
}

#[embassy_executor::task]
async fn shrink_control_task(harness: &'static FirmwareHarness, button: &'static Button) {
    harness.pool().run_shrink_control(button.press_signal()).await
}

#[embassy_executor::task(pool_size = POOL_CAPACITY)]
async fn scenario_task(harness: &'static FirmwareHarness, task: TaskHandle) {
    ScenarioTask::new(harness, task).run(&mut Delay).await;
}

#[embassy_executor::task]
async fn heartbeat_task(led: Rp2350Led) {
    Heartbeat::new(led).run(&mut Delay).await;
}
