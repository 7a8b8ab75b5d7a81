//! Debounced push button
//!
//! Glues the pure [`Debounce`] machine to a pin, a one-shot timer and the
//! press notification of a control loop.
//!
//! # Contexts
//!
//! - [`ButtonDebouncer::on_rising_edge`] runs in the edge interrupt (or the
//!   task standing in for it)
//! - [`ButtonDebouncer::on_timer_expired`] runs in the timer expiry context
//!
//! Neither blocks: the machine lives in a critical-section cell and the press
//! is delivered through an interrupt-safe [`Notification`].
//!
//! If the timer could not be created the button is inert: edges are ignored
//! and no press is ever confirmed. The other button is unaffected.

use core::cell::Cell;

use critical_section::Mutex;
use pico_heapscope_core::debounce::{Debounce, ExpiryOutcome, TimerCommand};
use pico_heapscope_core::HarnessError;

use crate::core::scheduler::Notification;
use crate::platform::traits::{GpioInterface, OneShotTimer};
use crate::platform::PlatformError;

/// Button with debounce timer and press notification
pub struct ButtonDebouncer<P, T> {
    name: &'static str,
    pin: P,
    timer: Option<T>,
    machine: Mutex<Cell<Debounce>>,
    press: Notification,
}

impl<P: GpioInterface, T: OneShotTimer> ButtonDebouncer<P, T> {
    /// Create a button from its pin and the outcome of creating its timer
    ///
    /// A failed timer is logged as `HarnessError::TimerCreationFailed` and
    /// leaves the button inert.
    pub fn new(name: &'static str, pin: P, timer: Result<T, PlatformError>) -> Self {
        let timer = match timer {
            Ok(timer) => Some(timer),
            Err(_) => {
                let err = HarnessError::TimerCreationFailed { button: name };
                crate::log_error!("{}", crate::core::logging::display(&err));
                None
            }
        };

        Self {
            name,
            pin,
            timer,
            machine: Mutex::new(Cell::new(Debounce::new())),
            press: Notification::new(),
        }
    }

    /// Button name for logging
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Pin sampled at the end of a debounce window
    pub fn pin(&self) -> &P {
        &self.pin
    }

    /// Whether the button can ever deliver a press
    pub fn is_operational(&self) -> bool {
        self.timer.is_some()
    }

    /// Notification signalled once per confirmed press
    pub fn press_signal(&self) -> &Notification {
        &self.press
    }

    /// Debounce timer, if it was created
    pub fn timer(&self) -> Option<&T> {
        self.timer.as_ref()
    }

    /// Copy of the debounce machine
    pub fn machine(&self) -> Debounce {
        critical_section::with(|cs| self.machine.borrow(cs).get())
    }

    /// Feed a raw rising edge
    ///
    /// Returns the timer command that was issued, or `None` for an inert
    /// button or a rejected restart.
    pub fn on_rising_edge(&self) -> Option<TimerCommand> {
        let timer = self.timer.as_ref()?;
        let command = self.update(|m| m.on_edge());

        match timer.restart() {
            Ok(()) => Some(command),
            Err(e) => {
                // No expiry will follow, so the window must not stay armed
                self.update(|m| m.disarm());
                crate::log_warn!("{}: debounce restart failed: {}", self.name, e);
                None
            }
        }
    }

    /// Feed a timer expiry
    ///
    /// Samples the pin; a window that closes with the line still asserted
    /// signals exactly one press.
    pub fn on_timer_expired(&self) -> ExpiryOutcome {
        let asserted = self.pin.read();
        let outcome = self.update(|m| m.on_expiry(asserted));

        if outcome == ExpiryOutcome::Confirmed {
            self.press.signal(());
        }
        outcome
    }

    fn update<R>(&self, f: impl FnOnce(&mut Debounce) -> R) -> R {
        critical_section::with(|cs| {
            let cell = self.machine.borrow(cs);
            let mut machine = cell.get();
            let result = f(&mut machine);
            cell.set(machine);
            result
        })
    }
}
