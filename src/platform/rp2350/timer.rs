//! Embassy one-shot timer
//!
//! A restartable single-shot timer built from a restart [`Signal`] and
//! `embassy_time::Timer`. [`OneShotTimer::restart`] only signals, so it is
//! safe from any context; the expiry is observed by whichever task awaits
//! [`EmbassyOneShot::wait_expiry`] (the debounce timer task of a button).

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::Timer;

use crate::platform::{
    error::{PlatformError, TimerError},
    traits::OneShotTimer,
    Result,
};

/// Restartable one-shot timer
pub struct EmbassyOneShot {
    period_ms: u32,
    restart: Signal<CriticalSectionRawMutex, ()>,
}

impl EmbassyOneShot {
    /// Create a timer with a period of `period_ms`
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Timer(TimerError::CreationFailed)` for a zero
    /// period.
    pub fn create(period_ms: u32) -> Result<Self> {
        if period_ms == 0 {
            return Err(PlatformError::Timer(TimerError::CreationFailed));
        }
        Ok(Self {
            period_ms,
            restart: Signal::new(),
        })
    }

    /// Wait until the timer is started and then runs a full period without
    /// being restarted
    pub async fn wait_expiry(&self) {
        self.restart.wait().await;
        loop {
            match select(Timer::after_millis(self.period_ms as u64), self.restart.wait()).await {
                Either::First(()) => return,
                Either::Second(()) => {}
            }
        }
    }
}

impl OneShotTimer for EmbassyOneShot {
    fn period_ms(&self) -> u32 {
        self.period_ms
    }

    fn restart(&self) -> Result<()> {
        self.restart.signal(());
        Ok(())
    }
}
