//! Mock one-shot timer for testing

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::platform::{
    error::{PlatformError, TimerError},
    traits::OneShotTimer,
    Result,
};

/// Mock one-shot timer
///
/// Records restarts instead of counting down. A test plays the timer
/// service: it checks [`is_armed`](Self::is_armed), then calls
/// [`take_expiry`](Self::take_expiry) and forwards the expiry to the
/// debouncer.
#[derive(Debug)]
pub struct MockOneShotTimer {
    period_ms: u32,
    armed: AtomicBool,
    restarts: AtomicU32,
    reject_restarts: AtomicBool,
}

impl MockOneShotTimer {
    /// Create an idle timer with the given period
    pub fn new(period_ms: u32) -> Self {
        Self {
            period_ms,
            armed: AtomicBool::new(false),
            restarts: AtomicU32::new(0),
            reject_restarts: AtomicBool::new(false),
        }
    }

    /// Simulate a timer service that cannot create the timer
    pub fn create_failing(_period_ms: u32) -> Result<Self> {
        Err(PlatformError::Timer(TimerError::CreationFailed))
    }

    /// Whether a window is running
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }

    /// Number of (re)starts issued
    pub fn restarts(&self) -> u32 {
        self.restarts.load(Ordering::SeqCst)
    }

    /// Make subsequent restarts fail
    pub fn reject_restarts(&self, reject: bool) {
        self.reject_restarts.store(reject, Ordering::SeqCst);
    }

    /// Let the running window elapse
    ///
    /// Returns `true` if the timer was armed, i.e. an expiry callback is due.
    pub fn take_expiry(&self) -> bool {
        self.armed.swap(false, Ordering::SeqCst)
    }
}

impl OneShotTimer for MockOneShotTimer {
    fn period_ms(&self) -> u32 {
        self.period_ms
    }

    fn restart(&self) -> Result<()> {
        if self.reject_restarts.load(Ordering::SeqCst) {
            return Err(PlatformError::Timer(TimerError::CommandRejected));
        }
        self.restarts.fetch_add(1, Ordering::SeqCst);
        self.armed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
