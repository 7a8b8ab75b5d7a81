//! Logging abstraction
//!
//! Provides unified logging macros that work across different targets:
//! - Embedded (pico2_w): Uses defmt over RTT
//! - Host tests: Uses println!
//! - Host non-test: No-op (arguments are still type-checked)
//!
//! Logs never share the UART with the record stream, so a log line can not
//! corrupt a record.
//!
//! Values that only implement `core::fmt::Display` (the harness error types)
//! go through [`display`] so the same call site works with defmt.

/// Wrap a `Display` value for the active log backend
#[cfg(feature = "pico2_w")]
pub fn display<T: core::fmt::Display + ?Sized>(value: &T) -> defmt::Display2Format<'_, T> {
    defmt::Display2Format(value)
}

/// Wrap a `Display` value for the active log backend
#[cfg(not(feature = "pico2_w"))]
pub fn display<T: core::fmt::Display + ?Sized>(value: &T) -> &T {
    value
}

/// Log informational message
///
/// Arguments are consumed on every target, including host builds where
/// nothing is printed:
///
/// ```
/// #![deny(unused_variables)]
/// let slot = 3;
/// pico_heapscope::log_info!("slot {}", slot);
/// ```
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "pico2_w")]
        ::defmt::info!($($arg)*);

        #[cfg(all(not(feature = "pico2_w"), test))]
        println!("[INFO] {}", format!($($arg)*));

        #[cfg(all(not(feature = "pico2_w"), not(test)))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

/// Log warning message
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "pico2_w")]
        ::defmt::warn!($($arg)*);

        #[cfg(all(not(feature = "pico2_w"), test))]
        println!("[WARN] {}", format!($($arg)*));

        #[cfg(all(not(feature = "pico2_w"), not(test)))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

/// Log error message
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "pico2_w")]
        ::defmt::error!($($arg)*);

        #[cfg(all(not(feature = "pico2_w"), test))]
        eprintln!("[ERROR] {}", format!($($arg)*));

        #[cfg(all(not(feature = "pico2_w"), not(test)))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

/// Log debug message
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "pico2_w")]
        ::defmt::debug!($($arg)*);

        #[cfg(all(not(feature = "pico2_w"), test))]
        println!("[DEBUG] {}", format!($($arg)*));

        #[cfg(all(not(feature = "pico2_w"), not(test)))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

#[cfg(test)]
mod tests {
    use pico_heapscope_core::HarnessError;

    #[test]
    fn test_macros_accept_display_values() {
        let err = HarnessError::AllocationFailed { size: 3200 };
        crate::log_error!("{}", super::display(&err));
        crate::log_info!("slot {}", 3);
        assert_eq!(format!("{}", super::display(&err)), "Malloc failed (3200 bytes)");
    }
}
