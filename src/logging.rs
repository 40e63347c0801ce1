//! Logging macros
//!
//! The program logs through these macros rather than calling a backend
//! directly. They forward to the `tracing` facade; the host decides where
//! the records go by installing a subscriber (the simulator does this in
//! `turbine_sitl::logging::init`). Without a subscriber they are no-ops.
//!
//! The plan engine in `turbine_core` does not log. It returns executor
//! events and the program logs those here.

#[doc(hidden)]
pub use tracing as __tracing;

/// Log info message
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::logging::__tracing::info!($($arg)*)
    };
}

/// Log warning message
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::logging::__tracing::warn!($($arg)*)
    };
}

/// Log error message
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::logging::__tracing::error!($($arg)*)
    };
}

/// Log debug message
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::logging::__tracing::debug!($($arg)*)
    };
}

/// Log trace message
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {
        $crate::logging::__tracing::trace!($($arg)*)
    };
}
