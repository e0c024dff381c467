//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Configurable log levels (overridable with `RUST_LOG`)
//! - Local JSON file logging with rotation
//! - Macros for the events every transfer emits
//!
//! # Example
//!
//! ```no_run
//! use ferry::logging::init_logging;
//! use ferry::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log the start of a transfer
///
/// # Example
///
/// ```no_run
/// use ferry::log_transfer_start;
///
/// log_transfer_start!("create", "directory data/Patient", 12, "Patient");
/// ```
#[macro_export]
macro_rules! log_transfer_start {
    ($op:expr, $source:expr, $items:expr, $expected:expr) => {
        tracing::info!(
            op = %$op,
            source = %$source,
            items = $items,
            expected_type = %$expected,
            "Starting transfer"
        );
    };
}

/// Log the completion of a transfer
#[macro_export]
macro_rules! log_transfer_complete {
    ($op:expr, $attempted:expr, $succeeded:expr, $failed:expr, $skipped:expr, $duration_ms:expr) => {
        tracing::debug!(
            op = %$op,
            attempted = $attempted,
            succeeded = $succeeded,
            failed = $failed,
            skipped = $skipped,
            duration_ms = $duration_ms,
            "Transfer finished"
        );
    };
}

/// Log one failed item
///
/// # Example
///
/// ```no_run
/// use ferry::log_item_failure;
///
/// log_item_failure!("p1.json", "Malformed JSON in p1.json: EOF while parsing");
/// ```
#[macro_export]
macro_rules! log_item_failure {
    ($item:expr, $error:expr) => {
        tracing::warn!(
            item = %$item,
            error = %$error,
            "Transfer item failed"
        );
    };
}
