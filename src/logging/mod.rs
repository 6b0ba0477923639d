//! Logging and observability
//!
//! Structured logging through `tracing`:
//! - Human-readable or JSON console output
//! - Configurable log levels, overridable with `RUST_LOG`
//! - Optional JSON file logging with daily or hourly rotation
//!
//! # Example
//!
//! ```no_run
//! use mdb::logging::init_logging;
//! use mdb::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(backend = "sqlite", "Connected");
//! ```

pub mod structured;

pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log the start of an import into one backend
///
/// # Example
///
/// ```no_run
/// use mdb::log_import_start;
/// use mdb::domain::BackendKind;
///
/// log_import_start!(BackendKind::Sqlite, 250);
/// ```
#[macro_export]
macro_rules! log_import_start {
    ($backend:expr, $count:expr) => {
        tracing::info!(
            backend = %$backend,
            requested = $count,
            "Starting import"
        );
    };
}

/// Log the completion of an import
///
/// # Example
///
/// ```no_run
/// use mdb::log_import_complete;
/// use mdb::domain::BackendKind;
/// use std::time::Duration;
///
/// log_import_complete!(BackendKind::MySql, 248, 2, 0, Duration::from_millis(830));
/// ```
#[macro_export]
macro_rules! log_import_complete {
    ($backend:expr, $inserted:expr, $duplicates:expr, $failed:expr, $duration:expr) => {
        tracing::info!(
            backend = %$backend,
            inserted = $inserted,
            duplicates = $duplicates,
            failed = $failed,
            duration_ms = $duration.as_millis() as u64,
            "Import completed"
        );
    };
}

/// Log a failed backend operation with the full driver error
///
/// # Example
///
/// ```no_run
/// use mdb::log_backend_failure;
/// use mdb::domain::{BackendError, BackendKind};
///
/// let error = BackendError::Disabled(BackendKind::Oracle);
/// log_backend_failure!(BackendKind::Oracle, "connect", &error);
/// ```
#[macro_export]
macro_rules! log_backend_failure {
    ($backend:expr, $operation:expr, $error:expr) => {
        tracing::error!(
            backend = %$backend,
            operation = $operation,
            error = %$error,
            "Backend operation failed"
        );
    };
}
