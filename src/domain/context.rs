//! Error context extension trait
//!
//! `.context()` / `.with_context()` in the style of `anyhow::Context`, but the result
//! stays a [`MdbError`].
//!
//! # Examples
//!
//! ```rust
//! use mdb::domain::Result;
//! use mdb::domain::context::ResultExt;
//!
//! fn read_sample(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path).context(format!("Failed to read {path}"))
//! }
//! ```

use crate::domain::errors::MdbError;
use crate::domain::result::Result;

/// Extension trait for adding context to `Result` types
pub trait ResultExt<T> {
    /// Add context to an error
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static;

    /// Add context computed only when the result is an error
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<MdbError>,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| wrap(e.into(), context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| wrap(e.into(), f()))
    }
}

// Client errors keep their variant so HTTP mapping still returns 400
fn wrap(base: MdbError, context: impl std::fmt::Display) -> MdbError {
    match base {
        MdbError::Validation(msg) => MdbError::Validation(format!("{context}: {msg}")),
        MdbError::Configuration(msg) => MdbError::Configuration(format!("{context}: {msg}")),
        other => MdbError::Other(format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BackendError, BackendKind};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_context_wraps_backend_error() {
        let result: Result<()> = Err(BackendError::connection(BackendKind::MySql, "refused"));
        let err = result.context("Failed to import into mysql").unwrap_err();

        assert!(matches!(err, MdbError::Other(_)));
        let msg = err.to_string();
        assert!(msg.contains("Failed to import into mysql"));
        assert!(msg.contains("refused"));
    }

    #[test]
    fn test_context_keeps_configuration_variant() {
        let result: Result<()> = Err(MdbError::Configuration("server.port cannot be 0".into()));
        let err = result.context("mdb.toml").unwrap_err();

        assert!(matches!(err, MdbError::Configuration(_)));
        assert!(err.to_string().contains("mdb.toml: server.port cannot be 0"));
    }

    #[test]
    fn test_with_context_is_lazy() {
        let called = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&called);

        let result: Result<i32> = Ok(42);
        let value = result
            .with_context(|| {
                flag.store(true, Ordering::SeqCst);
                "unused"
            })
            .unwrap();

        assert_eq!(value, 42);
        assert!(!called.load(Ordering::SeqCst));
    }

    #[test]
    fn test_context_from_io_error() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = result.context("Failed to write mdb.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to write mdb.toml"));
        assert!(err.to_string().contains("denied"));
    }
}
