//! Domain error types
//!
//! This module defines the error hierarchy for MDB. Driver-specific error types never
//! leak out of the adapters; they are converted into [`BackendError`] with the backend
//! kind attached so callers can tell which store failed.

use super::backend::BackendKind;
use thiserror::Error;

/// Main MDB error type
///
/// This is the primary error type used throughout the application.
#[derive(Debug, Error)]
pub enum MdbError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The caller named a backend tag that is not one of the supported five
    #[error("Unsupported database backend: {0}")]
    UnsupportedBackend(String),

    /// Request validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Backend driver errors
    #[error("{0}")]
    Backend(#[from] BackendError),

    /// The operation exists but not for this backend (e.g. schema listing outside sqlite)
    #[error("Operation '{operation}' is not supported by {backend}")]
    Unsupported {
        backend: BackendKind,
        operation: &'static str,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl MdbError {
    /// Message that is safe to hand to an HTTP caller
    ///
    /// Driver text can contain hostnames, SQL fragments or credentials, so backend
    /// failures are reduced to their category. The full error is logged at the call site.
    pub fn public_message(&self) -> String {
        match self {
            MdbError::Backend(err) => err.public_message(),
            MdbError::Configuration(_) => "Server configuration error".to_string(),
            MdbError::Io(_) | MdbError::Other(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }

    /// Whether the error was caused by the request rather than the server
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            MdbError::UnsupportedBackend(_)
                | MdbError::Validation(_)
                | MdbError::Unsupported { .. }
        )
    }
}

/// Backend driver errors
///
/// Every variant records which backend raised it and the driver message.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Failed to establish a connection or session
    #[error("{backend} connection failed: {message}")]
    ConnectionFailed {
        backend: BackendKind,
        message: String,
    },

    /// DDL or collection setup failed
    #[error("{backend} schema setup failed: {message}")]
    SchemaFailed {
        backend: BackendKind,
        message: String,
    },

    /// A single insert failed for a reason other than a duplicate key
    #[error("{backend} insert failed: {message}")]
    InsertFailed {
        backend: BackendKind,
        message: String,
    },

    /// A read or count query failed
    #[error("{backend} query failed: {message}")]
    QueryFailed {
        backend: BackendKind,
        message: String,
    },

    /// Releasing the handle failed
    #[error("{backend} close failed: {message}")]
    CloseFailed {
        backend: BackendKind,
        message: String,
    },

    /// The backend is switched off in configuration
    #[error("{0} is disabled in configuration")]
    Disabled(BackendKind),
}

impl BackendError {
    /// Backend that raised the error
    pub fn backend(&self) -> BackendKind {
        match self {
            BackendError::ConnectionFailed { backend, .. }
            | BackendError::SchemaFailed { backend, .. }
            | BackendError::InsertFailed { backend, .. }
            | BackendError::QueryFailed { backend, .. }
            | BackendError::CloseFailed { backend, .. } => *backend,
            BackendError::Disabled(backend) => *backend,
        }
    }

    /// Category-level message without driver detail
    pub fn public_message(&self) -> String {
        match self {
            BackendError::ConnectionFailed { backend, .. } => {
                format!("Could not connect to {backend}")
            }
            BackendError::SchemaFailed { backend, .. } => {
                format!("Could not prepare the {backend} schema")
            }
            BackendError::InsertFailed { backend, .. } => format!("Insert into {backend} failed"),
            BackendError::QueryFailed { backend, .. } => format!("Query against {backend} failed"),
            BackendError::CloseFailed { backend, .. } => {
                format!("Could not close the {backend} connection")
            }
            BackendError::Disabled(backend) => format!("{backend} is disabled"),
        }
    }

    pub(crate) fn connection(backend: BackendKind, err: impl std::fmt::Display) -> MdbError {
        BackendError::ConnectionFailed {
            backend,
            message: err.to_string(),
        }
        .into()
    }

    pub(crate) fn schema(backend: BackendKind, err: impl std::fmt::Display) -> MdbError {
        BackendError::SchemaFailed {
            backend,
            message: err.to_string(),
        }
        .into()
    }

    pub(crate) fn insert(backend: BackendKind, err: impl std::fmt::Display) -> MdbError {
        BackendError::InsertFailed {
            backend,
            message: err.to_string(),
        }
        .into()
    }

    pub(crate) fn query(backend: BackendKind, err: impl std::fmt::Display) -> MdbError {
        BackendError::QueryFailed {
            backend,
            message: err.to_string(),
        }
        .into()
    }

    pub(crate) fn close(backend: BackendKind, err: impl std::fmt::Display) -> MdbError {
        BackendError::CloseFailed {
            backend,
            message: err.to_string(),
        }
        .into()
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for MdbError {
    fn from(err: std::io::Error) -> Self {
        MdbError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for MdbError {
    fn from(err: serde_json::Error) -> Self {
        MdbError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for MdbError {
    fn from(err: toml::de::Error) -> Self {
        MdbError::Configuration(format!("TOML parse error: {err}"))
    }
}
