//! HTTP error responses
//!
//! Client mistakes become 400 with enough detail to fix the request. Server-side
//! failures become 500 with the category-level message from
//! [`MdbError::public_message`]; the full driver error only goes to the log.

use crate::core::SchemaManager;
use crate::domain::{BackendKind, MdbError};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

/// Error returned by every handler
#[derive(Debug)]
pub enum ApiError {
    /// The path named a backend the operation does not know
    UnsupportedBackend {
        requested: String,
        supported: Vec<&'static str>,
    },

    /// Body missing, malformed or lacking `database`/`data`
    InvalidPayload(String),

    /// Connecting or schema maintenance failed
    Failed { database: String, error: MdbError },

    /// Import, read or any other server-side failure
    Internal {
        database: Option<String>,
        error: MdbError,
    },
}

impl ApiError {
    /// Unknown backend tag, answered with the full supported list
    pub fn unsupported_backend(requested: impl Into<String>) -> Self {
        ApiError::UnsupportedBackend {
            requested: requested.into(),
            supported: BackendKind::supported_tags(),
        }
    }

    /// Map a failed connect or schema call; client errors stay 400
    pub fn failed(database: impl Into<String>, error: MdbError) -> Self {
        let database = database.into();
        match error {
            MdbError::Unsupported { .. } => ApiError::UnsupportedBackend {
                requested: database,
                supported: SchemaManager::supported(),
            },
            error => classify(error).unwrap_or_else(|error| ApiError::Failed { database, error }),
        }
    }

    /// Map a failed import or read; client errors stay 400
    pub fn internal(database: impl Into<String>, error: MdbError) -> Self {
        let database = Some(database.into());
        classify(error).unwrap_or_else(|error| ApiError::Internal { database, error })
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::UnsupportedBackend { .. } | ApiError::InvalidPayload(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Failed { .. } | ApiError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

// Ok(client error) or Err(the server error back)
fn classify(error: MdbError) -> Result<ApiError, MdbError> {
    match error {
        MdbError::UnsupportedBackend(tag) => Ok(ApiError::unsupported_backend(tag)),
        MdbError::Validation(message) => Ok(ApiError::InvalidPayload(message)),
        other => Err(other),
    }
}

/// Example request body returned with every payload error
pub fn example_payload() -> Value {
    json!({
        "database": "mysql",
        "data": [
            { "zipCode": "25627", "sido": "강원특별자치도", "sigungu": "강릉시" }
        ]
    })
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidPayload(rejection.body_text())
    }
}

impl From<MdbError> for ApiError {
    fn from(error: MdbError) -> Self {
        classify(error).unwrap_or_else(|error| ApiError::Internal {
            database: None,
            error,
        })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let timestamp = super::timestamp();

        let body = match self {
            ApiError::UnsupportedBackend {
                requested,
                supported,
            } => {
                tracing::debug!(database = %requested, "Rejected unsupported database");
                json!({
                    "error": "Unsupported database",
                    "database": requested,
                    "supported": supported,
                })
            }
            ApiError::InvalidPayload(message) => {
                tracing::debug!(error = %message, "Rejected request body");
                json!({
                    "error": "database and data array are required",
                    "details": message,
                    "example": example_payload(),
                })
            }
            ApiError::Failed { database, error } => {
                tracing::error!(database = %database, error = %error, "Request failed");
                json!({
                    "status": "Failed",
                    "database": database,
                    "error": error.public_message(),
                    "timestamp": timestamp,
                })
            }
            ApiError::Internal { database, error } => {
                tracing::error!(database = ?database, error = %error, "Request failed");
                json!({
                    "status": "error",
                    "database": database,
                    "message": error.public_message(),
                    "timestamp": timestamp,
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BackendError;

    #[test]
    fn test_unsupported_operation_lists_sqlite() {
        let err = ApiError::failed(
            "mysql",
            MdbError::Unsupported {
                backend: BackendKind::MySql,
                operation: "list tables",
            },
        );
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(matches!(
            err,
            ApiError::UnsupportedBackend { ref supported, .. } if supported == &vec!["sqlite"]
        ));
    }

    #[test]
    fn test_backend_failure_is_server_error() {
        let err = ApiError::failed(
            "oracle",
            BackendError::connection(BackendKind::Oracle, "ORA-12541: TNS:no listener"),
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_unknown_tag_from_domain_error() {
        let err: ApiError = MdbError::UnsupportedBackend("redis".to_string()).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(matches!(
            err,
            ApiError::UnsupportedBackend { ref requested, ref supported }
                if requested == "redis" && supported.len() == 5
        ));
    }
}
