//! HTTP handlers

pub mod databases;
pub mod health;
pub mod postal;
pub mod schema;

use crate::api::error::ApiError;
use crate::domain::BackendKind;

pub use health::{api_index, health, not_found};

/// Parse the `:database` path segment
pub(crate) fn parse_backend(tag: &str) -> Result<BackendKind, ApiError> {
    tag.parse().map_err(|_| ApiError::unsupported_backend(tag))
}
