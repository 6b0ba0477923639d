//! Schema maintenance endpoints (sqlite only)

use crate::api::error::ApiError;
use crate::api::{timestamp, AppState};
use crate::core::SchemaManager;
use crate::domain::BackendKind;
use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

/// `POST /api/schema/init/:database`
pub async fn init(
    State(state): State<AppState>,
    Path(database): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let kind = parse_schema_backend(&database)?;

    state
        .schema
        .init(kind)
        .await
        .map_err(|e| ApiError::failed(&database, e))?;

    Ok(Json(json!({
        "status": "Success",
        "database": kind,
        "message": "SQLite tables created successfully",
        "timestamp": timestamp(),
    })))
}

/// `GET /api/schema/tables/:database`
pub async fn tables(
    State(state): State<AppState>,
    Path(database): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let kind = parse_schema_backend(&database)?;

    let tables = state
        .schema
        .list_tables(kind)
        .await
        .map_err(|e| ApiError::failed(&database, e))?;

    Ok(Json(json!({
        "status": "Success",
        "database": kind,
        "tables": tables,
        "timestamp": timestamp(),
    })))
}

// Unknown tags answer with the schema-capable list, not all five backends
fn parse_schema_backend(tag: &str) -> Result<BackendKind, ApiError> {
    tag.parse().map_err(|_| ApiError::UnsupportedBackend {
        requested: tag.to_string(),
        supported: SchemaManager::supported(),
    })
}
