//! Connection management endpoints

use super::parse_backend;
use crate::api::error::ApiError;
use crate::api::{timestamp, AppState};
use crate::domain::BackendKind;
use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Map, Value};

/// `GET /api/databases/health`
///
/// Pings cached handles only; a backend nobody has connected yet reads as
/// `unconfigured`.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let statuses = state.registry.health_check().await;

    let databases: Map<String, Value> = statuses
        .iter()
        .map(|(kind, status)| (kind.to_string(), Value::Bool(status.is_healthy())))
        .collect();
    let connected = statuses.values().filter(|s| s.is_healthy()).count();

    Json(json!({
        "status": "OK",
        "connected": connected,
        "total": statuses.len(),
        "databases": databases,
        "details": statuses,
        "timestamp": timestamp(),
    }))
}

/// `POST /api/databases/connect/:database`
///
/// Always reconnects, closing any cached handle first.
pub async fn connect(
    State(state): State<AppState>,
    Path(database): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let kind = parse_backend(&database)?;

    state
        .registry
        .reset(kind)
        .await
        .map_err(|e| ApiError::failed(&database, e))?;

    Ok(Json(json!({
        "status": "Connected",
        "database": kind,
        "timestamp": timestamp(),
    })))
}

/// `GET /api/databases/info`
pub async fn info() -> Json<Value> {
    let databases: Map<String, Value> = BackendKind::ALL
        .iter()
        .map(|kind| {
            let info = serde_json::to_value(kind.info()).unwrap_or(Value::Null);
            (kind.to_string(), info)
        })
        .collect();

    Json(json!({
        "status": "OK",
        "databases": databases,
        "timestamp": timestamp(),
    }))
}
