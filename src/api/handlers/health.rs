//! Service-level endpoints

use crate::api::timestamp;
use axum::extract::OriginalUri;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

pub const SERVICE_NAME: &str = "MDB Backend API";

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "timestamp": timestamp(),
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `GET /api`
pub async fn api_index() -> Json<Value> {
    Json(json!({
        "message": "Multi-Database Management System API",
        "endpoints": {
            "health": "/health",
            "databases": "/api/databases",
            "postal": "/api/postal",
            "schema": "/api/schema",
        }
    }))
}

/// Fallback for every unmatched route
pub async fn not_found(OriginalUri(uri): OriginalUri) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Route not found",
            "path": uri.path(),
        })),
    )
}
