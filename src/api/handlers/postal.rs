//! Postal record endpoints

use super::parse_backend;
use crate::adapters::database::Page;
use crate::api::error::ApiError;
use crate::api::{timestamp, AppState};
use crate::config::ApiConfig;
use crate::domain::PostalRecord;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

/// Body of `POST /api/postal/insert`
#[derive(Debug, Deserialize)]
pub struct InsertRequest {
    pub database: Option<String>,
    pub data: Option<Vec<PostalRecord>>,
}

/// Raw `limit`/`offset` query values
///
/// Kept as strings so unparsable values fall back to defaults instead of rejecting
/// the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// Resolve query values into a page window
///
/// `limit` falls back to the default when missing, zero or unparsable and is capped
/// at the configured maximum. `offset` falls back to zero.
pub fn resolve_page(params: &PageParams, api: &ApiConfig) -> Page {
    let limit = params
        .limit
        .as_deref()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .filter(|limit| *limit > 0)
        .unwrap_or(api.default_page_size)
        .min(api.max_page_size);
    let offset = params
        .offset
        .as_deref()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .unwrap_or(0);

    Page::new(limit, offset)
}

/// `POST /api/postal/insert`
pub async fn insert(
    State(state): State<AppState>,
    payload: Result<Json<InsertRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload?;

    let (database, records) = match (request.database, request.data) {
        (Some(database), Some(records)) if !database.is_empty() => (database, records),
        _ => {
            return Err(ApiError::InvalidPayload(
                "missing `database` or `data`".to_string(),
            ))
        }
    };
    let kind = parse_backend(&database)?;

    let summary = state
        .importer
        .import(kind, &records)
        .await
        .map_err(|e| ApiError::internal(&database, e))?;

    Ok(Json(json!({
        "status": "success",
        "database": kind,
        "requested": summary.requested,
        "inserted": summary.inserted,
        "duplicates": summary.duplicates,
        "failed": summary.failed,
        "durationMs": summary.duration.as_millis() as u64,
        "message": format!("{} records inserted into {kind}", summary.inserted),
        "timestamp": timestamp(),
    })))
}

/// `GET /api/postal/:database/data`
pub async fn data(
    State(state): State<AppState>,
    Path(database): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<Value>, ApiError> {
    let kind = parse_backend(&database)?;
    let page = resolve_page(&params, &state.config.api);

    let result = state
        .reader
        .read(kind, page)
        .await
        .map_err(|e| ApiError::internal(&database, e))?;

    Ok(Json(json!({
        "status": "success",
        "database": kind,
        "data": result.records,
        "count": result.page_size,
        "totalCount": result.total_count,
        "limit": page.limit,
        "offset": page.offset,
        "timestamp": timestamp(),
    })))
}

/// `GET /api/postal/stats`
pub async fn stats(State(state): State<AppState>) -> Json<Value> {
    let stats = state.stats.collect().await;
    Json(serde_json::to_value(stats).unwrap_or_else(|_| json!({})))
}
