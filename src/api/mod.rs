//! HTTP API
//!
//! An axum [`Router`] over shared [`AppState`]. Routes:
//!
//! | Method | Path |
//! |---|---|
//! | GET | `/health`, `/api` |
//! | GET | `/api/databases/health`, `/api/databases/info` |
//! | POST | `/api/databases/connect/:database` |
//! | POST | `/api/postal/insert` |
//! | GET | `/api/postal/:database/data`, `/api/postal/stats` |
//! | POST | `/api/schema/init/:database` |
//! | GET | `/api/schema/tables/:database` |

pub mod error;
pub mod handlers;

use crate::adapters::database::ConnectionRegistry;
use crate::config::MdbConfig;
use crate::core::{RecordImporter, RecordReader, SchemaManager, StatsReporter};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use chrono::{SecondsFormat, Utc};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<MdbConfig>,
    pub registry: Arc<ConnectionRegistry>,
    pub importer: Arc<RecordImporter>,
    pub reader: Arc<RecordReader>,
    pub stats: Arc<StatsReporter>,
    pub schema: Arc<SchemaManager>,
}

impl AppState {
    pub fn new(config: Arc<MdbConfig>, registry: Arc<ConnectionRegistry>) -> Self {
        Self {
            importer: Arc::new(RecordImporter::new(Arc::clone(&registry))),
            reader: Arc::new(RecordReader::new(Arc::clone(&registry))),
            stats: Arc::new(StatsReporter::new(Arc::clone(&registry))),
            schema: Arc::new(SchemaManager::new(Arc::clone(&registry))),
            config,
            registry,
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api", get(handlers::api_index))
        .nest("/api/databases", database_routes())
        .nest("/api/postal", postal_routes())
        .nest("/api/schema", schema_routes())
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn database_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::databases::health))
        .route("/connect/:database", post(handlers::databases::connect))
        .route("/info", get(handlers::databases::info))
}

fn postal_routes() -> Router<AppState> {
    Router::new()
        .route("/insert", post(handlers::postal::insert))
        .route("/stats", get(handlers::postal::stats))
        .route("/:database/data", get(handlers::postal::data))
}

fn schema_routes() -> Router<AppState> {
    Router::new()
        .route("/init/:database", post(handlers::schema::init))
        .route("/tables/:database", get(handlers::schema::tables))
}

/// Current time in the `2025-01-01T00:00:00.000Z` form
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
