//! HTTP routing and response shapes against in-memory backends

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use common::FakeFactory;
use mdb::adapters::database::ConnectionRegistry;
use mdb::api::{router, AppState};
use mdb::config::MdbConfig;
use mdb::domain::BackendKind;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> (Arc<FakeFactory>, Router) {
    let factory = Arc::new(FakeFactory::new());
    let registry = Arc::new(ConnectionRegistry::new(factory.clone()));
    let state = AppState::new(Arc::new(MdbConfig::default()), registry);
    (factory, router(state))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let (_, app) = app();

    let (status, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["service"], "MDB Backend API");
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_unknown_route_is_404_with_path() {
    let (_, app) = app();

    let (status, body) = send(&app, get("/api/nowhere")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Route not found");
    assert_eq!(body["path"], "/api/nowhere");
}

#[tokio::test]
async fn test_connect_unknown_backend() {
    let (factory, app) = app();

    let (status, body) = send(&app, post("/api/databases/connect/unknown")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unsupported database");
    assert_eq!(
        body["supported"],
        json!(["mysql", "postgresql", "mongodb", "sqlite", "oracle"])
    );
    assert_eq!(factory.connect_count(), 0);
}

#[tokio::test]
async fn test_connect_reconnects_backend() {
    let (factory, app) = app();

    let (status, body) = send(&app, post("/api/databases/connect/mysql")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Connected");
    assert_eq!(body["database"], "mysql");

    send(&app, post("/api/databases/connect/mysql")).await;
    assert_eq!(factory.connect_count(), 2);
    assert_eq!(factory.close_count(), 1);
}

#[tokio::test]
async fn test_connect_failure_hides_driver_detail() {
    let (factory, app) = app();
    factory.set_unreachable(BackendKind::Oracle, true);

    let (status, body) = send(&app, post("/api/databases/connect/oracle")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "Failed");
    assert_eq!(body["error"], "Could not connect to oracle");
    assert!(!body.to_string().contains("10.0.0.4"));
}

#[tokio::test]
async fn test_database_health_lists_every_backend() {
    let (factory, app) = app();
    send(&app, post("/api/databases/connect/sqlite")).await;

    let (status, body) = send(&app, get("/api/databases/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["connected"], 1);
    assert_eq!(body["total"], 5);
    assert_eq!(body["databases"]["sqlite"], true);
    assert_eq!(body["databases"]["oracle"], false);
    assert_eq!(factory.connect_count(), 1);
}

#[tokio::test]
async fn test_database_info() {
    let (_, app) = app();

    let (status, body) = send(&app, get("/api/databases/info")).await;

    assert_eq!(status, StatusCode::OK);
    let databases = body["databases"].as_object().unwrap();
    assert_eq!(databases.len(), 5);
    assert_eq!(databases["sqlite"]["port"], "N/A");
}

#[tokio::test]
async fn test_insert_then_read() {
    let (_, app) = app();
    let payload = json!({
        "database": "sqlite",
        "data": [
            { "id": "a", "zipCode": "25627", "sido": "강원특별자치도" },
            { "id": "b", "zipCode": "25628" },
            { "id": "a", "zipCode": "25627" }
        ]
    });

    let (status, body) = send(&app, post_json("/api/postal/insert", &payload.to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["requested"], 3);
    assert_eq!(body["inserted"], 2);
    assert_eq!(body["duplicates"], 1);

    let (status, body) = send(&app, get("/api/postal/sqlite/data?limit=1&offset=0")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["totalCount"], 2);
    assert_eq!(body["data"][0]["id"], "b");
    assert_eq!(body["data"][0]["zipCode"], "25628");
}

#[tokio::test]
async fn test_insert_empty_array() {
    let (factory, app) = app();

    let (status, body) = send(
        &app,
        post_json("/api/postal/insert", r#"{"database":"postgresql","data":[]}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["requested"], 0);
    assert_eq!(body["inserted"], 0);
    assert_eq!(factory.connect_count(), 1);
}

#[tokio::test]
async fn test_insert_malformed_body() {
    let (_, app) = app();

    let (status, body) = send(&app, post_json("/api/postal/insert", "{not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "database and data array are required");
    assert_eq!(body["example"]["database"], "mysql");
}

#[tokio::test]
async fn test_insert_missing_data() {
    let (_, app) = app();

    let (status, body) =
        send(&app, post_json("/api/postal/insert", r#"{"database":"mysql"}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["example"].is_object());
}

#[tokio::test]
async fn test_insert_unknown_backend() {
    let (_, app) = app();

    let (status, body) = send(
        &app,
        post_json("/api/postal/insert", r#"{"database":"redis","data":[]}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["database"], "redis");
}

#[tokio::test]
async fn test_read_with_unparsable_paging() {
    let (_, app) = app();

    let (status, body) = send(&app, get("/api/postal/mongodb/data?limit=abc&offset=-3")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["limit"], 10);
    assert_eq!(body["offset"], 0);
    assert_eq!(body["totalCount"], 0);
}

#[tokio::test]
async fn test_read_from_unreachable_backend() {
    let (factory, app) = app();
    factory.set_unreachable(BackendKind::PostgreSql, true);

    let (status, body) = send(&app, get("/api/postal/postgresql/data")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Could not connect to postgresql");
}

#[tokio::test]
async fn test_stats_with_one_backend_down() {
    let (factory, app) = app();
    factory.set_unreachable(BackendKind::MongoDb, true);

    let (status, body) = send(&app, get("/api/postal/stats")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mongodb"]["status"], "error");
    assert_eq!(body["mongodb"]["recordCount"], 0);
    for tag in ["mysql", "postgresql", "sqlite", "oracle"] {
        assert_eq!(body[tag]["status"], "connected", "{tag}");
    }
}

#[tokio::test]
async fn test_schema_routes_only_for_sqlite() {
    let (_, app) = app();

    let (status, body) = send(&app, get("/api/schema/tables/mysql")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["supported"], json!(["sqlite"]));

    let (status, body) = send(&app, post("/api/schema/init/unknown")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["supported"], json!(["sqlite"]));
}

#[tokio::test]
async fn test_schema_on_non_sqlite_driver_is_unsupported() {
    // The in-memory sqlite stand-in is not a real sqlite adapter
    let (_, app) = app();

    let (status, body) = send(&app, get("/api/schema/tables/sqlite")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["supported"], json!(["sqlite"]));
}
