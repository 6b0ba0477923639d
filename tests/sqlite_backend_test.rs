//! End-to-end tests against a real SQLite file

mod common;

use common::{record, records};
use mdb::adapters::database::{BackendDriver, ConfiguredDriverFactory, ConnectionRegistry, Page};
use mdb::adapters::sqlite::{SqliteAdapter, SqliteClient};
use mdb::config::{MdbConfig, SqliteConfig};
use mdb::core::{RecordImporter, RecordReader, SchemaManager, StatsReporter, StatsStatus};
use mdb::domain::{BackendKind, MdbError, PostalRecord};
use std::collections::HashSet;
use std::sync::Arc;
use tempfile::TempDir;

struct Harness {
    _dir: TempDir,
    registry: Arc<ConnectionRegistry>,
    importer: RecordImporter,
    reader: RecordReader,
}

fn sqlite_only_config(dir: &TempDir) -> MdbConfig {
    let mut config = MdbConfig::default();
    config.mysql.enabled = false;
    config.postgresql.enabled = false;
    config.mongodb.enabled = false;
    config.oracle.enabled = false;
    config.sqlite.path = dir
        .path()
        .join("data")
        .join("postal_codes.db")
        .to_string_lossy()
        .to_string();
    config
}

fn harness() -> Harness {
    let dir = TempDir::new().unwrap();
    let config = Arc::new(sqlite_only_config(&dir));
    let registry = Arc::new(ConnectionRegistry::new(Arc::new(
        ConfiguredDriverFactory::new(config),
    )));

    Harness {
        _dir: dir,
        importer: RecordImporter::new(Arc::clone(&registry)),
        reader: RecordReader::new(Arc::clone(&registry)),
        registry,
    }
}

#[tokio::test]
async fn test_duplicate_ids_are_skipped() {
    let h = harness();

    let batch = vec![
        record("25627_1", "25627"),
        record("25628_1", "25628"),
        record("25627_1", "25627"),
    ];
    let summary = h.importer.import(BackendKind::Sqlite, &batch).await.unwrap();

    assert_eq!(summary.requested, 3);
    assert_eq!(summary.inserted, 2);
    assert_eq!(summary.duplicates, 1);
    assert_eq!(summary.failed, 0);
}

#[tokio::test]
async fn test_empty_import_creates_nothing() {
    let h = harness();

    let summary = h.importer.import(BackendKind::Sqlite, &[]).await.unwrap();
    assert_eq!(summary.inserted, 0);

    let page = h
        .reader
        .read(BackendKind::Sqlite, Page::new(10, 0))
        .await
        .unwrap();
    assert_eq!(page.total_count, 0);
}

#[tokio::test]
async fn test_generated_id_is_stable_across_reimport() {
    let h = harness();

    let first = h
        .importer
        .import(BackendKind::Sqlite, &[PostalRecord::new("25627")])
        .await
        .unwrap();
    assert_eq!(first.inserted, 1);

    let page = h
        .reader
        .read(BackendKind::Sqlite, Page::new(1, 0))
        .await
        .unwrap();
    let generated = page.records[0].id.clone();
    assert!(generated.starts_with("25627_"));

    let batch = vec![
        PostalRecord::new("25628"),
        PostalRecord::new("25627").with_id(generated.clone()),
    ];
    let second = h.importer.import(BackendKind::Sqlite, &batch).await.unwrap();

    assert_eq!(second.inserted, 1);
    assert_eq!(second.duplicates, 1);
    assert_eq!(first.inserted + second.inserted, 2);

    let page = h
        .reader
        .read(BackendKind::Sqlite, Page::new(10, 0))
        .await
        .unwrap();
    assert_eq!(page.total_count, 2);
    assert_eq!(page.records.iter().filter(|r| r.id == generated).count(), 1);
}

#[tokio::test]
async fn test_reimport_is_additive() {
    let h = harness();
    let batch = records("again", 4);

    h.importer.import(BackendKind::Sqlite, &batch).await.unwrap();
    let second = h.importer.import(BackendKind::Sqlite, &batch).await.unwrap();

    assert_eq!(second.inserted, 0);
    assert_eq!(second.duplicates, 4);

    let page = h
        .reader
        .read(BackendKind::Sqlite, Page::new(10, 0))
        .await
        .unwrap();
    assert_eq!(page.total_count, 4);
}

#[tokio::test]
async fn test_pages_are_disjoint_and_newest_first() {
    let h = harness();
    h.importer
        .import(BackendKind::Sqlite, &records("p", 6))
        .await
        .unwrap();

    let first = h
        .reader
        .read(BackendKind::Sqlite, Page::new(3, 0))
        .await
        .unwrap();
    let second = h
        .reader
        .read(BackendKind::Sqlite, Page::new(3, 3))
        .await
        .unwrap();

    let first_ids: Vec<_> = first.records.iter().map(|r| r.id.as_str()).collect();
    let second_ids: Vec<_> = second.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(first_ids, vec!["p-5", "p-4", "p-3"]);
    assert_eq!(second_ids, vec!["p-2", "p-1", "p-0"]);

    let union: HashSet<_> = first_ids.iter().chain(second_ids.iter()).collect();
    assert_eq!(union.len(), 6);
    assert_eq!(first.total_count, 6);
    assert!(first.records.iter().all(|r| r.created_at.is_some()));
}

#[tokio::test]
async fn test_page_past_end_is_empty() {
    let h = harness();
    h.importer
        .import(BackendKind::Sqlite, &records("e", 2))
        .await
        .unwrap();

    let page = h
        .reader
        .read(BackendKind::Sqlite, Page::new(10, 50))
        .await
        .unwrap();

    assert!(page.records.is_empty());
    assert_eq!(page.page_size, 0);
    assert_eq!(page.total_count, 2);
}

#[tokio::test]
async fn test_read_from_fresh_database_is_empty() {
    let h = harness();

    let page = h
        .reader
        .read(BackendKind::Sqlite, Page::new(10, 0))
        .await
        .unwrap();

    assert_eq!(page.total_count, 0);
}

#[tokio::test]
async fn test_missing_fields_read_back_as_defaults() {
    let h = harness();
    let sparse = PostalRecord::new("25627").with_id("sparse");

    h.importer.import(BackendKind::Sqlite, &[sparse]).await.unwrap();
    let page = h
        .reader
        .read(BackendKind::Sqlite, Page::new(1, 0))
        .await
        .unwrap();

    let stored = &page.records[0];
    assert_eq!(stored.zip_code, "25627");
    assert_eq!(stored.sido, "");
    assert_eq!(stored.building_main, 0);
}

#[tokio::test]
async fn test_schema_init_and_list_tables() {
    let h = harness();
    let schema = SchemaManager::new(Arc::clone(&h.registry));

    schema.init(BackendKind::Sqlite).await.unwrap();
    // Idempotent
    schema.init(BackendKind::Sqlite).await.unwrap();

    let tables = schema.list_tables(BackendKind::Sqlite).await.unwrap();
    assert_eq!(tables, vec!["performance_metrics", "postal_codes"]);
}

#[tokio::test]
async fn test_schema_rejects_other_backends() {
    let h = harness();
    let schema = SchemaManager::new(Arc::clone(&h.registry));

    let err = schema.list_tables(BackendKind::MySql).await.unwrap_err();
    assert!(matches!(err, MdbError::Unsupported { .. }));
}

#[tokio::test]
async fn test_stats_report_disabled_backends_as_errors() {
    let h = harness();
    h.importer
        .import(BackendKind::Sqlite, &records("st", 3))
        .await
        .unwrap();

    let stats = StatsReporter::new(Arc::clone(&h.registry)).collect().await;

    assert_eq!(stats[&BackendKind::Sqlite].status, StatsStatus::Connected);
    assert_eq!(stats[&BackendKind::Sqlite].record_count, 3);
    assert_eq!(stats[&BackendKind::Oracle].status, StatsStatus::Error);
}

#[tokio::test]
async fn test_rows_survive_reconnect() {
    let h = harness();
    h.importer
        .import(BackendKind::Sqlite, &records("keep", 2))
        .await
        .unwrap();

    h.registry.reset(BackendKind::Sqlite).await.unwrap();

    let page = h
        .reader
        .read(BackendKind::Sqlite, Page::new(10, 0))
        .await
        .unwrap();
    assert_eq!(page.total_count, 2);
}

#[tokio::test]
async fn test_closed_client_rejects_queries() {
    let dir = TempDir::new().unwrap();
    let config = SqliteConfig {
        path: dir.path().join("closed.db").to_string_lossy().to_string(),
        ..SqliteConfig::default()
    };

    let adapter = SqliteAdapter::new(SqliteClient::open(config).await.unwrap());
    adapter.close().await.unwrap();

    assert!(adapter.count().await.is_err());
    assert!(adapter.ping().await.is_err());
}
