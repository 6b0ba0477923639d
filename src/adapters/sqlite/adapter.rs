//! SQLite adapter implementing [`BackendDriver`]
//!
//! Besides the common contract it owns the sqlite-only schema operations: creating the
//! `performance_metrics` companion table and listing tables.

use crate::adapters::database::traits::{BackendDriver, InsertOutcome, Page, SchemaMode};
use crate::adapters::sqlite::client::SqliteClient;
use crate::domain::{BackendError, BackendKind, PostalRow, Result, StoredPostalRecord};
use async_trait::async_trait;
use rusqlite::params;
use std::any::Any;

const KIND: BackendKind = BackendKind::Sqlite;

// Millisecond timestamps so newest-first is meaningful within one import
const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS postal_codes (
        id TEXT PRIMARY KEY,
        zip_code TEXT,
        sido TEXT,
        sigungu TEXT,
        eupmyeon TEXT,
        road_name TEXT,
        building_main INTEGER DEFAULT 0,
        building_sub INTEGER DEFAULT 0,
        full_road_address TEXT,
        full_jibun_address TEXT,
        created_at TEXT DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
    );
    CREATE INDEX IF NOT EXISTS idx_postal_codes_created_at ON postal_codes (created_at);
"#;

const CREATE_METRICS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS performance_metrics (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        db_type VARCHAR(20) DEFAULT 'sqlite',
        operation_type VARCHAR(20) NOT NULL
            CHECK (operation_type IN ('INSERT', 'SELECT', 'UPDATE', 'DELETE', 'BULK_INSERT')),
        record_count INTEGER NOT NULL,
        execution_time_ms INTEGER NOT NULL,
        memory_usage_mb DECIMAL(10, 2),
        cpu_usage_percent DECIMAL(5, 2),
        query_complexity VARCHAR(10) DEFAULT 'SIMPLE'
            CHECK (query_complexity IN ('SIMPLE', 'MEDIUM', 'COMPLEX')),
        test_timestamp DATETIME DEFAULT CURRENT_TIMESTAMP,
        notes TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_postal_codes_zip_code ON postal_codes (zip_code);
    CREATE INDEX IF NOT EXISTS idx_postal_codes_region ON postal_codes (sido, sigungu);
    CREATE INDEX IF NOT EXISTS idx_performance_metrics_operation
        ON performance_metrics (db_type, operation_type);
"#;

const INSERT_ROW: &str = r#"
    INSERT OR IGNORE INTO postal_codes
        (id, zip_code, sido, sigungu, eupmyeon, road_name, building_main, building_sub,
         full_road_address, full_jibun_address)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
"#;

const SELECT_PAGE: &str = r#"
    SELECT id, zip_code, sido, sigungu, eupmyeon, road_name, building_main, building_sub,
           full_road_address, full_jibun_address, created_at
    FROM postal_codes
    ORDER BY created_at DESC, rowid DESC
    LIMIT ?1 OFFSET ?2
"#;

/// SQLite implementation of [`BackendDriver`]
pub struct SqliteAdapter {
    client: SqliteClient,
}

impl SqliteAdapter {
    pub fn new(client: SqliteClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &SqliteClient {
        &self.client
    }

    /// Create the postal table, the `performance_metrics` table and their indexes
    ///
    /// # Errors
    ///
    /// Returns a schema error if any DDL statement fails.
    pub async fn init_benchmark_schema(&self) -> Result<()> {
        self.client
            .run(|conn| {
                conn.execute_batch(CREATE_TABLE)
                    .and_then(|_| conn.execute_batch(CREATE_METRICS_TABLE))
                    .map_err(|e| BackendError::schema(KIND, e))
            })
            .await?;

        tracing::info!(backend = %KIND, "Benchmark schema created");
        Ok(())
    }

    /// Names of the user tables, alphabetically
    ///
    /// # Errors
    ///
    /// Returns a query error if `sqlite_master` cannot be read.
    pub async fn list_tables(&self) -> Result<Vec<String>> {
        self.client
            .run(|conn| {
                let mut stmt = conn
                    .prepare(
                        "SELECT name FROM sqlite_master \
                         WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
                    )
                    .map_err(|e| BackendError::query(KIND, e))?;
                let names = stmt
                    .query_map([], |row| row.get::<_, String>(0))
                    .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
                    .map_err(|e| BackendError::query(KIND, e))?;
                Ok(names)
            })
            .await
    }
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredPostalRecord> {
    let text = |idx: usize| -> rusqlite::Result<String> {
        Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
    };
    let number = |idx: usize| -> rusqlite::Result<i64> {
        Ok(row.get::<_, Option<i64>>(idx)?.unwrap_or(0))
    };

    Ok(StoredPostalRecord::from_row(
        PostalRow {
            id: text(0)?,
            zip_code: text(1)?,
            sido: text(2)?,
            sigungu: text(3)?,
            eupmyeon: text(4)?,
            road_name: text(5)?,
            building_main: number(6)?,
            building_sub: number(7)?,
            full_road_address: text(8)?,
            full_jibun_address: text(9)?,
        },
        row.get::<_, Option<String>>(10)?,
    ))
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl BackendDriver for SqliteAdapter {
    fn kind(&self) -> BackendKind {
        KIND
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    async fn ping(&self) -> Result<()> {
        self.client
            .run(|conn| {
                conn.query_row("SELECT 1", [], |_| Ok(()))
                    .map_err(|e| BackendError::connection(KIND, e))
            })
            .await
    }

    async fn ensure_schema(&self, mode: SchemaMode) -> Result<()> {
        self.client
            .run(move |conn| {
                if mode == SchemaMode::Destructive {
                    conn.execute_batch("DROP TABLE IF EXISTS postal_codes")
                        .map_err(|e| BackendError::schema(KIND, e))?;
                }
                conn.execute_batch(CREATE_TABLE)
                    .map_err(|e| BackendError::schema(KIND, e))
            })
            .await
    }

    fn import_schema_mode(&self) -> SchemaMode {
        SchemaMode::Additive
    }

    async fn insert_one(&self, row: &PostalRow) -> Result<InsertOutcome> {
        let row = row.clone();
        let changed = self
            .client
            .run(move |conn| {
                conn.execute(
                    INSERT_ROW,
                    params![
                        row.id,
                        row.zip_code,
                        row.sido,
                        row.sigungu,
                        row.eupmyeon,
                        row.road_name,
                        row.building_main,
                        row.building_sub,
                        row.full_road_address,
                        row.full_jibun_address,
                    ],
                )
                .map_err(|e| BackendError::insert(KIND, e))
            })
            .await?;

        Ok(if changed > 0 {
            InsertOutcome::Inserted
        } else {
            InsertOutcome::Duplicate
        })
    }

    async fn select_page(&self, page: Page) -> Result<Vec<StoredPostalRecord>> {
        let limit = to_i64(page.limit);
        let offset = to_i64(page.offset);

        self.client
            .run(move |conn| {
                let mut stmt = conn
                    .prepare(SELECT_PAGE)
                    .map_err(|e| BackendError::query(KIND, e))?;
                let records = stmt
                    .query_map(params![limit, offset], read_row)
                    .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
                    .map_err(|e| BackendError::query(KIND, e))?;
                Ok(records)
            })
            .await
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 = self
            .client
            .run(|conn| {
                conn.query_row("SELECT COUNT(*) FROM postal_codes", [], |row| row.get(0))
                    .map_err(|e| BackendError::query(KIND, e))
            })
            .await?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn close(&self) -> Result<()> {
        self.client.close().await
    }
}
