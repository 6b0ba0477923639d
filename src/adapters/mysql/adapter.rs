//! MySQL adapter implementing [`BackendDriver`]

use crate::adapters::database::traits::{BackendDriver, InsertOutcome, Page, SchemaMode};
use crate::adapters::mysql::client::MySqlClient;
use crate::domain::{BackendError, BackendKind, PostalRow, Result, StoredPostalRecord};
use async_trait::async_trait;
use mysql_async::prelude::Queryable;
use mysql_async::Row;
use std::any::Any;

const KIND: BackendKind = BackendKind::MySql;

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS postal_codes (
        id VARCHAR(255) PRIMARY KEY,
        zip_code VARCHAR(10),
        sido VARCHAR(50),
        sigungu VARCHAR(50),
        eupmyeon VARCHAR(50),
        road_name VARCHAR(100),
        building_main BIGINT DEFAULT 0,
        building_sub BIGINT DEFAULT 0,
        full_road_address TEXT,
        full_jibun_address TEXT,
        created_at TIMESTAMP(6) DEFAULT CURRENT_TIMESTAMP(6),
        INDEX idx_postal_codes_created_at (created_at)
    ) CHARACTER SET utf8mb4 COLLATE utf8mb4_unicode_ci
"#;

const INSERT_ROW: &str = r#"
    INSERT IGNORE INTO postal_codes
        (id, zip_code, sido, sigungu, eupmyeon, road_name, building_main, building_sub,
         full_road_address, full_jibun_address)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

const SELECT_PAGE: &str = r#"
    SELECT id, zip_code, sido, sigungu, eupmyeon, road_name, building_main, building_sub,
           full_road_address, full_jibun_address,
           CAST(created_at AS CHAR) AS created_at_text
    FROM postal_codes
    ORDER BY created_at DESC, id DESC
    LIMIT ? OFFSET ?
"#;

/// MySQL implementation of [`BackendDriver`]
pub struct MySqlAdapter {
    client: MySqlClient,
}

impl MySqlAdapter {
    pub fn new(client: MySqlClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &MySqlClient {
        &self.client
    }
}

fn text(row: &Row, idx: usize) -> String {
    row.get_opt::<Option<String>, _>(idx)
        .and_then(|value| value.ok())
        .flatten()
        .unwrap_or_default()
}

fn number(row: &Row, idx: usize) -> i64 {
    row.get_opt::<Option<i64>, _>(idx)
        .and_then(|value| value.ok())
        .flatten()
        .unwrap_or(0)
}

fn stored_from_row(row: &Row) -> StoredPostalRecord {
    let created_at = row
        .get_opt::<Option<String>, _>(10)
        .and_then(|value| value.ok())
        .flatten();

    StoredPostalRecord::from_row(
        PostalRow {
            id: text(row, 0),
            zip_code: text(row, 1),
            sido: text(row, 2),
            sigungu: text(row, 3),
            eupmyeon: text(row, 4),
            road_name: text(row, 5),
            building_main: number(row, 6),
            building_sub: number(row, 7),
            full_road_address: text(row, 8),
            full_jibun_address: text(row, 9),
        },
        created_at,
    )
}

#[async_trait]
impl BackendDriver for MySqlAdapter {
    fn kind(&self) -> BackendKind {
        KIND
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    async fn ping(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn ensure_schema(&self, mode: SchemaMode) -> Result<()> {
        let mut conn = self.client.get_connection().await?;

        if mode == SchemaMode::Destructive {
            tracing::info!(backend = %KIND, "Dropping postal_codes before import");
            conn.query_drop("DROP TABLE IF EXISTS postal_codes")
                .await
                .map_err(|e| BackendError::schema(KIND, e))?;
        }

        conn.query_drop(CREATE_TABLE)
            .await
            .map_err(|e| BackendError::schema(KIND, e))
    }

    async fn insert_one(&self, row: &PostalRow) -> Result<InsertOutcome> {
        let mut conn = self.client.get_connection().await?;

        conn.exec_drop(
            INSERT_ROW,
            (
                row.id.as_str(),
                row.zip_code.as_str(),
                row.sido.as_str(),
                row.sigungu.as_str(),
                row.eupmyeon.as_str(),
                row.road_name.as_str(),
                row.building_main,
                row.building_sub,
                row.full_road_address.as_str(),
                row.full_jibun_address.as_str(),
            ),
        )
        .await
        .map_err(|e| BackendError::insert(KIND, e))?;

        Ok(if conn.affected_rows() > 0 {
            InsertOutcome::Inserted
        } else {
            InsertOutcome::Duplicate
        })
    }

    async fn select_page(&self, page: Page) -> Result<Vec<StoredPostalRecord>> {
        let mut conn = self.client.get_connection().await?;

        let rows: Vec<Row> = conn
            .exec(SELECT_PAGE, (page.limit, page.offset))
            .await
            .map_err(|e| BackendError::query(KIND, e))?;

        Ok(rows.iter().map(stored_from_row).collect())
    }

    async fn count(&self) -> Result<u64> {
        let mut conn = self.client.get_connection().await?;

        let count: Option<u64> = conn
            .query_first("SELECT COUNT(*) FROM postal_codes")
            .await
            .map_err(|e| BackendError::query(KIND, e))?;

        Ok(count.unwrap_or(0))
    }

    async fn close(&self) -> Result<()> {
        self.client.close().await
    }
}
