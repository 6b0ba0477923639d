//! PostgreSQL adapter implementing [`BackendDriver`]

use crate::adapters::database::traits::{BackendDriver, InsertOutcome, Page, SchemaMode};
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::domain::{BackendError, BackendKind, PostalRow, Result, StoredPostalRecord};
use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;
use tokio_postgres::Row;

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
        created_at TIMESTAMP(6) DEFAULT CURRENT_TIMESTAMP
    );
    CREATE INDEX IF NOT EXISTS idx_postal_codes_created_at ON postal_codes (created_at DESC, id DESC);
"#;

const DROP_TABLE: &str = "DROP TABLE IF EXISTS postal_codes";

const INSERT_ROW: &str = r#"
    INSERT INTO postal_codes
        (id, zip_code, sido, sigungu, eupmyeon, road_name, building_main, building_sub,
         full_road_address, full_jibun_address)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
    ON CONFLICT (id) DO NOTHING
"#;

const SELECT_PAGE: &str = r#"
    SELECT id, zip_code, sido, sigungu, eupmyeon, road_name, building_main, building_sub,
           full_road_address, full_jibun_address,
           to_char(created_at, 'YYYY-MM-DD"T"HH24:MI:SS.US') AS created_at
    FROM postal_codes
    ORDER BY postal_codes.created_at DESC, postal_codes.id DESC
    LIMIT $1 OFFSET $2
"#;

/// PostgreSQL implementation of [`BackendDriver`]
pub struct PostgreSQLAdapter {
    client: Arc<PostgreSQLClient>,
}

impl PostgreSQLAdapter {
    pub fn new(client: PostgreSQLClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    pub fn client(&self) -> &Arc<PostgreSQLClient> {
        &self.client
    }
}

fn text(row: &Row, column: &str) -> String {
    row.try_get::<_, Option<String>>(column)
        .ok()
        .flatten()
        .unwrap_or_default()
}

fn number(row: &Row, column: &str) -> i64 {
    row.try_get::<_, Option<i64>>(column)
        .ok()
        .flatten()
        .unwrap_or(0)
}

fn stored_from_row(row: &Row) -> StoredPostalRecord {
    StoredPostalRecord::from_row(
        PostalRow {
            id: text(row, "id"),
            zip_code: text(row, "zip_code"),
            sido: text(row, "sido"),
            sigungu: text(row, "sigungu"),
            eupmyeon: text(row, "eupmyeon"),
            road_name: text(row, "road_name"),
            building_main: number(row, "building_main"),
            building_sub: number(row, "building_sub"),
            full_road_address: text(row, "full_road_address"),
            full_jibun_address: text(row, "full_jibun_address"),
        },
        row.try_get::<_, Option<String>>("created_at").ok().flatten(),
    )
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl BackendDriver for PostgreSQLAdapter {
    fn kind(&self) -> BackendKind {
        BackendKind::PostgreSql
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    async fn ping(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn ensure_schema(&self, mode: SchemaMode) -> Result<()> {
        if mode == SchemaMode::Destructive {
            tracing::info!(backend = %self.kind(), "Dropping postal_codes before import");
            self.client.batch_execute(DROP_TABLE).await?;
        }
        self.client.batch_execute(CREATE_TABLE).await?;
        tracing::debug!(backend = %self.kind(), ?mode, "Schema ready");
        Ok(())
    }

    async fn insert_one(&self, row: &PostalRow) -> Result<InsertOutcome> {
        let affected = self
            .client
            .execute(
                INSERT_ROW,
                &[
                    &row.id,
                    &row.zip_code,
                    &row.sido,
                    &row.sigungu,
                    &row.eupmyeon,
                    &row.road_name,
                    &row.building_main,
                    &row.building_sub,
                    &row.full_road_address,
                    &row.full_jibun_address,
                ],
            )
            .await?;

        Ok(if affected > 0 {
            InsertOutcome::Inserted
        } else {
            InsertOutcome::Duplicate
        })
    }

    async fn select_page(&self, page: Page) -> Result<Vec<StoredPostalRecord>> {
        let limit = to_i64(page.limit);
        let offset = to_i64(page.offset);
        let rows = self.client.query(SELECT_PAGE, &[&limit, &offset]).await?;
        Ok(rows.iter().map(stored_from_row).collect())
    }

    async fn count(&self) -> Result<u64> {
        let rows = self
            .client
            .query("SELECT COUNT(*) AS count FROM postal_codes", &[])
            .await?;

        let count: i64 = rows
            .first()
            .map(|row| row.try_get::<_, i64>("count"))
            .transpose()
            .map_err(|e| BackendError::query(self.kind(), e))?
            .unwrap_or(0);

        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn close(&self) -> Result<()> {
        self.client.close();
        Ok(())
    }
}
