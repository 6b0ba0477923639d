//! Oracle adapter implementing [`BackendDriver`]
//!
//! Oracle has no `IF NOT EXISTS`, so schema creation runs the DDL and treats
//! "name already used" as success. Duplicates are skipped with a `MERGE` that only has
//! a `WHEN NOT MATCHED` branch.

use crate::adapters::database::traits::{BackendDriver, InsertOutcome, Page, SchemaMode};
use crate::adapters::oracle::client::OracleClient;
use crate::domain::{BackendError, BackendKind, PostalRow, Result, StoredPostalRecord};
use async_trait::async_trait;
use oracle::Connection;
use std::any::Any;

const KIND: BackendKind = BackendKind::Oracle;

/// ORA-00955: name is already used by an existing object
const ORA_NAME_IN_USE: i32 = 955;
/// ORA-00942: table or view does not exist
const ORA_NO_SUCH_TABLE: i32 = 942;
/// ORA-01408: such column list already indexed
const ORA_ALREADY_INDEXED: i32 = 1408;

const CREATE_TABLE: &str = r#"
    CREATE TABLE postal_codes (
        id VARCHAR2(200) PRIMARY KEY,
        zip_code VARCHAR2(10),
        sido VARCHAR2(50),
        sigungu VARCHAR2(50),
        eupmyeon VARCHAR2(50),
        road_name VARCHAR2(100),
        building_main NUMBER DEFAULT 0,
        building_sub NUMBER DEFAULT 0,
        full_road_address VARCHAR2(500),
        full_jibun_address VARCHAR2(500),
        created_at TIMESTAMP(6) DEFAULT SYSTIMESTAMP
    )
"#;

const CREATE_INDEX: &str =
    "CREATE INDEX idx_postal_codes_created_at ON postal_codes (created_at DESC, id DESC)";

const DROP_TABLE: &str = "DROP TABLE postal_codes PURGE";

const MERGE_ROW: &str = r#"
    MERGE INTO postal_codes t
    USING (SELECT :id AS id FROM dual) s
    ON (t.id = s.id)
    WHEN NOT MATCHED THEN
        INSERT (id, zip_code, sido, sigungu, eupmyeon, road_name, building_main,
                building_sub, full_road_address, full_jibun_address)
        VALUES (:id, :zip_code, :sido, :sigungu, :eupmyeon, :road_name, :building_main,
                :building_sub, :full_road_address, :full_jibun_address)
"#;

// ROWNUM is assigned after the inner ORDER BY, so the window is taken over the
// newest-first ordering
const SELECT_PAGE: &str = r#"
    SELECT id, zip_code, sido, sigungu, eupmyeon, road_name, building_main, building_sub,
           full_road_address, full_jibun_address, created_at_text
    FROM (
        SELECT ordered.*, ROWNUM rnum
        FROM (
            SELECT id, zip_code, sido, sigungu, eupmyeon, road_name, building_main,
                   building_sub, full_road_address, full_jibun_address,
                   TO_CHAR(created_at, 'YYYY-MM-DD"T"HH24:MI:SS.FF6') AS created_at_text
            FROM postal_codes
            ORDER BY created_at DESC, id DESC
        ) ordered
        WHERE ROWNUM <= :max_row
    )
    WHERE rnum > :skip_rows
"#;

const COUNT_ROWS: &str = "SELECT COUNT(*) FROM postal_codes";

/// Bounds for the `ROWNUM` window: rows `skip_rows + 1 ..= max_row`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RownumWindow {
    pub max_row: u64,
    pub skip_rows: u64,
}

impl From<Page> for RownumWindow {
    fn from(page: Page) -> Self {
        Self {
            max_row: page.upper_bound(),
            skip_rows: page.offset,
        }
    }
}

impl RownumWindow {
    /// Whether the 1-based row number `rnum` falls inside the window
    pub fn contains(&self, rnum: u64) -> bool {
        rnum > self.skip_rows && rnum <= self.max_row
    }
}

fn oci_code(err: &oracle::Error) -> Option<i32> {
    match err {
        oracle::Error::OciError(db_error) => Some(db_error.code()),
        _ => None,
    }
}

/// Execute DDL, treating the listed ORA codes as success
fn execute_tolerating(conn: &Connection, sql: &str, tolerated: &[i32]) -> oracle::Result<bool> {
    match conn.execute(sql, &[]) {
        Ok(_) => Ok(true),
        Err(e) if oci_code(&e).is_some_and(|code| tolerated.contains(&code)) => Ok(false),
        Err(e) => Err(e),
    }
}

fn create_schema(conn: &Connection, mode: SchemaMode) -> oracle::Result<bool> {
    if mode == SchemaMode::Destructive {
        execute_tolerating(conn, DROP_TABLE, &[ORA_NO_SUCH_TABLE])?;
    }
    let created = execute_tolerating(conn, CREATE_TABLE, &[ORA_NAME_IN_USE])?;
    execute_tolerating(conn, CREATE_INDEX, &[ORA_NAME_IN_USE, ORA_ALREADY_INDEXED])?;
    Ok(created)
}

fn query_window(conn: &Connection, window: RownumWindow) -> oracle::Result<Vec<StoredPostalRecord>> {
    let rows = conn.query_named(
        SELECT_PAGE,
        &[
            ("max_row", &to_i64(window.max_row)),
            ("skip_rows", &to_i64(window.skip_rows)),
        ],
    )?;
    rows.map(|row| read_row(&row?)).collect()
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn read_row(row: &oracle::Row) -> oracle::Result<StoredPostalRecord> {
    let text = |idx: usize| -> oracle::Result<String> {
        Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
    };
    let number = |idx: usize| -> oracle::Result<i64> {
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

/// Oracle implementation of [`BackendDriver`]
pub struct OracleAdapter {
    client: OracleClient,
}

impl OracleAdapter {
    pub fn new(client: OracleClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &OracleClient {
        &self.client
    }
}

#[async_trait]
impl BackendDriver for OracleAdapter {
    fn kind(&self) -> BackendKind {
        KIND
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    async fn ping(&self) -> Result<()> {
        self.client.ping().await
    }

    async fn ensure_schema(&self, mode: SchemaMode) -> Result<()> {
        let created = self
            .client
            .run(move |conn| create_schema(conn, mode).map_err(|e| BackendError::schema(KIND, e)))
            .await?;

        if created {
            tracing::info!(backend = %KIND, "Created postal_codes table");
        } else {
            tracing::debug!(backend = %KIND, "postal_codes table already exists");
        }
        Ok(())
    }

    fn import_schema_mode(&self) -> SchemaMode {
        SchemaMode::Additive
    }

    async fn insert_one(&self, row: &PostalRow) -> Result<InsertOutcome> {
        let row = row.clone();
        let affected = self
            .client
            .run(move |conn| {
                conn.execute_named(
                    MERGE_ROW,
                    &[
                        ("id", &row.id),
                        ("zip_code", &row.zip_code),
                        ("sido", &row.sido),
                        ("sigungu", &row.sigungu),
                        ("eupmyeon", &row.eupmyeon),
                        ("road_name", &row.road_name),
                        ("building_main", &row.building_main),
                        ("building_sub", &row.building_sub),
                        ("full_road_address", &row.full_road_address),
                        ("full_jibun_address", &row.full_jibun_address),
                    ],
                )
                .and_then(|stmt| stmt.row_count())
                .map_err(|e| BackendError::insert(KIND, e))
            })
            .await?;

        Ok(if affected > 0 {
            InsertOutcome::Inserted
        } else {
            InsertOutcome::Duplicate
        })
    }

    async fn finish_import(&self) -> Result<()> {
        self.client.commit().await
    }

    async fn select_page(&self, page: Page) -> Result<Vec<StoredPostalRecord>> {
        let window = RownumWindow::from(page);
        self.client
            .run(move |conn| query_window(conn, window).map_err(|e| BackendError::query(KIND, e)))
            .await
    }

    async fn count(&self) -> Result<u64> {
        let count = self
            .client
            .run(|conn| {
                conn.query_row_as::<i64>(COUNT_ROWS, &[])
                    .map_err(|e| BackendError::query(KIND, e))
            })
            .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn close(&self) -> Result<()> {
        self.client.close().await
    }
}
