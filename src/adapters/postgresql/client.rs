//! PostgreSQL client implementation
//!
//! Wraps a deadpool connection pool. Constructing a client opens the pool and runs a
//! liveness query, so a returned client is known to be reachable.

use crate::config::schema::PostgreSQLConfig;
use crate::domain::{BackendError, BackendKind, MdbError, Result};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::{NoTls, Row};

const KIND: BackendKind = BackendKind::PostgreSql;

/// PostgreSQL client for MDB
pub struct PostgreSQLClient {
    pool: Pool,
    config: PostgreSQLConfig,
}

impl PostgreSQLClient {
    /// Create a new PostgreSQL client
    ///
    /// # Errors
    ///
    /// Returns a connection error if the pool cannot be built or the liveness query fails.
    pub async fn new(config: PostgreSQLConfig) -> Result<Self> {
        let pool = build_pool(&config)?;
        let client = Self { pool, config };
        client.test_connection().await?;

        tracing::info!(
            backend = %KIND,
            target = %client.connection_string_safe(),
            "PostgreSQL pool ready"
        );
        Ok(client)
    }

    /// Get a connection from the pool and run `SELECT 1`
    pub async fn test_connection(&self) -> Result<()> {
        let client = self.get_connection().await?;

        client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| BackendError::connection(KIND, format!("Connection test failed: {e}")))?;

        Ok(())
    }

    /// Get a connection from the pool
    ///
    /// # Errors
    ///
    /// Returns a connection error if no connection can be obtained in time.
    pub async fn get_connection(&self) -> Result<deadpool_postgres::Object> {
        self.pool.get().await.map_err(|e| {
            BackendError::connection(KIND, format!("Failed to get connection from pool: {e}"))
        })
    }

    /// Run a batch of DDL statements
    pub async fn batch_execute(&self, sql: &str) -> Result<()> {
        let client = self.get_connection().await?;
        client
            .batch_execute(sql)
            .await
            .map_err(|e| BackendError::schema(KIND, e))
    }

    /// Execute a query and return rows
    pub async fn query(
        &self,
        query: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> Result<Vec<Row>> {
        let client = self.get_connection().await?;
        client
            .query(query, params)
            .await
            .map_err(|e| BackendError::query(KIND, e))
    }

    /// Execute a statement and return the number of affected rows
    pub async fn execute(
        &self,
        statement: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> Result<u64> {
        let client = self.get_connection().await?;
        client
            .execute(statement, params)
            .await
            .map_err(|e| BackendError::insert(KIND, e))
    }

    /// Connection target with the user and password left out
    pub fn connection_string_safe(&self) -> String {
        format!(
            "postgresql://***@{}:{}/{}",
            self.config.host, self.config.port, self.config.database
        )
    }

    /// Close the pool; outstanding connections are dropped when returned
    pub fn close(&self) {
        self.pool.close();
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

fn build_pool(config: &PostgreSQLConfig) -> Result<Pool> {
    let timeout = Duration::from_secs(config.connection_timeout_seconds);

    let mut pg_config = tokio_postgres::Config::new();
    pg_config
        .host(&config.host)
        .port(config.port)
        .user(&config.user)
        .password(config.password.expose_secret().as_ref())
        .dbname(&config.database)
        .connect_timeout(timeout);

    let manager = Manager::from_config(
        pg_config,
        NoTls,
        ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        },
    );

    Pool::builder(manager)
        .max_size(config.max_connections)
        .wait_timeout(Some(timeout))
        .create_timeout(Some(timeout))
        .recycle_timeout(Some(timeout))
        .runtime(deadpool_postgres::Runtime::Tokio1)
        .build()
        .map_err(|e| -> MdbError {
            BackendError::connection(KIND, format!("Failed to create connection pool: {e}"))
        })
}
