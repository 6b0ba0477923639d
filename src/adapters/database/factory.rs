//! Driver factory
//!
//! The registry never constructs drivers itself; it asks a [`DriverFactory`]. The
//! production factory reads [`MdbConfig`], tests substitute their own.

use crate::adapters::database::traits::BackendDriver;
use crate::adapters::mongodb::{MongoDbAdapter, MongoDbClient};
use crate::adapters::mysql::{MySqlAdapter, MySqlClient};
use crate::adapters::oracle::{OracleAdapter, OracleClient};
use crate::adapters::postgresql::{PostgreSQLAdapter, PostgreSQLClient};
use crate::adapters::sqlite::{SqliteAdapter, SqliteClient};
use crate::config::MdbConfig;
use crate::domain::{BackendError, BackendKind, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Opens new driver handles
#[async_trait]
pub trait DriverFactory: Send + Sync {
    /// Connect to `kind` and return a fresh handle
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Disabled`] for a switched-off backend, otherwise a
    /// connection error.
    async fn connect(&self, kind: BackendKind) -> Result<Arc<dyn BackendDriver>>;
}

/// Factory backed by the application configuration
pub struct ConfiguredDriverFactory {
    config: Arc<MdbConfig>,
}

impl ConfiguredDriverFactory {
    pub fn new(config: Arc<MdbConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl DriverFactory for ConfiguredDriverFactory {
    async fn connect(&self, kind: BackendKind) -> Result<Arc<dyn BackendDriver>> {
        create_driver(&self.config, kind).await
    }
}

/// Create a driver for `kind` from configuration
///
/// # Errors
///
/// Returns an error if the backend is disabled or the connection cannot be opened
pub async fn create_driver(config: &MdbConfig, kind: BackendKind) -> Result<Arc<dyn BackendDriver>> {
    if !config.is_enabled(kind) {
        return Err(BackendError::Disabled(kind).into());
    }

    tracing::info!(backend = %kind, "Creating backend driver");

    let driver: Arc<dyn BackendDriver> = match kind {
        BackendKind::MySql => {
            let client = MySqlClient::new(config.mysql.clone()).await?;
            Arc::new(MySqlAdapter::new(client))
        }
        BackendKind::PostgreSql => {
            let client = PostgreSQLClient::new(config.postgresql.clone()).await?;
            Arc::new(PostgreSQLAdapter::new(client))
        }
        BackendKind::MongoDb => {
            let client = MongoDbClient::new(config.mongodb.clone()).await?;
            Arc::new(MongoDbAdapter::new(client))
        }
        BackendKind::Sqlite => {
            let client = SqliteClient::open(config.sqlite.clone()).await?;
            Arc::new(SqliteAdapter::new(client))
        }
        BackendKind::Oracle => {
            let client = OracleClient::connect(config.oracle.clone()).await?;
            Arc::new(OracleAdapter::new(client))
        }
    };

    Ok(driver)
}
