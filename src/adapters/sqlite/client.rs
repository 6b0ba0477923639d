//! SQLite client
//!
//! rusqlite is synchronous; the single connection is wrapped in a
//! [`BlockingConnection`].

use crate::adapters::database::blocking::BlockingConnection;
use crate::config::schema::SqliteConfig;
use crate::domain::{BackendError, BackendKind, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;

const KIND: BackendKind = BackendKind::Sqlite;

/// Path that opens a private in-memory database
pub const IN_MEMORY: &str = ":memory:";

/// SQLite client for MDB
pub struct SqliteClient {
    conn: BlockingConnection<Connection>,
    config: SqliteConfig,
}

impl SqliteClient {
    /// Open (or create) the database file
    ///
    /// Missing parent directories are created first.
    ///
    /// # Errors
    ///
    /// Returns a connection error if the directory or the file cannot be opened.
    pub async fn open(config: SqliteConfig) -> Result<Self> {
        let path = PathBuf::from(&config.path);

        if config.path != IN_MEMORY {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    BackendError::connection(
                        KIND,
                        format!("Failed to create directory {}: {e}", parent.display()),
                    )
                })?;
            }
        }

        let busy_timeout = Duration::from_millis(config.busy_timeout_ms);
        let conn = tokio::task::spawn_blocking(move || open_connection(&path, busy_timeout))
            .await
            .map_err(|e| BackendError::connection(KIND, format!("Blocking task failed: {e}")))?
            .map_err(|e| BackendError::connection(KIND, e))?;

        tracing::info!(backend = %KIND, path = %config.path, "SQLite database opened");

        Ok(Self {
            conn: BlockingConnection::new(KIND, conn),
            config,
        })
    }

    /// Run `f` against the connection on the blocking pool
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns, or a connection error once the client is closed.
    pub async fn run<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        self.conn.run(f).await
    }

    /// Close the connection; later calls fail with a connection error
    pub async fn close(&self) -> Result<()> {
        self.conn
            .close_with(|conn| conn.close().map_err(|(_, e)| BackendError::close(KIND, e)))
            .await
    }

    /// Database file path as configured
    pub fn path(&self) -> &str {
        &self.config.path
    }
}

fn open_connection(path: &Path, busy_timeout: Duration) -> rusqlite::Result<Connection> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(busy_timeout)?;
    if path != Path::new(IN_MEMORY) {
        conn.pragma_update(None, "journal_mode", "WAL")?;
    }
    Ok(conn)
}
