//! Oracle client implementation
//!
//! The `oracle` crate wraps OCI and blocks, so the session is held in a
//! [`BlockingConnection`]. Autocommit stays off: inserts become visible to other
//! sessions when [`OracleClient::commit`] runs.

use crate::adapters::database::blocking::BlockingConnection;
use crate::config::schema::OracleConfig;
use crate::domain::{BackendError, BackendKind, Result};
use oracle::Connection;
use secrecy::ExposeSecret;

const KIND: BackendKind = BackendKind::Oracle;

/// Oracle client for MDB
pub struct OracleClient {
    conn: BlockingConnection<Connection>,
    config: OracleConfig,
}

impl OracleClient {
    /// Open a session against `config.connect_string`
    ///
    /// # Errors
    ///
    /// Returns a connection error if the listener refuses or the credentials are wrong.
    pub async fn connect(config: OracleConfig) -> Result<Self> {
        let user = config.user.clone();
        let password = config.password.expose_secret().as_ref().to_string();
        let connect_string = config.connect_string.clone();

        let conn = tokio::task::spawn_blocking(move || {
            Connection::connect(&user, &password, &connect_string)
        })
        .await
        .map_err(|e| BackendError::connection(KIND, format!("Blocking task failed: {e}")))?
        .map_err(|e| BackendError::connection(KIND, e))?;

        let client = Self {
            conn: BlockingConnection::new(KIND, conn),
            config,
        };

        tracing::info!(
            backend = %KIND,
            target = %client.connection_string_safe(),
            "Oracle session opened"
        );
        Ok(client)
    }

    /// Run `f` against the session on the blocking pool
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

    /// Round-trip to the server
    pub async fn ping(&self) -> Result<()> {
        self.run(|conn| {
            conn.ping()
                .map_err(|e| BackendError::connection(KIND, format!("Ping failed: {e}")))
        })
        .await
    }

    /// Commit the open transaction
    pub async fn commit(&self) -> Result<()> {
        self.run(|conn| conn.commit().map_err(|e| BackendError::insert(KIND, e)))
            .await
    }

    /// Connection target without the password
    pub fn connection_string_safe(&self) -> String {
        format!("oracle://{}@{}", self.config.user, self.config.connect_string)
    }

    /// Close the session; later calls fail with a connection error
    pub async fn close(&self) -> Result<()> {
        self.conn
            .close_with(|conn| conn.close().map_err(|e| BackendError::close(KIND, e)))
            .await
    }
}
