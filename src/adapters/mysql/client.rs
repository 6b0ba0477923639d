//! MySQL client implementation

use crate::config::schema::MySqlConfig;
use crate::domain::{BackendError, BackendKind, Result};
use mysql_async::prelude::Queryable;
use mysql_async::{Conn, OptsBuilder, Pool, PoolConstraints, PoolOpts};
use secrecy::ExposeSecret;

const KIND: BackendKind = BackendKind::MySql;

/// MySQL client for MDB
///
/// Owns a `mysql_async` pool. Constructing a client checks out one connection and
/// pings it, so a returned client is known to be reachable.
pub struct MySqlClient {
    pool: Pool,
    config: MySqlConfig,
}

impl MySqlClient {
    /// Create a new MySQL client
    ///
    /// # Errors
    ///
    /// Returns a connection error if the server cannot be reached.
    pub async fn new(config: MySqlConfig) -> Result<Self> {
        let pool = Pool::new(build_opts(&config));
        let client = Self { pool, config };

        if let Err(e) = client.test_connection().await {
            // Release sockets opened by the failed attempt
            let _ = client.pool.clone().disconnect().await;
            return Err(e);
        }

        tracing::info!(
            backend = %KIND,
            target = %client.connection_string_safe(),
            "MySQL pool ready"
        );
        Ok(client)
    }

    /// Check out a connection and ping the server
    pub async fn test_connection(&self) -> Result<()> {
        let mut conn = self.get_connection().await?;
        conn.ping()
            .await
            .map_err(|e| BackendError::connection(KIND, format!("Ping failed: {e}")))
    }

    /// Get a connection from the pool
    ///
    /// # Errors
    ///
    /// Returns a connection error if no connection can be obtained.
    pub async fn get_connection(&self) -> Result<Conn> {
        self.pool.get_conn().await.map_err(|e| {
            BackendError::connection(KIND, format!("Failed to get connection from pool: {e}"))
        })
    }

    /// Connection target with the credentials left out
    pub fn connection_string_safe(&self) -> String {
        format!(
            "mysql://***@{}:{}/{}",
            self.config.host, self.config.port, self.config.database
        )
    }

    /// Disconnect the pool
    ///
    /// Resolves once every checked-out connection has been returned.
    pub async fn close(&self) -> Result<()> {
        self.pool
            .clone()
            .disconnect()
            .await
            .map_err(|e| BackendError::close(KIND, e))
    }
}

fn build_opts(config: &MySqlConfig) -> OptsBuilder {
    let constraints = PoolConstraints::new(1, config.max_connections).unwrap_or_default();

    OptsBuilder::default()
        .ip_or_hostname(config.host.clone())
        .tcp_port(config.port)
        .user(Some(config.user.clone()))
        .pass(Some(config.password.expose_secret().as_ref().to_string()))
        .db_name(Some(config.database.clone()))
        .pool_opts(PoolOpts::default().with_constraints(constraints))
}
