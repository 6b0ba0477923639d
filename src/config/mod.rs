//! Configuration management for MDB.
//!
//! # Overview
//!
//! MDB reads an optional TOML file, then lets environment variables override it:
//! - Environment variable substitution inside the file (`${VAR_NAME}`)
//! - Defaults for every setting, matching the bundled docker-compose ports
//! - Per-section validation
//! - Credentials held as [`SecretString`]
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mdb::config::load_config_or_default;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config_or_default(Some(Path::new("mdb.toml")))?;
//! println!("MySQL at {}:{}", config.mysql.host, config.mysql.port);
//! println!("SQLite file {}", config.sqlite.path);
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 3001
//!
//! [mysql]
//! host = "localhost"
//! port = 3307
//! password = "${MYSQL_PASSWORD}"
//!
//! [oracle]
//! enabled = false
//! ```
//!
//! # Environment Variables
//!
//! `PORT`, `MYSQL_HOST`, `MYSQL_PORT`, `MYSQL_USER`, `MYSQL_PASSWORD`, `MYSQL_DATABASE`,
//! the matching `POSTGRES_*` set, `MONGODB_URI`, `SQLITE_PATH`, `ORACLE_USER`,
//! `ORACLE_PASSWORD`, `ORACLE_CONNECTION` and `MDB_LOG_LEVEL` override the file.

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, load_config_or_default};
pub use schema::{
    ApiConfig, ApplicationConfig, LoggingConfig, MdbConfig, MongoDbConfig, MySqlConfig,
    OracleConfig, PostgreSQLConfig, ServerConfig, SqliteConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
