//! Storage engine integrations for MDB.
//!
//! - [`database`] - Driver trait, factory and the connection registry
//! - [`mysql`] - MySQL through `mysql_async`
//! - [`postgresql`] - PostgreSQL through `tokio-postgres` and `deadpool-postgres`
//! - [`mongodb`] - MongoDB through the official driver
//! - [`sqlite`] - Embedded SQLite through `rusqlite`
//! - [`oracle`] - Oracle through the `oracle` crate (ODPI-C)
//!
//! # Design Pattern
//!
//! Every engine is split into a client, which owns the connection or pool and converts
//! driver errors, and an adapter, which implements
//! [`BackendDriver`](database::BackendDriver) on top of it. Nothing outside this module
//! sees a driver type.
//!
//! ```rust,no_run
//! use mdb::adapters::database::{BackendDriver, SchemaMode};
//! use mdb::adapters::sqlite::{SqliteAdapter, SqliteClient};
//! use mdb::config::SqliteConfig;
//!
//! # async fn example() -> mdb::domain::Result<()> {
//! let client = SqliteClient::open(SqliteConfig::default()).await?;
//! let driver = SqliteAdapter::new(client);
//!
//! driver.ensure_schema(SchemaMode::Additive).await?;
//! println!("{} rows", driver.count().await?);
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod mongodb;
pub mod mysql;
pub mod oracle;
pub mod postgresql;
pub mod sqlite;
