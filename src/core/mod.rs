//! Core services for MDB.
//!
//! Each service borrows handles from the shared
//! [`ConnectionRegistry`](crate::adapters::database::ConnectionRegistry) and works
//! against `dyn BackendDriver` only.
//!
//! # Modules
//!
//! - [`importer`] - Sequential, failure-tolerant record import
//! - [`reader`] - Newest-first paging with total count
//! - [`stats`] - Per-backend row counts, collected concurrently
//! - [`schema`] - Sqlite schema maintenance
//!
//! # Example
//!
//! ```rust,no_run
//! use mdb::adapters::database::{ConfiguredDriverFactory, ConnectionRegistry, Page};
//! use mdb::config::MdbConfig;
//! use mdb::core::{RecordImporter, RecordReader};
//! use mdb::domain::{BackendKind, PostalRecord};
//! use std::sync::Arc;
//!
//! # async fn example() -> mdb::domain::Result<()> {
//! let config = Arc::new(MdbConfig::default());
//! let registry = Arc::new(ConnectionRegistry::new(Arc::new(ConfiguredDriverFactory::new(config))));
//!
//! let summary = RecordImporter::new(Arc::clone(&registry))
//!     .import(BackendKind::Sqlite, &[PostalRecord::new("25627")])
//!     .await?;
//! let page = RecordReader::new(registry)
//!     .read(BackendKind::Sqlite, Page::new(10, 0))
//!     .await?;
//!
//! println!("inserted {}, stored {}", summary.inserted, page.total_count);
//! # Ok(())
//! # }
//! ```

pub mod importer;
pub mod reader;
pub mod schema;
pub mod stats;

pub use importer::{ImportSummary, RecordImporter};
pub use reader::{RecordPage, RecordReader};
pub use schema::SchemaManager;
pub use stats::{BackendStats, StatsReporter, StatsStatus};
