//! Backend driver abstraction
//!
//! Every storage engine implements [`BackendDriver`] once. The services in
//! [`crate::core`] only ever talk to `dyn BackendDriver`.

use crate::domain::{BackendKind, PostalRow, Result, StoredPostalRecord};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Table name shared by every relational backend
pub const POSTAL_TABLE: &str = "postal_codes";

/// How [`BackendDriver::ensure_schema`] treats an existing table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaMode {
    /// Drop then recreate; existing rows are lost
    Destructive,
    /// Create only if absent
    Additive,
}

/// Outcome of inserting a single row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The row was written
    Inserted,
    /// A row with the same primary key already existed; nothing was written
    Duplicate,
}

/// Window over the newest-first ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u64,
    pub offset: u64,
}

impl Page {
    pub fn new(limit: u64, offset: u64) -> Self {
        Self { limit, offset }
    }

    /// One past the last row of the window (1-indexed), saturating
    pub fn upper_bound(&self) -> u64 {
        self.offset.saturating_add(self.limit)
    }
}

/// Storage engine driver
///
/// A driver value is a live handle: constructing it connects, [`close`](Self::close)
/// releases it. The registry owns handles and shares them as `Arc<dyn BackendDriver>`.
#[async_trait]
pub trait BackendDriver: Send + Sync {
    /// Backend this driver talks to
    fn kind(&self) -> BackendKind;

    /// Downcast to Any for backend-specific operations
    ///
    /// Used by the sqlite schema endpoints, which have no counterpart on the
    /// other engines.
    fn as_any(&self) -> &dyn Any;

    /// Liveness check
    ///
    /// # Errors
    ///
    /// Returns a connection error if the backend does not answer.
    async fn ping(&self) -> Result<()>;

    /// Ensure the postal table (or collection) exists with the fixed shape
    ///
    /// # Errors
    ///
    /// Returns a schema error if DDL fails.
    async fn ensure_schema(&self, mode: SchemaMode) -> Result<()>;

    /// Schema mode applied before a bulk import
    fn import_schema_mode(&self) -> SchemaMode {
        SchemaMode::Destructive
    }

    /// Insert one row, leaving an existing row with the same id untouched
    ///
    /// # Errors
    ///
    /// Returns an insert error for any failure other than a duplicate key.
    async fn insert_one(&self, row: &PostalRow) -> Result<InsertOutcome>;

    /// Rows ordered by creation time, newest first
    ///
    /// # Errors
    ///
    /// Returns a query error if the select fails.
    async fn select_page(&self, page: Page) -> Result<Vec<StoredPostalRecord>>;

    /// Total number of stored rows
    ///
    /// # Errors
    ///
    /// Returns a query error if the count fails.
    async fn count(&self) -> Result<u64>;

    /// Called once after the insert loop of an import
    ///
    /// # Errors
    ///
    /// Returns an insert error if pending writes cannot be made durable.
    async fn finish_import(&self) -> Result<()> {
        Ok(())
    }

    /// Release the underlying connection or pool
    ///
    /// # Errors
    ///
    /// Returns a close error; callers shutting down ignore it.
    async fn close(&self) -> Result<()>;
}


impl std::fmt::Debug for dyn BackendDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendDriver").field("kind", &self.kind()).finish()
    }
}
