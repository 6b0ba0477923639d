//! Record reader

use crate::adapters::database::{ConnectionRegistry, Page, SchemaMode};
use crate::domain::{BackendKind, Result, StoredPostalRecord};
use std::sync::Arc;

/// One page of records, newest first
#[derive(Debug, Clone, PartialEq)]
pub struct RecordPage {
    pub records: Vec<StoredPostalRecord>,

    /// Number of records in this page
    pub page_size: usize,

    /// Number of records stored in the backend
    pub total_count: u64,
}

pub struct RecordReader {
    registry: Arc<ConnectionRegistry>,
}

impl RecordReader {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Read one page from `kind`
    ///
    /// The table is created if missing so a fresh backend reads as empty rather than
    /// failing.
    ///
    /// # Errors
    ///
    /// Returns a connection, schema or query error from the backend.
    pub async fn read(&self, kind: BackendKind, page: Page) -> Result<RecordPage> {
        let driver = self.registry.acquire(kind).await?;
        driver.ensure_schema(SchemaMode::Additive).await?;

        let records = driver.select_page(page).await?;
        let total_count = driver.count().await?;

        tracing::debug!(
            backend = %kind,
            limit = page.limit,
            offset = page.offset,
            returned = records.len(),
            total_count,
            "Read page"
        );

        Ok(RecordPage {
            page_size: records.len(),
            records,
            total_count,
        })
    }
}
