//! Record importer
//!
//! Writes records one at a time into a single backend. A failing record is logged
//! and counted; the loop carries on with the next one.

use crate::adapters::database::{ConnectionRegistry, InsertOutcome};
use crate::domain::{BackendKind, PostalRecord, Result};
use crate::{log_import_complete, log_import_start};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Result of importing a batch of records into one backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub backend: BackendKind,

    /// Records submitted
    pub requested: usize,

    /// Records actually written
    pub inserted: usize,

    /// Records skipped because the id already existed
    pub duplicates: usize,

    /// Records whose insert failed
    pub failed: usize,

    /// One message per failed record
    pub errors: Vec<String>,

    pub duration: Duration,
}

impl ImportSummary {
    pub fn new(backend: BackendKind, requested: usize) -> Self {
        Self {
            backend,
            requested,
            inserted: 0,
            duplicates: 0,
            failed: 0,
            errors: Vec::new(),
            duration: Duration::ZERO,
        }
    }

    fn record(&mut self, outcome: InsertOutcome) {
        match outcome {
            InsertOutcome::Inserted => self.inserted += 1,
            InsertOutcome::Duplicate => self.duplicates += 1,
        }
    }

    fn add_failure(&mut self, error: String) {
        self.failed += 1;
        self.errors.push(error);
    }
}

/// Imports postal records through the registry
pub struct RecordImporter {
    registry: Arc<ConnectionRegistry>,
}

impl RecordImporter {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Import `records` into `kind`, in input order
    ///
    /// The driver's import schema mode runs first, so the relational backends that
    /// reset destructively start from an empty table. That reset also happens for an
    /// empty batch.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be reached, the schema cannot be prepared
    /// or the final commit fails. Individual insert failures are counted, unless the
    /// handle stopped answering during the loop (a concurrent `reset` closes it).
    pub async fn import(&self, kind: BackendKind, records: &[PostalRecord]) -> Result<ImportSummary> {
        let mut summary = ImportSummary::new(kind, records.len());
        let started = Instant::now();
        log_import_start!(kind, records.len());

        let driver = self.registry.acquire(kind).await?;
        driver.ensure_schema(driver.import_schema_mode()).await?;

        for record in records {
            let row = record.to_row();
            match driver.insert_one(&row).await {
                Ok(outcome) => {
                    if outcome == InsertOutcome::Duplicate {
                        tracing::debug!(backend = %kind, record_id = %row.id, "Skipped duplicate record");
                    }
                    summary.record(outcome);
                }
                Err(e) => {
                    tracing::warn!(
                        backend = %kind,
                        record_id = %row.id,
                        error = %e,
                        "Failed to insert record"
                    );
                    summary.add_failure(format!("{}: {e}", row.id));
                }
            }
        }

        if summary.failed > 0 {
            if let Err(e) = driver.ping().await {
                tracing::error!(backend = %kind, error = %e, "Connection lost during import");
                return Err(e);
            }
        }
        driver.finish_import().await?;

        summary.duration = started.elapsed();
        log_import_complete!(
            kind,
            summary.inserted,
            summary.duplicates,
            summary.failed,
            summary.duration
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let mut summary = ImportSummary::new(BackendKind::Sqlite, 4);
        summary.record(InsertOutcome::Inserted);
        summary.record(InsertOutcome::Inserted);
        summary.record(InsertOutcome::Duplicate);
        summary.add_failure("25627_1_x: sqlite insert failed: disk I/O error".to_string());

        assert_eq!(summary.inserted, 2);
        assert_eq!(summary.duplicates, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.requested, 4);
    }
}
