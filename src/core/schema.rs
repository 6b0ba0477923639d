//! Schema maintenance endpoints
//!
//! Only sqlite exposes these; the other engines answer with
//! [`MdbError::Unsupported`].

use crate::adapters::database::ConnectionRegistry;
use crate::adapters::sqlite::SqliteAdapter;
use crate::domain::{BackendKind, MdbError, Result};
use std::sync::Arc;

pub struct SchemaManager {
    registry: Arc<ConnectionRegistry>,
}

impl SchemaManager {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Backends that support schema maintenance
    pub fn supported() -> Vec<&'static str> {
        vec![BackendKind::Sqlite.as_str()]
    }

    /// Create the postal table, `performance_metrics` and their indexes
    ///
    /// # Errors
    ///
    /// Returns [`MdbError::Unsupported`] for anything but sqlite, otherwise the
    /// backend's connection or schema error.
    pub async fn init(&self, kind: BackendKind) -> Result<()> {
        let driver = self.registry.acquire(require_sqlite(kind, "schema init")?).await?;
        let sqlite = driver
            .as_any()
            .downcast_ref::<SqliteAdapter>()
            .ok_or(MdbError::Unsupported {
                backend: kind,
                operation: "schema init",
            })?;
        sqlite.init_benchmark_schema().await
    }

    /// List user tables
    ///
    /// # Errors
    ///
    /// Same as [`SchemaManager::init`].
    pub async fn list_tables(&self, kind: BackendKind) -> Result<Vec<String>> {
        let driver = self.registry.acquire(require_sqlite(kind, "list tables")?).await?;
        let sqlite = driver
            .as_any()
            .downcast_ref::<SqliteAdapter>()
            .ok_or(MdbError::Unsupported {
                backend: kind,
                operation: "list tables",
            })?;
        sqlite.list_tables().await
    }
}

fn require_sqlite(kind: BackendKind, operation: &'static str) -> Result<BackendKind> {
    match kind {
        BackendKind::Sqlite => Ok(kind),
        backend => Err(MdbError::Unsupported { backend, operation }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_sqlite_is_supported() {
        assert!(require_sqlite(BackendKind::Sqlite, "list tables").is_ok());

        let err = require_sqlite(BackendKind::MySql, "list tables").unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "Operation 'list tables' is not supported by mysql");
        assert_eq!(SchemaManager::supported(), vec!["sqlite"]);
    }
}
