//! Aggregate stats across every backend
//!
//! Each backend is counted on its own task; an outage shows up only in that
//! backend's entry.

use crate::adapters::database::{ConnectionRegistry, SchemaMode};
use crate::domain::{BackendKind, Result};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsStatus {
    Connected,
    Error,
}

/// Row count and status of one backend
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendStats {
    pub record_count: u64,
    pub status: StatsStatus,
    pub last_checked: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BackendStats {
    fn connected(record_count: u64) -> Self {
        Self {
            record_count,
            status: StatsStatus::Connected,
            last_checked: Utc::now(),
            error: None,
        }
    }

    fn failed(error: String) -> Self {
        Self {
            record_count: 0,
            status: StatsStatus::Error,
            last_checked: Utc::now(),
            error: Some(error),
        }
    }
}

pub struct StatsReporter {
    registry: Arc<ConnectionRegistry>,
}

impl StatsReporter {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Stats for every backend, in [`BackendKind::ALL`] order
    pub async fn collect(&self) -> BTreeMap<BackendKind, BackendStats> {
        let tasks = BackendKind::ALL.iter().map(|kind| async move {
            let stats = match self.count(*kind).await {
                Ok(count) => BackendStats::connected(count),
                Err(e) => {
                    tracing::warn!(backend = %kind, error = %e, "Stats unavailable");
                    BackendStats::failed(e.public_message())
                }
            };
            (*kind, stats)
        });

        join_all(tasks).await.into_iter().collect()
    }

    async fn count(&self, kind: BackendKind) -> Result<u64> {
        let driver = self.registry.acquire(kind).await?;
        driver.ensure_schema(SchemaMode::Additive).await?;
        driver.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_serialization() {
        let json = serde_json::to_value(BackendStats::connected(42)).unwrap();
        assert_eq!(json["recordCount"], 42);
        assert_eq!(json["status"], "connected");
        assert!(json.get("error").is_none());
        assert!(json["lastChecked"].is_string());

        let json = serde_json::to_value(BackendStats::failed("Could not connect to oracle".into()))
            .unwrap();
        assert_eq!(json["recordCount"], 0);
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"], "Could not connect to oracle");
    }
}
