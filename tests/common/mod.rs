//! Shared fixtures for integration tests
//!
//! [`FakeFactory`] hands out [`InMemoryDriver`] handles so registry, service and
//! HTTP behaviour can be tested without any database server.

#![allow(dead_code)]

use async_trait::async_trait;
use fake::faker::address::en::{CityName, StateName, StreetName};
use fake::Fake;
use mdb::adapters::database::{BackendDriver, DriverFactory, InsertOutcome, Page, SchemaMode};
use mdb::domain::{BackendError, BackendKind, PostalRecord, PostalRow, Result, StoredPostalRecord};
use std::any::Any;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Zip code whose insert always fails
pub const FAILING_ZIP: &str = "00000";

/// Zip code whose insert drops the connection
pub const KILLING_ZIP: &str = "99999";

/// Backend stand-in keeping rows in memory, newest last
pub struct InMemoryDriver {
    kind: BackendKind,
    mode: SchemaMode,
    rows: Mutex<Vec<StoredPostalRecord>>,
    alive: AtomicBool,
    closes: Arc<AtomicUsize>,
    fail_close: bool,
}

impl InMemoryDriver {
    pub fn new(kind: BackendKind, mode: SchemaMode, closes: Arc<AtomicUsize>) -> Self {
        Self {
            kind,
            mode,
            rows: Mutex::new(Vec::new()),
            alive: AtomicBool::new(true),
            closes,
            fail_close: false,
        }
    }

    /// Make subsequent pings fail
    pub fn kill(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    pub fn ids(&self) -> Vec<String> {
        self.rows.lock().unwrap().iter().map(|r| r.id.clone()).collect()
    }

    fn check_alive(&self) -> Result<()> {
        if self.alive.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(BackendError::ConnectionFailed {
                backend: self.kind,
                message: "connection reset by peer".to_string(),
            }
            .into())
        }
    }
}

#[async_trait]
impl BackendDriver for InMemoryDriver {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    async fn ping(&self) -> Result<()> {
        self.check_alive()
    }

    async fn ensure_schema(&self, mode: SchemaMode) -> Result<()> {
        self.check_alive()?;
        if mode == SchemaMode::Destructive {
            self.rows.lock().unwrap().clear();
        }
        Ok(())
    }

    fn import_schema_mode(&self) -> SchemaMode {
        self.mode
    }

    async fn insert_one(&self, row: &PostalRow) -> Result<InsertOutcome> {
        self.check_alive()?;
        if row.zip_code == FAILING_ZIP {
            return Err(BackendError::InsertFailed {
                backend: self.kind,
                message: format!("constraint violated for {}", row.id),
            }
            .into());
        }
        if row.zip_code == KILLING_ZIP {
            self.kill();
            return self.check_alive().map(|_| InsertOutcome::Inserted);
        }

        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|r| r.id == row.id) {
            return Ok(InsertOutcome::Duplicate);
        }
        let created_at = format!("{:06}", rows.len());
        rows.push(StoredPostalRecord::from_row(row.clone(), Some(created_at)));
        Ok(InsertOutcome::Inserted)
    }

    async fn select_page(&self, page: Page) -> Result<Vec<StoredPostalRecord>> {
        self.check_alive()?;
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .rev()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<u64> {
        self.check_alive()?;
        Ok(self.rows.lock().unwrap().len() as u64)
    }

    async fn close(&self) -> Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            return Err(BackendError::CloseFailed {
                backend: self.kind,
                message: "socket already closed".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Factory producing [`InMemoryDriver`] handles and counting calls
#[derive(Default)]
pub struct FakeFactory {
    unreachable: Mutex<HashSet<BackendKind>>,
    disabled: HashSet<BackendKind>,
    handles: Mutex<Vec<Arc<InMemoryDriver>>>,
    connects: AtomicUsize,
    closes: Arc<AtomicUsize>,
    connect_delay: Option<Duration>,
    failing_close: bool,
}

impl FakeFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_disabled(mut self, kinds: &[BackendKind]) -> Self {
        self.disabled = kinds.iter().copied().collect();
        self
    }

    pub fn with_connect_delay(mut self, delay: Duration) -> Self {
        self.connect_delay = Some(delay);
        self
    }

    pub fn with_failing_close(mut self) -> Self {
        self.failing_close = true;
        self
    }

    pub fn set_unreachable(&self, kind: BackendKind, unreachable: bool) {
        let mut set = self.unreachable.lock().unwrap();
        if unreachable {
            set.insert(kind);
        } else {
            set.remove(&kind);
        }
    }

    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Most recently created handle for `kind`
    pub fn latest(&self, kind: BackendKind) -> Option<Arc<InMemoryDriver>> {
        self.handles
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|h| h.kind == kind)
            .cloned()
    }
}

#[async_trait]
impl DriverFactory for FakeFactory {
    async fn connect(&self, kind: BackendKind) -> Result<Arc<dyn BackendDriver>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.connect_delay {
            tokio::time::sleep(delay).await;
        }

        if self.disabled.contains(&kind) {
            return Err(BackendError::Disabled(kind).into());
        }
        if self.unreachable.lock().unwrap().contains(&kind) {
            return Err(BackendError::ConnectionFailed {
                backend: kind,
                message: format!("{kind}: connection refused (os error 111) at 10.0.0.4"),
            }
            .into());
        }

        let mode = match kind {
            BackendKind::MySql | BackendKind::PostgreSql => SchemaMode::Destructive,
            _ => SchemaMode::Additive,
        };
        let mut driver = InMemoryDriver::new(kind, mode, Arc::clone(&self.closes));
        driver.fail_close = self.failing_close;
        let driver = Arc::new(driver);
        self.handles.lock().unwrap().push(Arc::clone(&driver));
        Ok(driver)
    }
}

/// Record with an explicit id and fake address parts
pub fn record(id: &str, zip_code: &str) -> PostalRecord {
    PostalRecord::new(zip_code)
        .with_id(id)
        .with_region(
            StateName().fake::<String>(),
            CityName().fake::<String>(),
            CityName().fake::<String>(),
        )
        .with_road(StreetName().fake::<String>(), (1i64..500).fake::<i64>(), 0)
}

/// `count` records with ids `{prefix}-0`, `{prefix}-1`, ...
pub fn records(prefix: &str, count: usize) -> Vec<PostalRecord> {
    (0..count)
        .map(|i| record(&format!("{prefix}-{i}"), &format!("{:05}", 25000 + i)))
        .collect()
}
