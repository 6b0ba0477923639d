//! Backend connection registry
//!
//! Holds at most one live handle per [`BackendKind`]. Each kind has its own async
//! mutex, so concurrent callers for the same backend connect at most once while
//! different backends never wait on each other.

use crate::adapters::database::factory::DriverFactory;
use crate::adapters::database::traits::BackendDriver;
use crate::domain::{BackendError, BackendKind, MdbError, Result};
use crate::log_backend_failure;
use futures::future::join_all;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Connection attempts give up after this unless configured otherwise
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Reason reported for a backend whose slot is busy connecting
pub const CONNECTING_REASON: &str = "Connection attempt in progress";

/// Liveness of one backend as seen by the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum HealthStatus {
    /// A cached handle answered its ping
    Healthy,
    /// The last connection attempt or ping failed
    Unreachable { reason: String },
    /// Never connected and never failed, or disabled in configuration
    Unconfigured,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}

#[derive(Default)]
struct Slot {
    handle: Option<Arc<dyn BackendDriver>>,
    last_error: Option<String>,
    disabled: bool,
}

impl Slot {
    fn record_failure(&mut self, err: &MdbError) {
        if let MdbError::Backend(BackendError::Disabled(_)) = err {
            self.disabled = true;
            self.last_error = None;
        } else {
            self.last_error = Some(err.public_message());
        }
    }
}

/// Per-process registry of backend handles
///
/// Constructed once at startup and shared as `Arc<ConnectionRegistry>`.
pub struct ConnectionRegistry {
    factory: Arc<dyn DriverFactory>,
    slots: BTreeMap<BackendKind, Mutex<Slot>>,
    connect_timeout: Duration,
}

impl ConnectionRegistry {
    pub fn new(factory: Arc<dyn DriverFactory>) -> Self {
        let slots = BackendKind::ALL
            .iter()
            .map(|kind| (*kind, Mutex::new(Slot::default())))
            .collect();
        Self {
            factory,
            slots,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Bound every connection attempt by `timeout`
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    fn slot(&self, kind: BackendKind) -> &Mutex<Slot> {
        // Every kind is inserted in `new`
        &self.slots[&kind]
    }

    /// Return a live handle for `kind`, connecting if needed
    ///
    /// A cached handle is pinged first. If the ping fails the stale handle is closed
    /// before a new connection is opened.
    ///
    /// # Errors
    ///
    /// Returns the connection error; the slot stays empty so the next call retries.
    pub async fn acquire(&self, kind: BackendKind) -> Result<Arc<dyn BackendDriver>> {
        let mut slot = self.slot(kind).lock().await;

        if let Some(handle) = slot.handle.clone() {
            match handle.ping().await {
                Ok(()) => return Ok(handle),
                Err(e) => {
                    tracing::warn!(backend = %kind, error = %e, "Cached handle failed ping, reconnecting");
                    slot.handle = None;
                    if let Err(close_err) = handle.close().await {
                        tracing::debug!(backend = %kind, error = %close_err, "Ignoring close error on stale handle");
                    }
                }
            }
        }

        self.connect_into(kind, &mut slot).await
    }

    /// Close the cached handle for `kind` (if any) and connect a fresh one
    ///
    /// # Errors
    ///
    /// Returns the connection error of the new attempt.
    pub async fn reset(&self, kind: BackendKind) -> Result<Arc<dyn BackendDriver>> {
        let mut slot = self.slot(kind).lock().await;

        if let Some(handle) = slot.handle.take() {
            tracing::info!(backend = %kind, "Closing handle before reconnect");
            if let Err(e) = handle.close().await {
                tracing::debug!(backend = %kind, error = %e, "Ignoring close error during reset");
            }
        }

        self.connect_into(kind, &mut slot).await
    }

    async fn connect_into(&self, kind: BackendKind, slot: &mut Slot) -> Result<Arc<dyn BackendDriver>> {
        let attempt = tokio::time::timeout(self.connect_timeout, self.factory.connect(kind))
            .await
            .unwrap_or_else(|_| {
                Err(BackendError::ConnectionFailed {
                    backend: kind,
                    message: format!("timed out after {:?}", self.connect_timeout),
                }
                .into())
            });

        match attempt {
            Ok(handle) => {
                tracing::info!(backend = %kind, "Connected");
                slot.handle = Some(Arc::clone(&handle));
                slot.last_error = None;
                slot.disabled = false;
                Ok(handle)
            }
            Err(e) => {
                if matches!(e, MdbError::Backend(BackendError::Disabled(_))) {
                    tracing::debug!(backend = %kind, "Backend disabled, not connecting");
                } else {
                    log_backend_failure!(kind, "connect", &e);
                }
                slot.record_failure(&e);
                Err(e)
            }
        }
    }

    /// Connect every backend concurrently
    ///
    /// Individual failures are logged and recorded; the returned map says which
    /// backends ended up connected.
    pub async fn connect_all(&self) -> BTreeMap<BackendKind, bool> {
        let attempts = BackendKind::ALL.iter().map(|kind| async move {
            let connected = self.acquire(*kind).await.is_ok();
            (*kind, connected)
        });

        let results: BTreeMap<BackendKind, bool> = join_all(attempts).await.into_iter().collect();
        let connected = results.values().filter(|ok| **ok).count();
        tracing::info!(connected, total = results.len(), "Initial connection round finished");
        results
    }

    /// Check every backend without connecting new ones
    pub async fn health_check(&self) -> BTreeMap<BackendKind, HealthStatus> {
        let checks = BackendKind::ALL.iter().map(|kind| async move {
            (*kind, self.check_slot(*kind).await)
        });

        join_all(checks).await.into_iter().collect()
    }

    // Never waits on a slot that is busy connecting, and pings outside the lock
    async fn check_slot(&self, kind: BackendKind) -> HealthStatus {
        let handle = {
            let Ok(slot) = self.slot(kind).try_lock() else {
                return HealthStatus::Unreachable {
                    reason: CONNECTING_REASON.to_string(),
                };
            };
            match slot.handle.clone() {
                Some(handle) => handle,
                None if slot.disabled => return HealthStatus::Unconfigured,
                None => {
                    return match &slot.last_error {
                        Some(reason) => HealthStatus::Unreachable {
                            reason: reason.clone(),
                        },
                        None => HealthStatus::Unconfigured,
                    }
                }
            }
        };

        match handle.ping().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => {
                tracing::warn!(backend = %kind, error = %e, "Health check failed");
                let reason = e.public_message();
                if let Ok(mut slot) = self.slot(kind).try_lock() {
                    slot.last_error = Some(reason.clone());
                }
                HealthStatus::Unreachable { reason }
            }
        }
    }

    /// Whether a handle is currently cached for `kind`
    pub async fn is_cached(&self, kind: BackendKind) -> bool {
        self.slot(kind).lock().await.handle.is_some()
    }

    /// Release every cached handle, ignoring close errors
    pub async fn close_all(&self) {
        let closes = self.slots.iter().map(|(kind, slot)| async move {
            let handle = slot.lock().await.handle.take();
            if let Some(handle) = handle {
                match handle.close().await {
                    Ok(()) => tracing::info!(backend = %kind, "Connection closed"),
                    Err(e) => tracing::debug!(backend = %kind, error = %e, "Ignoring close error"),
                }
            }
        });

        join_all(closes).await;
    }
}
