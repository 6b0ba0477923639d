//! Single synchronous connection shared with async code
//!
//! Used by drivers whose client library blocks (rusqlite, oracle). The connection sits
//! behind a `std::sync::Mutex` and every call runs on tokio's blocking pool, so at most
//! one statement uses the connection at a time.

use crate::domain::{BackendError, BackendKind, Result};
use std::sync::{Arc, Mutex};

pub struct BlockingConnection<C> {
    kind: BackendKind,
    conn: Arc<Mutex<Option<C>>>,
}

impl<C: Send + 'static> BlockingConnection<C> {
    pub fn new(kind: BackendKind, conn: C) -> Self {
        Self {
            kind,
            conn: Arc::new(Mutex::new(Some(conn))),
        }
    }

    /// Run `f` against the connection on the blocking pool
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns, or a connection error once the connection has
    /// been taken.
    pub async fn run<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&C) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let kind = self.kind;
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| BackendError::query(kind, "connection mutex poisoned"))?;
            match guard.as_ref() {
                Some(conn) => f(conn),
                None => Err(BackendError::connection(kind, "connection is closed")),
            }
        })
        .await
        .map_err(|e| BackendError::query(kind, format!("Blocking task failed: {e}")))?
    }

    /// Remove the connection and hand it to `close` on the blocking pool
    ///
    /// Does nothing if the connection was already taken.
    pub async fn close_with<F>(&self, close: F) -> Result<()>
    where
        F: FnOnce(C) -> Result<()> + Send + 'static,
    {
        let kind = self.kind;
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let taken = conn
                .lock()
                .map_err(|_| BackendError::close(kind, "connection mutex poisoned"))?
                .take();
            match taken {
                Some(conn) => close(conn),
                None => Ok(()),
            }
        })
        .await
        .map_err(|e| BackendError::close(kind, format!("Blocking task failed: {e}")))?
    }
}
