//! Per-path connection handle
//!
//! Each handle owns at most one physical connection and rechecks it lazily:
//! every acquisition pings the existing link and falls back to a fresh open
//! when the ping fails or no link exists yet. The whole sequence holds the
//! handle's own lock, so opens and pings for one logical path never
//! interleave, while distinct paths proceed independently.

use crate::config::ConnectionParameters;
use crate::db::driver::{Connection, Driver};
use crate::error::DriverResult;
use parking_lot::Mutex;
use std::sync::Arc;

/// Lazily (re)connected handle for one logical path
pub struct ConnectionHandle<D: Driver> {
    params: Arc<ConnectionParameters>,
    slot: Mutex<Option<Arc<D::Conn>>>,
}

impl<D: Driver> ConnectionHandle<D> {
    /// Empty handle bound to `params`. No I/O happens here.
    pub(crate) fn new(params: Arc<ConnectionParameters>) -> Self {
        Self {
            params,
            slot: Mutex::new(None),
        }
    }

    /// Parameters this handle is bound to
    pub fn params(&self) -> &ConnectionParameters {
        &self.params
    }

    /// Return a live connection, opening or reopening as needed.
    ///
    /// Returns `None` when no link can be established right now; the cause
    /// is logged.
    pub fn ensure(&self, driver: &D) -> Option<Arc<D::Conn>> {
        self.try_ensure(driver).ok()
    }

    /// Like [`ensure`](Self::ensure), but surfaces the open error.
    pub fn try_ensure(&self, driver: &D) -> DriverResult<Arc<D::Conn>> {
        let mut slot = self.slot.lock();

        if let Some(conn) = slot.as_ref() {
            if conn.ping().is_ok() {
                return Ok(Arc::clone(conn));
            }
            // Dead link: fall through and treat it exactly like a cold start.
        }

        match driver.open(&self.params.connection_string()) {
            Ok(conn) => {
                let conn = Arc::new(conn);
                // The prior reference, if any, is discarded but not closed;
                // outstanding users keep it alive until they drop it.
                *slot = Some(Arc::clone(&conn));
                tracing::debug!(driver = driver.name(), config = %self.params, "connection opened");
                Ok(conn)
            }
            Err(err) => {
                tracing::error!(
                    driver = driver.name(),
                    config = %self.params,
                    error = %err,
                    "connection open failed"
                );
                *slot = None;
                Err(err)
            }
        }
    }
}
