//! Common test utilities and helpers
//!
//! Shared test infrastructure: an on-disk configuration root and a
//! scriptable mock driver for exercising the caching layer without a server.

use mylink::Client;
use mylink::config::ConfigLoader;
use mylink::db::driver::{Connection, ConnectionStats, Driver};
use mylink::error::{DriverError, DriverResult};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Observable state of one mock connection
#[derive(Default, Debug)]
pub struct MockConnState {
    /// Cleared to simulate a dead link
    pub alive: AtomicBool,
    /// Set by `close`
    pub closed: AtomicBool,
    /// Reported through `stats`
    pub in_use: AtomicUsize,
    /// Number of pings received
    pub pings: AtomicUsize,
}

impl MockConnState {
    fn live() -> Arc<Self> {
        let state = Self::default();
        state.alive.store(true, Ordering::SeqCst);
        Arc::new(state)
    }

    /// Simulate the link dying underneath the handle.
    pub fn kill(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}

/// Mock physical connection
#[derive(Debug)]
pub struct MockConnection {
    pub state: Arc<MockConnState>,
}

impl Connection for MockConnection {
    fn ping(&self) -> DriverResult<()> {
        self.state.pings.fetch_add(1, Ordering::SeqCst);
        if self.state.closed.load(Ordering::SeqCst) || !self.state.alive.load(Ordering::SeqCst) {
            return Err(DriverError::Closed);
        }
        Ok(())
    }

    fn stats(&self) -> ConnectionStats {
        ConnectionStats {
            in_use: self.state.in_use.load(Ordering::SeqCst),
        }
    }

    fn close(&self) -> DriverResult<()> {
        self.state.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Scriptable driver: records every open attempt and can be told to refuse.
#[derive(Default)]
pub struct MockDriver {
    attempts: AtomicUsize,
    fail_opens: AtomicBool,
    dsns: Mutex<Vec<String>>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent opens fail (or succeed again).
    pub fn fail_opens(&self, fail: bool) {
        self.fail_opens.store(fail, Ordering::SeqCst);
    }

    /// Number of open attempts, successful or not.
    pub fn open_attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Connection string of the most recent open attempt.
    pub fn last_dsn(&self) -> Option<String> {
        self.dsns.lock().unwrap().last().cloned()
    }
}

impl Driver for MockDriver {
    type Conn = MockConnection;

    fn name(&self) -> &str {
        "mock"
    }

    fn open(&self, dsn: &str) -> DriverResult<MockConnection> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.dsns.lock().unwrap().push(dsn.to_string());
        if self.fail_opens.load(Ordering::SeqCst) {
            return Err(DriverError::Connect("mock open refused".to_string()));
        }
        Ok(MockConnection {
            state: MockConnState::live(),
        })
    }
}

/// Profile body matching the standard test target.
pub const VALID_PROFILE: &str = r#"
host = "db1"
port = 0
user = "u"
password = "p"
db = "orders"
"#;

/// Write `db/mysql/<name>.toml` under `root`.
pub fn write_profile(root: &Path, name: &str, body: &str) {
    let dir = root.join("db/mysql");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(format!("{name}.toml")), body).unwrap();
}

/// Client over the mock driver with profiles under `root`.
pub fn test_client(root: &TempDir) -> Client<MockDriver> {
    init_tracing();
    Client::new(ConfigLoader::new(root.path()), MockDriver::new())
}

/// Route log output through the test harness; safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
