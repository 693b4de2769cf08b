//! Driver seam
//!
//! Defines the interface the caching layer requires from a wire driver.
//! This abstraction allows for:
//! - Swapping the physical driver without touching the caches
//! - Easy testing with mock implementations
//! - Consistent error handling

use crate::error::DriverResult;

/// Factory for physical connections
pub trait Driver: Send + Sync + 'static {
    /// Physical connection type produced by [`open`](Self::open)
    type Conn: Connection + 'static;

    /// Driver name used in diagnostics (e.g. `"mysql"`)
    fn name(&self) -> &str;

    /// Open a physical connection for the given connection string.
    ///
    /// The string is in the `user:password@tcp(host:port)/db?k=v&...` form
    /// produced by
    /// [`ConnectionParameters::connection_string`](crate::config::ConnectionParameters::connection_string).
    ///
    /// # Errors
    /// Returns `DriverError::Dsn` for a malformed string, or a driver error
    /// when the link cannot be established.
    fn open(&self, dsn: &str) -> DriverResult<Self::Conn>;
}

/// One physical connection
///
/// Implementations are expected to be internally synchronized: once handed
/// to a caller, the connection may be used from several threads at once. The
/// caching layer relies on that property rather than enforcing it.
pub trait Connection: Send + Sync {
    /// Check that the link is still usable.
    ///
    /// This should be a lightweight round-trip (e.g. `SELECT 1`).
    ///
    /// # Errors
    /// Returns error when the link is dead or closed; the caller reacts by
    /// reopening, never by retrying the ping.
    fn ping(&self) -> DriverResult<()>;

    /// Point-in-time usage statistics.
    fn stats(&self) -> ConnectionStats;

    /// Tear the link down.
    ///
    /// Safe to call while other references exist; subsequent pings fail and
    /// the owning handle reopens on next use.
    ///
    /// # Errors
    /// Returns error if teardown fails (though this is rare).
    fn close(&self) -> DriverResult<()>;
}

/// Usage statistics reported by a connection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectionStats {
    /// Number of operations currently in flight
    pub in_use: usize,
}
