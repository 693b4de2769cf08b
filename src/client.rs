//! Client facade
//!
//! The composition root tying the config cache, the connection registry, and
//! the driver together behind the three public operations. Both caches are
//! plain instance state: initialized empty when the client is built, never
//! torn down mid-process, no ambient singletons.

use crate::config::{ConfigCache, ConfigLoader, ConnectionParameters};
use crate::db::driver::{Connection, Driver};
use crate::db::mysql::MysqlDriver;
use crate::db::registry::ConnectionRegistry;
use crate::error::{ConfigResult, MylinkError};
use std::path::PathBuf;
use std::sync::Arc;

/// Cached access to database connections, keyed by logical path
pub struct Client<D: Driver> {
    driver: D,
    configs: ConfigCache,
    registry: ConnectionRegistry<D>,
}

/// Client over the bundled MySQL driver
pub type MysqlClient = Client<MysqlDriver>;

impl<D: Driver> Client<D> {
    /// Client over an explicit loader and driver.
    pub fn new(loader: ConfigLoader, driver: D) -> Self {
        Self {
            driver,
            configs: ConfigCache::new(loader),
            registry: ConnectionRegistry::new(),
        }
    }

    /// Return a ready-to-use connection for `path`.
    ///
    /// Loads and validates the profile on first use, reuses the open link on
    /// subsequent calls, and reopens it transparently when the health check
    /// fails. Returns `None` when no usable connection exists right now; the
    /// cause is in the logs. Callers for the same path serialize on one
    /// open-or-ping at a time; different paths proceed independently.
    pub fn connect(&self, path: &str) -> Option<Arc<D::Conn>> {
        let params = self.configs.get(path)?;
        let handle = self.registry.get_or_create(&params);
        handle.ensure(&self.driver)
    }

    /// Like [`connect`](Self::connect), but surfaces the failure kind
    /// (configuration vs driver).
    pub fn try_connect(&self, path: &str) -> Result<Arc<D::Conn>, MylinkError> {
        let params = self.configs.try_get(path)?;
        let handle = self.registry.get_or_create(&params);
        Ok(handle.try_ensure(&self.driver)?)
    }

    /// Fetch the loaded parameters for `path`.
    ///
    /// Loads the profile if it has not been seen yet, but never triggers a
    /// connection attempt.
    pub fn get_config(&self, path: &str) -> Option<Arc<ConnectionParameters>> {
        self.configs.get(path)
    }

    /// Best-effort close hint.
    ///
    /// Closes the connection only if no operations are in flight at the
    /// moment of the check, and reports whether it did. The check is a
    /// point-in-time read and can race with concurrent use; the registry
    /// keeps the handle either way, so a later [`connect`](Self::connect)
    /// revives the path through the normal reopen.
    pub fn close(&self, conn: &D::Conn) -> bool {
        if conn.stats().in_use > 0 {
            return false;
        }
        conn.close().is_ok()
    }

    /// Driver backing this client
    pub fn driver(&self) -> &D {
        &self.driver
    }
}

impl Client<MysqlDriver> {
    /// MySQL client with profiles under `root`.
    pub fn mysql(root: impl Into<PathBuf>) -> Self {
        Self::new(ConfigLoader::new(root), MysqlDriver::new())
    }

    /// MySQL client with the configuration root resolved from the
    /// environment (`MYLINK_CONF_DIR`, falling back to `~/.mylink`).
    ///
    /// # Errors
    /// Returns `ConfigError::NoHomeDir` when neither source resolves.
    pub fn mysql_from_env() -> ConfigResult<Self> {
        Ok(Self::new(ConfigLoader::from_env()?, MysqlDriver::new()))
    }
}
