//! MySQL driver
//!
//! Concrete [`Driver`] implementation over the synchronous `mysql` crate.
//! The physical connection object is a connection pool: internally
//! synchronized, shareable across threads, and torn down or reopened as a
//! unit when the owning handle's health check fails.

use crate::config::params::DEFAULT_PORT;
use crate::db::driver::{Connection, ConnectionStats, Driver};
use crate::error::{DriverError, DriverResult, ServerError};
use mysql::prelude::Queryable;
use mysql::{Opts, OptsBuilder, Pool, PooledConn};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Driver name reported in diagnostics
pub const DRIVER_NAME: &str = "mysql";

/// Connection string fields in the `user:password@tcp(host:port)/db?k=v` form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDsn {
    /// Username
    pub user: String,
    /// Password
    pub password: String,
    /// Database host
    pub host: String,
    /// Database port
    pub port: u16,
    /// Database name
    pub db: String,
    /// Query-string parameters, kept for inspection; the wire options cover
    /// host/auth/db only
    pub params: BTreeMap<String, String>,
}

impl ParsedDsn {
    /// Parse a `user:password@tcp(host:port)/db?k=v&...` connection string.
    ///
    /// The port may be omitted (`tcp(host)`) and defaults to 3306.
    ///
    /// # Errors
    /// Returns `DriverError::Dsn` describing the first malformed piece.
    pub fn parse(dsn: &str) -> DriverResult<Self> {
        let (creds, rest) = dsn
            .split_once('@')
            .ok_or_else(|| DriverError::Dsn("missing credentials separator '@'".to_string()))?;
        let (user, password) = creds
            .split_once(':')
            .ok_or_else(|| DriverError::Dsn("missing ':' between user and password".to_string()))?;

        let rest = rest
            .strip_prefix("tcp(")
            .ok_or_else(|| DriverError::Dsn("expected tcp(host:port) address".to_string()))?;
        let (addr, rest) = rest
            .split_once(')')
            .ok_or_else(|| DriverError::Dsn("unterminated tcp(...) address".to_string()))?;
        let (host, port) = match addr.split_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| DriverError::Dsn(format!("invalid port: {port}")))?;
                (host, port)
            }
            None => (addr, DEFAULT_PORT),
        };
        if host.is_empty() {
            return Err(DriverError::Dsn("empty host".to_string()));
        }

        let rest = rest
            .strip_prefix('/')
            .ok_or_else(|| DriverError::Dsn("missing '/' before database name".to_string()))?;
        let (db, query) = match rest.split_once('?') {
            Some((db, query)) => (db, Some(query)),
            None => (rest, None),
        };

        let mut params = BTreeMap::new();
        if let Some(query) = query {
            for pair in query.split('&').filter(|p| !p.is_empty()) {
                match pair.split_once('=') {
                    Some((k, v)) => params.insert(k.to_string(), v.to_string()),
                    None => params.insert(pair.to_string(), String::new()),
                };
            }
        }

        Ok(Self {
            user: user.to_string(),
            password: password.to_string(),
            host: host.to_string(),
            port,
            db: db.to_string(),
            params,
        })
    }

    fn opts(&self) -> Opts {
        OptsBuilder::new()
            .ip_or_hostname(Some(self.host.clone()))
            .tcp_port(self.port)
            .user(Some(self.user.clone()))
            .pass(Some(self.password.clone()))
            .db_name(Some(self.db.clone()))
            .into()
    }
}

/// MySQL driver factory
#[derive(Debug, Default, Clone)]
pub struct MysqlDriver;

impl MysqlDriver {
    /// New driver instance.
    pub fn new() -> Self {
        Self
    }
}

impl Driver for MysqlDriver {
    type Conn = MysqlConnection;

    fn name(&self) -> &str {
        DRIVER_NAME
    }

    fn open(&self, dsn: &str) -> DriverResult<MysqlConnection> {
        let parsed = ParsedDsn::parse(dsn)?;
        let pool = Pool::new(parsed.opts()).map_err(map_mysql_error)?;
        Ok(MysqlConnection {
            pool: Mutex::new(Some(pool)),
            in_use: AtomicUsize::new(0),
        })
    }
}

/// Pool-backed physical connection for one logical path
pub struct MysqlConnection {
    /// `None` once closed; pings then fail and the owning handle reopens
    pool: Mutex<Option<Pool>>,
    /// Outstanding leases
    in_use: AtomicUsize,
}

impl MysqlConnection {
    /// Borrow a pooled connection for running queries.
    ///
    /// The lease counts as an in-flight operation until dropped, which is
    /// what the best-effort close consults.
    ///
    /// # Errors
    /// Returns `DriverError::Closed` after [`close`](Connection::close), or a
    /// driver error when the pool cannot supply a connection.
    pub fn checkout(&self) -> DriverResult<MysqlLease<'_>> {
        let pool = self.pool.lock().clone().ok_or(DriverError::Closed)?;
        let conn = pool.get_conn().map_err(map_mysql_error)?;
        self.in_use.fetch_add(1, Ordering::SeqCst);
        Ok(MysqlLease {
            conn,
            in_use: &self.in_use,
        })
    }
}

impl Connection for MysqlConnection {
    fn ping(&self) -> DriverResult<()> {
        let pool = self.pool.lock().clone().ok_or(DriverError::Closed)?;
        let mut conn = pool.get_conn().map_err(map_mysql_error)?;
        conn.query_drop("SELECT 1").map_err(map_mysql_error)
    }

    fn stats(&self) -> ConnectionStats {
        ConnectionStats {
            in_use: self.in_use.load(Ordering::SeqCst),
        }
    }

    fn close(&self) -> DriverResult<()> {
        // Dropping the pool closes its idle links; outstanding leases keep
        // their connections alive until returned.
        self.pool.lock().take();
        Ok(())
    }
}

/// RAII lease over a pooled connection
///
/// Derefs to [`mysql::PooledConn`], so queries run directly on the lease.
pub struct MysqlLease<'a> {
    conn: PooledConn,
    in_use: &'a AtomicUsize,
}

impl Deref for MysqlLease<'_> {
    type Target = PooledConn;

    fn deref(&self) -> &PooledConn {
        &self.conn
    }
}

impl DerefMut for MysqlLease<'_> {
    fn deref_mut(&mut self) -> &mut PooledConn {
        &mut self.conn
    }
}

impl Drop for MysqlLease<'_> {
    fn drop(&mut self) {
        self.in_use.fetch_sub(1, Ordering::SeqCst);
    }
}

fn map_mysql_error(err: mysql::Error) -> DriverError {
    match err {
        mysql::Error::MySqlError(e) => DriverError::Server(ServerError {
            code: e.code,
            message: e.message,
        }),
        other => DriverError::Connect(other.to_string()),
    }
}
