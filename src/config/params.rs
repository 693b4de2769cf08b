//! Connection parameter records
//!
//! One record per logical path, deserialized from a TOML profile and
//! immutable after validation. The record carries its own load metadata
//! (normalized path, source file, modification time) so callers can audit
//! where a live connection came from.

use crate::error::{ConfigError, ConfigResult};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Namespace prefix shared by every logical path
pub const PATH_PREFIX: &str = "db/mysql";

/// Default MySQL port, applied when a profile leaves the port unset or zero
pub const DEFAULT_PORT: u16 = 3306;

/// Characters escaped when a filled-in parameter value lands in the query
/// string; everything but unreserved characters.
const QUERY_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Normalize a raw logical path into the cache key form.
///
/// Trims path separators and prepends the `db/mysql` namespace unless the
/// input already carries it, so callers may pass either a bare name
/// (`payments`) or a fully qualified path (`db/mysql/payments`).
pub fn normalize_path(raw: &str) -> String {
    let trimmed = raw.trim_matches('/');
    if trimmed.starts_with(PATH_PREFIX) {
        trimmed.to_string()
    } else {
        format!("{PATH_PREFIX}/{trimmed}")
    }
}

/// Validated connection parameters for one logical path
///
/// Every profile field defaults during deserialization, so a missing value
/// surfaces as a validation failure rather than a parse error. Passwords are
/// never serialized back out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionParameters {
    /// Database host
    #[serde(default)]
    pub host: String,

    /// Database port (0 means "use the default")
    #[serde(default)]
    pub port: u16,

    /// Username
    #[serde(default)]
    pub user: String,

    /// Password
    #[serde(default, skip_serializing)]
    pub password: String,

    /// Database name
    #[serde(default)]
    pub db: String,

    /// Driver parameters appended to the connection string as a query string
    #[serde(default)]
    pub params: BTreeMap<String, String>,

    /// Normalized logical path, the key used by both caches
    #[serde(skip)]
    path: String,

    /// Profile file this record was loaded from
    #[serde(skip)]
    file: PathBuf,

    /// Modification time of the profile file, unix seconds
    #[serde(skip)]
    last_modified: i64,
}

impl ConnectionParameters {
    /// Check the record's invariants, defaulting the port.
    ///
    /// # Errors
    /// Returns `ConfigError::Invalid` naming the violated rule.
    pub(crate) fn validate(&mut self) -> ConfigResult<()> {
        if self.host.is_empty() {
            return Err(ConfigError::Invalid("host is empty".to_string()));
        }
        if self.port == 0 {
            self.port = DEFAULT_PORT;
        }
        if self.user.is_empty() || self.password.is_empty() {
            return Err(ConfigError::Invalid(
                "authorization information is missing".to_string(),
            ));
        }
        if self.db.is_empty() {
            return Err(ConfigError::Invalid("database name is missing".to_string()));
        }
        Ok(())
    }

    /// Attach load metadata after a successful parse.
    pub(crate) fn stamp(&mut self, path: String, file: PathBuf, last_modified: i64) {
        self.path = path;
        self.file = file;
        self.last_modified = last_modified;
    }

    /// Fill in driver parameters the profile omitted.
    ///
    /// Explicit values always win. The timezone is query-escaped at fill
    /// time; values the profile sets itself are taken verbatim.
    pub(crate) fn fill_default_params(&mut self, charset: &str, parse_time: bool, time_zone: &str) {
        self.params
            .entry("charset".to_string())
            .or_insert_with(|| charset.to_string());
        self.params
            .entry("parseTime".to_string())
            .or_insert_with(|| parse_time.to_string());
        self.params
            .entry("loc".to_string())
            .or_insert_with(|| utf8_percent_encode(time_zone, QUERY_ESCAPE).to_string());
    }

    /// Normalized logical path, the key used by both caches
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Profile file this record was loaded from
    pub fn source_file(&self) -> &Path {
        &self.file
    }

    /// Modification time of the profile file, unix seconds
    pub fn last_modified(&self) -> i64 {
        self.last_modified
    }

    /// Build the driver connection string:
    /// `user:password@tcp(host:port)/db?key=value&...`
    ///
    /// Parameters are appended in sorted key order, so the string is
    /// reproducible for a given record.
    pub fn connection_string(&self) -> String {
        let mut s = format!(
            "{}:{}@tcp({}:{})/{}",
            self.user, self.password, self.host, self.port, self.db
        );
        if !self.params.is_empty() {
            let query: Vec<String> = self
                .params
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            s.push('?');
            s.push_str(&query.join("&"));
        }
        s
    }

    /// Serialize the record as compact JSON (password omitted).
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Serialize the record as pretty-printed JSON (password omitted).
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Credential-free summary used in log messages
impl fmt::Display for ConnectionParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{}> {}:{}/{}@{}",
            self.path, self.host, self.port, self.db, self.last_modified
        )
    }
}
