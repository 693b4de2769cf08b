//! Profile loading
//!
//! Resolves and parses connection profiles stored under a configuration root
//! directory: the profile for logical path `db/mysql/payments` is the file
//! `<root>/db/mysql/payments.toml`.

use crate::config::params::{ConnectionParameters, normalize_path};
use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the configuration root directory
pub const CONF_DIR_ENV: &str = "MYLINK_CONF_DIR";

/// Driver parameters filled into a profile when it omits them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamDefaults {
    /// Character set (`charset`)
    #[serde(default = "default_charset")]
    pub charset: String,

    /// Whether the driver should parse time columns (`parseTime`)
    #[serde(default = "default_parse_time")]
    pub parse_time: bool,

    /// Timezone name (`loc`), query-escaped when filled in
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
}

fn default_charset() -> String {
    "utf8".to_string()
}

fn default_parse_time() -> bool {
    true
}

fn default_time_zone() -> String {
    "UTC".to_string()
}

impl Default for ParamDefaults {
    fn default() -> Self {
        Self {
            charset: default_charset(),
            parse_time: default_parse_time(),
            time_zone: default_time_zone(),
        }
    }
}

/// Loads and validates connection profiles from disk
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    root: PathBuf,
    defaults: ParamDefaults,
}

impl ConfigLoader {
    /// Loader with profiles under `root` and the standard parameter defaults.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_defaults(root, ParamDefaults::default())
    }

    /// Loader with explicit parameter defaults.
    pub fn with_defaults(root: impl Into<PathBuf>, defaults: ParamDefaults) -> Self {
        Self {
            root: root.into(),
            defaults,
        }
    }

    /// Loader with the root resolved from the environment.
    ///
    /// Reads `MYLINK_CONF_DIR`, falling back to `~/.mylink`.
    ///
    /// # Errors
    /// Returns `ConfigError::NoHomeDir` when neither source resolves.
    pub fn from_env() -> ConfigResult<Self> {
        if let Ok(dir) = std::env::var(CONF_DIR_ENV) {
            return Ok(Self::new(dir));
        }
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(Self::new(home.join(".mylink")))
    }

    /// Configuration root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load and validate the profile for `path`.
    ///
    /// The path is normalized first, so both bare names and fully qualified
    /// paths resolve to the same file. On success the record is stamped with
    /// its path, source file, and modification time, and any omitted driver
    /// parameters are filled from the defaults.
    ///
    /// # Errors
    /// `NotFound` for a missing file, `Io`/`Parse` for unreadable or
    /// malformed TOML, `Invalid` when a validation rule is violated.
    pub fn load(&self, path: &str) -> ConfigResult<ConnectionParameters> {
        let path = normalize_path(path);
        let file = self.root.join(format!("{path}.toml"));
        if !file.exists() {
            return Err(ConfigError::NotFound(file.display().to_string()));
        }

        let content = std::fs::read_to_string(&file)?;
        let mut params: ConnectionParameters = toml::from_str(&content)?;
        params.validate()?;

        let modified = std::fs::metadata(&file)?.modified()?;
        let last_modified = chrono::DateTime::<chrono::Utc>::from(modified).timestamp();
        params.stamp(path, file, last_modified);
        params.fill_default_params(
            &self.defaults.charset,
            self.defaults.parse_time,
            &self.defaults.time_zone,
        );
        Ok(params)
    }
}
