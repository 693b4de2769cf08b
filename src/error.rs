//! Error types for mylink
//!
//! This module defines the error hierarchy used throughout the crate.
//! We use `thiserror` for library-style errors with clear error chains.
//!
//! The null-contract operations (`connect`, `get_config`) collapse every
//! failure to absence and leave the detail in the logs; the `try_*` variants
//! surface these types directly.

use std::io;

/// Main error type for the mylink crate
#[derive(Debug, thiserror::Error)]
pub enum MylinkError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Driver-related errors
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),
}

/// Configuration loading/parsing errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Home directory not found
    #[error("Could not determine home directory")]
    NoHomeDir,

    /// Profile file not found under the configuration root
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    /// Failed to read the profile file
    #[error("Failed to read configuration: {0}")]
    Io(#[from] io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Profile parsed but violates a validation rule
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Driver operation errors
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// Malformed connection string
    #[error("Invalid DSN: {0}")]
    Dsn(String),

    /// Failed to establish or use the link
    #[error("Connection failed: {0}")]
    Connect(String),

    /// Error reported by the server, with a driver-specific code
    #[error("{0}")]
    Server(#[from] ServerError),

    /// The connection has been closed
    #[error("Connection is closed")]
    Closed,
}

/// Server-reported error carrying the driver-specific code and message
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Server error {code}: {message}")]
pub struct ServerError {
    /// Server error code (e.g. 1045 for access denied)
    pub code: u16,
    /// Server error message
    pub message: String,
}

impl DriverError {
    /// Unwrap the server-reported code and message, if this error carries one.
    ///
    /// Errors that never reached the server (bad DSN, unreachable host,
    /// closed link) return `None`.
    pub fn server_error(&self) -> Option<&ServerError> {
        match self {
            DriverError::Server(e) => Some(e),
            _ => None,
        }
    }
}

/// Specialized Result type for mylink operations
pub type Result<T> = std::result::Result<T, MylinkError>;

/// Specialized Result type for config operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized Result type for driver operations
pub type DriverResult<T> = std::result::Result<T, DriverError>;
