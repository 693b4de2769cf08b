//! mylink - A per-process MySQL connection cache keyed by logical paths
//!
//! mylink hands out ready-to-use MySQL handles by symbolic name. Connection
//! parameters live in TOML profiles under a configuration root; each profile
//! is loaded and validated once, and the physical link it describes is opened
//! lazily, reused across calls, and reopened transparently when it dies.
//!
//! # Features
//!
//! - **Config cache**: one validated, immutable parameter record per logical
//!   path, loaded on first use and never reloaded
//! - **Connection registry**: one handle per path; concurrent callers for the
//!   same path share a single open (single-flight), different paths proceed
//!   independently
//! - **Lazy reconnect**: every acquisition pings the existing link and falls
//!   back to a fresh open when the ping fails
//! - **Best-effort close**: an opportunistic hint that only closes idle links
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`]: profile records, the loader, and the config cache
//! - [`db`]: the driver seam, the MySQL driver, and the handle registry
//! - [`client`]: the public facade composing the above
//! - [`error`]: error types and result aliases
//!
//! # Example
//!
//! ```no_run
//! use mylink::MysqlClient;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Profiles live under the configuration root, e.g. db/mysql/payments.toml
//! let client = MysqlClient::mysql("/etc/myapp/conf");
//!
//! match client.connect("payments") {
//!     Some(conn) => {
//!         let _lease = conn.checkout()?;
//!         // run queries on the lease (it derefs to a pooled connection)
//!     }
//!     None => eprintln!("no usable connection right now (see logs)"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod db;
pub mod error;

pub use client::{Client, MysqlClient};
pub use error::{ConfigError, DriverError, MylinkError, Result, ServerError};
