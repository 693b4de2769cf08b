//! Database connectivity
//!
//! This module provides a trait-based seam over the wire driver, allowing the
//! caching layer to be exercised against mock backends as well as the real
//! driver, plus the per-path handle and registry that cache physical
//! connections.

pub mod driver;
pub mod handle;
pub mod mysql;
pub mod registry;

// Re-export main types
pub use driver::{Connection, ConnectionStats, Driver};
pub use handle::ConnectionHandle;
pub use mysql::{MysqlConnection, MysqlDriver, MysqlLease};
pub use registry::ConnectionRegistry;
