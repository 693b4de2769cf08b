//! Configuration management
//!
//! Handles loading, validating, and caching connection profiles stored as
//! TOML files under the configuration root (e.g. `<root>/db/mysql/payments.toml`).

pub mod cache;
pub mod loader;
pub mod params;

pub use cache::ConfigCache;
pub use loader::{ConfigLoader, ParamDefaults};
pub use params::{ConnectionParameters, normalize_path};
