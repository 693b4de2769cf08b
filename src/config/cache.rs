//! Configuration cache
//!
//! One record per normalized path, loaded on first request and held for the
//! life of the process. There is no eviction or reload; the set of logical
//! targets a process talks to is assumed small and static.
//!
//! The whole get-or-load sequence runs under a single cache-wide lock. That
//! serializes loads for distinct paths too, which is acceptable here: a load
//! happens once per path and is a small file read.

use crate::config::loader::ConfigLoader;
use crate::config::params::{ConnectionParameters, normalize_path};
use crate::error::ConfigResult;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Cache of loaded connection parameters, keyed by normalized path
pub struct ConfigCache {
    loader: ConfigLoader,
    records: Mutex<HashMap<String, Arc<ConnectionParameters>>>,
}

impl ConfigCache {
    /// Empty cache over the given loader.
    pub fn new(loader: ConfigLoader) -> Self {
        Self {
            loader,
            records: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch the record for `path`, loading it on first use.
    ///
    /// A cache hit performs no I/O. Returns `None` when the profile is
    /// missing or invalid; the failure is logged and **not** cached, so the
    /// next call re-attempts the load.
    pub fn get(&self, path: &str) -> Option<Arc<ConnectionParameters>> {
        match self.try_get(path) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::error!(path, error = %err, "failed to load connection config");
                None
            }
        }
    }

    /// Like [`get`](Self::get), but surfaces the load error to the caller.
    pub fn try_get(&self, path: &str) -> ConfigResult<Arc<ConnectionParameters>> {
        let mut records = self.records.lock();

        let key = normalize_path(path);
        if let Some(record) = records.get(&key) {
            return Ok(Arc::clone(record));
        }

        let record = Arc::new(self.loader.load(&key)?);
        tracing::debug!(config = %record, "loaded connection config");
        records.insert(record.path().to_string(), Arc::clone(&record));
        Ok(record)
    }

    /// Number of records loaded so far.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Whether any record has been loaded yet.
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}
