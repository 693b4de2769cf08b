//! Connection registry
//!
//! Maps each normalized path to its handle. The lock covers only the
//! lookup-or-insert step; constructing a handle allocates the empty slot and
//! performs no I/O, so the registry never blocks on the network. Entries are
//! never removed.

use crate::config::ConnectionParameters;
use crate::db::driver::Driver;
use crate::db::handle::ConnectionHandle;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of connection handles, keyed by normalized path
pub struct ConnectionRegistry<D: Driver> {
    handles: Mutex<HashMap<String, Arc<ConnectionHandle<D>>>>,
}

impl<D: Driver> ConnectionRegistry<D> {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            handles: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch the handle for the record's path, creating it on first use.
    pub fn get_or_create(&self, params: &Arc<ConnectionParameters>) -> Arc<ConnectionHandle<D>> {
        let mut handles = self.handles.lock();
        match handles.get(params.path()) {
            Some(handle) => Arc::clone(handle),
            None => {
                let handle = Arc::new(ConnectionHandle::new(Arc::clone(params)));
                handles.insert(params.path().to_string(), Arc::clone(&handle));
                handle
            }
        }
    }

    /// Number of handles created so far.
    pub fn len(&self) -> usize {
        self.handles.lock().len()
    }

    /// Whether any handle has been created yet.
    pub fn is_empty(&self) -> bool {
        self.handles.lock().is_empty()
    }
}

impl<D: Driver> Default for ConnectionRegistry<D> {
    fn default() -> Self {
        Self::new()
    }
}
