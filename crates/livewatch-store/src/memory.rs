//! In-memory backend.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Map, Value};

use crate::KeyValueStore;
use crate::error::Result;

/// In-memory store for tests and ephemeral runs.
///
/// Counts mutating calls so tests can assert that nothing was written.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<Map<String, Value>>,
    writes: AtomicU32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set`/`remove` calls so far.
    pub fn write_count(&self) -> u32 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Copy of everything currently stored.
    pub fn snapshot(&self) -> Map<String, Value> {
        self.values.lock().clone()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.lock().get(key).cloned())
    }

    async fn set(&self, entries: Map<String, Value>) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.values.lock().extend(entries);
        Ok(())
    }

    async fn remove(&self, keys: &[&str]) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut values = self.values.lock();
        for key in keys {
            values.remove(*key);
        }
        Ok(())
    }
}
