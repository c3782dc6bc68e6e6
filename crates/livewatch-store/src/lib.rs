//! Persistent key-value storage for livewatch.
//!
//! Two layers:
//!
//! - [`KeyValueStore`]: untyped JSON values under string keys, with a file
//!   backend ([`FileStore`]) and an in-memory backend ([`MemoryStore`]).
//! - [`StateStore`]: typed access to the three keys livewatch uses:
//!   `accessToken`, `lastStreamers` and `lastUpdated`.
//!
//! # Consistency
//!
//! The store is shared by the background poller and the foreground view,
//! possibly in different processes, with no locking between them. Writes
//! are last-write-wins: a snapshot written by one can be replaced by the
//! other at any time. Both derive from the same upstream source, so the
//! surviving value is always a complete snapshot from some fetch. A single
//! [`KeyValueStore::set`] call writes all of its keys together.

mod error;
mod file;
mod memory;
mod state;

pub use error::{Result, StoreError};
pub use file::{FileStore, STORE_FILE};
pub use memory::MemoryStore;
pub use state::{KEY_ACCESS_TOKEN, KEY_LAST_STREAMERS, KEY_LAST_UPDATED, StateStore};

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

/// Untyped persistent key-value storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Read one key.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Write several keys at once, overwriting existing values.
    async fn set(&self, entries: Map<String, Value>) -> Result<()>;

    /// Delete keys. Missing keys are ignored.
    async fn remove(&self, keys: &[&str]) -> Result<()>;
}

/// Shared store for use across async contexts.
pub type SharedStore = Arc<dyn KeyValueStore>;
