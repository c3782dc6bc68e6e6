//! Typed access to the session and snapshot keys.

use livewatch_types::{Channel, EpochMillis, Session, StreamSnapshot};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::{KeyValueStore, SharedStore};

/// Bearer token of the signed-in user. Absent means logged out.
pub const KEY_ACCESS_TOKEN: &str = "accessToken";

/// Array of live channels from the last successful fetch.
pub const KEY_LAST_STREAMERS: &str = "lastStreamers";

/// Epoch milliseconds of the last successful fetch.
pub const KEY_LAST_UPDATED: &str = "lastUpdated";

/// Session and snapshot persistence on top of a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct StateStore {
    store: SharedStore,
}

impl StateStore {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Read a key, treating a value of the wrong shape as absent.
    async fn get_typed<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(value) = self.store.get(key).await? else {
            return Ok(None);
        };
        match serde_json::from_value(value) {
            Ok(v) => Ok(Some(v)),
            Err(e) => {
                tracing::warn!(key, error = %e, "Ignoring unreadable stored value");
                Ok(None)
            }
        }
    }

    /// Current session, if any. Not validated.
    pub async fn load_session(&self) -> Result<Option<Session>> {
        Ok(self
            .get_typed::<Session>(KEY_ACCESS_TOKEN)
            .await?
            .filter(|s| !s.access_token().is_empty()))
    }

    /// Persist a session, replacing any previous one.
    pub async fn save_session(&self, session: &Session) -> Result<()> {
        let mut entries = Map::new();
        entries.insert(
            KEY_ACCESS_TOKEN.to_string(),
            Value::String(session.access_token().to_string()),
        );
        self.store.set(entries).await?;
        tracing::info!(token = %session.masked(), "Session saved");
        Ok(())
    }

    /// Forget the session. The cached snapshot is kept.
    pub async fn clear_session(&self) -> Result<()> {
        self.store.remove(&[KEY_ACCESS_TOKEN]).await
    }

    /// Last cached snapshot, or `None` if nothing was ever fetched.
    pub async fn load_snapshot(&self) -> Result<Option<StreamSnapshot>> {
        let Some(channels) = self.get_typed::<Vec<Channel>>(KEY_LAST_STREAMERS).await? else {
            return Ok(None);
        };
        let last_updated = self.get_typed::<EpochMillis>(KEY_LAST_UPDATED).await?;
        Ok(Some(StreamSnapshot {
            channels,
            last_updated,
        }))
    }

    /// Replace the cached snapshot. Both keys are written in one call; a
    /// snapshot without a timestamp also drops any previous `lastUpdated`.
    pub async fn save_snapshot(&self, snapshot: &StreamSnapshot) -> Result<()> {
        let mut entries = Map::new();
        entries.insert(
            KEY_LAST_STREAMERS.to_string(),
            serde_json::to_value(&snapshot.channels)?,
        );
        match snapshot.last_updated {
            Some(ts) => {
                entries.insert(KEY_LAST_UPDATED.to_string(), Value::from(ts));
                self.store.set(entries).await
            }
            None => {
                self.store.set(entries).await?;
                self.store.remove(&[KEY_LAST_UPDATED]).await
            }
        }
    }
}
