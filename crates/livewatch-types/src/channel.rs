//! Live channel records and the cached snapshot.

use serde::{Deserialize, Serialize};

use crate::EpochMillis;

/// A live followed channel, as returned by the followed-streams endpoint.
///
/// Field names on the wire match the upstream payload so that the cached
/// `lastStreamers` array has the same shape as the API response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Stream id.
    pub id: String,

    /// Broadcaster user id.
    #[serde(default)]
    pub user_id: String,

    /// Broadcaster login, used to build the channel URL.
    #[serde(rename = "user_login")]
    pub login: String,

    /// Broadcaster display name.
    #[serde(rename = "user_name")]
    pub display_name: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub game_name: String,

    #[serde(default)]
    pub viewer_count: u64,

    /// Thumbnail URL with `{width}` and `{height}` placeholders.
    #[serde(rename = "thumbnail_url", default)]
    pub thumbnail_url_template: String,

    /// RFC 3339 start time of the broadcast.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub started_at: String,
}

impl Channel {
    /// Public channel page.
    pub fn url(&self) -> String {
        format!("https://twitch.tv/{}", self.login)
    }

    /// Thumbnail URL with both placeholders replaced by `size`.
    pub fn thumbnail_url(&self, size: u32) -> String {
        let size = size.to_string();
        self.thumbnail_url_template
            .replace("{width}", &size)
            .replace("{height}", &size)
    }
}

/// The most recently fetched list of live followed channels.
///
/// Replaced wholesale on every successful fetch. Channel order is the order
/// the API returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamSnapshot {
    pub channels: Vec<Channel>,
    pub last_updated: Option<EpochMillis>,
}

impl StreamSnapshot {
    pub fn new(channels: Vec<Channel>, last_updated: EpochMillis) -> Self {
        Self {
            channels,
            last_updated: Some(last_updated),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}
