//! View model for the stream list and the rendering seam.

use chrono::{Local, TimeZone};
use livewatch_types::{Channel, EpochMillis};
use serde::Serialize;

/// Thumbnail edge length used when none is configured.
pub const DEFAULT_THUMBNAIL_SIZE: u32 = 80;

/// Shown instead of the list when nobody is live.
pub const EMPTY_MESSAGE: &str = "No streamers are currently online";

/// Shown when a refresh fails.
pub const LOAD_ERROR_MESSAGE: &str = "Error loading streamers. Try refreshing.";

/// Something that can display popup states.
///
/// Implemented by the terminal renderer in the binary and by recording
/// views in tests.
pub trait View: Send {
    /// Ask the user to connect an account.
    fn show_connect(&mut self, prompt: &ConnectPrompt);

    fn show_loading(&mut self);

    fn show_streams(&mut self, list: &StreamList);

    fn show_error(&mut self, message: &str);
}

/// The logged-out state, optionally carrying the last sign-in failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConnectPrompt {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConnectPrompt {
    pub fn with_error(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
        }
    }
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelEntry {
    pub display_name: String,
    pub login: String,
    pub title: String,
    pub game: String,
    pub viewers: String,
    pub url: String,
    pub thumbnail_url: String,
}

impl ChannelEntry {
    fn from_channel(channel: &Channel, thumbnail_size: u32) -> Self {
        Self {
            display_name: channel.display_name.clone(),
            login: channel.login.clone(),
            title: non_empty_or(&channel.title, "No title"),
            game: non_empty_or(&channel.game_name, "No game"),
            viewers: format!("{} viewers", format_viewer_count(channel.viewer_count)),
            url: channel.url(),
            thumbnail_url: channel.thumbnail_url(thumbnail_size),
        }
    }
}

/// The list as the user sees it. Entries keep upstream order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamList {
    /// `"{n} online"`.
    pub header: String,
    pub entries: Vec<ChannelEntry>,
    /// Set only when `entries` is empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
    /// `"Updated: HH:MM:SS"`, when the fetch time is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
}

impl StreamList {
    pub fn from_channels(channels: &[Channel], last_updated: Option<EpochMillis>) -> Self {
        Self::with_thumbnail_size(channels, last_updated, DEFAULT_THUMBNAIL_SIZE)
    }

    pub fn with_thumbnail_size(
        channels: &[Channel],
        last_updated: Option<EpochMillis>,
        thumbnail_size: u32,
    ) -> Self {
        let entries: Vec<ChannelEntry> = channels
            .iter()
            .map(|c| ChannelEntry::from_channel(c, thumbnail_size))
            .collect();

        Self {
            header: format!("{} online", entries.len()),
            empty_message: entries.is_empty().then(|| EMPTY_MESSAGE.to_string()),
            updated: last_updated.and_then(format_updated),
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Compact viewer count: `999`, `1.0K`, `12.3K`, `1.5M`.
pub fn format_viewer_count(count: u64) -> String {
    if count >= 1_000_000 {
        format!("{}M", one_decimal(count as f64 / 1_000_000.0))
    } else if count >= 1_000 {
        format!("{}K", one_decimal(count as f64 / 1_000.0))
    } else {
        count.to_string()
    }
}

/// Round to one decimal, taking the larger candidate on an exact tie.
///
/// `{:.1}` rounds the exact binary value to the nearest tenth but breaks
/// ties to even. A tie is only possible when `4 * value` is an odd integer
/// (`x.25`, `x.75`), and both products below are exact there.
fn one_decimal(value: f64) -> String {
    let quarters = value * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 == 1.0 {
        let tenths = (value * 10.0).ceil();
        return format!("{:.1}", tenths / 10.0);
    }
    format!("{:.1}", value)
}

/// `"Updated: HH:MM:SS"` in local time, or `None` for an out-of-range stamp.
pub fn format_updated(millis: EpochMillis) -> Option<String> {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|t| format!("Updated: {}", t.format("%H:%M:%S")))
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
