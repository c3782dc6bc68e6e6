//! Fakes shared by the domain tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;
use livewatch_client::{ApiError, StreamApi, TokenInfo};
use livewatch_store::{MemoryStore, StateStore};
use livewatch_types::Channel;
use parking_lot::Mutex;

use crate::view::{ConnectPrompt, StreamList, View};

pub(crate) fn channel(login: &str, viewers: u64) -> Channel {
    Channel {
        id: format!("stream-{}", login),
        user_id: format!("user-{}", login),
        login: login.to_string(),
        display_name: login.to_uppercase(),
        title: format!("{} plays", login),
        game_name: "Just Chatting".to_string(),
        viewer_count: viewers,
        thumbnail_url_template: format!(
            "https://static-cdn.jtvnw.net/previews-ttv/live_user_{}-{{width}}x{{height}}.jpg",
            login
        ),
        started_at: String::new(),
    }
}

pub(crate) fn memory_state() -> (Arc<MemoryStore>, StateStore) {
    let store = Arc::new(MemoryStore::new());
    (store.clone(), StateStore::new(store))
}

/// Scripted API that counts every call.
#[derive(Default)]
pub(crate) struct FakeApi {
    pub valid: AtomicBool,
    pub fail_streams: AtomicBool,
    pub live: Mutex<Vec<Channel>>,
    pub validate_calls: AtomicU32,
    pub user_calls: AtomicU32,
    pub stream_calls: AtomicU32,
}

impl FakeApi {
    pub fn valid_with(live: Vec<Channel>) -> Arc<Self> {
        let api = Self::default();
        api.valid.store(true, Ordering::SeqCst);
        *api.live.lock() = live;
        Arc::new(api)
    }

    pub fn rejecting() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn total_calls(&self) -> u32 {
        self.validate_calls.load(Ordering::SeqCst)
            + self.user_calls.load(Ordering::SeqCst)
            + self.stream_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StreamApi for FakeApi {
    async fn check_token(&self, _token: &str) -> Result<Option<TokenInfo>, ApiError> {
        self.validate_calls.fetch_add(1, Ordering::SeqCst);
        if !self.valid.load(Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(Some(TokenInfo {
            user_id: "42".to_string(),
            login: "viewer".to_string(),
            client_id: "abc123".to_string(),
            scopes: vec!["user:read:follows".to_string()],
            expires_in: 3600,
        }))
    }

    async fn get_user_id(&self, _token: &str) -> Result<String, ApiError> {
        self.user_calls.fetch_add(1, Ordering::SeqCst);
        Ok("42".to_string())
    }

    async fn get_followed_streams(
        &self,
        user_id: &str,
        _token: &str,
    ) -> Result<Vec<Channel>, ApiError> {
        self.stream_calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(user_id, "42");
        if self.fail_streams.load(Ordering::SeqCst) {
            return Err(ApiError::NetworkError("connection refused".to_string()));
        }
        Ok(self.live.lock().clone())
    }
}

/// Everything a view was asked to show, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Shown {
    Connect(ConnectPrompt),
    Loading,
    Streams(StreamList),
    Error(String),
}

#[derive(Debug, Default)]
pub(crate) struct RecordingView {
    pub shown: Vec<Shown>,
}

impl View for RecordingView {
    fn show_connect(&mut self, prompt: &ConnectPrompt) {
        self.shown.push(Shown::Connect(prompt.clone()));
    }

    fn show_loading(&mut self) {
        self.shown.push(Shown::Loading);
    }

    fn show_streams(&mut self, list: &StreamList) {
        self.shown.push(Shown::Streams(list.clone()));
    }

    fn show_error(&mut self, message: &str) {
        self.shown.push(Shown::Error(message.to_string()));
    }
}
