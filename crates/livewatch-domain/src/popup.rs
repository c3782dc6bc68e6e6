//! The foreground flow: what the user sees when they look at the list.

use livewatch_client::SharedStreamApi;
use livewatch_store::StateStore;
use livewatch_types::{BackgroundRequest, BackgroundResponse, Session, StreamSnapshot, now_millis};

use crate::background::BackgroundHandle;
use crate::poller::fetch_followed_live;
use crate::view::{ConnectPrompt, DEFAULT_THUMBNAIL_SIZE, LOAD_ERROR_MESSAGE, StreamList, View};

/// Where a popup operation left the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupState {
    Connect,
    Streams { live: usize },
    Error,
}

/// Drives a [`View`] through open, refresh, connect and logout.
///
/// The session is re-read from the store on every operation, so sign-ins
/// and logouts made by another process are picked up.
pub struct Popup<V: View> {
    api: SharedStreamApi,
    state: StateStore,
    background: BackgroundHandle,
    view: V,
    thumbnail_size: u32,
}

impl<V: View> Popup<V> {
    pub fn new(api: SharedStreamApi, state: StateStore, background: BackgroundHandle, view: V) -> Self {
        Self {
            api,
            state,
            background,
            view,
            thumbnail_size: DEFAULT_THUMBNAIL_SIZE,
        }
    }

    pub fn with_thumbnail_size(mut self, size: u32) -> Self {
        self.thumbnail_size = size;
        self
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }

    /// Initial display.
    ///
    /// Without a session nothing touches the network. With a valid one, the
    /// cached snapshot is shown first and then refreshed.
    pub async fn open(&mut self) -> PopupState {
        let Some(session) = self.current_session().await else {
            return self.prompt(ConnectPrompt::default());
        };

        if !self.api.validate_token(session.access_token()).await {
            return self.revoke(&session).await;
        }

        match self.state.load_snapshot().await {
            Ok(Some(snapshot)) => {
                self.render(&snapshot);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "Could not read cached streamers"),
        }

        self.refresh().await
    }

    /// Fetch the live list and show it.
    ///
    /// On failure the error message is shown and the cache is left alone.
    pub async fn refresh(&mut self) -> PopupState {
        let Some(session) = self.current_session().await else {
            return self.prompt(ConnectPrompt::default());
        };

        self.view.show_loading();

        if !self.api.validate_token(session.access_token()).await {
            return self.revoke(&session).await;
        }

        let channels = match fetch_followed_live(self.api.as_ref(), session.access_token()).await {
            Ok(channels) => channels,
            Err(e) => {
                tracing::warn!(error = %e, "Error loading streamers");
                self.view.show_error(LOAD_ERROR_MESSAGE);
                return PopupState::Error;
            }
        };

        let snapshot = StreamSnapshot::new(channels, now_millis());
        let state = self.render(&snapshot);
        if let Err(e) = self.state.save_snapshot(&snapshot).await {
            tracing::warn!(error = %e, "Could not cache streamers");
        }
        state
    }

    /// Ask the background service to sign in, then refresh.
    pub async fn connect(&mut self) -> PopupState {
        match self.background.send(BackgroundRequest::StartAuth).await {
            BackgroundResponse::Success => self.refresh().await,
            BackgroundResponse::Failure { error } => {
                self.prompt(ConnectPrompt::with_error(format!("Authentication error: {}", error)))
            }
        }
    }

    /// Forget the session.
    pub async fn logout(&mut self) -> PopupState {
        if let Err(e) = self.state.clear_session().await {
            tracing::warn!(error = %e, "Could not clear session");
        }
        tracing::info!("Logged out");
        self.prompt(ConnectPrompt::default())
    }

    async fn current_session(&self) -> Option<Session> {
        match self.state.load_session().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read session");
                None
            }
        }
    }

    async fn revoke(&mut self, session: &Session) -> PopupState {
        tracing::info!(token = %session.masked(), "Stored token rejected, clearing session");
        if let Err(e) = self.state.clear_session().await {
            tracing::warn!(error = %e, "Could not clear session");
        }
        self.prompt(ConnectPrompt::default())
    }

    fn prompt(&mut self, prompt: ConnectPrompt) -> PopupState {
        self.view.show_connect(&prompt);
        PopupState::Connect
    }

    fn render(&mut self, snapshot: &StreamSnapshot) -> PopupState {
        let list = StreamList::with_thumbnail_size(
            &snapshot.channels,
            snapshot.last_updated,
            self.thumbnail_size,
        );
        self.view.show_streams(&list);
        PopupState::Streams { live: list.len() }
    }
}
