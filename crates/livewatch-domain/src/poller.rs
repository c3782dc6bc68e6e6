//! Unattended snapshot refresh.

use async_trait::async_trait;
use livewatch_client::{ApiError, SharedStreamApi, StreamApi};
use livewatch_store::StateStore;
use livewatch_types::{Channel, StreamSnapshot, now_millis};

use crate::error::DomainError;
use crate::scheduler::PeriodicTask;

/// Name of the recurring refresh task.
pub const UPDATE_TASK_NAME: &str = "updateStreamers";

/// What one poll did.
#[derive(Debug)]
pub enum PollOutcome {
    /// Nobody is signed in. Nothing was touched.
    NoSession,
    /// The stored token was rejected and has been removed.
    SessionRevoked,
    /// Fetching or persisting failed. The cached snapshot is unchanged.
    Failed(DomainError),
    /// The snapshot was replaced.
    Updated { live: usize },
}

/// Look up the token's owner, then their live followed channels.
pub async fn fetch_followed_live(
    api: &dyn StreamApi,
    token: &str,
) -> Result<Vec<Channel>, ApiError> {
    let user_id = api.get_user_id(token).await?;
    api.get_followed_streams(&user_id, token).await
}

/// Background refresher of the cached snapshot.
///
/// Never shows anything to the user; failures end up in the log.
pub struct Poller {
    api: SharedStreamApi,
    state: StateStore,
}

impl Poller {
    pub fn new(api: SharedStreamApi, state: StateStore) -> Self {
        Self { api, state }
    }

    /// Run one refresh.
    pub async fn poll_once(&self) -> PollOutcome {
        let session = match self.state.load_session().await {
            Ok(Some(session)) => session,
            Ok(None) => return PollOutcome::NoSession,
            Err(e) => return self.failed(e.into()),
        };

        if !self.api.validate_token(session.access_token()).await {
            tracing::info!(token = %session.masked(), "Stored token rejected, clearing session");
            return match self.state.clear_session().await {
                Ok(()) => PollOutcome::SessionRevoked,
                Err(e) => self.failed(e.into()),
            };
        }

        let channels = match fetch_followed_live(self.api.as_ref(), session.access_token()).await {
            Ok(channels) => channels,
            Err(e) => return self.failed(e.into()),
        };

        let live = channels.len();
        let snapshot = StreamSnapshot::new(channels, now_millis());
        match self.state.save_snapshot(&snapshot).await {
            Ok(()) => {
                tracing::debug!(live, "Snapshot updated");
                PollOutcome::Updated { live }
            }
            Err(e) => self.failed(e.into()),
        }
    }

    fn failed(&self, error: DomainError) -> PollOutcome {
        tracing::warn!(error = %error, "Error updating streamers");
        PollOutcome::Failed(error)
    }
}

#[async_trait]
impl PeriodicTask for Poller {
    fn name(&self) -> &str {
        UPDATE_TASK_NAME
    }

    async fn run(&self) {
        match self.poll_once().await {
            PollOutcome::Updated { live } => tracing::info!(live, "Streamers updated"),
            PollOutcome::NoSession => tracing::debug!("No session, skipping update"),
            PollOutcome::SessionRevoked | PollOutcome::Failed(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeApi, channel, memory_state};
    use livewatch_types::Session;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_no_session_is_a_silent_noop() {
        let api = FakeApi::valid_with(vec![channel("a", 1)]);
        let (store, state) = memory_state();
        let poller = Poller::new(api.clone(), state);

        assert!(matches!(poller.poll_once().await, PollOutcome::NoSession));
        assert_eq!(api.total_calls(), 0);
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_rejected_token_clears_session() {
        let api = FakeApi::rejecting();
        let (_, state) = memory_state();
        state.save_session(&Session::new("stale")).await.unwrap();
        let poller = Poller::new(api.clone(), state.clone());

        assert!(matches!(poller.poll_once().await, PollOutcome::SessionRevoked));
        assert!(state.load_session().await.unwrap().is_none());
        assert_eq!(api.user_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_success_replaces_snapshot() {
        let api = FakeApi::valid_with(vec![channel("a", 1), channel("b", 2)]);
        let (_, state) = memory_state();
        state.save_session(&Session::new("good")).await.unwrap();
        state
            .save_snapshot(&StreamSnapshot::new(vec![channel("old", 9)], 1))
            .await
            .unwrap();

        let outcome = Poller::new(api, state.clone()).poll_once().await;
        assert!(matches!(outcome, PollOutcome::Updated { live: 2 }));

        let snapshot = state.load_snapshot().await.unwrap().unwrap();
        let logins: Vec<_> = snapshot.channels.iter().map(|c| c.login.as_str()).collect();
        assert_eq!(logins, ["a", "b"]);
        assert!(snapshot.last_updated.unwrap() > 1);
    }

    #[tokio::test]
    async fn test_stream_failure_keeps_prior_snapshot() {
        let api = FakeApi::valid_with(vec![]);
        api.fail_streams.store(true, Ordering::SeqCst);
        let (store, state) = memory_state();
        state.save_session(&Session::new("good")).await.unwrap();
        let prior = StreamSnapshot::new(vec![channel("kept", 5)], 1_000);
        state.save_snapshot(&prior).await.unwrap();
        let writes_before = store.write_count();

        let outcome = Poller::new(api, state.clone()).poll_once().await;
        assert!(matches!(
            outcome,
            PollOutcome::Failed(DomainError::Api(ApiError::NetworkError(_)))
        ));
        assert_eq!(store.write_count(), writes_before);
        assert_eq!(state.load_snapshot().await.unwrap(), Some(prior));
    }

    #[tokio::test]
    async fn test_runs_as_periodic_task() {
        let api = FakeApi::valid_with(vec![channel("a", 1)]);
        let (_, state) = memory_state();
        state.save_session(&Session::new("good")).await.unwrap();
        let poller = Poller::new(api, state.clone());

        assert_eq!(poller.name(), "updateStreamers");
        poller.run().await;
        assert_eq!(state.load_snapshot().await.unwrap().unwrap().channels.len(), 1);
    }
}
