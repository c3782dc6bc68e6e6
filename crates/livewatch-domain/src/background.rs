//! The background side of the popup message channel.
//!
//! The popup never runs sign-in itself. It sends a [`BackgroundRequest`]
//! through a [`BackgroundHandle`] and waits for the tagged
//! [`BackgroundResponse`]. Requests are served one at a time.

use std::sync::Arc;

use async_trait::async_trait;
use livewatch_oauth::Authenticator;
use livewatch_types::{BackgroundRequest, BackgroundResponse};
use tokio::sync::{mpsc, oneshot};

const CHANNEL_CAPACITY: usize = 8;

/// Answers background requests.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn handle(&self, request: BackgroundRequest) -> BackgroundResponse;
}

/// Production handler: runs the sign-in flow on `startAuth`.
pub struct BackgroundService {
    authenticator: Arc<Authenticator>,
}

impl BackgroundService {
    pub fn new(authenticator: Arc<Authenticator>) -> Self {
        Self { authenticator }
    }
}

#[async_trait]
impl RequestHandler for BackgroundService {
    async fn handle(&self, request: BackgroundRequest) -> BackgroundResponse {
        match request {
            BackgroundRequest::StartAuth => {
                let result = self.authenticator.start_auth().await;
                if let Err(ref e) = result {
                    tracing::warn!(error = %e, "Authentication failed");
                }
                BackgroundResponse::from(result)
            }
        }
    }
}

type Envelope = (BackgroundRequest, oneshot::Sender<BackgroundResponse>);

/// Cloneable sender side of the message channel.
#[derive(Clone)]
pub struct BackgroundHandle {
    tx: mpsc::Sender<Envelope>,
}

impl BackgroundHandle {
    /// Start serving requests with `handler` on a new task.
    ///
    /// The task ends once every handle has been dropped.
    pub fn spawn(handler: Arc<dyn RequestHandler>) -> Self {
        let (tx, mut rx) = mpsc::channel::<Envelope>(CHANNEL_CAPACITY);

        tokio::spawn(async move {
            while let Some((request, reply)) = rx.recv().await {
                tracing::debug!(?request, "Background request received");
                let response = handler.handle(request).await;
                if reply.send(response).is_err() {
                    tracing::debug!("Requester went away before the response");
                }
            }
            tracing::debug!("Background service stopped");
        });

        Self { tx }
    }

    /// Send a request and wait for its response.
    ///
    /// A stopped service is reported as a failure response.
    pub async fn send(&self, request: BackgroundRequest) -> BackgroundResponse {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self.tx.send((request, reply_tx)).await.is_err() {
            return BackgroundResponse::failure("Background service is not running");
        }
        reply_rx
            .await
            .unwrap_or_else(|_| BackgroundResponse::failure("No response from background service"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeApi, memory_state};
    use livewatch_oauth::{OAuthConfig, RedirectCapture};
    use livewatch_types::Session;

    struct Canned(Option<String>);

    #[async_trait]
    impl RedirectCapture for Canned {
        async fn capture(&self, _authorize_url: &str) -> livewatch_oauth::Result<Option<String>> {
            Ok(self.0.clone())
        }
    }

    fn service(api: Arc<FakeApi>, state: livewatch_store::StateStore, redirect: Option<&str>) -> BackgroundHandle {
        let config = OAuthConfig {
            client_id: "abc123".to_string(),
            ..OAuthConfig::default()
        };
        let capture = Arc::new(Canned(redirect.map(str::to_string)));
        let authenticator = Arc::new(Authenticator::new(config, api, state, capture));
        BackgroundHandle::spawn(Arc::new(BackgroundService::new(authenticator)))
    }

    #[tokio::test]
    async fn test_start_auth_success() {
        let (_, state) = memory_state();
        let handle = service(
            FakeApi::valid_with(vec![]),
            state.clone(),
            Some("http://localhost:17563/#access_token=new-token&token_type=bearer"),
        );

        let response = handle.send(BackgroundRequest::StartAuth).await;
        assert!(response.is_success());
        assert_eq!(
            state.load_session().await.unwrap(),
            Some(Session::new("new-token"))
        );
    }

    #[tokio::test]
    async fn test_start_auth_failure_carries_message() {
        let (store, state) = memory_state();
        let handle = service(FakeApi::valid_with(vec![]), state, None);

        let response = handle.send(BackgroundRequest::StartAuth).await;
        assert_eq!(response, BackgroundResponse::failure("No auth result returned"));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_response_wire_form() {
        let (_, state) = memory_state();
        let handle = service(FakeApi::rejecting(), state, Some("http://x/#access_token=t"));

        let response = handle.send(BackgroundRequest::StartAuth).await;
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({"success": false, "error": "Token validation failed"})
        );
    }

    #[tokio::test]
    async fn test_clones_share_one_service() {
        let (_, state) = memory_state();
        let handle = service(FakeApi::valid_with(vec![]), state, Some("http://x/#access_token=t"));
        let other = handle.clone();

        let (a, b) = tokio::join!(
            handle.send(BackgroundRequest::StartAuth),
            other.send(BackgroundRequest::StartAuth)
        );
        assert!(a.is_success() && b.is_success());
    }
}
