//! Redirect capture: run the interactive authorize page and hand back the
//! location the provider redirected to.
//!
//! The implicit grant returns the token in the URL fragment, which browsers
//! never send to a server. The loopback listener therefore answers the
//! redirect with a tiny page that forwards `location.hash` back to the
//! listener, which then reassembles `<redirect_uri>#<fragment>`.

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
};
use parking_lot::Mutex;
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;
use url::Url;

use crate::error::{AuthError, Result};

/// Path the forwarding page posts the fragment to.
pub const CAPTURE_PATH: &str = "/livewatch/capture";

const FORWARD_HTML: &str = r#"<!doctype html>
<html><head><meta charset="utf-8"><title>livewatch</title></head>
<body><p id="status">Finishing sign-in...</p>
<script>
  const fragment = window.location.hash.substring(1);
  fetch("/livewatch/capture?fragment=" + encodeURIComponent(fragment))
    .then(() => { document.getElementById("status").textContent = "Signed in. You may close this window."; })
    .catch(() => { document.getElementById("status").textContent = "Could not reach livewatch. Please retry."; });
</script></body></html>"#;

const DENIED_HTML: &str = "<html><body><h1>Authentication cancelled</h1><p>You may close this window.</p></body></html>";

/// Opens the authorize page and waits for the provider to redirect back.
#[async_trait]
pub trait RedirectCapture: Send + Sync {
    /// Returns the full redirect location, or `None` if the user cancelled
    /// or denied access.
    async fn capture(&self, authorize_url: &str) -> Result<Option<String>>;
}

/// Captures the redirect with a one-shot HTTP listener on the redirect URI.
#[derive(Debug, Clone)]
pub struct LoopbackCapture {
    redirect_uri: Url,
    open_browser: bool,
}

impl LoopbackCapture {
    pub fn new(redirect_uri: &str) -> Result<Self> {
        let redirect_uri = Url::parse(redirect_uri)
            .map_err(|e| AuthError::NetworkError(format!("invalid redirect URI: {}", e)))?;
        Ok(Self {
            redirect_uri,
            open_browser: true,
        })
    }

    /// Disable launching the system browser; the URL is only logged.
    pub fn without_browser(mut self) -> Self {
        self.open_browser = false;
        self
    }

    /// Address the listener binds, derived from the redirect URI.
    pub fn bind_target(&self) -> Result<(String, u16)> {
        let host = self
            .redirect_uri
            .host_str()
            .ok_or_else(|| AuthError::NetworkError("redirect URI has no host".to_string()))?;
        let port = self
            .redirect_uri
            .port_or_known_default()
            .ok_or_else(|| AuthError::NetworkError("redirect URI has no port".to_string()))?;
        Ok((host.trim_matches(['[', ']']).to_string(), port))
    }

    /// Bind the listener without serving yet.
    pub async fn bind(&self) -> Result<(TcpListener, SocketAddr)> {
        let (host, port) = self.bind_target()?;
        let listener = TcpListener::bind((host.as_str(), port))
            .await
            .map_err(|e| {
                AuthError::NetworkError(format!(
                    "could not listen on {}:{} for the OAuth redirect: {}",
                    host, port, e
                ))
            })?;
        let addr = listener
            .local_addr()
            .map_err(|e| AuthError::NetworkError(e.to_string()))?;
        Ok((listener, addr))
    }

    /// Serve on an already bound listener until a redirect arrives.
    pub async fn serve(&self, listener: TcpListener) -> Result<Option<String>> {
        let (router, rx) = capture_router(self.redirect_uri.clone());
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let server = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    stop_rx.await.ok();
                })
                .await
        });

        let outcome = tokio::select! {
            received = rx => received.unwrap_or(None),
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Sign-in interrupted");
                None
            }
        };

        stop_tx.send(()).ok();
        match server.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(error = %e, "Redirect listener stopped with error"),
            Err(e) => tracing::warn!(error = %e, "Redirect listener task failed"),
        }
        Ok(outcome)
    }
}

#[async_trait]
impl RedirectCapture for LoopbackCapture {
    async fn capture(&self, authorize_url: &str) -> Result<Option<String>> {
        let (listener, addr) = self.bind().await?;
        tracing::info!(%addr, "Waiting for OAuth redirect");
        tracing::info!("Open this URL to sign in: {}", authorize_url);

        if self.open_browser && open_url(authorize_url).is_err() {
            tracing::warn!("Could not open browser automatically");
        }

        self.serve(listener).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Listener routes
// ─────────────────────────────────────────────────────────────────────────────

type Delivery = Arc<Mutex<Option<oneshot::Sender<Option<String>>>>>;

#[derive(Clone)]
struct CaptureState {
    redirect_uri: Url,
    delivery: Delivery,
}

impl CaptureState {
    /// Hand the result to the waiting flow. Later calls are ignored.
    fn deliver(&self, value: Option<String>) -> bool {
        match self.delivery.lock().take() {
            Some(tx) => tx.send(value).is_ok(),
            None => false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RedirectQuery {
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FragmentQuery {
    #[serde(default)]
    fragment: String,
}

/// Router answering the provider redirect and the forwarded fragment.
fn capture_router(redirect_uri: Url) -> (Router, oneshot::Receiver<Option<String>>) {
    let (tx, rx) = oneshot::channel();
    let landing_path = match redirect_uri.path() {
        "" => "/".to_string(),
        p => p.to_string(),
    };
    let state = CaptureState {
        redirect_uri,
        delivery: Arc::new(Mutex::new(Some(tx))),
    };

    let router = Router::new()
        .route(&landing_path, get(handle_redirect))
        .route(CAPTURE_PATH, get(handle_fragment))
        .layer(TraceLayer::new_for_http())
        .with_state(state);
    (router, rx)
}

/// GET <redirect path>: the provider's redirect lands here.
async fn handle_redirect(
    State(state): State<CaptureState>,
    Query(query): Query<RedirectQuery>,
) -> impl IntoResponse {
    if let Some(error) = query.error {
        tracing::info!(
            error = %error,
            description = query.error_description.as_deref().unwrap_or(""),
            "Provider returned an authorization error"
        );
        state.deliver(None);
        return (StatusCode::OK, Html(DENIED_HTML));
    }
    (StatusCode::OK, Html(FORWARD_HTML))
}

/// GET /livewatch/capture?fragment=...: the forwarding page reports here.
async fn handle_fragment(
    State(state): State<CaptureState>,
    Query(query): Query<FragmentQuery>,
) -> impl IntoResponse {
    let mut location = state.redirect_uri.clone();
    location.set_fragment(Some(&query.fragment).filter(|f| !f.is_empty()).map(|f| f.as_str()));
    if state.deliver(Some(location.to_string())) {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::CONFLICT, "already captured")
    }
}

/// Try to open a URL in the default browser.
pub fn open_url(url: &str) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).status()?;
    }
    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).status()?;
    }
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", url])
            .status()?;
    }
    Ok(())
}
