//! The sign-in flow: capture, validate, persist.

use std::sync::Arc;

use livewatch_client::SharedStreamApi;
use livewatch_store::StateStore;
use livewatch_types::Session;

use crate::capture::RedirectCapture;
use crate::error::{AuthError, Result};
use crate::oauth::{OAuthConfig, build_authorization_url, extract_access_token};

/// Runs the implicit-grant sign-in and stores the resulting session.
pub struct Authenticator {
    config: OAuthConfig,
    api: SharedStreamApi,
    state: StateStore,
    capture: Arc<dyn RedirectCapture>,
}

impl Authenticator {
    pub fn new(
        config: OAuthConfig,
        api: SharedStreamApi,
        state: StateStore,
        capture: Arc<dyn RedirectCapture>,
    ) -> Self {
        Self {
            config,
            api,
            state,
            capture,
        }
    }

    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// The URL the user is sent to.
    pub fn authorize_url(&self) -> String {
        build_authorization_url(&self.config)
    }

    /// Sign in interactively.
    ///
    /// The stored session is only replaced once the new token has been
    /// confirmed by the validation endpoint; every failure leaves storage
    /// untouched.
    pub async fn start_auth(&self) -> Result<()> {
        if !self.config.is_client_configured() {
            return Err(AuthError::MisconfiguredClient);
        }

        let authorize_url = self.authorize_url();
        tracing::debug!(redirect_uri = %self.config.redirect_uri, "Starting OAuth flow");

        let redirect = self
            .capture
            .capture(&authorize_url)
            .await?
            .ok_or(AuthError::UserCancelled)?;

        let token = extract_access_token(&redirect).ok_or(AuthError::NoToken)?;
        let session = Session::new(token);
        tracing::debug!(token = %session.masked(), "Extracted access token");

        match self.api.check_token(session.access_token()).await {
            Ok(Some(info)) => {
                tracing::info!(login = %info.login, "Token validated");
            }
            Ok(None) => return Err(AuthError::InvalidToken),
            Err(e) if e.is_network() => return Err(AuthError::NetworkError(e.to_string())),
            Err(e) => {
                tracing::warn!(error = %e, "Token validation error");
                return Err(AuthError::InvalidToken);
            }
        }

        self.state.save_session(&session).await?;
        Ok(())
    }
}
