//! OAuth 2.0 implicit grant for Twitch.

use std::sync::LazyLock;

use livewatch_config::TwitchConfig;
use regex::Regex;

/// Matches the token parameter anywhere in a redirect location.
static ACCESS_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"access_token=([^&]+)").expect("static regex is valid")
});

/// OAuth settings for the implicit grant.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub authorize_url: String,
    pub redirect_uri: String,
    pub scope: String,
    pub force_verify: bool,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self::from(&TwitchConfig::default())
    }
}

impl From<&TwitchConfig> for OAuthConfig {
    fn from(twitch: &TwitchConfig) -> Self {
        Self {
            client_id: twitch.client_id.trim().to_string(),
            authorize_url: twitch.authorize_url.clone(),
            redirect_uri: twitch.redirect_uri.clone(),
            scope: twitch.scope.clone(),
            force_verify: twitch.force_verify,
        }
    }
}

impl OAuthConfig {
    /// Whether the client id is set to something other than the placeholder.
    pub fn is_client_configured(&self) -> bool {
        !self.client_id.is_empty() && self.client_id != livewatch_config::PLACEHOLDER_CLIENT_ID
    }
}

/// Build the authorization URL for the implicit grant (`response_type=token`).
pub fn build_authorization_url(config: &OAuthConfig) -> String {
    let force_verify = if config.force_verify { "true" } else { "false" };
    let params = [
        ("client_id", config.client_id.as_str()),
        ("redirect_uri", config.redirect_uri.as_str()),
        ("response_type", "token"),
        ("scope", config.scope.as_str()),
        ("force_verify", force_verify),
    ];

    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", config.authorize_url, query)
}

/// Pull the access token out of a redirect location such as
/// `http://localhost:17563/#access_token=abc&scope=...&token_type=bearer`.
pub fn extract_access_token(redirect: &str) -> Option<String> {
    ACCESS_TOKEN_RE
        .captures(redirect)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
