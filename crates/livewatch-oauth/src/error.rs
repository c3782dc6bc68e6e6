//! Error types for the sign-in flow.

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Ways the sign-in flow can fail.
///
/// The display strings are shown to the user as-is.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No usable client id is configured.
    #[error(
        "Please set your Twitch client id (twitch.client_id in config.toml or LIVEWATCH_CLIENT_ID)"
    )]
    MisconfiguredClient,

    /// The flow ended without a redirect.
    #[error("No auth result returned")]
    UserCancelled,

    /// The redirect did not carry an access token.
    #[error("Could not extract access token from response")]
    NoToken,

    /// The provider rejected the token it just issued.
    #[error("Token validation failed")]
    InvalidToken,

    /// Network failure while validating, or the capture listener failed.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The session could not be persisted.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<livewatch_store::StoreError> for AuthError {
    fn from(e: livewatch_store::StoreError) -> Self {
        AuthError::Storage(e.to_string())
    }
}
