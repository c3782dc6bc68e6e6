//! Client error types.

use thiserror::Error;

/// Errors from the Helix client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The endpoint answered with a non-success status.
    #[error("{endpoint} request failed with HTTP {status}")]
    RequestFailed { status: u16, endpoint: &'static str },

    /// The request never produced a response.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The response body was not what the endpoint promises.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The client could not be built from the given settings.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl ApiError {
    /// True for transport-level failures.
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::NetworkError(_))
    }

    /// True when upstream rejected the credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::RequestFailed { status: 401, .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::NetworkError(e.to_string())
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ApiError>;
