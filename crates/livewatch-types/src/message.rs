//! Request/response messages between the foreground view and the
//! background service.
//!
//! Wire forms:
//!
//! ```text
//! request:  {"action":"startAuth"}
//! response: {"success":true}
//!           {"success":false,"error":"..."}
//! ```

use serde::{Deserialize, Serialize};

/// A request sent to the background service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum BackgroundRequest {
    /// Run the interactive OAuth flow and persist the resulting session.
    StartAuth,
}

/// The background service's answer to a [`BackgroundRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "WireResponse", try_from = "WireResponse")]
pub enum BackgroundResponse {
    Success,
    Failure { error: String },
}

impl BackgroundResponse {
    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl<E: std::fmt::Display> From<Result<(), E>> for BackgroundResponse {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::Success,
            Err(e) => Self::failure(e.to_string()),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct WireResponse {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Error for a response that claims failure without saying why.
#[derive(Debug, thiserror::Error)]
#[error("failure response is missing its error message")]
pub struct MissingErrorMessage;

impl From<BackgroundResponse> for WireResponse {
    fn from(response: BackgroundResponse) -> Self {
        match response {
            BackgroundResponse::Success => Self {
                success: true,
                error: None,
            },
            BackgroundResponse::Failure { error } => Self {
                success: false,
                error: Some(error),
            },
        }
    }
}

impl TryFrom<WireResponse> for BackgroundResponse {
    type Error = MissingErrorMessage;

    fn try_from(wire: WireResponse) -> Result<Self, Self::Error> {
        match (wire.success, wire.error) {
            (true, _) => Ok(Self::Success),
            (false, Some(error)) => Ok(Self::Failure { error }),
            (false, None) => Err(MissingErrorMessage),
        }
    }
}
