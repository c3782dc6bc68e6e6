//! Wire types for the upstream endpoints.

use serde::Deserialize;

/// Body of a successful `/validate` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenInfo {
    pub user_id: String,
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    /// Seconds until expiry, as reported by upstream.
    #[serde(default)]
    pub expires_in: u64,
}

/// Helix list envelope: `{"data": [...]}`.
#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope<T> {
    /// Absent on some error-shaped bodies; a missing key reads as `None`.
    pub data: Option<Vec<T>>,
}

/// The part of a Helix user record we read.
#[derive(Debug, Deserialize)]
pub(crate) struct UserRecord {
    pub id: String,
}
