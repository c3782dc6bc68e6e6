//! The authenticated session.

use serde::{Deserialize, Serialize};

/// An OAuth bearer token obtained through the implicit grant.
///
/// Holding a `Session` says nothing about whether the token still works;
/// callers re-validate before every use.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Session {
    access_token: String,
}

impl Session {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Short form safe to put in logs.
    pub fn masked(&self) -> String {
        mask_token(&self.access_token)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &self.masked())
            .finish()
    }
}

/// Mask a bearer token, keeping at most a four character prefix.
pub fn mask_token(token: &str) -> String {
    match token.get(..4) {
        Some(prefix) if token.len() > 8 => format!("{}...", prefix),
        _ => "****".to_string(),
    }
}
