//! The seam between the client and its callers.

use std::sync::Arc;

use async_trait::async_trait;
use livewatch_types::Channel;

use crate::error::Result;
use crate::types::TokenInfo;

/// Read operations against the streaming platform.
#[async_trait]
pub trait StreamApi: Send + Sync {
    /// Ask the identity endpoint about `token`.
    ///
    /// `Ok(None)` means upstream answered and the token is not usable.
    /// Only transport failures are errors.
    async fn check_token(&self, token: &str) -> Result<Option<TokenInfo>>;

    /// True iff the identity endpoint confirms `token`. Never fails.
    async fn validate_token(&self, token: &str) -> bool {
        match self.check_token(token).await {
            Ok(info) => info.is_some(),
            Err(e) => {
                tracing::warn!(error = %e, "Token validation error");
                false
            }
        }
    }

    /// Id of the user that owns `token`.
    async fn get_user_id(&self, token: &str) -> Result<String>;

    /// Live channels followed by `user_id`, in upstream order.
    async fn get_followed_streams(&self, user_id: &str, token: &str) -> Result<Vec<Channel>>;
}

/// Shared API handle for use across async contexts.
pub type SharedStreamApi = Arc<dyn StreamApi>;
