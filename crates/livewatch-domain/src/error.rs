//! Domain error types.

use livewatch_client::ApiError;
use livewatch_store::StoreError;
use thiserror::Error;

/// Result type alias for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;

/// Errors surfaced by the poller and popup pipelines.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Upstream call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Session or snapshot could not be read or written.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}
