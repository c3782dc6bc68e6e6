//! Shared types for livewatch.

pub mod channel;
pub mod message;
pub mod session;

pub use channel::{Channel, StreamSnapshot};
pub use message::{BackgroundRequest, BackgroundResponse};
pub use session::{Session, mask_token};

/// Milliseconds since the Unix epoch.
pub type EpochMillis = i64;

/// Current time as epoch milliseconds.
pub fn now_millis() -> EpochMillis {
    chrono::Utc::now().timestamp_millis()
}
