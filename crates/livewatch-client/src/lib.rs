//! Typed client for the Twitch endpoints livewatch depends on.
//!
//! Three read-only calls, each a single GET with a bearer token:
//!
//! - **Validate**: `GET {id}/validate`: fail-soft token check
//! - **Users**: `GET {helix}/users`: id of the token's owner
//! - **Followed streams**: `GET {helix}/streams/followed?user_id=..`
//!
//! No retries, no rate-limit handling. A failed call surfaces immediately.
//!
//! # Example
//!
//! ```no_run
//! use livewatch_client::{HelixClient, StreamApi};
//!
//! # async fn example() -> livewatch_client::Result<()> {
//! let client = HelixClient::builder().client_id("abc123").build()?;
//!
//! if client.validate_token("token").await {
//!     let user_id = client.get_user_id("token").await?;
//!     let live = client.get_followed_streams(&user_id, "token").await?;
//!     println!("{} online", live.len());
//! }
//! # Ok(())
//! # }
//! ```

mod api;
mod client;
mod error;
mod types;

pub use api::{SharedStreamApi, StreamApi};
pub use client::{ClientBuilder, HelixClient};
pub use error::{ApiError, Result};
pub use types::TokenInfo;
