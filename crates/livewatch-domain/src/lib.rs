//! Domain layer for livewatch.
//!
//! Sits between the CLI and the infrastructure crates:
//!
//! - **Poller**: one unattended refresh of the cached snapshot
//! - **Scheduler**: fixed-period firing of the poller
//! - **Background service**: request/response channel that runs sign-in
//! - **Popup**: the foreground flow (open, refresh, connect, logout)
//!   driving a [`View`]
//!
//! # Example
//!
//! ```ignore
//! use livewatch_domain::{Poller, Scheduler};
//!
//! let poller = Arc::new(Poller::new(api, state));
//! Scheduler::new(Duration::from_secs(300)).run(poller, shutdown_rx).await;
//! ```

mod error;
pub mod background;
pub mod poller;
pub mod popup;
pub mod scheduler;
pub mod view;

pub use background::{BackgroundHandle, BackgroundService, RequestHandler};
pub use error::{DomainError, Result};
pub use poller::{PollOutcome, Poller, fetch_followed_live};
pub use popup::{Popup, PopupState};
pub use scheduler::{PeriodicTask, Scheduler};
pub use view::{ChannelEntry, ConnectPrompt, StreamList, View, format_updated, format_viewer_count};

#[cfg(test)]
pub(crate) mod test_support;
