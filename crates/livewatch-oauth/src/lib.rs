//! OAuth 2.0 implicit-grant sign-in for livewatch.
//!
//! # Components
//!
//! - [`oauth`]: authorize URL construction and token extraction
//! - [`capture`]: the [`RedirectCapture`] seam and the
//!   loopback listener that receives the provider's redirect
//! - [`authenticator`]: the full sign-in (capture, then validate, then persist)

pub mod authenticator;
pub mod capture;
pub mod error;
pub mod oauth;

pub use authenticator::Authenticator;
pub use capture::{LoopbackCapture, RedirectCapture, open_url};
pub use error::{AuthError, Result};
pub use oauth::{OAuthConfig, build_authorization_url, extract_access_token};
