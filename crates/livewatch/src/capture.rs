//! Redirect capture by pasting the redirect URL.
//!
//! For machines where the loopback port cannot be bound or the browser runs
//! elsewhere: the user signs in, copies the address the browser landed on
//! and pastes it here.

use async_trait::async_trait;
use livewatch_oauth::{RedirectCapture, Result, open_url};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[derive(Debug, Default)]
pub struct PastedRedirect;

impl PastedRedirect {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RedirectCapture for PastedRedirect {
    async fn capture(&self, authorize_url: &str) -> Result<Option<String>> {
        println!("Twitch Authentication");
        println!("=====================");
        println!();
        println!("Open this URL in your browser:");
        println!();
        println!("  {}", authorize_url);
        println!();
        println!("After authorizing, copy the full address of the page you were");
        println!("redirected to (it contains #access_token=...) and paste it here:");
        println!();

        if open_url(authorize_url).is_err() {
            println!("(Could not open browser automatically)");
            println!();
        }

        let mut stdout = tokio::io::stdout();
        stdout.write_all(b"redirect> ").await.ok();
        stdout.flush().await.ok();

        let mut input = String::new();
        let read = BufReader::new(tokio::io::stdin())
            .read_line(&mut input)
            .await
            .map_err(|e| livewatch_oauth::AuthError::NetworkError(e.to_string()))?;

        let input = input.trim();
        if read == 0 || input.is_empty() {
            return Ok(None);
        }
        Ok(Some(input.to_string()))
    }
}
