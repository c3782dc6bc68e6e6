//! Poll command - one unattended update of the cached list.

use anyhow::Result;
use livewatch_domain::{PollOutcome, Poller};
use serde::Serialize;

use super::Context;

/// Poll result for JSON output.
#[derive(Debug, Serialize)]
struct PollOutput {
    outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    live: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Run the poll command.
pub async fn run(ctx: &Context) -> Result<()> {
    let poller = Poller::new(ctx.api()?, ctx.state());
    let outcome = poller.poll_once().await;

    let output = match &outcome {
        PollOutcome::NoSession => PollOutput {
            outcome: "no_session",
            live: None,
            error: None,
        },
        PollOutcome::SessionRevoked => PollOutput {
            outcome: "session_revoked",
            live: None,
            error: None,
        },
        PollOutcome::Failed(e) => PollOutput {
            outcome: "failed",
            live: None,
            error: Some(e.to_string()),
        },
        PollOutcome::Updated { live } => PollOutput {
            outcome: "updated",
            live: Some(*live),
            error: None,
        },
    };

    if ctx.json_output {
        println!("{}", serde_json::to_string(&output)?);
    } else {
        match &outcome {
            PollOutcome::NoSession => println!("No session; nothing to update."),
            PollOutcome::SessionRevoked => println!("Stored session was rejected and removed."),
            PollOutcome::Failed(e) => println!("Update failed: {}", e),
            PollOutcome::Updated { live } => println!("Updated: {} online", live),
        }
    }

    match outcome {
        PollOutcome::Failed(e) => Err(e.into()),
        _ => Ok(()),
    }
}
