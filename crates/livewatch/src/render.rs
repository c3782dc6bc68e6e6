//! Terminal rendering of popup states.

use console::{Style, style};
use livewatch_domain::{ConnectPrompt, StreamList, View};
use serde::Serialize;

/// One line of `--json` output.
#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
enum Rendered<'a> {
    Connect {
        #[serde(flatten)]
        prompt: &'a ConnectPrompt,
    },
    Streams {
        #[serde(flatten)]
        list: &'a StreamList,
    },
    Error {
        message: &'a str,
    },
}

/// Renders to stdout, either styled for people or as JSON lines.
#[derive(Debug)]
pub struct TerminalView {
    json: bool,
}

impl TerminalView {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    fn emit_json(&self, rendered: &Rendered<'_>) {
        match serde_json::to_string(rendered) {
            Ok(line) => println!("{}", line),
            Err(e) => tracing::error!(error = %e, "Could not serialize output"),
        }
    }
}

impl View for TerminalView {
    fn show_connect(&mut self, prompt: &ConnectPrompt) {
        if self.json {
            return self.emit_json(&Rendered::Connect { prompt });
        }

        println!();
        println!("{}", style("Not connected").bold());
        if let Some(error) = &prompt.error {
            println!("{}", style(error).red());
        }
        println!(
            "{}",
            style("Run 'livewatch auth login' to connect your Twitch account.").dim()
        );
    }

    fn show_loading(&mut self) {
        if !self.json {
            eprintln!("{}", style("Loading...").dim());
        }
    }

    fn show_streams(&mut self, list: &StreamList) {
        if self.json {
            return self.emit_json(&Rendered::Streams { list });
        }

        let dim = Style::new().dim();
        let live = Style::new().red().bold();

        println!();
        println!("{}", style(&list.header).bold());
        println!("{}", dim.apply_to("─".repeat(40)));

        if let Some(message) = &list.empty_message {
            println!("  {}", dim.apply_to(message));
        }

        for entry in &list.entries {
            println!();
            println!(
                "  {} {}  {}",
                live.apply_to("●"),
                style(&entry.display_name).bold(),
                live.apply_to(&entry.viewers)
            );
            println!("    {}", entry.title);
            println!("    {}", dim.apply_to(&entry.game));
            println!("    {}", style(&entry.url).cyan());
        }

        if let Some(updated) = &list.updated {
            println!();
            println!("{}", dim.apply_to(updated));
        }
    }

    fn show_error(&mut self, message: &str) {
        if self.json {
            return self.emit_json(&Rendered::Error { message });
        }
        eprintln!("{}", style(message).red());
    }
}
