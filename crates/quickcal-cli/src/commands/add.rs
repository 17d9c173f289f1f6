//! The `add` command: create an event from free text.

use quickcal_core::Event;

use crate::cli::Cli;
use crate::config::ClientConfig;
use crate::error::ClientResult;

/// Quick-adds an event described in natural language.
///
/// The argv words are joined with single spaces and sent verbatim to the
/// server's natural-language event parser.
pub async fn run(cli: &Cli, config: &ClientConfig, text: &[String]) -> ClientResult<()> {
    let (client, calendar_id) = super::connect(cli, config).await?;

    let text = text.join(" ");
    println!("Adding: '{}'...", text);

    let event = client.quick_add(&calendar_id, &text).await?;
    println!("{}", render_created(&event));

    Ok(())
}

/// Renders the confirmation for a created event.
fn render_created(event: &Event) -> String {
    format!(
        "✅ Created event: {}\n   Link: {}",
        event.summary,
        event.html_link.as_deref().unwrap_or("")
    )
}
