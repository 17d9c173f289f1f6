//! The `next` command: show the single next upcoming event.

use chrono::Utc;

use quickcal_core::{Event, format_event};

use crate::cli::Cli;
use crate::config::ClientConfig;
use crate::error::ClientResult;

/// Prefix for the next-event line.
const NEXT_PREFIX: &str = "⏭️  NEXT: ";

/// Fetches and prints the next upcoming event.
pub async fn run(cli: &Cli, config: &ClientConfig) -> ClientResult<()> {
    let (client, calendar_id) = super::connect(cli, config).await?;

    let events = client.list_events(&calendar_id, Utc::now(), 1).await?;
    println!("{}", render_next(&events));

    Ok(())
}

/// Renders the next-event line, or the empty-calendar message.
fn render_next(events: &[Event]) -> String {
    match events.first() {
        Some(event) => format_event(event, NEXT_PREFIX),
        None => "No upcoming events found.".to_string(),
    }
}
