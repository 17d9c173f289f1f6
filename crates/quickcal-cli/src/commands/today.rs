//! The `today` command: list the remaining events for the current day.

use chrono::{Local, NaiveDate, Utc};

use quickcal_core::{Event, format_event, remaining_today};

use crate::cli::Cli;
use crate::config::ClientConfig;
use crate::error::ClientResult;

/// How many upcoming events to fetch before filtering to today.
const FETCH_LIMIT: usize = 20;

/// Fetches the upcoming events and prints today's agenda.
///
/// Nothing is printed until the fetch has succeeded, so a failed call
/// produces only the error message.
pub async fn run(cli: &Cli, config: &ClientConfig) -> ClientResult<()> {
    let (client, calendar_id) = super::connect(cli, config).await?;

    let events = client
        .list_events(&calendar_id, Utc::now(), FETCH_LIMIT)
        .await?;

    let today = Local::now().date_naive();
    for line in render_agenda(&events, today) {
        println!("{}", line);
    }

    Ok(())
}

/// Renders the agenda: header, rule, then one line per event of today.
fn render_agenda(events: &[Event], today: NaiveDate) -> Vec<String> {
    let mut lines = vec![
        format!("📅 Agenda for Today ({}):", today.format("%Y-%m-%d")),
        "-".repeat(40),
    ];

    if events.is_empty() {
        lines.push("No events found.".to_string());
        return lines;
    }

    let remaining = remaining_today(events, today);
    if remaining.is_empty() {
        lines.push("Nothing left for today! 🎉".to_string());
        return lines;
    }

    lines.extend(remaining.into_iter().map(|event| format_event(event, "")));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcal_core::EventStart;

    fn timed(summary: &str, date_time: &str) -> Event {
        Event {
            summary: summary.to_string(),
            start: EventStart {
                date_time: Some(date_time.to_string()),
                date: None,
            },
            html_link: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn header_shows_the_date() {
        let lines = render_agenda(&[], date(2024, 1, 1));
        assert_eq!(lines[0], "📅 Agenda for Today (2024-01-01):");
        assert_eq!(lines[1], "-".repeat(40));
    }

    #[test]
    fn empty_fetch_prints_no_events() {
        let lines = render_agenda(&[], date(2024, 1, 1));
        assert_eq!(lines[2], "No events found.");
    }

    #[test]
    fn no_matches_prints_celebration() {
        let events = vec![timed("tomorrow", "2024-01-02T10:00:00")];
        let lines = render_agenda(&events, date(2024, 1, 1));
        assert_eq!(lines[2], "Nothing left for today! 🎉");
    }

    #[test]
    fn lists_only_todays_events_in_order() {
        let events = vec![
            timed("breakfast", "2024-01-01T09:00:00"),
            timed("lunch", "2024-01-01T12:30:00"),
            timed("tomorrow", "2024-01-02T10:00:00"),
        ];

        let lines = render_agenda(&events, date(2024, 1, 1));
        assert_eq!(lines.len(), 4);
        assert!(lines[2].contains("[09:00 AM]"));
        assert!(lines[2].ends_with("breakfast"));
        assert!(lines[3].contains("[12:30 PM]"));
        assert!(lines[3].ends_with("lunch"));
    }
}
