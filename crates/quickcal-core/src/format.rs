//! Terminal output formatting.
//!
//! Each event renders as one line: an optional caller-supplied prefix, the
//! start time in brackets (cyan, 12-hour clock), then the summary. Starts
//! that do not parse as a datetime — all-day dates — show `All Day`
//! instead of a time; the parse failure never surfaces as an error.

use chrono::{DateTime, NaiveDateTime};

use crate::event::Event;

const CYAN: &str = "\x1b[96m";
const RESET: &str = "\x1b[0m";

/// Label shown when the start value has no time component.
const ALL_DAY: &str = "All Day";

/// Formats an event as a single colorized terminal line.
pub fn format_event(event: &Event, prefix: &str) -> String {
    let time = match event.start.raw() {
        Some(raw) => format_start(raw),
        None => ALL_DAY.to_string(),
    };
    format!("{prefix}{CYAN}[{time}]{RESET} {}", event.summary)
}

/// Renders a raw start value as a 12-hour clock time with AM/PM.
fn format_start(raw: &str) -> String {
    match parse_start(raw) {
        Some(dt) => dt.format("%I:%M %p").to_string(),
        None => ALL_DAY.to_string(),
    }
}

/// Parses a start value into the wall-clock datetime it displays as.
///
/// RFC 3339 datetimes keep their own offset, so the time shown is the
/// event's local time, not the machine's. Naive datetimes (no offset) are
/// taken as-is.
fn parse_start(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventStart;

    fn event(summary: &str, date_time: Option<&str>, date: Option<&str>) -> Event {
        Event {
            summary: summary.to_string(),
            start: EventStart {
                date_time: date_time.map(String::from),
                date: date.map(String::from),
            },
            html_link: None,
        }
    }

    #[test]
    fn afternoon_time_on_twelve_hour_clock() {
        let line = format_event(&event("Review", Some("2024-01-01T14:30:00"), None), "");
        assert_eq!(line, "\x1b[96m[02:30 PM]\x1b[0m Review");
    }

    #[test]
    fn morning_time() {
        let line = format_event(&event("Standup", Some("2024-01-01T09:05:00"), None), "");
        assert!(line.contains("[09:05 AM]"));
    }

    #[test]
    fn all_day_date_falls_back() {
        let line = format_event(&event("Holiday", None, Some("2024-01-01")), "");
        assert_eq!(line, "\x1b[96m[All Day]\x1b[0m Holiday");
    }

    #[test]
    fn prefix_is_prepended_verbatim() {
        let line = format_event(&event("Lunch", Some("2024-01-01T12:00:00"), None), "NEXT: ");
        assert!(line.starts_with("NEXT: \x1b[96m["));
    }

    #[test]
    fn offset_datetime_keeps_its_own_wall_clock() {
        // The event's offset wins over the machine's timezone.
        assert_eq!(format_start("2024-01-01T14:30:00-07:00"), "02:30 PM");
        assert_eq!(format_start("2024-06-15T08:00:00Z"), "08:00 AM");
    }

    #[test]
    fn fractional_seconds_accepted() {
        assert_eq!(format_start("2024-01-01T23:59:59.500"), "11:59 PM");
    }

    #[test]
    fn unparseable_start_shows_all_day() {
        assert_eq!(format_start("2024-01-01"), "All Day");
        assert_eq!(format_start("not a date"), "All Day");
    }

    #[test]
    fn missing_start_shows_all_day() {
        let line = format_event(&event("Mystery", None, None), "");
        assert!(line.contains("[All Day]"));
    }
}
