//! Event types for calendar events.
//!
//! An [`Event`] is the Calendar API's own representation, kept deliberately
//! thin: events are created remotely (via quick-add) and fetched for
//! display, never constructed or mutated locally. The start field keeps the
//! raw strings the API returned so that filtering and display see exactly
//! what the server sent.

use serde::Deserialize;

/// A calendar event as returned by the Calendar API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// The event title. Events can be created without one.
    #[serde(default)]
    pub summary: String,

    /// When the event starts.
    #[serde(default)]
    pub start: EventStart,

    /// URL to view this event in the calendar web UI.
    pub html_link: Option<String>,
}

impl Event {
    /// Returns true if this event has only an all-day date, no datetime.
    pub fn is_all_day(&self) -> bool {
        self.start.date_time.is_none() && self.start.date.is_some()
    }
}

/// The start of an event: a specific datetime or an all-day date.
///
/// Well-formed API responses set exactly one of the two fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStart {
    /// RFC 3339 datetime, e.g. `2024-01-01T09:00:00-07:00`.
    pub date_time: Option<String>,

    /// All-day date, e.g. `2024-01-01`.
    pub date: Option<String>,
}

impl EventStart {
    /// Returns the raw start value, preferring the datetime over the
    /// all-day date.
    pub fn raw(&self) -> Option<&str> {
        self.date_time.as_deref().or(self.date.as_deref())
    }
}
