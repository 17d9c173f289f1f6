//! Client-side "today" filtering.
//!
//! The agenda listing asks the API for the next batch of upcoming events
//! and narrows them to the current day here, by matching each event's raw
//! start string against the local date.
//!
//! # Known limitation
//!
//! The match is a plain string prefix on the start value, not a
//! calendar-aware comparison. An event whose datetime carries a UTC offset
//! different from the local machine's can be mis-included or mis-excluded
//! near midnight. Callers that need offset-correct day boundaries should
//! not use this filter.

use chrono::NaiveDate;

use crate::event::Event;

/// Selects the events that start on `today`.
///
/// Events are ordered by start time in practice, but the filter scans the
/// whole list and does not rely on matches being contiguous.
pub fn remaining_today<'a>(events: &'a [Event], today: NaiveDate) -> Vec<&'a Event> {
    let prefix = today.format("%Y-%m-%d").to_string();
    events
        .iter()
        .filter(|event| {
            event
                .start
                .raw()
                .is_some_and(|start| start.starts_with(&prefix))
        })
        .collect()
}
