//! Google Calendar API client.
//!
//! A low-level HTTP client for the Calendar API v3, covering the two
//! endpoints this tool uses: `events.quickAdd` and `events.list`. Every
//! operation is a single request - no retry, no pagination (list results
//! are capped well below one page, so a `nextPageToken` is never followed).

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use quickcal_core::Event;

use crate::error::{GoogleError, GoogleResult};

/// Base URL for Google Calendar API v3.
const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Google Calendar API client.
///
/// Constructed from an already-acquired access token; refreshing is the
/// credential store's job, not this client's.
#[derive(Debug)]
pub struct CalendarClient {
    http_client: reqwest::Client,
    access_token: String,
}

impl CalendarClient {
    /// Creates a new Calendar client with the given access token.
    pub fn new(access_token: impl Into<String>, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create HTTP client");

        Self {
            http_client,
            access_token: access_token.into(),
        }
    }

    /// Creates an event from free-form text via the quick-add endpoint.
    ///
    /// The server parses the text (e.g. `"Dinner at 7pm"`) into a
    /// structured event and returns the created record.
    pub async fn quick_add(&self, calendar_id: &str, text: &str) -> GoogleResult<Event> {
        let url = format!(
            "{}/calendars/{}/events/quickAdd",
            CALENDAR_API_BASE,
            urlencoding::encode(calendar_id)
        );

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.access_token)
            .query(&[("text", text)])
            .send()
            .await
            .map_err(transport_error)?;

        let body = Self::read_success_body(response).await?;

        let event: Event = serde_json::from_str(&body).map_err(|e| {
            GoogleError::invalid_response(format!("failed to parse created event: {}", e))
        })?;

        debug!("quick-added event to calendar {}", calendar_id);
        Ok(event)
    }

    /// Lists upcoming events from a calendar, ordered by start time.
    ///
    /// Recurring events are expanded server-side (`singleEvents=true`), so
    /// each item has a concrete start.
    pub async fn list_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        max_results: usize,
    ) -> GoogleResult<Vec<Event>> {
        let url = format!(
            "{}/calendars/{}/events",
            CALENDAR_API_BASE,
            urlencoding::encode(calendar_id)
        );

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[
                ("timeMin", time_min.to_rfc3339()),
                ("maxResults", max_results.to_string()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        let body = Self::read_success_body(response).await?;

        let list: EventListResponse = serde_json::from_str(&body).map_err(|e| {
            GoogleError::invalid_response(format!("failed to parse event list: {}", e))
        })?;

        debug!(
            "fetched {} events from calendar {}",
            list.items.len(),
            calendar_id
        );
        Ok(list.items)
    }

    /// Maps the response status to an error, or returns the body text.
    async fn read_success_body(response: reqwest::Response) -> GoogleResult<String> {
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(GoogleError::authentication(
                "access token expired or invalid",
            ));
        }

        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(GoogleError::authorization("access denied to calendar"));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok());
            return Err(GoogleError::rate_limited(format!(
                "rate limit exceeded{}",
                retry_after
                    .map(|s| format!(", retry after {} seconds", s))
                    .unwrap_or_default()
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GoogleError::server(format!(
                "API error ({}): {}",
                status, body
            )));
        }

        response
            .text()
            .await
            .map_err(|e| GoogleError::network(format!("failed to read response: {}", e)))
    }
}

/// Maps a reqwest transport failure to a network error.
fn transport_error(e: reqwest::Error) -> GoogleError {
    if e.is_timeout() {
        GoogleError::network("request timeout")
    } else if e.is_connect() {
        GoogleError::network(format!("connection failed: {}", e))
    } else {
        GoogleError::network(format!("request failed: {}", e))
    }
}

/// Response from the events.list endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventListResponse {
    #[serde(default)]
    items: Vec<Event>,
}
