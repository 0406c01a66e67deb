//! REST client for the calendar provider.
//!
//! Wraps the two endpoints the dashboard consumes — list events in a time
//! range and create an event — using [`reqwest`]. The base URL is
//! configurable so tests can point the client at a stub server.

use chrono::NaiveDate;
use closer_core::slots::BusyInterval;
use closer_core::types::Timestamp;
use serde::{Deserialize, Serialize};

/// Production base URL of the calendar provider.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

/// HTTP client for the calendar provider. Credentials are passed per call;
/// the client itself holds no state beyond the connection pool.
pub struct CalendarApi {
    client: reqwest::Client,
    base_url: String,
}

/// A calendar event as the dashboard sees it.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarEvent {
    pub id: String,
    pub summary: String,
    pub start: Timestamp,
    pub end: Timestamp,
    pub description: Option<String>,
}

impl CalendarEvent {
    /// The interval this event occupies, for slot generation.
    pub fn busy_interval(&self) -> BusyInterval {
        BusyInterval {
            start: self.start,
            end: self.end,
        }
    }
}

/// Errors from the calendar provider layer.
#[derive(Debug, thiserror::Error)]
pub enum CalendarApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code. `message` carries the
    /// provider's own error message when one is present in the body.
    #[error("Calendar API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Provider error message, or the raw body when unparseable.
        message: String,
    },
}

// ---- wire types ----

#[derive(Debug, Deserialize)]
struct EventList {
    #[serde(default)]
    items: Vec<RawEvent>,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    id: String,
    summary: Option<String>,
    description: Option<String>,
    start: RawEventTime,
    end: RawEventTime,
}

/// Timed events carry `dateTime`; all-day events carry `date` only.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEventTime {
    date_time: Option<Timestamp>,
    date: Option<NaiveDate>,
}

impl RawEventTime {
    /// All-day boundaries resolve to midnight UTC.
    fn instant(&self) -> Option<Timestamp> {
        self.date_time
            .or_else(|| self.date.map(|d| d.and_hms_opt(0, 0, 0).expect("midnight").and_utc()))
    }
}

impl RawEvent {
    fn into_event(self) -> Option<CalendarEvent> {
        Some(CalendarEvent {
            start: self.start.instant()?,
            end: self.end.instant()?,
            id: self.id,
            summary: self.summary.unwrap_or_else(|| "Occupato".to_string()),
            description: self.description,
        })
    }
}

impl CalendarApi {
    /// Create a client against the production provider.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL.to_string())
    }

    /// Create a client against an arbitrary base URL (tests, proxies).
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// List the events of `calendar_id` between `time_min` and `time_max`,
    /// expanded to single events and ordered by start time.
    pub async fn list_events(
        &self,
        access_token: &str,
        calendar_id: &str,
        time_min: Timestamp,
        time_max: Timestamp,
    ) -> Result<Vec<CalendarEvent>, CalendarApiError> {
        let response = self
            .client
            .get(format!("{}/calendars/{}/events", self.base_url, calendar_id))
            .bearer_auth(access_token)
            .query(&[
                ("timeMin", time_min.to_rfc3339()),
                ("timeMax", time_max.to_rfc3339()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ])
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let list: EventList = response.json().await?;

        // Events missing both boundaries carry no usable interval; drop them.
        Ok(list.items.into_iter().filter_map(RawEvent::into_event).collect())
    }

    /// Create an event on `calendar_id`. Returns the provider's view of the
    /// created event.
    pub async fn create_event(
        &self,
        access_token: &str,
        calendar_id: &str,
        summary: &str,
        description: &str,
        start: Timestamp,
        end: Timestamp,
        timezone: &str,
    ) -> Result<CalendarEvent, CalendarApiError> {
        let body = serde_json::json!({
            "summary": summary,
            "description": description,
            "start": {
                "dateTime": start.to_rfc3339(),
                "timeZone": timezone,
            },
            "end": {
                "dateTime": end.to_rfc3339(),
                "timeZone": timezone,
            },
        });

        let response = self
            .client
            .post(format!("{}/calendars/{}/events", self.base_url, calendar_id))
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let raw: RawEvent = response.json().await?;

        raw.into_event().ok_or(CalendarApiError::Api {
            status: 200,
            message: "Created event has no start/end".to_string(),
        })
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. On failure, extract
    /// the provider's error message (`error.message` in the JSON body) so
    /// the operator sees the provider's own words.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, CalendarApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
            .unwrap_or(body);

        tracing::debug!(status = status.as_u16(), %message, "Calendar provider rejected request");
        Err(CalendarApiError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

impl Default for CalendarApi {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn timed_event_deserializes() {
        let raw: RawEvent = serde_json::from_value(json!({
            "id": "ev1",
            "summary": "Sopralluogo",
            "start": {"dateTime": "2026-03-16T10:00:00+01:00"},
            "end": {"dateTime": "2026-03-16T10:30:00+01:00"},
        }))
        .unwrap();

        let event = raw.into_event().unwrap();
        assert_eq!(event.summary, "Sopralluogo");
        // Offsets are normalized to UTC.
        assert_eq!(event.start.to_rfc3339(), "2026-03-16T09:00:00+00:00");
    }

    #[test]
    fn all_day_event_starts_at_midnight_utc() {
        let raw: RawEvent = serde_json::from_value(json!({
            "id": "ev2",
            "start": {"date": "2026-03-16"},
            "end": {"date": "2026-03-17"},
        }))
        .unwrap();

        let event = raw.into_event().unwrap();
        assert_eq!(event.summary, "Occupato");
        assert_eq!(event.start.to_rfc3339(), "2026-03-16T00:00:00+00:00");
    }

    #[test]
    fn event_without_boundaries_is_dropped() {
        let raw: RawEvent = serde_json::from_value(json!({
            "id": "ev3",
            "start": {},
            "end": {},
        }))
        .unwrap();
        assert!(raw.into_event().is_none());
    }

    #[test]
    fn empty_item_list_deserializes() {
        let list: EventList = serde_json::from_value(json!({})).unwrap();
        assert!(list.items.is_empty());
    }
}
