//! Google Calendar client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::auth::ServiceAccount;
use crate::time::{to_iso, BookingWindow};
use crate::{CalendarCredentials, Config, Error, Result};

/// Event as returned by the events list endpoint (fields we read).
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub summary: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EventListResponse {
    items: Option<Vec<CalendarEvent>>,
}

#[derive(Debug, Deserialize)]
struct InsertedEvent {
    id: String,
}

/// Event body sent to the insert endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub summary: String,
    pub description: String,
    pub start: EventTime,
    pub end: EventTime,
    pub status: String,
    pub color_id: String,
    pub reminders: Reminders,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    pub date_time: String,
    pub time_zone: String,
}

impl EventTime {
    pub fn new(date_time: chrono::DateTime<chrono::Utc>, time_zone: &str) -> Self {
        Self {
            date_time: to_iso(date_time),
            time_zone: time_zone.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminders {
    pub use_default: bool,
    pub overrides: Vec<ReminderOverride>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReminderOverride {
    pub method: String,
    pub minutes: u32,
}

impl Reminders {
    /// Email a day ahead, pop up an hour ahead.
    pub fn service_default() -> Self {
        Self {
            use_default: false,
            overrides: vec![
                ReminderOverride {
                    method: "email".to_string(),
                    minutes: 24 * 60,
                },
                ReminderOverride {
                    method: "popup".to_string(),
                    minutes: 60,
                },
            ],
        }
    }
}

/// Operations the handlers need from a calendar provider.
#[async_trait]
pub trait CalendarApi: Send + Sync {
    /// Events overlapping `window`, earliest first.
    async fn list_events(&self, window: &BookingWindow, max_results: u32) -> Result<Vec<CalendarEvent>>;

    /// Create an event and return its id.
    async fn insert_event(&self, event: &NewEvent) -> Result<String>;
}

/// Google Calendar v3 authenticated with a service account.
#[derive(Debug, Clone)]
pub struct GoogleCalendar {
    http_client: reqwest::Client,
    account: ServiceAccount,
    api_base: String,
    calendar_id: String,
}

impl GoogleCalendar {
    pub fn new(
        http_client: reqwest::Client,
        credentials: &CalendarCredentials,
        token_uri: &str,
        api_base: &str,
    ) -> Self {
        Self {
            http_client,
            account: ServiceAccount::new(credentials, token_uri),
            api_base: api_base.trim_end_matches('/').to_string(),
            calendar_id: credentials.calendar_id.clone(),
        }
    }

    /// Client for the configured calendar, if credentials are complete.
    pub fn from_config(config: &Config, http_client: reqwest::Client) -> Option<Self> {
        let credentials = config.calendar_credentials()?;
        Some(Self::new(
            http_client,
            &credentials,
            &config.google_token_uri,
            &config.calendar_api_base,
        ))
    }

    fn events_url(&self) -> String {
        format!(
            "{}/calendars/{}/events",
            self.api_base,
            urlencoding::encode(&self.calendar_id)
        )
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(Error::Upstream {
        provider: "calendar",
        status,
        body,
    })
}

#[async_trait]
impl CalendarApi for GoogleCalendar {
    async fn list_events(&self, window: &BookingWindow, max_results: u32) -> Result<Vec<CalendarEvent>> {
        let access_token = self.account.access_token(&self.http_client).await?;

        let url = format!(
            "{}?timeMin={}&timeMax={}&maxResults={}&singleEvents=true&orderBy=startTime",
            self.events_url(),
            urlencoding::encode(&to_iso(window.start)),
            urlencoding::encode(&to_iso(window.end)),
            max_results
        );

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&access_token)
            .send()
            .await?;

        let events: EventListResponse = check_status(response).await?.json().await?;
        Ok(events.items.unwrap_or_default())
    }

    async fn insert_event(&self, event: &NewEvent) -> Result<String> {
        let access_token = self.account.access_token(&self.http_client).await?;

        let response = self
            .http_client
            .post(self.events_url())
            .bearer_auth(&access_token)
            .json(event)
            .send()
            .await?;

        let inserted: InsertedEvent = check_status(response).await?.json().await?;
        Ok(inserted.id)
    }
}
