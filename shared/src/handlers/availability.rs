//! Availability check for a requested booking slot.
//!
//! The calendar is consulted for anything in the hour following the
//! requested time. Whenever the calendar cannot answer, the slot is
//! reported as available so a booking is never blocked by an outage.

use std::sync::Arc;

use lambda_http::Request;
use tracing::{error, info, warn};

use crate::calendar::{CalendarApi, GoogleCalendar};
use crate::http::read_json;
use crate::models::{AvailabilityRequest, AvailabilityResponse};
use crate::outcome::{Degradation, Outcome, Rejection};
use crate::time::BookingWindow;
use crate::{Config, Result};

pub const NOTE_NOT_CONFIGURED: &str = "calendar-not-configured";
pub const NOTE_CALENDAR_ERROR: &str = "calendar-error-assuming-available";

pub struct AvailabilityHandler {
    calendar: Option<Arc<dyn CalendarApi>>,
}

impl AvailabilityHandler {
    pub fn new(calendar: Option<Arc<dyn CalendarApi>>) -> Self {
        Self { calendar }
    }

    /// Build the handler with a Google client when credentials are complete.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http_client = config.http_client()?;
        let calendar = GoogleCalendar::from_config(config, http_client)
            .map(|calendar| Arc::new(calendar) as Arc<dyn CalendarApi>);
        Ok(Self::new(calendar))
    }

    pub async fn handle(&self, request: &Request) -> Outcome<AvailabilityResponse> {
        if let Err(rejection) = super::require_post(request) {
            return Outcome::Rejected(rejection);
        }

        let body = read_json(request.body());
        let Some(datetime) = AvailabilityRequest::from_json(&body).datetime else {
            return Outcome::Rejected(Rejection::MissingField("datetime"));
        };

        let Some(calendar) = &self.calendar else {
            info!(%datetime, "calendar not configured, assuming available");
            return Outcome::degraded(
                AvailabilityResponse::assumed_available(NOTE_NOT_CONFIGURED),
                Degradation::NotConfigured("calendar"),
            );
        };

        match check_slot(calendar.as_ref(), &datetime).await {
            Ok(available) => {
                info!(%datetime, available, "availability checked");
                Outcome::Complete(AvailabilityResponse::checked(available))
            }
            Err(e) => {
                error!(%datetime, error = %e, "calendar error, assuming available");
                Outcome::degraded(
                    AvailabilityResponse::assumed_available(NOTE_CALENDAR_ERROR),
                    Degradation::ProviderFailure {
                        provider: "calendar",
                        message: e.to_string(),
                    },
                )
            }
        }
    }
}

/// True when nothing is booked in the hour starting at `datetime`.
async fn check_slot(calendar: &dyn CalendarApi, datetime: &str) -> Result<bool> {
    let window = BookingWindow::parse(datetime)?;
    let events = calendar.list_events(&window, 1).await?;
    if let Some(conflict) = events.first() {
        warn!(event_id = %conflict.id, "slot conflicts with existing event");
    }
    Ok(events.is_empty())
}
