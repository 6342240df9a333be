//! Contact, mobile-mechanic and scheduling form submissions.
//!
//! Each submission is emailed to the shop and, for scheduled services,
//! booked on the shop calendar. Both side effects are best-effort: the
//! caller gets `{"ok":true}` whether or not they succeed.

use std::sync::Arc;

use chrono::Utc;
use lambda_http::Request;
use tracing::{error, info};

use crate::calendar::{CalendarApi, EventTime, GoogleCalendar, NewEvent, Reminders};
use crate::email::{escape_html, Mailer, OutgoingEmail, ResendMailer};
use crate::http::read_json;
use crate::models::{ContactResponse, Submission};
use crate::outcome::{Degradation, Outcome};
use crate::time::{to_iso, BookingWindow};
use crate::{Config, Result};

const CONFIRMED_COLOR: &str = "11";
const PENDING_COLOR: &str = "5";

pub struct ContactHandler {
    notify_to: String,
    email_from: String,
    time_zone: String,
    mailer: Option<Arc<dyn Mailer>>,
    calendar: Option<Arc<dyn CalendarApi>>,
}

impl ContactHandler {
    pub fn new(
        config: &Config,
        mailer: Option<Arc<dyn Mailer>>,
        calendar: Option<Arc<dyn CalendarApi>>,
    ) -> Self {
        Self {
            notify_to: config.notify_to.clone(),
            email_from: config.email_from.clone(),
            time_zone: config.time_zone.clone(),
            mailer,
            calendar,
        }
    }

    /// Build the handler with whichever providers are configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http_client = config.http_client()?;
        let mailer = ResendMailer::from_config(config, http_client.clone())
            .map(|mailer| Arc::new(mailer) as Arc<dyn Mailer>);
        let calendar = GoogleCalendar::from_config(config, http_client)
            .map(|calendar| Arc::new(calendar) as Arc<dyn CalendarApi>);
        Ok(Self::new(config, mailer, calendar))
    }

    pub async fn handle(&self, request: &Request) -> Outcome<ContactResponse> {
        if let Err(rejection) = super::require_post(request) {
            return Outcome::Rejected(rejection);
        }

        let body = read_json(request.body());
        let submission = match Submission::normalize(&body, Utc::now()) {
            Ok(submission) => submission,
            Err(e) => return Outcome::Failed(e.to_string()),
        };
        let mut causes = Vec::new();

        // Email first, then calendar.
        if let Err(cause) = self.send_notification(&submission).await {
            info!(submission = ?submission, "incoming request (no-email fallback)");
            causes.push(cause);
        }

        if submission.is_schedule() && !submission.datetime.is_empty() {
            if let Err(cause) = self.book_service(&submission).await {
                causes.push(cause);
            }
        }

        Outcome::from_parts(ContactResponse { ok: true }, causes)
    }

    async fn send_notification(&self, submission: &Submission) -> std::result::Result<(), Degradation> {
        let Some(mailer) = &self.mailer else {
            return Err(Degradation::NotConfigured("email"));
        };

        let email = OutgoingEmail {
            from: self.email_from.clone(),
            to: vec![self.notify_to.clone()],
            subject: submission.kind.subject().to_string(),
            html: render_notification(submission),
        };

        match mailer.send(&email).await {
            Ok(message_id) => {
                info!(%message_id, kind = submission.kind.as_str(), "email sent");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "email send failed");
                Err(Degradation::ProviderFailure {
                    provider: "email",
                    message: e.to_string(),
                })
            }
        }
    }

    async fn book_service(&self, submission: &Submission) -> std::result::Result<(), Degradation> {
        let Some(calendar) = &self.calendar else {
            info!("calendar not configured, skipping");
            return Err(Degradation::NotConfigured("calendar"));
        };

        let result = match BookingWindow::parse(&submission.datetime) {
            Ok(window) => {
                let event = booking_event(submission, &window, &self.time_zone);
                calendar.insert_event(&event).await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(event_id) => {
                info!(%event_id, datetime = %submission.datetime, "calendar event created");
                Ok(())
            }
            Err(e) => {
                error!(datetime = %submission.datetime, error = %e, "calendar event creation failed");
                Err(Degradation::ProviderFailure {
                    provider: "calendar",
                    message: e.to_string(),
                })
            }
        }
    }
}

/// HTML notification body. Empty optional fields are left out.
pub fn render_notification(submission: &Submission) -> String {
    let subject = submission.kind.subject();
    let mut html = format!(
        "<h2>{}</h2>\n<p><b>Type:</b> {}</p>\n<p><b>Name:</b> {}</p>\n",
        subject,
        escape_html(submission.kind.as_str()),
        escape_html(&submission.name)
    );

    let optional = [
        ("Email", &submission.email),
        ("Phone", &submission.phone),
        ("Vehicle", &submission.vehicle),
        ("VIN", &submission.vin),
        ("Fuel type", &submission.fuel_type),
        ("Service", &submission.service),
        ("Address", &submission.address),
        ("Date/Time", &submission.datetime),
        ("Company", &submission.company),
        ("Fleet size", &submission.fleet_size),
        ("Status", &submission.status),
        ("Summary", &submission.summary),
    ];
    for (label, value) in optional {
        if !value.is_empty() {
            html.push_str(&format!("<p><b>{}:</b> {}</p>\n", label, escape_html(value)));
        }
    }

    html.push_str(&format!(
        "<hr/>\n<small>Submitted at {}</small>\n",
        to_iso(submission.created_at)
    ));
    html
}

/// Calendar event for a scheduled service.
pub fn booking_event(submission: &Submission, window: &BookingWindow, time_zone: &str) -> NewEvent {
    let what = if submission.service.is_empty() {
        &submission.vehicle
    } else {
        &submission.service
    };
    let (status, color_id, prefix) = if submission.is_pending() {
        ("tentative", PENDING_COLOR, "[PENDING] ")
    } else {
        ("confirmed", CONFIRMED_COLOR, "")
    };

    let mut lines = vec![
        format!("Customer: {}", submission.name),
        format!("Vehicle: {}", submission.vehicle),
    ];
    let details = [
        ("Phone", &submission.phone),
        ("Email", &submission.email),
        ("VIN", &submission.vin),
        ("Fuel", &submission.fuel_type),
        ("Service", &submission.service),
        ("Address", &submission.address),
        ("Notes", &submission.summary),
    ];
    lines.extend(
        details
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(label, value)| format!("{}: {}", label, value)),
    );
    lines.push("Type: Scheduled Service".to_string());
    lines.push(String::new());
    lines.push("Booked via website".to_string());

    NewEvent {
        summary: format!("{}Service: {}", prefix, what),
        description: lines.join("\n"),
        start: EventTime::new(window.start, time_zone),
        end: EventTime::new(window.end, time_zone),
        status: status.to_string(),
        color_id: color_id.to_string(),
        reminders: Reminders::service_default(),
    }
}
