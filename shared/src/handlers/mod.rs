//! Request handlers behind the `/contact` and `/availability` endpoints.

pub mod availability;
pub mod contact;

use lambda_http::http::Method;
use lambda_http::{Body, Request, Response};
use serde::Serialize;
use tracing::error;

use crate::http::failure_response;
use crate::outcome::{Outcome, Rejection};

pub use availability::AvailabilityHandler;
pub use contact::ContactHandler;

/// Both endpoints only accept POST.
fn require_post(request: &Request) -> Result<(), Rejection> {
    if request.method() == Method::POST {
        Ok(())
    } else {
        Err(Rejection::MethodNotAllowed)
    }
}

/// Render an outcome, turning an unexpected fault into `500 {"ok":false}`.
pub fn respond<T: Serialize>(endpoint: &str, outcome: Outcome<T>) -> Result<Response<Body>, lambda_http::Error> {
    if let Outcome::Failed(reason) = &outcome {
        error!(endpoint, error = %reason, "handler failed");
    }

    match outcome.into_response() {
        Ok(response) => Ok(response),
        Err(e) => {
            error!(endpoint, error = %e, "handler failed");
            failure_response(500)
        }
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use lambda_http::{Body, Request};

    use crate::calendar::{CalendarApi, CalendarEvent, NewEvent};
    use crate::email::{Mailer, OutgoingEmail};
    use crate::time::BookingWindow;
    use crate::{Error, Result};

    pub fn request(method: &str, body: &str) -> Request {
        lambda_http::http::Request::builder()
            .method(method)
            .uri("/api")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn provider_down(provider: &'static str) -> Error {
        Error::Upstream {
            provider,
            status: 503,
            body: "unavailable".to_string(),
        }
    }

    /// In-memory calendar that records every call.
    #[derive(Default)]
    pub struct FakeCalendar {
        pub existing: Vec<CalendarEvent>,
        pub fail: bool,
        pub inserted: Mutex<Vec<NewEvent>>,
        pub queried: Mutex<Vec<BookingWindow>>,
    }

    impl FakeCalendar {
        pub fn with_events(count: usize) -> Self {
            let existing = (0..count)
                .map(|i| CalendarEvent {
                    id: format!("evt{}", i),
                    summary: Some("Booked".to_string()),
                    status: Some("confirmed".to_string()),
                })
                .collect();
            Self {
                existing,
                ..Self::default()
            }
        }

        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn inserted(&self) -> Vec<NewEvent> {
            self.inserted.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CalendarApi for FakeCalendar {
        async fn list_events(&self, window: &BookingWindow, max_results: u32) -> Result<Vec<CalendarEvent>> {
            self.queried.lock().unwrap().push(*window);
            if self.fail {
                return Err(provider_down("calendar"));
            }
            Ok(self
                .existing
                .iter()
                .take(max_results as usize)
                .cloned()
                .collect())
        }

        async fn insert_event(&self, event: &NewEvent) -> Result<String> {
            if self.fail {
                return Err(provider_down("calendar"));
            }
            self.inserted.lock().unwrap().push(event.clone());
            Ok("fake-event".to_string())
        }
    }

    #[derive(Default)]
    pub struct FakeMailer {
        pub fail: bool,
        pub sent: Mutex<Vec<OutgoingEmail>>,
    }

    impl FakeMailer {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn sent(&self) -> Vec<OutgoingEmail> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Mailer for FakeMailer {
        async fn send(&self, email: &OutgoingEmail) -> Result<String> {
            if self.fail {
                return Err(provider_down("email"));
            }
            self.sent.lock().unwrap().push(email.clone());
            Ok("fake-message".to_string())
        }
    }
}
