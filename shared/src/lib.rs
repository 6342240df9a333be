//! Shared library for the TechTrust website Lambda functions.
//!
//! This crate provides configuration, provider clients, and the request
//! handlers used by the `contact` and `availability` functions.

pub mod auth;
pub mod calendar;
pub mod config;
pub mod email;
pub mod error;
pub mod handlers;
pub mod http;
pub mod models;
pub mod outcome;
pub mod time;

pub use auth::ServiceAccount;
pub use calendar::{CalendarApi, GoogleCalendar, NewEvent};
pub use config::{CalendarCredentials, Config};
pub use email::{Mailer, OutgoingEmail, ResendMailer};
pub use error::{Error, Result};
pub use handlers::{AvailabilityHandler, ContactHandler};
pub use models::{AvailabilityResponse, ContactResponse, Submission};
pub use outcome::{Degradation, Outcome, Rejection};
