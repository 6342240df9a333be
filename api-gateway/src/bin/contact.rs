//! Contact Lambda - Handles POST /api/contact.
//!
//! Emails every form submission to the shop and books scheduled services
//! on the shop calendar. Provider failures are logged, never returned.

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use shared::handlers::respond;
use shared::{Config, ContactHandler};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

async fn handler(state: Arc<ContactHandler>, event: Request) -> Result<Response<Body>, Error> {
    info!("Contact request: {} {}", event.method(), event.uri().path());

    let outcome = state.handle(&event).await;
    respond("contact", outcome)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = Config::from_env();
    info!(
        email_enabled = config.email_enabled(),
        calendar_enabled = config.calendar_credentials().is_some(),
        "contact function starting"
    );

    let state = Arc::new(ContactHandler::from_config(&config)?);

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}
