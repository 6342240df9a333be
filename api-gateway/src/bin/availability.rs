//! Availability Lambda - Handles POST /api/availability.
//!
//! Reports whether the hour starting at the requested time is free on the
//! shop calendar, assuming it is whenever the calendar cannot be read.

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use shared::handlers::respond;
use shared::{AvailabilityHandler, Config};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

async fn handler(state: Arc<AvailabilityHandler>, event: Request) -> Result<Response<Body>, Error> {
    info!("Availability request: {} {}", event.method(), event.uri().path());

    let outcome = state.handle(&event).await;
    respond("availability", outcome)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = Config::from_env();
    let state = Arc::new(AvailabilityHandler::from_config(&config)?);

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}
