//! Error types for the TechTrust request handlers.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while handling a form or availability request.
#[derive(Error, Debug)]
pub enum Error {
    /// Service-account signing or token exchange failed
    #[error("Authentication error: {0}")]
    Auth(String),

    /// A provider answered with a non-success status
    #[error("{provider} returned {status}: {body}")]
    Upstream {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A date/time string that could not be interpreted
    #[error("Invalid datetime: {0}")]
    InvalidDateTime(String),

    /// The handler's own logic could not proceed
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Error::Auth(err.to_string())
    }
}
