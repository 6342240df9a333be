//! Handler results that separate client errors from degraded successes.

use lambda_http::{Body, Response};
use serde::Serialize;
use serde_json::json;

use crate::http::{failure_response, json_response};

/// Why a side effect did not happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Degradation {
    /// Credentials for the feature are not configured.
    NotConfigured(&'static str),
    /// The provider call failed; the message is for logs only.
    ProviderFailure {
        provider: &'static str,
        message: String,
    },
}

/// A request the caller got wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    MethodNotAllowed,
    MissingField(&'static str),
}

impl Rejection {
    pub fn status_code(&self) -> u16 {
        match self {
            Rejection::MethodNotAllowed => 405,
            Rejection::MissingField(_) => 400,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Rejection::MethodNotAllowed => "Method Not Allowed".to_string(),
            Rejection::MissingField(field) => format!("Missing {}", field),
        }
    }
}

/// Result of one handler invocation.
///
/// `Degraded` renders exactly like `Complete`; the causes exist for logs and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Complete(T),
    Degraded { body: T, causes: Vec<Degradation> },
    Rejected(Rejection),
    /// The handler's own logic faulted; rendered as `500 {"ok":false}`.
    Failed(String),
}

impl<T> Outcome<T> {
    /// `Complete` when nothing degraded, otherwise `Degraded`.
    pub fn from_parts(body: T, causes: Vec<Degradation>) -> Self {
        if causes.is_empty() {
            Outcome::Complete(body)
        } else {
            Outcome::Degraded { body, causes }
        }
    }

    pub fn degraded(body: T, cause: Degradation) -> Self {
        Outcome::Degraded {
            body,
            causes: vec![cause],
        }
    }

    pub fn body(&self) -> Option<&T> {
        match self {
            Outcome::Complete(body) | Outcome::Degraded { body, .. } => Some(body),
            Outcome::Rejected(_) | Outcome::Failed(_) => None,
        }
    }

    pub fn causes(&self) -> &[Degradation] {
        match self {
            Outcome::Degraded { causes, .. } => causes,
            _ => &[],
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Outcome::Degraded { .. })
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Outcome::Rejected(rejection) => rejection.status_code(),
            Outcome::Failed(_) => 500,
            _ => 200,
        }
    }
}

impl<T: Serialize> Outcome<T> {
    /// Render the HTTP response for API Gateway.
    pub fn into_response(self) -> Result<Response<Body>, lambda_http::Error> {
        match self {
            Outcome::Complete(body) | Outcome::Degraded { body, .. } => json_response(200, &body),
            Outcome::Rejected(rejection) => json_response(
                rejection.status_code(),
                &json!({ "ok": false, "error": rejection.message() }),
            ),
            Outcome::Failed(_) => failure_response(500),
        }
    }
}
