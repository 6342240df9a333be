//! HTTP helpers for Lambda functions.

use lambda_http::{Body, Response};
use serde::Serialize;
use serde_json::{Map, Value};

/// Anything a request body can arrive as.
///
/// Reading never fails: malformed or empty input becomes an empty object.
pub trait JsonBody {
    fn to_json(&self) -> Value;
}

impl JsonBody for Value {
    /// Already parsed, returned unchanged.
    fn to_json(&self) -> Value {
        self.clone()
    }
}

impl JsonBody for str {
    fn to_json(&self) -> Value {
        if self.trim().is_empty() {
            return empty_object();
        }
        serde_json::from_str(self).unwrap_or_else(|_| empty_object())
    }
}

impl JsonBody for [u8] {
    fn to_json(&self) -> Value {
        <str as JsonBody>::to_json(&String::from_utf8_lossy(self))
    }
}

impl JsonBody for Body {
    fn to_json(&self) -> Value {
        match self {
            Body::Empty => empty_object(),
            Body::Text(text) => text.as_str().to_json(),
            Body::Binary(bytes) => bytes.as_slice().to_json(),
        }
    }
}

/// Parse a request body as JSON, falling back to `{}`.
pub fn read_json<B: JsonBody + ?Sized>(body: &B) -> Value {
    body.to_json()
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// Create a JSON response with the given status code and data.
pub fn json_response<T: Serialize>(status: u16, data: &T) -> Result<Response<Body>, lambda_http::Error> {
    let response = Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(data)?))?;

    Ok(response)
}

/// Create the minimal `{"ok":false}` body used for unexpected faults.
pub fn failure_response(status: u16) -> Result<Response<Body>, lambda_http::Error> {
    json_response(status, &serde_json::json!({ "ok": false }))
}
