//! Request and response payloads.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::config::DEFAULT_NOTIFY_TO;
use crate::time::to_iso;
use crate::{Error, Result};

/// Kind of form that produced a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionType {
    Schedule,
    Mobile,
    Contact,
    Other(String),
}

impl SubmissionType {
    fn parse(value: &str) -> Self {
        match value {
            "schedule" => Self::Schedule,
            "mobile" => Self::Mobile,
            "contact" => Self::Contact,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Schedule => "schedule",
            Self::Mobile => "mobile",
            Self::Contact => "contact",
            Self::Other(other) => other,
        }
    }

    /// Notification email subject for this kind of request.
    pub fn subject(&self) -> &'static str {
        match self {
            Self::Schedule => "New service scheduling",
            Self::Mobile => "New mobile mechanic request",
            _ => "New website inquiry",
        }
    }
}

impl Serialize for SubmissionType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A normalized contact, mobile or scheduling form submission.
///
/// Lives for one request only; it is emailed, logged, or both.
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    #[serde(rename = "type")]
    pub kind: SubmissionType,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub vehicle: String,
    pub vin: String,
    pub fuel_type: String,
    pub service: String,
    pub address: String,
    pub summary: String,
    pub datetime: String,
    pub company: String,
    pub fleet_size: String,
    pub status: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

fn serialize_timestamp<S: serde::Serializer>(
    dt: &DateTime<Utc>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&to_iso(*dt))
}

impl Submission {
    /// Apply defaults to a raw form body. The body must be a JSON object.
    pub fn normalize(body: &Value, created_at: DateTime<Utc>) -> Result<Self> {
        if !body.is_object() {
            return Err(Error::Internal(format!(
                "submission body must be a JSON object, got {}",
                body
            )));
        }

        let text = |key: &str| field(body, key).unwrap_or_default();

        Ok(Self {
            kind: SubmissionType::parse(&field(body, "type").unwrap_or_else(|| "contact".to_string())),
            name: text("name"),
            email: field(body, "email").unwrap_or_else(|| DEFAULT_NOTIFY_TO.to_string()),
            phone: text("phone"),
            vehicle: text("vehicle"),
            vin: text("vin"),
            fuel_type: text("fuel_type"),
            service: text("service"),
            address: text("address"),
            summary: field(body, "summary")
                .or_else(|| field(body, "message"))
                .unwrap_or_default(),
            datetime: text("datetime"),
            company: text("company"),
            fleet_size: text("fleet_size"),
            status: field(body, "status").unwrap_or_else(|| "confirmed".to_string()),
            created_at,
        })
    }

    pub fn is_schedule(&self) -> bool {
        self.kind == SubmissionType::Schedule
    }

    pub fn is_pending(&self) -> bool {
        self.status == "pending"
    }
}

/// Read a form field with loose truthiness: missing, null, false, 0 and ""
/// are all treated as absent.
fn field(body: &Value, key: &str) -> Option<String> {
    match body.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Array(_) | Value::Object(_) => Some(body[key].to_string()),
        _ => None,
    }
}

/// Availability request payload.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityRequest {
    pub datetime: Option<String>,
}

impl AvailabilityRequest {
    pub fn from_json(body: &Value) -> Self {
        Self {
            datetime: field(body, "datetime"),
        }
    }
}

/// Availability response payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityResponse {
    pub ok: bool,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl AvailabilityResponse {
    pub fn checked(available: bool) -> Self {
        Self {
            ok: true,
            available,
            note: None,
        }
    }

    /// Optimistic answer used when the calendar cannot be consulted.
    pub fn assumed_available(note: &str) -> Self {
        Self {
            ok: true,
            available: true,
            note: Some(note.to_string()),
        }
    }
}

/// Contact response payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactResponse {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_defaults_applied() {
        let submission = Submission::normalize(&json!({}), now()).unwrap();
        assert_eq!(submission.kind, SubmissionType::Contact);
        assert_eq!(submission.email, "contact@techtrustautosolutions.com");
        assert_eq!(submission.status, "confirmed");
        assert_eq!(submission.name, "");
        assert!(!submission.is_schedule());
    }

    #[test]
    fn test_summary_falls_back_to_message() {
        let submission = Submission::normalize(&json!({"message": "Brakes squeal"}), now()).unwrap();
        assert_eq!(submission.summary, "Brakes squeal");

        let submission =
            Submission::normalize(&json!({"summary": "Oil change", "message": "ignored"}), now()).unwrap();
        assert_eq!(submission.summary, "Oil change");
    }

    #[test]
    fn test_falsy_values_take_defaults() {
        let body = json!({"type": "", "email": null, "fleet_size": 0, "status": false});
        let submission = Submission::normalize(&body, now()).unwrap();
        assert_eq!(submission.kind, SubmissionType::Contact);
        assert_eq!(submission.email, DEFAULT_NOTIFY_TO);
        assert_eq!(submission.fleet_size, "");
        assert_eq!(submission.status, "confirmed");
    }

    #[test]
    fn test_numbers_rendered_as_text() {
        let submission = Submission::normalize(&json!({"fleet_size": 12}), now()).unwrap();
        assert_eq!(submission.fleet_size, "12");
    }

    #[test]
    fn test_non_object_body_rejected() {
        for body in [json!(null), json!(["schedule"]), json!("schedule")] {
            let err = Submission::normalize(&body, now()).unwrap_err();
            assert!(matches!(err, Error::Internal(_)));
        }
    }

    #[test]
    fn test_serialized_shape() {
        let submission = Submission::normalize(&json!({"type": "mobile", "name": "Ana"}), now()).unwrap();
        let value = serde_json::to_value(&submission).unwrap();
        assert_eq!(value["type"], "mobile");
        assert_eq!(value["created_at"], "2024-05-01T12:00:00.000Z");
    }

    #[test]
    fn test_subjects() {
        assert_eq!(SubmissionType::Schedule.subject(), "New service scheduling");
        assert_eq!(SubmissionType::Mobile.subject(), "New mobile mechanic request");
        assert_eq!(SubmissionType::Contact.subject(), "New website inquiry");
        assert_eq!(
            SubmissionType::Other("fleet".into()).subject(),
            "New website inquiry"
        );
    }

    #[test]
    fn test_availability_response_omits_empty_note() {
        let value = serde_json::to_value(AvailabilityResponse::checked(false)).unwrap();
        assert_eq!(value, json!({"ok": true, "available": false}));

        let value =
            serde_json::to_value(AvailabilityResponse::assumed_available("calendar-not-configured"))
                .unwrap();
        assert_eq!(
            value,
            json!({"ok": true, "available": true, "note": "calendar-not-configured"})
        );
    }
}
