//! Configuration management for the request handlers.
//!
//! Every option is optional. A missing credential switches the matching
//! side effect off instead of failing the request.

use std::env;
use std::time::Duration;

pub const DEFAULT_NOTIFY_TO: &str = "contact@techtrustautosolutions.com";
pub const DEFAULT_EMAIL_FROM: &str = "TechTrust <no-reply@techtrustautosolutions.com>";
pub const DEFAULT_TIME_ZONE: &str = "America/New_York";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";
pub const DEFAULT_EMAIL_API_BASE: &str = "https://api.resend.com";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Google calendar to read and write
    pub calendar_id: Option<String>,
    /// Service-account email used as the JWT issuer
    pub client_email: Option<String>,
    /// Service-account PEM private key, newlines restored
    pub private_key: Option<String>,
    /// Resend API key
    pub email_api_key: Option<String>,
    /// Mailbox that receives submission notifications
    pub notify_to: String,
    /// Sender header for notification emails
    pub email_from: String,
    /// Time zone attached to inserted calendar events
    pub time_zone: String,
    pub google_token_uri: String,
    pub calendar_api_base: String,
    pub email_api_base: String,
    /// Upper bound on any single provider call
    pub http_timeout: Duration,
}

/// The three values required before the calendar can be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarCredentials {
    pub calendar_id: String,
    pub client_email: String,
    pub private_key: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let http_timeout = get("HTTP_TIMEOUT_SECS")
            .and_then(|secs| secs.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);

        Self {
            calendar_id: get("GOOGLE_CALENDAR_ID").or_else(|| get("GOOGLE_CALENDAR")),
            client_email: get("GOOGLE_CLIENT_EMAIL"),
            private_key: get("GOOGLE_PRIVATE_KEY").map(|key| unescape_newlines(&key)),
            email_api_key: get("RESEND_API_KEY"),
            notify_to: get("CONTACT_NOTIFY_TO").unwrap_or_else(|| DEFAULT_NOTIFY_TO.to_string()),
            email_from: get("CONTACT_EMAIL_FROM")
                .unwrap_or_else(|| DEFAULT_EMAIL_FROM.to_string()),
            time_zone: get("CALENDAR_TIME_ZONE").unwrap_or_else(|| DEFAULT_TIME_ZONE.to_string()),
            google_token_uri: get("GOOGLE_TOKEN_URI")
                .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
            calendar_api_base: get("GOOGLE_CALENDAR_API_BASE")
                .unwrap_or_else(|| DEFAULT_CALENDAR_API_BASE.to_string()),
            email_api_base: get("RESEND_API_BASE")
                .unwrap_or_else(|| DEFAULT_EMAIL_API_BASE.to_string()),
            http_timeout: Duration::from_secs(http_timeout),
        }
    }

    /// Calendar credentials, present only when all three values are configured.
    pub fn calendar_credentials(&self) -> Option<CalendarCredentials> {
        Some(CalendarCredentials {
            calendar_id: self.calendar_id.clone()?,
            client_email: self.client_email.clone()?,
            private_key: self.private_key.clone()?,
        })
    }

    pub fn email_enabled(&self) -> bool {
        self.email_api_key.is_some()
    }

    /// Shared HTTP client honoring the configured timeout.
    pub fn http_client(&self) -> crate::Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.http_timeout)
            .build()
            .map_err(crate::Error::Http)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Deployment tooling stores the PEM key with literal `\n` sequences.
fn unescape_newlines(value: &str) -> String {
    value.replace("\\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = Config::default();
        assert!(config.calendar_credentials().is_none());
        assert!(!config.email_enabled());
        assert_eq!(config.notify_to, DEFAULT_NOTIFY_TO);
        assert_eq!(config.time_zone, "America/New_York");
        assert_eq!(config.http_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_legacy_calendar_variable() {
        let config = config_with(&[("GOOGLE_CALENDAR", "legacy@group.calendar.google.com")]);
        assert_eq!(
            config.calendar_id.as_deref(),
            Some("legacy@group.calendar.google.com")
        );

        let config = config_with(&[
            ("GOOGLE_CALENDAR", "legacy"),
            ("GOOGLE_CALENDAR_ID", "primary-id"),
        ]);
        assert_eq!(config.calendar_id.as_deref(), Some("primary-id"));
    }

    #[test]
    fn test_private_key_newlines_restored() {
        let config = config_with(&[("GOOGLE_PRIVATE_KEY", "-----BEGIN-----\\nabc\\n-----END-----")]);
        assert_eq!(
            config.private_key.as_deref(),
            Some("-----BEGIN-----\nabc\n-----END-----")
        );
    }

    #[test]
    fn test_calendar_credentials_need_all_three() {
        let partial = config_with(&[
            ("GOOGLE_CALENDAR_ID", "cal"),
            ("GOOGLE_CLIENT_EMAIL", "svc@example.iam.gserviceaccount.com"),
        ]);
        assert!(partial.calendar_credentials().is_none());

        let full = config_with(&[
            ("GOOGLE_CALENDAR_ID", "cal"),
            ("GOOGLE_CLIENT_EMAIL", "svc@example.iam.gserviceaccount.com"),
            ("GOOGLE_PRIVATE_KEY", "key"),
        ]);
        let creds = full.calendar_credentials().unwrap();
        assert_eq!(creds.calendar_id, "cal");
        assert_eq!(creds.private_key, "key");
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config = config_with(&[("RESEND_API_KEY", ""), ("HTTP_TIMEOUT_SECS", "abc")]);
        assert!(!config.email_enabled());
        assert_eq!(config.http_timeout, Duration::from_secs(10));
    }
}
