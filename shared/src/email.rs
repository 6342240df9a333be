//! Transactional email through Resend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Config, Error, Result};

/// A rendered message ready to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send `email`, returning the provider's message id.
    async fn send(&self, email: &OutgoingEmail) -> Result<String>;
}

#[derive(Clone)]
pub struct ResendMailer {
    http_client: reqwest::Client,
    api_key: String,
    api_base: String,
}

impl std::fmt::Debug for ResendMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendMailer")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl ResendMailer {
    pub fn new(http_client: reqwest::Client, api_key: impl Into<String>, api_base: &str) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Mailer for the configured API key, if any.
    pub fn from_config(config: &Config, http_client: reqwest::Client) -> Option<Self> {
        let api_key = config.email_api_key.as_ref()?;
        Some(Self::new(http_client, api_key.clone(), &config.email_api_base))
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<String> {
        let response = self
            .http_client
            .post(format!("{}/emails", self.api_base))
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream {
                provider: "email",
                status,
                body,
            });
        }

        let sent: SendResponse = response.json().await?;
        Ok(sent.id)
    }
}

/// Escape text for interpolation into HTML.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn email() -> OutgoingEmail {
        OutgoingEmail {
            from: "TechTrust <no-reply@techtrustautosolutions.com>".to_string(),
            to: vec!["contact@techtrustautosolutions.com".to_string()],
            subject: "New website inquiry".to_string(),
            html: "<h2>New website inquiry</h2>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_send_posts_to_resend() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(header("authorization", "Bearer re_test"))
            .and(body_json(json!({
                "from": "TechTrust <no-reply@techtrustautosolutions.com>",
                "to": ["contact@techtrustautosolutions.com"],
                "subject": "New website inquiry",
                "html": "<h2>New website inquiry</h2>"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "msg_123"})))
            .expect(1)
            .mount(&server)
            .await;

        let mailer = ResendMailer::new(reqwest::Client::new(), "re_test", &server.uri());
        assert_eq!(mailer.send(&email()).await.unwrap(), "msg_123");
    }

    #[tokio::test]
    async fn test_send_failure_surfaces_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .respond_with(ResponseTemplate::new(422).set_body_string("invalid from"))
            .mount(&server)
            .await;

        let mailer = ResendMailer::new(reqwest::Client::new(), "re_test", &server.uri());
        let err = mailer.send(&email()).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Upstream {
                provider: "email",
                status: 422,
                ..
            }
        ));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>Tom & "Jerry"</b>"#),
            "&lt;b&gt;Tom &amp; &quot;Jerry&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_from_config_requires_key() {
        assert!(ResendMailer::from_config(&Config::default(), reqwest::Client::new()).is_none());
    }
}
