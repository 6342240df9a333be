//! Google service-account authentication.
//!
//! Signs a short-lived RS256 assertion with the service account's private
//! key and trades it for an OAuth access token (two-legged JWT bearer flow).

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::{CalendarCredentials, Error, Result};

pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Claims of the self-signed assertion.
#[derive(Debug, Serialize, Deserialize)]
pub struct AssertionClaims {
    /// Service-account email
    pub iss: String,
    /// Space-separated scopes
    pub scope: String,
    /// Token endpoint
    pub aud: String,
    /// Issued at
    pub iat: i64,
    /// Expiration
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// A service account allowed to act on the business calendar.
#[derive(Clone)]
pub struct ServiceAccount {
    client_email: String,
    private_key: String,
    token_uri: String,
}

impl std::fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

impl ServiceAccount {
    pub fn new(credentials: &CalendarCredentials, token_uri: impl Into<String>) -> Self {
        Self {
            client_email: credentials.client_email.clone(),
            private_key: credentials.private_key.clone(),
            token_uri: token_uri.into(),
        }
    }

    /// Build and sign the assertion for `now`.
    pub fn signed_assertion(&self, now: i64) -> Result<String> {
        let claims = AssertionClaims {
            iss: self.client_email.clone(),
            scope: CALENDAR_SCOPE.to_string(),
            aud: self.token_uri.clone(),
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())
            .map_err(|e| Error::Auth(format!("Invalid service account key: {}", e)))?;

        Ok(encode(&Header::new(Algorithm::RS256), &claims, &key)?)
    }

    /// Exchange a fresh assertion for an access token.
    pub async fn access_token(&self, http: &reqwest::Client) -> Result<String> {
        let assertion = self.signed_assertion(Utc::now().timestamp())?;
        let params = [("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())];

        let response = http.post(&self.token_uri).form(&params).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::Auth(format!(
                "Token exchange failed ({}): {}",
                status, error_text
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::Auth(format!("Failed to parse token response: {}", e)))?;

        Ok(token.access_token)
    }
}
