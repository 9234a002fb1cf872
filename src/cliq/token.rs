//! OAuth2 refresh-token grant against the Zoho accounts server.
//!
//! A fresh token is requested for every delivery; nothing is cached.

use super::credentials::Credentials;
use super::error::TokenError;
use log::{error, info};
use serde_json::Value;
use std::fmt;

/// Permissions requested with every token
pub const CLIQ_SCOPE: &str = "ZohoCliq.Channels.CREATE,ZohoCliq.Channels.READ,ZohoCliq.Channels.UPDATE,ZohoCliq.Channels.DELETE,ZohoCliq.Webhooks.CREATE";

/// Short-lived access token. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value of the `Authorization` header expected by the Cliq API
    pub fn authorization(&self) -> String {
        format!("Zoho-oauthtoken {}", self.0)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

pub struct TokenProvider {
    client: reqwest::Client,
    credentials: Credentials,
}

impl TokenProvider {
    pub fn new(credentials: Credentials) -> Self {
        Self::with_client(reqwest::Client::new(), credentials)
    }

    pub fn with_client(client: reqwest::Client, credentials: Credentials) -> Self {
        Self {
            client,
            credentials,
        }
    }

    /// Exchange the refresh token for an access token
    pub async fn acquire_token(&self) -> Result<BearerToken, TokenError> {
        info!("Requesting new OAuth token...");

        let form = [
            ("refresh_token", self.credentials.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
            ("scope", CLIQ_SCOPE),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("redirect_uri", self.credentials.redirect_uri.as_str()),
        ];

        let response = self
            .client
            .post(&self.credentials.oauth_token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to get token: {}", e);
                TokenError::Transport(e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read token response ({}): {}", status, e);
            TokenError::Transport(e)
        })?;

        if !status.is_success() {
            error!("Failed to get token: status {}, body {}", status, body);
            return Err(TokenError::Status {
                status: status.as_u16(),
                body,
            });
        }

        // Never log a success body: it may hold a token
        match extract_access_token(&body) {
            Some(token) => {
                info!("OAuth token retrieved successfully");
                Ok(BearerToken(token))
            }
            None => {
                error!("Failed to get token: no access token in response");
                Err(TokenError::MissingAccessToken)
            }
        }
    }
}

/// Non-empty string `access_token` of a JSON body, if any
fn extract_access_token(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("access_token")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
