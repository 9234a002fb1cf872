use super::error::CredentialsError;
use crate::utils::config::env_lookup;
use log::info;
use std::fmt;

pub const CLIENT_ID_KEY: &str = "ZOHO_CLIENT_ID";
pub const CLIENT_SECRET_KEY: &str = "ZOHO_CLIENT_SECRET";
pub const REFRESH_TOKEN_KEY: &str = "ZOHO_REFRESH_TOKEN";
pub const REDIRECT_URI_KEY: &str = "ZOHO_REDIRECT_URI";
pub const OAUTH_TOKEN_URL_KEY: &str = "ZOHO_OAUTH_TOKEN_URL";

pub const DEFAULT_REDIRECT_URI: &str = "https://www.google.com/";
pub const DEFAULT_OAUTH_TOKEN_URL: &str = "https://accounts.zoho.in/oauth/v2/token";

/// OAuth client settings, validated once and immutable afterwards
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub redirect_uri: String,
    pub oauth_token_url: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("oauth_token_url", &self.oauth_token_url)
            .finish()
    }
}

impl Credentials {
    pub fn from_env() -> Result<Self, CredentialsError> {
        Self::from_lookup(env_lookup)
    }

    /// Read and validate credentials.
    ///
    /// Fails when any of the client id, client secret or refresh token is
    /// absent or blank, reporting all of them together.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CredentialsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str, missing: &mut Vec<&'static str>| {
            let value = lookup(key).filter(|v| !v.trim().is_empty());
            if value.is_none() {
                missing.push(key);
            }
            value.unwrap_or_default()
        };

        let mut missing = Vec::new();
        let client_id = required(CLIENT_ID_KEY, &mut missing);
        let client_secret = required(CLIENT_SECRET_KEY, &mut missing);
        let refresh_token = required(REFRESH_TOKEN_KEY, &mut missing);

        if !missing.is_empty() {
            return Err(CredentialsError { missing });
        }

        info!("All required environment variables are present");

        Ok(Self {
            client_id,
            client_secret,
            refresh_token,
            redirect_uri: lookup(REDIRECT_URI_KEY)
                .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
            oauth_token_url: lookup(OAUTH_TOKEN_URL_KEY)
                .unwrap_or_else(|| DEFAULT_OAUTH_TOKEN_URL.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_all_present() {
        let credentials = Credentials::from_lookup(lookup_from(&[
            (CLIENT_ID_KEY, "id"),
            (CLIENT_SECRET_KEY, "secret"),
            (REFRESH_TOKEN_KEY, "refresh"),
        ]))
        .unwrap();

        assert_eq!(credentials.client_id, "id");
        assert_eq!(credentials.redirect_uri, DEFAULT_REDIRECT_URI);
        assert_eq!(credentials.oauth_token_url, DEFAULT_OAUTH_TOKEN_URL);
    }

    #[test]
    fn test_reports_every_missing_key() {
        let err = Credentials::from_lookup(lookup_from(&[(CLIENT_SECRET_KEY, "secret")]))
            .unwrap_err();
        assert_eq!(err.missing, vec![CLIENT_ID_KEY, REFRESH_TOKEN_KEY]);
        assert_eq!(
            err.to_string(),
            "Missing environment variables: ZOHO_CLIENT_ID, ZOHO_REFRESH_TOKEN"
        );
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let err = Credentials::from_lookup(lookup_from(&[
            (CLIENT_ID_KEY, "id"),
            (CLIENT_SECRET_KEY, "  "),
            (REFRESH_TOKEN_KEY, ""),
        ]))
        .unwrap_err();
        assert_eq!(err.missing, vec![CLIENT_SECRET_KEY, REFRESH_TOKEN_KEY]);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let credentials = Credentials::from_lookup(lookup_from(&[
            (CLIENT_ID_KEY, "id"),
            (CLIENT_SECRET_KEY, "top-secret"),
            (REFRESH_TOKEN_KEY, "refresh-value"),
            (OAUTH_TOKEN_URL_KEY, "http://localhost/token"),
        ]))
        .unwrap();
        let debug = format!("{:?}", credentials);
        assert!(!debug.contains("top-secret"));
        assert!(!debug.contains("refresh-value"));
        assert!(debug.contains("http://localhost/token"));
    }
}
