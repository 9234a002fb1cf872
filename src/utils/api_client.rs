//! Thin JSON client used by step code against the device-management API.
//!
//! Every call logs method, endpoint and duration together with the response
//! or error body. `post` never fails: HTTP errors are returned as-is and
//! transport failures are turned into a synthetic response with status 600.

use super::config::NotifierConfig;
use super::console::ConsoleTheme;
use log::{error, info};
use reqwest::Method;
use serde_json::{json, Value};
use std::time::Instant;
use thiserror::Error;

/// Status used for responses synthesized after a transport failure
pub const NETWORK_ERROR_STATUS: u16 = 600;

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub data: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn network_error(message: &str) -> Self {
        Self {
            status: NETWORK_ERROR_STATUS,
            data: json!({
                "status": false,
                "message": message,
                "code": "NETWORK_ERROR",
            }),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{method} {endpoint} failed: {source}")]
    Transport {
        method: Method,
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} {endpoint} returned status {}", .response.status)]
    Status {
        method: Method,
        endpoint: String,
        response: ApiResponse,
    },
}

pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
    theme: ConsoleTheme,
}

impl ApiClient {
    pub fn new(base_url: &str, theme: ConsoleTheme) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            theme,
        }
    }

    /// Client for `BASE_URL`, or `None` when it is not configured
    pub fn from_config(config: &NotifierConfig, theme: ConsoleTheme) -> Option<Self> {
        config
            .api_base_url
            .as_deref()
            .map(|base_url| Self::new(base_url, theme))
    }

    pub async fn get(&self, endpoint: &str, headers: &[(&str, &str)]) -> Result<ApiResponse, ApiError> {
        self.send(Method::GET, endpoint, None, headers).await
    }

    /// POST that reports failures in the returned response instead of raising
    pub async fn post(&self, endpoint: &str, data: &Value, headers: &[(&str, &str)]) -> ApiResponse {
        match self.send(Method::POST, endpoint, Some(data), headers).await {
            Ok(response) => {
                if let Some(device_id) = response.data.get("device_id") {
                    info!("{} {}", self.theme.highlight("Device_id:"), device_id);
                }
                response
            }
            Err(ApiError::Status { response, .. }) => response,
            Err(ApiError::Transport { source, .. }) => ApiResponse::network_error(&source.to_string()),
        }
    }

    pub async fn put(&self, endpoint: &str, data: &Value, headers: &[(&str, &str)]) -> Result<ApiResponse, ApiError> {
        self.send(Method::PUT, endpoint, Some(data), headers).await
    }

    pub async fn delete(&self, endpoint: &str, headers: &[(&str, &str)]) -> Result<ApiResponse, ApiError> {
        self.send(Method::DELETE, endpoint, None, headers).await
    }

    fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
        }
    }

    async fn send(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        headers: &[(&str, &str)],
    ) -> Result<ApiResponse, ApiError> {
        let start = Instant::now();

        let mut request = self.client.request(method.clone(), self.url(endpoint));
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let result = match request.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                let text = response.text().await.unwrap_or_default();
                Ok(ApiResponse {
                    status,
                    data: parse_body(&text),
                })
            }
            Err(source) => Err(source),
        };
        let duration = start.elapsed().as_millis();

        match result {
            Ok(response) if response.is_success() => {
                info!(
                    "{}",
                    self.theme
                        .success(&format!("{} {} took {}ms", method, endpoint, duration))
                );
                info!("{} {}", self.theme.highlight("Response:"), response.data);
                Ok(response)
            }
            Ok(response) => {
                error!(
                    "{} status {}",
                    self.theme
                        .failure(&format!("{} {} failed after {}ms:", method, endpoint, duration)),
                    response.status
                );
                self.log_request_body(body);
                error!(
                    "{} {}",
                    self.theme.failure(&format!("Status {}:", response.status)),
                    response.data
                );
                Err(ApiError::Status {
                    method,
                    endpoint: endpoint.to_string(),
                    response,
                })
            }
            Err(source) => {
                error!(
                    "{} {}",
                    self.theme
                        .failure(&format!("{} {} failed after {}ms:", method, endpoint, duration)),
                    source
                );
                self.log_request_body(body);
                Err(ApiError::Transport {
                    method,
                    endpoint: endpoint.to_string(),
                    source,
                })
            }
        }
    }

    fn log_request_body(&self, body: Option<&Value>) {
        if let Some(body) = body {
            let pretty = serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string());
            error!("{} {}", self.theme.failure("Request Body:"), pretty);
        }
    }
}

fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = ApiClient::new("http://localhost:3000/", ConsoleTheme::plain());
        assert_eq!(client.url("/devices"), "http://localhost:3000/devices");
        assert_eq!(client.url("devices/1"), "http://localhost:3000/devices/1");
        assert_eq!(client.url("https://other.host/x"), "https://other.host/x");
    }

    #[test]
    fn test_from_config() {
        let config = NotifierConfig {
            api_base_url: Some("http://devices.local/api/".to_string()),
            ..NotifierConfig::default()
        };
        let client = ApiClient::from_config(&config, ConsoleTheme::plain()).unwrap();
        assert_eq!(client.url("devices"), "http://devices.local/api/devices");

        assert!(ApiClient::from_config(&NotifierConfig::default(), ConsoleTheme::plain()).is_none());
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(""), Value::Null);
        assert_eq!(parse_body(r#"{"ok":true}"#), json!({"ok": true}));
        assert_eq!(parse_body("plain"), json!("plain"));
    }

    #[test]
    fn test_network_error_shape() {
        let response = ApiResponse::network_error("connection refused");
        assert_eq!(response.status, NETWORK_ERROR_STATUS);
        assert_eq!(response.data["status"], json!(false));
        assert_eq!(response.data["code"], json!("NETWORK_ERROR"));
        assert_eq!(response.data["message"], json!("connection refused"));
    }
}
