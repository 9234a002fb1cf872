use super::delivery::DeliveryState;
use std::path::PathBuf;
use thiserror::Error;

/// One or more required secrets are absent. Lists every missing key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Missing environment variables: {}", .missing.join(", "))]
pub struct CredentialsError {
    pub missing: Vec<&'static str>,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("token endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Success status, but the body has no non-empty string `access_token`
    #[error("No access token in response")]
    MissingAccessToken,
}

/// Failure of a single HTTP call against the channel API
#[derive(Debug, Error)]
pub enum RequestError {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("status {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("failed to get token: {0}")]
    Token(#[from] TokenError),

    #[error("failed to send message to channel '{channel}': {source}")]
    Message {
        channel: String,
        #[source]
        source: RequestError,
    },

    #[error("failed to read attachment {}: {source}", .path.display())]
    Attachment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to upload {} to channel '{channel}': {source}", .path.display())]
    Upload {
        channel: String,
        path: PathBuf,
        #[source]
        source: RequestError,
    },
}

impl DeliveryError {
    /// Last state reached before the delivery moved to `Failed`
    pub fn failed_at(&self) -> DeliveryState {
        match self {
            DeliveryError::Token(_) => DeliveryState::Idle,
            DeliveryError::Message { .. } => DeliveryState::TokenAcquired,
            DeliveryError::Attachment { .. } | DeliveryError::Upload { .. } => {
                DeliveryState::MessageSent
            }
        }
    }

    /// True when the message reached the channel before the failure
    pub fn message_sent(&self) -> bool {
        self.failed_at() == DeliveryState::MessageSent
    }
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error(transparent)]
    Credentials(#[from] CredentialsError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error("Screenshot not found: {}", .0.display())]
    ScreenshotMissing(PathBuf),
}
