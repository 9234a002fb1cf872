//! Two-phase delivery: post the message, then upload the attachment.
//!
//! `Idle -> TokenAcquired -> MessageSent -> [FileUploaded] -> Done`, with any
//! failing step moving to `Failed`. Steps run strictly in sequence and a sent
//! message is never retracted.

use super::credentials::Credentials;
use super::error::{DeliveryError, RequestError};
use super::message::MessagePayload;
use super::token::{BearerToken, TokenProvider};
use crate::utils::config::NotifierConfig;
use crate::utils::id::generate_short_id;
use log::{debug, error, info, warn};
use reqwest::multipart::{Form, Part};
use std::path::{Path, PathBuf};

/// Channel endpoint builder for one Cliq company
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliqEndpoints {
    base_url: String,
    company_id: String,
}

impl CliqEndpoints {
    pub fn new(base_url: &str, company_id: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            company_id: company_id.to_string(),
        }
    }

    pub fn from_config(config: &NotifierConfig) -> Self {
        Self::new(&config.cliq_base_url, &config.company_id)
    }

    pub fn message_url(&self, channel: &str) -> String {
        self.channel_url(channel, "message")
    }

    pub fn files_url(&self, channel: &str) -> String {
        self.channel_url(channel, "files")
    }

    fn channel_url(&self, channel: &str, leaf: &str) -> String {
        format!(
            "{}/company/{}/api/v2/channelsbyname/{}/{}",
            self.base_url, self.company_id, channel, leaf
        )
    }
}

/// File to upload after the message, under `file_name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub path: PathBuf,
    pub file_name: String,
}

impl Attachment {
    pub fn new(path: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            file_name: file_name.into(),
        }
    }

    /// Upload under the file's own base name
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());
        Self { path, file_name }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryTarget {
    pub channel: String,
    pub attachment: Option<Attachment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryState {
    Idle,
    TokenAcquired,
    MessageSent,
    FileUploaded,
    Done,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Message posted and attachment uploaded
    Complete,
    /// Message posted; no attachment configured or the file was missing
    MessageOnly,
}

struct Progress {
    attempt: String,
    state: DeliveryState,
}

impl Progress {
    fn new() -> Self {
        Self {
            attempt: generate_short_id(),
            state: DeliveryState::Idle,
        }
    }

    fn advance(&mut self, next: DeliveryState) {
        debug!("[delivery {}] {:?} -> {:?}", self.attempt, self.state, next);
        self.state = next;
    }

    fn fail(&mut self, err: DeliveryError) -> DeliveryError {
        error!("[delivery {}] failed in {:?}: {}", self.attempt, self.state, err);
        self.advance(DeliveryState::Failed);
        err
    }
}

pub struct DeliveryExecutor {
    client: reqwest::Client,
    tokens: TokenProvider,
    endpoints: CliqEndpoints,
}

impl DeliveryExecutor {
    pub fn new(credentials: Credentials, endpoints: CliqEndpoints) -> Self {
        let client = reqwest::Client::new();
        Self {
            tokens: TokenProvider::with_client(client.clone(), credentials),
            client,
            endpoints,
        }
    }

    /// Acquire a token, post `payload`, then upload the attachment if it exists.
    ///
    /// A missing attachment file is logged and yields `MessageOnly`.
    pub async fn deliver(
        &self,
        target: &DeliveryTarget,
        payload: &MessagePayload,
    ) -> Result<DeliveryOutcome, DeliveryError> {
        let mut progress = Progress::new();

        let token = match self.tokens.acquire_token().await {
            Ok(token) => token,
            Err(e) => return Err(progress.fail(DeliveryError::Token(e))),
        };
        progress.advance(DeliveryState::TokenAcquired);

        info!("Sending message to Cliq channel '{}'...", target.channel);
        if let Err(source) = self.post_message(&target.channel, payload, &token).await {
            return Err(progress.fail(DeliveryError::Message {
                channel: target.channel.clone(),
                source,
            }));
        }
        progress.advance(DeliveryState::MessageSent);
        info!("Message sent successfully");

        let mut attachment = target.attachment.as_ref();
        if let Some(candidate) = attachment {
            if !is_file(&candidate.path).await {
                warn!("Attachment not found: {}", candidate.path.display());
                attachment = None;
            }
        }

        let outcome = match attachment {
            None => DeliveryOutcome::MessageOnly,
            Some(attachment) => {
                info!("Uploading {}...", attachment.path.display());
                if let Err(e) = self.upload_file(&target.channel, attachment, &token).await {
                    return Err(progress.fail(e));
                }
                progress.advance(DeliveryState::FileUploaded);
                info!(
                    "{} uploaded to Cliq channel '{}'",
                    attachment.file_name, target.channel
                );
                DeliveryOutcome::Complete
            }
        };

        progress.advance(DeliveryState::Done);
        Ok(outcome)
    }

    async fn post_message(
        &self,
        channel: &str,
        payload: &MessagePayload,
        token: &BearerToken,
    ) -> Result<(), RequestError> {
        let response = self
            .client
            .post(self.endpoints.message_url(channel))
            .header(reqwest::header::AUTHORIZATION, token.authorization())
            .json(payload)
            .send()
            .await?;
        check_status(response).await
    }

    async fn upload_file(
        &self,
        channel: &str,
        attachment: &Attachment,
        token: &BearerToken,
    ) -> Result<(), DeliveryError> {
        // The file handle lives only for the duration of the read
        let bytes = tokio::fs::read(&attachment.path)
            .await
            .map_err(|source| DeliveryError::Attachment {
                path: attachment.path.clone(),
                source,
            })?;

        let upload_error = |source: RequestError| DeliveryError::Upload {
            channel: channel.to_string(),
            path: attachment.path.clone(),
            source,
        };

        let part = Part::bytes(bytes)
            .file_name(attachment.file_name.clone())
            .mime_str(mime_for(&attachment.path))
            .map_err(|e| upload_error(RequestError::Transport(e)))?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.endpoints.files_url(channel))
            .header(reqwest::header::AUTHORIZATION, token.authorization())
            .multipart(form)
            .send()
            .await
            .map_err(|e| upload_error(RequestError::Transport(e)))?;

        check_status(response).await.map_err(upload_error)
    }
}

async fn check_status(response: reqwest::Response) -> Result<(), RequestError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    error!("Status: {}", status);
    error!("Response data: {}", body);
    Err(RequestError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

fn mime_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match extension.as_deref() {
        Some("html") | Some("htm") => "text/html",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("json") => "application/json",
        Some("txt") | Some("log") => "text/plain",
        _ => "application/octet-stream",
    }
}
