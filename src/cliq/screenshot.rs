use super::delivery::{Attachment, DeliveryExecutor, DeliveryOutcome, DeliveryTarget};
use super::error::NotifyError;
use super::message::MessagePayload;
use crate::utils::config::ScreenshotOptions;
use log::{error, info};

pub const SCREENSHOT_MESSAGE: &str = "📸 Jenkins Allure Report Screenshot";

/// Uploads a screenshot with a short caption. Unlike the reporter, every
/// failure is returned to the caller.
pub struct ScreenshotUploader {
    options: ScreenshotOptions,
    executor: DeliveryExecutor,
}

impl ScreenshotUploader {
    pub fn new(options: ScreenshotOptions, executor: DeliveryExecutor) -> Self {
        Self { options, executor }
    }

    pub async fn upload(&self) -> Result<(), NotifyError> {
        let path = &self.options.file_path;
        info!("Checking for screenshot file: {}", path.display());
        if !path.is_file() {
            error!("Screenshot not found: {}", path.display());
            return Err(NotifyError::ScreenshotMissing(path.clone()));
        }
        info!("Screenshot file found");

        let target = DeliveryTarget {
            channel: self.options.channel_name.clone(),
            attachment: Some(Attachment::from_path(path.clone())),
        };

        match self
            .executor
            .deliver(&target, &MessagePayload::text(SCREENSHOT_MESSAGE))
            .await?
        {
            DeliveryOutcome::Complete => {
                info!("Screenshot uploaded successfully to Cliq channel");
                Ok(())
            }
            // The file disappeared between the check and the upload
            DeliveryOutcome::MessageOnly => Err(NotifyError::ScreenshotMissing(path.clone())),
        }
    }
}
