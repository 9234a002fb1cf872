use super::delivery::{Attachment, DeliveryExecutor, DeliveryOutcome, DeliveryTarget};
use super::error::DeliveryError;
use super::message::{compose, MessagePayload};
use crate::report::{aggregate, RunResult};
use crate::utils::config::ReporterOptions;
use log::{error, info};

/// Posts run summaries with the HTML report attached. Failures never escape
/// `send_results`; a notification is best effort.
pub struct CliqReporter {
    options: ReporterOptions,
    executor: DeliveryExecutor,
}

impl CliqReporter {
    pub fn new(options: ReporterOptions, executor: DeliveryExecutor) -> Self {
        Self { options, executor }
    }

    pub fn build_payload(&self, result: &RunResult) -> MessagePayload {
        let rows = aggregate(result);
        compose(result, rows, &self.options.compose_options())
    }

    pub fn target(&self) -> DeliveryTarget {
        DeliveryTarget {
            channel: self.options.channel_name.clone(),
            attachment: Some(Attachment::new(
                self.options.report_path(),
                self.options.attachment_name(),
            )),
        }
    }

    pub async fn try_send(&self, result: &RunResult) -> Result<DeliveryOutcome, DeliveryError> {
        let payload = self.build_payload(result);
        self.executor.deliver(&self.target(), &payload).await
    }

    /// Deliver and log the outcome. Returns `None` when delivery failed.
    pub async fn send_results(&self, result: &RunResult) -> Option<DeliveryOutcome> {
        match self.try_send(result).await {
            Ok(DeliveryOutcome::Complete) => {
                info!("Message and report sent to Cliq channel successfully");
                Some(DeliveryOutcome::Complete)
            }
            Ok(DeliveryOutcome::MessageOnly) => {
                info!("Message sent to Cliq channel without the report");
                Some(DeliveryOutcome::MessageOnly)
            }
            Err(e) => {
                error!("Failed to send message to Cliq: {}", e);
                None
            }
        }
    }
}
