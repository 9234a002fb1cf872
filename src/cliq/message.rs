//! Chat message payloads and the alert/summary decision.

use crate::report::{ReportRow, RunResult, RunStats, TABLE_HEADERS};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bot {
    pub name: String,
    pub image: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CardTheme {
    Prompt,
    ModernInline,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub title: String,
    pub theme: CardTheme,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideKind {
    Table,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<ReportRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slide {
    #[serde(rename = "type")]
    pub kind: SlideKind,
    pub title: String,
    pub data: TableData,
}

/// Body posted to a channel's message endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessagePayload {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bot: Option<Bot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slides: Option<Vec<Slide>>,
}

impl MessagePayload {
    /// Bare text message without bot identity or card
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bot: None,
            card: None,
            slides: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeOptions {
    pub test_env: String,
    pub bot_name: String,
    pub bot_image: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// The only executed test failed; treated as a broken environment
    Alert,
    Summary,
}

/// True when exactly one test ran and it failed: `failures == 1` and
/// `tests == failures + skipped`. Missing counters never match.
pub fn is_pre_validation_failure(stats: &RunStats) -> bool {
    match (stats.tests, stats.failures, stats.skipped) {
        (Some(tests), Some(failures), Some(skipped)) => {
            failures == 1 && failures.checked_add(skipped) == Some(tests)
        }
        _ => false,
    }
}

pub fn classify(result: &RunResult) -> MessageKind {
    match &result.stats {
        Some(stats) if is_pre_validation_failure(stats) => MessageKind::Alert,
        _ => MessageKind::Summary,
    }
}

pub fn compose(result: &RunResult, rows: Vec<ReportRow>, options: &ComposeOptions) -> MessagePayload {
    let bot = Some(Bot {
        name: options.bot_name.clone(),
        image: options.bot_image.clone(),
    });

    match classify(result) {
        MessageKind::Alert => MessagePayload {
            text: format!(
                "Pre-validation failure for {}. Basic test scenario failed.",
                options.test_env
            ),
            bot,
            card: Some(Card {
                title: format!("Alert! -- Test Failure in {}", options.test_env),
                theme: CardTheme::Prompt,
            }),
            slides: None,
        },
        MessageKind::Summary => MessagePayload {
            text: format!("Hi Team! Test execution results for {}", options.test_env),
            bot,
            card: Some(Card {
                title: options.test_env.clone(),
                theme: CardTheme::ModernInline,
            }),
            slides: Some(vec![Slide {
                kind: SlideKind::Table,
                title: "Details of Execution".to_string(),
                data: TableData {
                    headers: TABLE_HEADERS.iter().map(|h| h.to_string()).collect(),
                    rows,
                },
            }]),
        },
    }
}
