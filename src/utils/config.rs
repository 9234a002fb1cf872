use crate::cliq::message::ComposeOptions;
use std::path::PathBuf;

pub const CLIQ_BASE_URL_KEY: &str = "ZOHO_CLIQ_BASE_URL";
pub const COMPANY_ID_KEY: &str = "ZOHO_COMPANY_ID";
pub const CHANNEL_NAME_KEY: &str = "ZOHO_CHANNEL_NAME";
pub const SCREENSHOT_PATH_KEY: &str = "SCREENSHOT_PATH";
pub const API_BASE_URL_KEY: &str = "BASE_URL";

pub const DEFAULT_CLIQ_BASE_URL: &str = "https://cliq.zoho.in";
pub const DEFAULT_COMPANY_ID: &str = "60001695168";

pub const DEFAULT_REPORT_CHANNEL: &str = "default-channel";
pub const DEFAULT_REPORT_DIR: &str = "./reports";
pub const DEFAULT_REPORT_FILE: &str = "index.html";
pub const DEFAULT_TEST_ENV: &str = "Test Environment";
pub const DEFAULT_BOT_NAME: &str = "WebdriverIO Reporter";
pub const DEFAULT_BOT_IMAGE: &str = "https://webdriver.io/img/webdriverio.png";

pub const DEFAULT_SCREENSHOT_CHANNEL: &str = "automationreports";
pub const DEFAULT_SCREENSHOT_PATH: &str = "./summary/summary.png";

/// Read a process environment variable, treating blank values as unset
pub fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Non-secret settings read from the process environment
#[derive(Debug, Clone, PartialEq)]
pub struct NotifierConfig {
    /// Cliq API host, e.g. "https://cliq.zoho.in"
    pub cliq_base_url: String,

    /// Company segment of the channel endpoints
    pub company_id: String,

    /// Channel used by the screenshot command when none is given
    pub channel_name: Option<String>,

    /// Screenshot to upload
    pub screenshot_path: Option<PathBuf>,

    /// Base URL for the generic API client
    pub api_base_url: Option<String>,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            cliq_base_url: DEFAULT_CLIQ_BASE_URL.to_string(),
            company_id: DEFAULT_COMPANY_ID.to_string(),
            channel_name: None,
            screenshot_path: None,
            api_base_url: None,
        }
    }
}

impl NotifierConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            cliq_base_url: lookup(CLIQ_BASE_URL_KEY)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.cliq_base_url),
            company_id: lookup(COMPANY_ID_KEY).unwrap_or(defaults.company_id),
            channel_name: lookup(CHANNEL_NAME_KEY),
            screenshot_path: lookup(SCREENSHOT_PATH_KEY).map(PathBuf::from),
            api_base_url: lookup(API_BASE_URL_KEY),
        }
    }
}

/// Options of the run-summary reporter
#[derive(Debug, Clone, PartialEq)]
pub struct ReporterOptions {
    pub channel_name: String,
    pub report_dir: PathBuf,
    pub report_file: String,
    pub test_env: String,
    pub bot_name: String,
    pub bot_image: String,
}

impl Default for ReporterOptions {
    fn default() -> Self {
        Self {
            channel_name: DEFAULT_REPORT_CHANNEL.to_string(),
            report_dir: PathBuf::from(DEFAULT_REPORT_DIR),
            report_file: DEFAULT_REPORT_FILE.to_string(),
            test_env: DEFAULT_TEST_ENV.to_string(),
            bot_name: DEFAULT_BOT_NAME.to_string(),
            bot_image: DEFAULT_BOT_IMAGE.to_string(),
        }
    }
}

impl ReporterOptions {
    pub fn report_path(&self) -> PathBuf {
        self.report_dir.join(&self.report_file)
    }

    /// File name the report is uploaded under
    pub fn attachment_name(&self) -> String {
        format!("{}_report.html", self.test_env)
    }

    pub fn compose_options(&self) -> ComposeOptions {
        ComposeOptions {
            test_env: self.test_env.clone(),
            bot_name: self.bot_name.clone(),
            bot_image: self.bot_image.clone(),
        }
    }
}

/// Options of the screenshot uploader
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenshotOptions {
    pub channel_name: String,
    pub file_path: PathBuf,
}

impl ScreenshotOptions {
    /// Explicit arguments win over the environment, which wins over defaults
    pub fn resolve(
        config: &NotifierConfig,
        channel: Option<String>,
        file_path: Option<PathBuf>,
    ) -> Self {
        Self {
            channel_name: channel
                .or_else(|| config.channel_name.clone())
                .unwrap_or_else(|| DEFAULT_SCREENSHOT_CHANNEL.to_string()),
            file_path: file_path
                .or_else(|| config.screenshot_path.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SCREENSHOT_PATH)),
        }
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
    fn test_config_defaults() {
        let config = NotifierConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, NotifierConfig::default());
        assert_eq!(config.cliq_base_url, "https://cliq.zoho.in");
    }

    #[test]
    fn test_config_from_lookup() {
        let config = NotifierConfig::from_lookup(lookup_from(&[
            (CLIQ_BASE_URL_KEY, "https://cliq.zoho.eu/"),
            (COMPANY_ID_KEY, "42"),
            (CHANNEL_NAME_KEY, "nightly"),
            (SCREENSHOT_PATH_KEY, "/tmp/shot.png"),
        ]));
        assert_eq!(config.cliq_base_url, "https://cliq.zoho.eu");
        assert_eq!(config.company_id, "42");
        assert_eq!(config.channel_name.as_deref(), Some("nightly"));
        assert_eq!(config.screenshot_path, Some(PathBuf::from("/tmp/shot.png")));
    }

    #[test]
    fn test_screenshot_options_precedence() {
        let config = NotifierConfig {
            channel_name: Some("from-env".to_string()),
            ..NotifierConfig::default()
        };

        let options = ScreenshotOptions::resolve(&config, Some("from-arg".to_string()), None);
        assert_eq!(options.channel_name, "from-arg");
        assert_eq!(options.file_path, PathBuf::from(DEFAULT_SCREENSHOT_PATH));

        let options = ScreenshotOptions::resolve(&config, None, None);
        assert_eq!(options.channel_name, "from-env");

        let options = ScreenshotOptions::resolve(&NotifierConfig::default(), None, None);
        assert_eq!(options.channel_name, DEFAULT_SCREENSHOT_CHANNEL);
    }

    #[test]
    fn test_reporter_paths() {
        let options = ReporterOptions {
            test_env: "QA".to_string(),
            ..ReporterOptions::default()
        };
        assert_eq!(options.report_path(), PathBuf::from("./reports/index.html"));
        assert_eq!(options.attachment_name(), "QA_report.html");
    }
}
