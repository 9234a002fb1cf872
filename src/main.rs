use clap::{Parser, Subcommand};
use log::warn;
use std::path::PathBuf;

use cliq_notifier::cliq::{
    compose, CliqEndpoints, CliqReporter, ComposeOptions, Credentials, DeliveryExecutor,
    ScreenshotUploader,
};
use cliq_notifier::report::{self, RunResult};
use cliq_notifier::utils::config::{
    NotifierConfig, ReporterOptions, ScreenshotOptions, DEFAULT_BOT_IMAGE, DEFAULT_BOT_NAME,
    DEFAULT_REPORT_CHANNEL, DEFAULT_REPORT_DIR, DEFAULT_REPORT_FILE, DEFAULT_TEST_ENV,
};
use cliq_notifier::utils::console::{init_logging, ConsoleTheme};

#[derive(Parser)]
#[command(name = "cliq-notifier")]
#[command(author = "NL Team")]
#[command(version)]
#[command(about = "Send test run summaries and screenshots to Zoho Cliq", long_about = None)]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Post the execution summary of a test run, with the HTML report attached
    Report {
        /// Path to the run result JSON
        results: PathBuf,

        /// Target channel name
        #[arg(short, long, default_value = DEFAULT_REPORT_CHANNEL)]
        channel: String,

        /// Directory holding the HTML report
        #[arg(long, default_value = DEFAULT_REPORT_DIR)]
        report_dir: PathBuf,

        /// Report file name inside the report directory
        #[arg(long, default_value = DEFAULT_REPORT_FILE)]
        report_file: String,

        /// Environment label shown in the message
        #[arg(short, long, default_value = DEFAULT_TEST_ENV)]
        env: String,

        /// Bot display name
        #[arg(long, default_value = DEFAULT_BOT_NAME)]
        bot_name: String,

        /// Bot avatar URL
        #[arg(long, default_value = DEFAULT_BOT_IMAGE)]
        bot_image: String,
    },

    /// Upload a screenshot with a short caption
    Screenshot {
        /// Target channel (falls back to ZOHO_CHANNEL_NAME)
        channel: Option<String>,

        /// Screenshot file (falls back to SCREENSHOT_PATH)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Print the aggregated table or message payload without sending anything
    Preview {
        /// Path to the run result JSON
        results: PathBuf,

        /// Output format (table, csv, json). JSON prints the composed message
        #[arg(short, long, default_value = "table")]
        format: String,

        /// Environment label shown in the message
        #[arg(short, long, default_value = DEFAULT_TEST_ENV)]
        env: String,

        /// Bot display name
        #[arg(long, default_value = DEFAULT_BOT_NAME)]
        bot_name: String,

        /// Bot avatar URL
        #[arg(long, default_value = DEFAULT_BOT_IMAGE)]
        bot_image: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let theme = ConsoleTheme::new(!cli.no_color);
    init_logging(theme);

    let config = NotifierConfig::from_env();

    match cli.command {
        Commands::Report {
            results,
            channel,
            report_dir,
            report_file,
            env,
            bot_name,
            bot_image,
        } => {
            let credentials = require_credentials(theme);

            println!(
                "{} Sending results from: {}",
                theme.success("▶"),
                results.display()
            );
            println!("  Channel: {}", theme.label(&channel));
            println!("  Environment: {}", theme.label(&env));

            let result = match report::load_results(&results) {
                Ok(result) => result,
                Err(e) => {
                    warn!("{:#}. Reporting an empty run result.", e);
                    RunResult::default()
                }
            };

            let options = ReporterOptions {
                channel_name: channel,
                report_dir,
                report_file,
                test_env: env,
                bot_name,
                bot_image,
            };
            let executor = DeliveryExecutor::new(credentials, CliqEndpoints::from_config(&config));
            let reporter = CliqReporter::new(options, executor);

            // Best effort: a failed notification does not fail the run
            if reporter.send_results(&result).await.is_none() {
                println!("{} Notification was not delivered", theme.highlight("⚠"));
            }
        }

        Commands::Screenshot { channel, file } => {
            let credentials = require_credentials(theme);
            let options = ScreenshotOptions::resolve(&config, channel, file);

            println!(
                "{} Using channel: {}",
                theme.highlight("📢"),
                theme.label(&options.channel_name)
            );

            let executor = DeliveryExecutor::new(credentials, CliqEndpoints::from_config(&config));
            let uploader = ScreenshotUploader::new(options, executor);

            if let Err(e) = uploader.upload().await {
                eprintln!("{} Script failed: {}", theme.failure("❌"), e);
                std::process::exit(1);
            }
        }

        Commands::Preview {
            results,
            format,
            env,
            bot_name,
            bot_image,
        } => {
            let result = report::load_results(&results)?;
            let rows = report::aggregate(&result);

            // JSON previews the full message; other formats show only the rows
            if format == "json" {
                let options = ComposeOptions {
                    test_env: env,
                    bot_name,
                    bot_image,
                };
                let payload = compose(&result, rows, &options);
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("{}", report::export_rows(&rows, &format)?.trim_end());
            }
        }
    }

    Ok(())
}

/// Validate credentials or terminate, listing every missing variable
fn require_credentials(theme: ConsoleTheme) -> Credentials {
    match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            eprintln!("{} {}", theme.failure("❌"), theme.failure(&e.to_string()));
            eprintln!("Please set these environment variables before running the script.");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_version_follows_package() {
        assert_eq!(
            Cli::command().get_version(),
            Some(env!("CARGO_PKG_VERSION"))
        );
    }

    #[test]
    fn test_screenshot_args_are_optional() {
        let cli = Cli::try_parse_from(["cliq-notifier", "--no-color", "screenshot"]).unwrap();
        assert!(cli.no_color);
        match cli.command {
            Commands::Screenshot { channel, file } => {
                assert!(channel.is_none());
                assert!(file.is_none());
            }
            _ => panic!("expected screenshot command"),
        }
    }
}
