//! Console colors as an explicit value instead of global escape constants.

use colored::{Color, Colorize};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleTheme {
    color: bool,
}

impl ConsoleTheme {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Theme that never emits escape codes
    pub fn plain() -> Self {
        Self { color: false }
    }

    pub fn success(&self, text: &str) -> String {
        self.paint(text, Color::Green)
    }

    pub fn highlight(&self, text: &str) -> String {
        self.paint(text, Color::Yellow)
    }

    pub fn failure(&self, text: &str) -> String {
        self.paint(text, Color::Red)
    }

    pub fn label(&self, text: &str) -> String {
        self.paint(text, Color::Cyan)
    }

    pub fn level_tag(&self, level: log::Level) -> String {
        let tag = format!("{:<5}", level);
        match level {
            log::Level::Error => self.failure(&tag),
            log::Level::Warn => self.highlight(&tag),
            log::Level::Info => self.success(&tag),
            log::Level::Debug | log::Level::Trace => self.label(&tag),
        }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }
}

/// Install the process logger. `RUST_LOG` overrides the default `info` filter.
pub fn init_logging(theme: ConsoleTheme) {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(move |buf, record| {
            writeln!(
                buf,
                "{} {} {}",
                chrono::Local::now().format("%H:%M:%S"),
                theme.level_tag(record.level()),
                record.args()
            )
        })
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_theme_has_no_escapes() {
        let theme = ConsoleTheme::plain();
        assert_eq!(theme.success("ok"), "ok");
        assert_eq!(theme.failure("bad"), "bad");
        assert_eq!(theme.level_tag(log::Level::Warn), "WARN ");
    }

    #[test]
    fn test_colored_theme_wraps_text() {
        colored::control::set_override(true);
        let theme = ConsoleTheme::new(true);
        let painted = theme.failure("bad");
        assert!(painted.contains("bad"));
        assert!(painted.starts_with("\u{1b}["));
    }
}
