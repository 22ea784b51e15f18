//! Structured logging configuration.

use crate::config::LoggingSettings;
use std::path::PathBuf;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "NOTEPORT_LOG";

/// Filter used when nothing else is configured.
const DEFAULT_DIRECTIVE: &str = "info";

/// Filter used with `--verbose`.
const VERBOSE_DIRECTIVE: &str = "debug";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format name; unknown names fall back to [`LogFormat::Pretty`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Resolved logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// `EnvFilter` directive.
    pub directive: String,
    /// Log file; stderr when `None`.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            directive: DEFAULT_DIRECTIVE.to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Builds the logging config from the `[logging]` section and the
    /// process environment.
    #[must_use]
    pub fn from_settings(settings: Option<&LoggingSettings>, verbose: bool) -> Self {
        let env_directive = std::env::var(LOG_ENV)
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok());
        Self::resolve(settings, verbose, env_directive)
    }

    /// Resolves the directive: environment, then `--verbose`, then the
    /// configured level, then `info`.
    #[must_use]
    pub fn resolve(
        settings: Option<&LoggingSettings>,
        verbose: bool,
        env_directive: Option<String>,
    ) -> Self {
        let directive = env_directive
            .filter(|d| !d.trim().is_empty())
            .or_else(|| verbose.then(|| VERBOSE_DIRECTIVE.to_string()))
            .or_else(|| settings.and_then(|s| s.level.clone()))
            .unwrap_or_else(|| DEFAULT_DIRECTIVE.to_string());

        Self {
            format: settings
                .and_then(|s| s.format.as_deref())
                .map(LogFormat::parse)
                .unwrap_or_default(),
            directive,
            file: settings.and_then(|s| s.file.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("json", LogFormat::Json; "json")]
    #[test_case("JSON", LogFormat::Json; "uppercase")]
    #[test_case("pretty", LogFormat::Pretty; "pretty")]
    #[test_case("xml", LogFormat::Pretty; "unknown falls back")]
    fn test_log_format_parse(input: &str, expected: LogFormat) {
        assert_eq!(LogFormat::parse(input), expected);
    }

    #[test]
    fn test_resolve_defaults() {
        let config = LoggingConfig::resolve(None, false, None);
        assert_eq!(config, LoggingConfig::default());
    }

    #[test]
    fn test_resolve_precedence() {
        let settings = LoggingSettings {
            format: Some("json".to_string()),
            level: Some("warn".to_string()),
            file: Some(PathBuf::from("noteport.log")),
        };

        let from_settings = LoggingConfig::resolve(Some(&settings), false, None);
        assert_eq!(from_settings.directive, "warn");
        assert_eq!(from_settings.format, LogFormat::Json);
        assert_eq!(from_settings.file, Some(PathBuf::from("noteport.log")));

        let verbose = LoggingConfig::resolve(Some(&settings), true, None);
        assert_eq!(verbose.directive, "debug");

        let env = LoggingConfig::resolve(Some(&settings), true, Some("noteport=trace".to_string()));
        assert_eq!(env.directive, "noteport=trace");
    }
}
