//! Configuration management.
//!
//! Configuration comes from a TOML file, then environment overrides:
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `NOTEPORT_API_URL` | `[api] base_url` |
//! | `NOTEPORT_API_TOKEN` | `[api] token` |
//! | `NOTEPORT_API_TIMEOUT_MS` | `[api] timeout_ms` |

use crate::api::{ApiHttpConfig, HttpTemplateApi};
use crate::{Error, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "NOTEPORT_CONFIG_PATH";

/// Main configuration for noteport.
#[derive(Debug, Clone, Default)]
pub struct NoteportConfig {
    /// Notes API connection.
    pub api: ApiConfig,
    /// Export destination.
    pub export: ExportConfig,
    /// Logging settings from the `[logging]` section.
    pub logging: Option<LoggingSettings>,
    /// Files the configuration was loaded from.
    pub config_sources: Vec<PathBuf>,
}

/// Notes API connection settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the notes API, without the `/templates` suffix.
    pub base_url: String,
    /// Bearer token.
    pub token: Option<SecretString>,
    /// Request timeout in milliseconds (0 to disable).
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds (0 to disable).
    pub connect_timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let http = ApiHttpConfig::default();
        Self {
            base_url: HttpTemplateApi::DEFAULT_BASE_URL.to_string(),
            token: None,
            timeout_ms: http.timeout_ms,
            connect_timeout_ms: http.connect_timeout_ms,
        }
    }
}

/// Export settings.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Directory exported artifacts are written to.
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingSettings {
    /// `pretty` or `json`.
    pub format: Option<String>,
    /// Filter directive, e.g. `info` or `noteport=debug`.
    pub level: Option<String>,
    /// Log file path; stderr when unset.
    pub file: Option<PathBuf>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// API section.
    pub api: Option<ConfigFileApi>,
    /// Export section.
    pub export: Option<ConfigFileExport>,
    /// Logging section.
    pub logging: Option<LoggingSettings>,
}

/// API section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileApi {
    /// Base URL.
    pub base_url: Option<String>,
    /// Bearer token.
    pub token: Option<String>,
    /// Request timeout.
    pub timeout_ms: Option<u64>,
    /// Connect timeout.
    pub connect_timeout_ms: Option<u64>,
}

/// Export section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileExport {
    /// Output directory.
    pub output_dir: Option<String>,
}

impl NoteportConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_config_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;

        let mut config = Self::parse(&contents)?;
        config.config_sources.push(path.to_path_buf());
        Ok(config)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid config file.
    pub fn parse(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents).map_err(|e| Error::OperationFailed {
            operation: "parse_config_file".to_string(),
            cause: e.to_string(),
        })?;

        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform-specific config dir (`~/Library/Application Support/noteport/` on macOS)
    /// 2. XDG config dir (`~/.config/noteport/`)
    ///
    /// Returns default configuration if no config file is found. A file that
    /// exists but cannot be parsed is skipped with a warning.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let candidates = [
            base_dirs.config_dir().join("noteport").join("config.toml"),
            base_dirs
                .home_dir()
                .join(".config")
                .join("noteport")
                .join("config.toml"),
        ];

        for path in candidates.iter().filter(|p| p.exists()) {
            match Self::load_from_file(path) {
                Ok(config) => return config,
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Skipping config file"),
            }
        }

        Self::default()
    }

    /// Converts a `ConfigFile` to `NoteportConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(api) = file.api {
            if let Some(base_url) = api.base_url {
                config.api.base_url = base_url;
            }
            if let Some(token) = api.token.filter(|t| !t.is_empty()) {
                config.api.token = Some(SecretString::from(token));
            }
            if let Some(v) = api.timeout_ms {
                config.api.timeout_ms = v;
            }
            if let Some(v) = api.connect_timeout_ms {
                config.api.connect_timeout_ms = v;
            }
        }
        if let Some(output_dir) = file.export.and_then(|e| e.output_dir) {
            config.export.output_dir = PathBuf::from(output_dir);
        }
        config.logging = file.logging;

        config
    }

    /// Applies `NOTEPORT_*` environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an override has an invalid value.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if `NOTEPORT_API_TIMEOUT_MS` is not an integer.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("NOTEPORT_API_URL").filter(|v| !v.trim().is_empty()) {
            self.api.base_url = url;
        }
        if let Some(token) = lookup("NOTEPORT_API_TOKEN").filter(|v| !v.is_empty()) {
            self.api.token = Some(SecretString::from(token));
        }
        if let Some(raw) = lookup("NOTEPORT_API_TIMEOUT_MS") {
            self.api.timeout_ms = raw.trim().parse().map_err(|_| {
                Error::InvalidInput(format!("NOTEPORT_API_TIMEOUT_MS must be an integer: '{raw}'"))
            })?;
        }
        Ok(())
    }

    /// Sets the export output directory.
    #[must_use]
    pub fn with_output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.export.output_dir = path.into();
        self
    }
}

impl fmt::Display for NoteportConfig {
    /// Renders the effective configuration; the token is never shown.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[api]")?;
        writeln!(f, "base_url = \"{}\"", self.api.base_url)?;
        writeln!(
            f,
            "token = {}",
            if self.api.token.is_some() { "\"********\"" } else { "(unset)" }
        )?;
        writeln!(f, "timeout_ms = {}", self.api.timeout_ms)?;
        writeln!(f, "connect_timeout_ms = {}", self.api.connect_timeout_ms)?;
        writeln!(f)?;
        writeln!(f, "[export]")?;
        writeln!(f, "output_dir = \"{}\"", self.export.output_dir.display())?;

        if let Some(logging) = &self.logging {
            writeln!(f)?;
            writeln!(f, "[logging]")?;
            if let Some(format) = &logging.format {
                writeln!(f, "format = \"{format}\"")?;
            }
            if let Some(level) = &logging.level {
                writeln!(f, "level = \"{level}\"")?;
            }
            if let Some(file) = &logging.file {
                writeln!(f, "file = \"{}\"", file.display())?;
            }
        }

        Ok(())
    }
}
