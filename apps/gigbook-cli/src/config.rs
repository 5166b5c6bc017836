//! # CLI Configuration
//!
//! Where the gigs come from and how reports look.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority, applied in main.rs)          │
//! │     --input gigs.json --format json                                    │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     GIGBOOK_INPUT=~/exports/gigs.json                                  │
//! │     GIGBOOK_FORMAT=csv                                                 │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     ~/.config/gigbook/gigbook.toml (Linux)                             │
//! │     ~/Library/Application Support/com.gigbook.gigbook/gigbook.toml     │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     text output, "$" symbol, lenient input                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # gigbook.toml
//! [input]
//! path = "/home/me/exports/gigs.json"
//! strict = false
//!
//! [report]
//! format = "text"      # text | json | csv
//! currency_symbol = "€"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{CliError, CliResult};

// =============================================================================
// Report Format
// =============================================================================

/// How reports are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    /// Aligned tables for a terminal.
    #[default]
    Text,
    /// Pretty-printed JSON, same shape the web dashboard consumes.
    Json,
    /// Comma-separated rows for spreadsheets.
    Csv,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Json => write!(f, "json"),
            ReportFormat::Csv => write!(f, "csv"),
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "table" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            other => Err(CliError::InvalidConfig(format!(
                "Unknown report format: '{}'. Valid options: text, json, csv",
                other
            ))),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

/// Where gig records are read from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputSettings {
    /// JSON file holding an array of gigs (or `{ "gigs": [...] }`).
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Reject invalid gigs instead of repairing them.
    #[serde(default)]
    pub strict: bool,
}

/// Report rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    #[serde(default)]
    pub format: ReportFormat,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            format: ReportFormat::default(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

// =============================================================================
// Complete Configuration
// =============================================================================

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub input: InputSettings,

    #[serde(default)]
    pub report: ReportSettings,
}

impl CliConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (gigbook.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> CliResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Saves configuration to file, creating parent directories.
    ///
    /// Returns the path written.
    pub fn save(&self, config_path: Option<PathBuf>) -> CliResult<PathBuf> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| CliError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Config saved");
        Ok(path)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CliResult<()> {
        if self.report.currency_symbol.chars().count() > 4 {
            return Err(CliError::InvalidConfig(format!(
                "currency_symbol must be at most 4 characters, got '{}'",
                self.report.currency_symbol
            )));
        }

        if let Some(ref path) = self.input.path {
            if path.as_os_str().is_empty() {
                return Err(CliError::InvalidConfig("input.path is empty".into()));
            }
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("GIGBOOK_INPUT") {
            debug!(path = %path, "Overriding input path from environment");
            self.input.path = Some(PathBuf::from(path));
        }

        if let Ok(format) = std::env::var("GIGBOOK_FORMAT") {
            match format.parse() {
                Ok(parsed) => self.report.format = parsed,
                Err(_) => warn!(format = %format, "Unknown report format in environment"),
            }
        }

        if let Ok(symbol) = std::env::var("GIGBOOK_CURRENCY_SYMBOL") {
            self.report.currency_symbol = symbol;
        }

        if let Ok(strict) = std::env::var("GIGBOOK_STRICT") {
            match strict.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.input.strict = true,
                "0" | "false" | "no" => self.input.strict = false,
                _ => warn!(strict = %strict, "Unknown GIGBOOK_STRICT value"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "gigbook", "gigbook")
            .map(|dirs| dirs.config_dir().join("gigbook.toml"))
    }
}
