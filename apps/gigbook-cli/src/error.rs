//! # CLI Error Types
//!
//! Everything that can go wrong around the engine: config files, reading
//! gig exports, writing reports.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        CLI Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │     Input       │  │       Output            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  MissingInput   │  │  Io                     │ │
//! │  │  ConfigLoad     │  │  Json           │  │  Csv                    │ │
//! │  │  ConfigSave     │  │  InvalidGig     │  │                         │ │
//! │  └─────────────────┘  │  InvalidDate    │  └─────────────────────────┘ │
//! │                       │  Core           │                               │
//! │                       └─────────────────┘                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use gigbook_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Config values that parse but make no sense.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read or parse the config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to write the config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Input Errors
    // =========================================================================
    /// No gig file given on the command line, in the config or environment.
    #[error("No gig file configured. Pass --input or set GIGBOOK_INPUT.")]
    MissingInput,

    /// A gig failed strict validation.
    #[error("Gig {id} is invalid: {source}")]
    InvalidGig {
        id: String,
        #[source]
        source: ValidationError,
    },

    /// Unparseable `--today` value.
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Engine-level failure (unknown gig id).
    #[error(transparent)]
    Core(#[from] CoreError),

    // =========================================================================
    // I/O and Serialization Errors
    // =========================================================================
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        CliError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for CliError {
    fn from(err: toml::ser::Error) -> Self {
        CliError::ConfigSaveFailed(err.to_string())
    }
}
