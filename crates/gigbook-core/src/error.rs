//! # Error Types
//!
//! Domain-specific error types for gigbook-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  gigbook-core errors (this file)                                       │
//! │  ├── CoreError        - Lookup failures around the engine              │
//! │  └── ValidationError  - Strict input validation failures               │
//! │                                                                         │
//! │  gigbook-cli errors (separate crate)                                   │
//! │  └── CliError         - Config, file and serialization failures        │
//! │                                                                         │
//! │  The calculator and aggregator themselves never fail: bad numbers are  │
//! │  corrected during sanitization, zero denominators yield zero.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No gig with the requested id in the supplied list.
    #[error("Gig not found: {0}")]
    GigNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by the strict validators used at the creation/update boundary,
/// and by sanitization when a record cannot be repaired (no date).
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Money amount is negative or not a number.
    #[error("{field} must be a non-negative amount")]
    MustBeNonNegative { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., unparseable date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// One amount exceeds the amount it is drawn from.
    ///
    /// ## When This Occurs
    /// - technicalFeeClaimAmount greater than technicalFee
    #[error("{field} ({value}) cannot exceed {limit_field} ({limit})")]
    ExceedsLimit {
        field: String,
        value: String,
        limit_field: String,
        limit: String,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
