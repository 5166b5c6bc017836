//! # gigbook-core: Pure Gig Finance Engine
//!
//! This crate is the **heart** of Gigbook. It turns a band manager's gig
//! records into earnings breakdowns and dashboard aggregates, as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Gigbook Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          Callers (CLI, web dashboard, report builders)          │   │
//! │  │    gig cards ── dashboard ── analytics ── CSV/JSON export      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ GigInput / GigRecord                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ gigbook-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌────────────┐  ┌──────────┐  │   │
//! │  │   │validation │─►│ calculator │─►│ aggregator │─►│  export  │  │   │
//! │  │   │ sanitize  │  │ per gig    │  │ analytics  │  │  rows    │  │   │
//! │  │   └───────────┘  └────────────┘  │ partition  │  └──────────┘  │   │
//! │  │                                  └────────────┘                │   │
//! │  │   NO I/O • NO CLOCK • NO GLOBAL STATE • PURE FUNCTIONS         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Integer-cent `Money` and fixed-point `Percentage`
//! - [`types`] - `GigInput` (raw) and `GigRecord` (sanitized)
//! - [`validation`] - Lenient sanitization and strict validators
//! - [`calculator`] - Per-gig earnings breakdown
//! - [`aggregator`] - Dashboard totals and per-band breakdowns
//! - [`analytics`] - Monthly buckets and seasonal patterns
//! - [`partition`] - Active/handled split and the dashboard bundle
//! - [`export`] - Flat rows for CSV/JSON exports
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use gigbook_core::{aggregate, calculate, GigInput, GigRecord};
//!
//! let input = GigInput {
//!     id: "g1".into(),
//!     date: Some("2024-06-14".into()),
//!     performers: Some("The Blue Notes".into()),
//!     number_of_musicians: Some(4.0),
//!     performance_fee: Some(1000.0),
//!     technical_fee: Some(200.0),
//!     manager_bonus_amount: Some(50.0),
//!     ..Default::default()
//! };
//! let gig = GigRecord::from_input(&input).unwrap();
//!
//! let calc = calculate(&gig);
//! assert_eq!(calc.my_earnings.cents(), 50_000); // $500.00
//!
//! let summary = aggregate(std::slice::from_ref(&gig));
//! assert_eq!(summary.total_earnings_pending.cents(), 50_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregator;
pub mod analytics;
pub mod calculator;
pub mod error;
pub mod export;
pub mod money;
pub mod partition;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use aggregator::{aggregate, AggregateSummary, BandBreakdown, PendingBand};
pub use analytics::{MonthKey, MonthlyBucket, SeasonalPattern, SeasonalSummary};
pub use calculator::{calculate, find_and_calculate, CalculatedGig, GigCalculation};
pub use error::{CoreError, CoreResult, ValidationError};
pub use export::{export_document, export_rows, ExportDocument, ExportRow};
pub use money::{Money, Percentage};
pub use partition::{partition, Dashboard, GigPartition};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Grouping key for gigs with no performers name.
pub const UNKNOWN_BAND: &str = "Unknown Band";

/// Maximum musicians on a single gig.
///
/// ## Business Reason
/// Catches typos (400 instead of 4) before they turn a split into cents.
pub const MAX_MUSICIANS: u32 = 100;

/// Largest amount accepted for any single money field: $1,000,000,000.00.
///
/// ## Business Reason
/// No gig fee comes close, and with every field capped a whole catalogue of
/// gigs sums far below the i64 cent range.
pub const MAX_AMOUNT_CENTS: i64 = 100_000_000_000;

/// Months kept in the monthly breakdown.
pub const MONTHS_RETAINED: usize = 12;
