//! # Dashboard Partition
//!
//! Splits gigs into "active" (needs attention) and "handled" (done), and
//! bundles that with the aggregate summary for the dashboard.
//!
//! ## Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  date >= today                        ──► ACTIVE   (upcoming)           │
//! │  date <  today, client or band unpaid ──► ACTIVE   (needs settling)     │
//! │  date <  today, both paid             ──► HANDLED                       │
//! │                                                                         │
//! │  ACTIVE sorted soonest first, HANDLED most recent first                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `today` is always passed in; nothing here reads the clock.

use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregator::{aggregate, AggregateSummary};
use crate::types::GigRecord;

/// Active and handled gigs, each already in display order.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GigPartition<'a> {
    pub active: Vec<&'a GigRecord>,
    pub handled: Vec<&'a GigRecord>,
}

/// A gig is handled only once it is in the past and fully settled.
#[inline]
pub fn is_handled(gig: &GigRecord, today: NaiveDate) -> bool {
    gig.date < today && gig.is_settled()
}

/// Splits gigs into active and handled lists.
///
/// Sorting is stable, so gigs on the same date keep their input order.
pub fn partition(gigs: &[GigRecord], today: NaiveDate) -> GigPartition<'_> {
    let (mut handled, mut active): (Vec<&GigRecord>, Vec<&GigRecord>) =
        gigs.iter().partition(|gig| is_handled(gig, today));

    active.sort_by(|a, b| a.date.cmp(&b.date));
    handled.sort_by(|a, b| b.date.cmp(&a.date));

    GigPartition { active, handled }
}

/// Everything the dashboard page renders.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard<'a> {
    pub today: NaiveDate,
    pub summary: AggregateSummary,
    pub gigs: GigPartition<'a>,
    /// Gigs dated today or later.
    pub upcoming_gigs: u32,
}

impl<'a> Dashboard<'a> {
    /// Builds the dashboard for `today`.
    pub fn build(gigs: &'a [GigRecord], today: NaiveDate) -> Self {
        Dashboard {
            today,
            summary: aggregate(gigs),
            gigs: partition(gigs, today),
            upcoming_gigs: upcoming_count(gigs, today),
        }
    }
}

/// Number of gigs dated today or later.
pub fn upcoming_count(gigs: &[GigRecord], today: NaiveDate) -> u32 {
    gigs.iter().filter(|gig| gig.date >= today).count() as u32
}

// =============================================================================
// Unit Tests
// =============================================================================
