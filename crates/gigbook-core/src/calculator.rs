//! # Gig Financial Calculator
//!
//! Turns one gig's fee, claim and advance fields into a fixed-shape
//! earnings breakdown. Every consumer (gig cards, dashboard, analytics,
//! exports) gets its numbers from [`calculate`].
//!
//! ## Calculation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  is_charity? ──yes──► GigCalculation::zero()                            │
//! │      │ no                                                               │
//! │      ▼                                                                  │
//! │  bonus        = fixed amount | performance_fee × pct                    │
//! │  total        = performance_fee + technical_fee + bonus                 │
//! │  split        = claim_perf ? musicians : max(1, musicians - 1)          │
//! │  per_musician = performance_fee / split            (rounded to cent)    │
//! │  my_earnings  = perf_share + tech_share + bonus                         │
//! │  owed_band    = max(0, (musicians - 1) × per_musician - advance)        │
//! │  owed_tech    = technical_fee - tech_share                              │
//! │  owed_others  = owed_band + owed_tech                                   │
//! │  received     = paid ? my_earnings : min(advance_in, my_earnings)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rounding
//! Amounts are integer cents. The percentage bonus and the per-musician
//! share are the only values that need rounding, each rounded once half up.
//! Every other output is an exact sum or multiple of those.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::GigRecord;

// =============================================================================
// Gig Calculation
// =============================================================================

/// Earnings breakdown for a single gig.
///
/// Always derived, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct GigCalculation {
    /// Bonus amount after resolving a percentage against the performance fee.
    pub actual_manager_bonus: Money,

    /// Everything the client pays: performance + technical + bonus.
    pub total_received: Money,

    /// One musician's share of the performance fee.
    pub amount_per_musician: Money,

    /// What the manager keeps.
    pub my_earnings: Money,

    /// Net musician shares plus the unclaimed technical fee.
    pub amount_owed_to_others: Money,

    /// Musician shares still to pay after `advance_to_musicians`.
    pub amount_owed_to_band: Money,

    /// Part of the technical fee held for whoever provided the equipment.
    pub amount_owed_for_technical: Money,

    /// Share of `my_earnings` already in hand.
    pub my_earnings_already_received: Money,

    /// Share of `my_earnings` not yet received.
    pub my_earnings_still_owed: Money,

    /// Denominator used for the performance fee split (0 for charity).
    pub musicians_in_split: u32,
}

impl GigCalculation {
    /// The all-zero result used for charity gigs.
    pub const fn zero() -> Self {
        GigCalculation {
            actual_manager_bonus: Money::zero(),
            total_received: Money::zero(),
            amount_per_musician: Money::zero(),
            my_earnings: Money::zero(),
            amount_owed_to_others: Money::zero(),
            amount_owed_to_band: Money::zero(),
            amount_owed_for_technical: Money::zero(),
            my_earnings_already_received: Money::zero(),
            my_earnings_still_owed: Money::zero(),
            musicians_in_split: 0,
        }
    }
}

// =============================================================================
// Calculation
// =============================================================================

/// Calculates the earnings breakdown for one gig.
///
/// Pure: same record in, same breakdown out. Never panics; negative money
/// and a zero musician count are clamped before use.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use gigbook_core::calculator::calculate;
/// use gigbook_core::money::Money;
/// use gigbook_core::types::{GigRecord, ManagerBonus};
///
/// let gig = GigRecord {
///     number_of_musicians: 4,
///     performance_fee: Money::from_cents(100_000),
///     technical_fee: Money::from_cents(20_000),
///     manager_bonus: ManagerBonus::Fixed(Money::from_cents(5_000)),
///     ..GigRecord::new("g1", NaiveDate::from_ymd_opt(2024, 6, 14).unwrap())
/// };
///
/// let calc = calculate(&gig);
/// assert_eq!(calc.amount_per_musician.cents(), 25_000);
/// assert_eq!(calc.total_received.cents(), 125_000);
/// assert_eq!(calc.my_earnings.cents(), 50_000);
/// assert_eq!(calc.amount_owed_to_others.cents(), 75_000);
/// ```
pub fn calculate(gig: &GigRecord) -> GigCalculation {
    if gig.is_charity {
        return GigCalculation::zero();
    }

    let performance_fee = gig.performance_fee.non_negative();
    let technical_fee = gig.technical_fee.non_negative();
    let musicians = gig.number_of_musicians.max(1);

    let actual_manager_bonus = gig.manager_bonus.resolve(performance_fee);
    let total_received = performance_fee + technical_fee + actual_manager_bonus;

    // Not claiming removes the manager from the denominator
    let musicians_in_split = if gig.claim_performance_fee {
        musicians
    } else {
        (musicians - 1).max(1)
    };
    let amount_per_musician = performance_fee.split(musicians_in_split as i64);

    let perf_share = if gig.claim_performance_fee {
        amount_per_musician
    } else {
        Money::zero()
    };

    let tech_share = if !gig.claim_technical_fee {
        Money::zero()
    } else {
        match gig.technical_fee_claim_amount {
            None => technical_fee,
            Some(claim) => claim.non_negative().min(technical_fee),
        }
    };

    let my_earnings = perf_share + tech_share + actual_manager_bonus;

    let gross_owed_to_band = if musicians > 1 {
        amount_per_musician.multiply_quantity((musicians - 1) as i64)
    } else {
        Money::zero()
    };
    let amount_owed_to_band =
        (gross_owed_to_band - gig.advance_to_musicians.non_negative()).non_negative();

    // tech_share is already clamped to technical_fee, so this is never negative
    let amount_owed_for_technical = technical_fee - tech_share;

    let amount_owed_to_others = amount_owed_to_band + amount_owed_for_technical;

    let my_earnings_already_received = if gig.payment_received {
        my_earnings
    } else {
        gig.advance_received_by_manager.non_negative().min(my_earnings)
    };
    let my_earnings_still_owed = my_earnings - my_earnings_already_received;

    GigCalculation {
        actual_manager_bonus,
        total_received,
        amount_per_musician,
        my_earnings,
        amount_owed_to_others,
        amount_owed_to_band,
        amount_owed_for_technical,
        my_earnings_already_received,
        my_earnings_still_owed,
        musicians_in_split,
    }
}

/// A gig paired with its calculation, so callers compute once and reuse.
#[derive(Debug, Clone, Copy)]
pub struct CalculatedGig<'a> {
    pub gig: &'a GigRecord,
    pub calc: GigCalculation,
}

impl<'a> CalculatedGig<'a> {
    pub fn new(gig: &'a GigRecord) -> Self {
        CalculatedGig {
            gig,
            calc: calculate(gig),
        }
    }
}

/// Calculates every gig in order.
pub fn calculate_all(gigs: &[GigRecord]) -> Vec<CalculatedGig<'_>> {
    gigs.iter().map(CalculatedGig::new).collect()
}

/// Finds a gig by id and calculates it, for single-gig cards.
///
/// ## Errors
/// `CoreError::GigNotFound` when no gig has that id.
pub fn find_and_calculate<'a>(gigs: &'a [GigRecord], id: &str) -> CoreResult<CalculatedGig<'a>> {
    gigs.iter()
        .find(|gig| gig.id == id)
        .map(CalculatedGig::new)
        .ok_or_else(|| CoreError::GigNotFound(id.to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================
