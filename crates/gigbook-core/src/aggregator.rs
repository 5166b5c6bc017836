//! # Aggregation Engine
//!
//! Folds a user's gigs into the dashboard summary: totals, pending client
//! payments per band, what is still owed to the band, per-band drill-downs
//! and the monthly/seasonal analytics.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  &[GigRecord] ──► calculate() per gig ──┬──► scalar totals              │
//! │                                         ├──► pending_by_band            │
//! │                                         ├──► outstanding_to_band        │
//! │                                         ├──► per_band (desc received)   │
//! │                                         └──► monthly ──► seasonal       │
//! │                                                                         │
//! │  Recomputed from scratch on every call. No cache, no hidden state.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Received vs Pending
//! A paid gig counts all of `my_earnings` as received. An unpaid gig counts
//! the client advance (capped at `my_earnings`) as received and the rest as
//! pending. This all-or-nothing flip once `payment_received` is set is kept
//! as-is because historical reports depend on it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::analytics::{self, MonthlyBucket, SeasonalSummary};
use crate::calculator::{calculate_all, CalculatedGig};
use crate::money::Money;
use crate::types::GigRecord;

// =============================================================================
// Output Types
// =============================================================================

/// Outstanding client exposure for one band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PendingBand {
    pub band: String,
    /// Sum of `max(0, total_received - advance_received_by_manager)`.
    pub amount: Money,
    pub count: u32,
}

/// Per-band drill-down row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BandBreakdown {
    pub band: String,
    pub earnings: Money,
    pub gigs: u32,
    pub received: Money,
    pub pending: Money,
    /// Owed to others where the manager distributes and the band is unpaid.
    pub owed: Money,
    pub average_per_gig: Money,
}

/// Everything the dashboard and analytics pages show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSummary {
    pub total_gigs: u32,
    pub total_earnings: Money,
    pub total_earnings_received: Money,
    pub total_earnings_pending: Money,
    pub average_earnings_per_gig: Money,

    /// Gigs whose client has not paid yet. Charity gigs count with zero exposure.
    pub pending_client_payments: u32,
    /// Sum of `pending_by_band` amounts.
    pub pending_client_amount: Money,
    pub outstanding_to_band: Money,

    /// Descending by amount.
    pub pending_by_band: Vec<PendingBand>,
    /// Descending by received.
    pub per_band: Vec<BandBreakdown>,
    pub best_band: Option<String>,

    /// Newest twelve months, oldest first.
    pub monthly: Vec<MonthlyBucket>,
    pub highest_month: Option<MonthlyBucket>,
    pub seasonal: SeasonalSummary,
}

impl AggregateSummary {
    /// Looks up a band's drill-down row.
    pub fn band(&self, name: &str) -> Option<&BandBreakdown> {
        self.per_band.iter().find(|b| b.band == name)
    }
}

// =============================================================================
// Ordered Grouping
// =============================================================================

/// Groups keyed by band in first-seen order.
///
/// Output order must never depend on hash iteration order.
struct OrderedGroups<T> {
    index: HashMap<String, usize>,
    entries: Vec<(String, T)>,
}

impl<T: Default> OrderedGroups<T> {
    fn new() -> Self {
        OrderedGroups {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    fn entry(&mut self, key: &str) -> &mut T {
        let idx = match self.index.get(key) {
            Some(&idx) => idx,
            None => {
                let idx = self.entries.len();
                self.index.insert(key.to_string(), idx);
                self.entries.push((key.to_string(), T::default()));
                idx
            }
        };
        &mut self.entries[idx].1
    }

    fn into_entries(self) -> Vec<(String, T)> {
        self.entries
    }
}

#[derive(Default)]
struct PendingAcc {
    amount: Money,
    count: u32,
}

#[derive(Default)]
struct BandAcc {
    earnings: Money,
    gigs: u32,
    received: Money,
    pending: Money,
    owed: Money,
}

// =============================================================================
// Aggregation
// =============================================================================

/// Whether a gig's `amount_owed_to_others` is still the manager's to pay.
///
/// Gigs where a third party pays the band never count, even when
/// `amount_owed_to_others` is nonzero.
#[inline]
pub fn counts_toward_outstanding(gig: &GigRecord) -> bool {
    gig.manager_handles_distribution && !gig.band_paid
}

/// Outstanding client exposure for an unpaid gig (not the manager's share).
#[inline]
pub fn client_exposure(entry: &CalculatedGig<'_>) -> Money {
    (entry.calc.total_received - entry.gig.advance_received_by_manager.non_negative()).non_negative()
}

/// Builds the dashboard summary for a list of gigs.
///
/// An empty list yields all-zero totals and `None` for every "best" pointer.
///
/// ## Example
/// ```rust
/// use gigbook_core::aggregator::aggregate;
///
/// let summary = aggregate(&[]);
/// assert_eq!(summary.total_gigs, 0);
/// assert!(summary.total_earnings.is_zero());
/// assert!(summary.best_band.is_none());
/// assert!(summary.highest_month.is_none());
/// ```
pub fn aggregate(gigs: &[GigRecord]) -> AggregateSummary {
    let calculated = calculate_all(gigs);

    let mut total_earnings = Money::zero();
    let mut total_received = Money::zero();
    let mut total_pending = Money::zero();
    let mut outstanding_to_band = Money::zero();
    let mut pending_client_payments = 0u32;

    let mut pending_groups: OrderedGroups<PendingAcc> = OrderedGroups::new();
    let mut band_groups: OrderedGroups<BandAcc> = OrderedGroups::new();

    for entry in &calculated {
        let gig = entry.gig;
        let calc = &entry.calc;
        let band = gig.band_key();

        total_earnings += calc.my_earnings;
        total_received += calc.my_earnings_already_received;
        total_pending += calc.my_earnings_still_owed;

        let owed = if counts_toward_outstanding(gig) {
            calc.amount_owed_to_others
        } else {
            Money::zero()
        };
        outstanding_to_band += owed;

        if !gig.payment_received {
            pending_client_payments += 1;
            let acc = pending_groups.entry(band);
            acc.amount += client_exposure(entry);
            acc.count += 1;
        }

        let acc = band_groups.entry(band);
        acc.earnings += calc.my_earnings;
        acc.gigs += 1;
        acc.received += calc.my_earnings_already_received;
        acc.pending += calc.my_earnings_still_owed;
        acc.owed += owed;
    }

    let mut pending_by_band: Vec<PendingBand> = pending_groups
        .into_entries()
        .into_iter()
        .map(|(band, acc)| PendingBand {
            band,
            amount: acc.amount,
            count: acc.count,
        })
        .collect();
    // Stable: equal amounts keep first-seen order
    pending_by_band.sort_by(|a, b| b.amount.cmp(&a.amount));

    let mut per_band: Vec<BandBreakdown> = band_groups
        .into_entries()
        .into_iter()
        .map(|(band, acc)| BandBreakdown {
            band,
            average_per_gig: acc.earnings.split(acc.gigs as i64),
            earnings: acc.earnings,
            gigs: acc.gigs,
            received: acc.received,
            pending: acc.pending,
            owed: acc.owed,
        })
        .collect();
    per_band.sort_by(|a, b| b.received.cmp(&a.received));

    let monthly = analytics::monthly_breakdown(gigs);
    let highest_month = analytics::highest_month(&monthly).cloned();
    let seasonal = analytics::seasonal_patterns(&monthly);

    let total_gigs = gigs.len() as u32;
    let pending_client_amount: Money = pending_by_band.iter().map(|p| p.amount).sum();

    debug!(
        gigs = total_gigs,
        bands = per_band.len(),
        months = monthly.len(),
        total_earnings = %total_earnings,
        "Aggregated gigs"
    );

    AggregateSummary {
        total_gigs,
        total_earnings,
        total_earnings_received: total_received,
        total_earnings_pending: total_pending,
        average_earnings_per_gig: total_earnings.split(total_gigs as i64),
        pending_client_payments,
        pending_client_amount,
        outstanding_to_band,
        best_band: per_band.first().map(|b| b.band.clone()),
        pending_by_band,
        per_band,
        monthly,
        highest_month,
        seasonal,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ManagerBonus;
    use chrono::NaiveDate;

    fn gig(id: &str, band: &str) -> GigRecord {
        GigRecord {
            performers: band.to_string(),
            number_of_musicians: 4,
            performance_fee: Money::from_cents(100_000),
            technical_fee: Money::from_cents(20_000),
            manager_bonus: ManagerBonus::Fixed(Money::from_cents(5_000)),
            ..GigRecord::new(id, NaiveDate::from_ymd_opt(2024, 6, 14).unwrap())
        }
    }

    #[test]
    fn test_empty_list() {
        let summary = aggregate(&[]);
        assert_eq!(summary.total_gigs, 0);
        assert!(summary.total_earnings.is_zero());
        assert!(summary.total_earnings_received.is_zero());
        assert!(summary.total_earnings_pending.is_zero());
        assert!(summary.average_earnings_per_gig.is_zero());
        assert!(summary.outstanding_to_band.is_zero());
        assert_eq!(summary.pending_client_payments, 0);
        assert!(summary.pending_by_band.is_empty());
        assert!(summary.per_band.is_empty());
        assert!(summary.best_band.is_none());
        assert!(summary.highest_month.is_none());
        assert!(summary.seasonal.busiest.is_none());
    }

    #[test]
    fn test_same_band_paid_and_unpaid() {
        let paid = GigRecord {
            payment_received: true,
            ..gig("a", "The Blue Notes")
        };
        let unpaid = GigRecord {
            advance_received_by_manager: Money::from_cents(40_000),
            ..gig("b", "The Blue Notes")
        };
        let summary = aggregate(&[paid, unpaid]);

        let band = summary.band("The Blue Notes").unwrap();
        assert_eq!(band.gigs, 2);
        assert_eq!(band.earnings.cents(), 100_000);
        assert_eq!(band.received.cents(), 50_000 + 40_000);
        assert_eq!(band.pending.cents(), 10_000);
        assert_eq!(band.average_per_gig.cents(), 50_000);

        assert_eq!(summary.total_earnings.cents(), 100_000);
        assert_eq!(summary.total_earnings_received.cents(), 90_000);
        assert_eq!(summary.total_earnings_pending.cents(), 10_000);
        assert_eq!(
            summary.total_earnings_received + summary.total_earnings_pending,
            summary.total_earnings
        );
    }

    #[test]
    fn test_pending_by_band_uses_client_exposure() {
        let gigs = vec![
            GigRecord {
                advance_received_by_manager: Money::from_cents(25_000),
                ..gig("a", "Alpha")
            },
            gig("b", "Beta"),
            GigRecord {
                payment_received: true,
                ..gig("c", "Beta")
            },
            GigRecord {
                performers: String::new(),
                advance_received_by_manager: Money::from_cents(500_000),
                ..gig("d", "")
            },
        ];
        let summary = aggregate(&gigs);

        assert_eq!(summary.pending_client_payments, 3);
        let amounts: Vec<(&str, i64, u32)> = summary
            .pending_by_band
            .iter()
            .map(|p| (p.band.as_str(), p.amount.cents(), p.count))
            .collect();
        assert_eq!(
            amounts,
            vec![("Beta", 125_000, 1), ("Alpha", 100_000, 1), ("Unknown Band", 0, 1)]
        );
        assert_eq!(summary.pending_client_amount.cents(), 225_000);
    }

    #[test]
    fn test_outstanding_skips_direct_pay_and_paid_band() {
        let gigs = vec![
            gig("a", "Alpha"),
            GigRecord {
                manager_handles_distribution: false,
                ..gig("b", "Alpha")
            },
            GigRecord {
                band_paid: true,
                ..gig("c", "Alpha")
            },
        ];
        let summary = aggregate(&gigs);
        assert_eq!(summary.outstanding_to_band.cents(), 75_000);
        assert_eq!(summary.band("Alpha").unwrap().owed.cents(), 75_000);
    }

    #[test]
    fn test_charity_counts_as_gig_without_money() {
        let gigs = vec![
            GigRecord {
                is_charity: true,
                ..gig("a", "Alpha")
            },
            gig("b", "Alpha"),
        ];
        let summary = aggregate(&gigs);
        assert_eq!(summary.total_gigs, 2);
        assert_eq!(summary.total_earnings.cents(), 50_000);
        assert_eq!(summary.average_earnings_per_gig.cents(), 25_000);
        assert_eq!(summary.outstanding_to_band.cents(), 75_000);

        // An unpaid charity gig is still a pending payment, worth nothing
        assert_eq!(summary.pending_client_payments, 2);
        assert_eq!(summary.pending_by_band[0].count, 2);
        assert_eq!(
            summary.pending_client_amount,
            aggregate(&gigs[1..]).pending_client_amount
        );
    }

    #[test]
    fn test_per_band_sorted_by_received() {
        let gigs = vec![
            gig("a", "Small"),
            GigRecord {
                payment_received: true,
                ..gig("b", "Big")
            },
            GigRecord {
                payment_received: true,
                performance_fee: Money::from_cents(10_000),
                ..gig("c", "Middle")
            },
        ];
        let summary = aggregate(&gigs);
        let order: Vec<&str> = summary.per_band.iter().map(|b| b.band.as_str()).collect();
        assert_eq!(order, vec!["Big", "Middle", "Small"]);
        assert_eq!(summary.best_band.as_deref(), Some("Big"));
    }

    #[test]
    fn test_band_ties_keep_first_seen_order() {
        let gigs = vec![gig("a", "Zeta"), gig("b", "Alpha")];
        let summary = aggregate(&gigs);
        let order: Vec<&str> = summary.per_band.iter().map(|b| b.band.as_str()).collect();
        assert_eq!(order, vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn test_aggregate_includes_analytics() {
        let gigs = vec![GigRecord {
            payment_received: true,
            ..gig("a", "Alpha")
        }];
        let summary = aggregate(&gigs);
        assert_eq!(summary.monthly.len(), 1);
        assert_eq!(summary.highest_month.as_ref().unwrap().total.cents(), 120_000);
        assert_eq!(summary.seasonal.busiest.as_ref().unwrap().month_name, "June");
    }

    #[test]
    fn test_aggregate_is_deterministic() {
        let gigs: Vec<GigRecord> = (0..20)
            .map(|i| GigRecord {
                payment_received: i % 3 == 0,
                ..gig(&format!("g{}", i), &format!("Band {}", i % 5))
            })
            .collect();
        let a = serde_json::to_string(&aggregate(&gigs)).unwrap();
        let b = serde_json::to_string(&aggregate(&gigs)).unwrap();
        assert_eq!(a, b);
    }
}
