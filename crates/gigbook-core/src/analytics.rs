//! # Analytics Module
//!
//! Monthly buckets and seasonal patterns for the analytics page.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  gigs ──► bucket by YYYY-MM ──► newest 12 ──► ascending                 │
//! │                                      │                                  │
//! │                                      ▼                                  │
//! │                      re-bucket by calendar month (Jan..Dec)             │
//! │                      avg_gigs   = gigs / years observed                 │
//! │                      avg_income = income / years observed               │
//! │                                      │                                  │
//! │                                      ▼                                  │
//! │                      busiest = max avg_gigs, quietest = min             │
//! │                      (first month in Jan..Dec order wins ties)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Month};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::GigRecord;
use crate::MONTHS_RETAINED;

// =============================================================================
// Month Key
// =============================================================================

/// A calendar month of a specific year, serialized as `"YYYY-MM"`.
///
/// Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    /// Month key for a gig date.
    pub fn of(date: chrono::NaiveDate) -> Self {
        MonthKey {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidFormat {
            field: "month".to_string(),
            reason: format!("'{}' is not YYYY-MM", s),
        };

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }

        Ok(MonthKey { year, month })
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Monthly Breakdown
// =============================================================================

/// Gig activity for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBucket {
    #[ts(as = "String")]
    pub month: MonthKey,

    /// Every gig in the month, charity and unpaid included.
    pub count: u32,

    pub charity_count: u32,

    /// Gigs with `payment_received`.
    pub paid_gigs: u32,

    /// Performance + technical fees of paid, non-charity gigs.
    pub total: Money,
}

impl MonthlyBucket {
    fn empty(month: MonthKey) -> Self {
        MonthlyBucket {
            month,
            count: 0,
            charity_count: 0,
            paid_gigs: 0,
            total: Money::zero(),
        }
    }
}

/// Buckets gigs by month of performance date.
///
/// Only the most recent [`MONTHS_RETAINED`] months that have gigs are kept,
/// returned oldest first.
pub fn monthly_breakdown(gigs: &[GigRecord]) -> Vec<MonthlyBucket> {
    let mut buckets: BTreeMap<MonthKey, MonthlyBucket> = BTreeMap::new();

    for gig in gigs {
        let key = MonthKey::of(gig.date);
        let bucket = buckets.entry(key).or_insert_with(|| MonthlyBucket::empty(key));

        bucket.count += 1;
        if gig.is_charity {
            bucket.charity_count += 1;
        }
        if gig.payment_received {
            bucket.paid_gigs += 1;
            if !gig.is_charity {
                bucket.total += gig.gross_fees();
            }
        }
    }

    // BTreeMap iterates ascending: newest N from the back, then back in order
    let mut newest: Vec<MonthlyBucket> = buckets.into_values().rev().take(MONTHS_RETAINED).collect();
    newest.reverse();
    newest
}

/// The month with the largest paid total; the earliest wins ties.
pub fn highest_month(buckets: &[MonthlyBucket]) -> Option<&MonthlyBucket> {
    let mut best: Option<&MonthlyBucket> = None;
    for bucket in buckets {
        match best {
            Some(current) if bucket.total <= current.total => {}
            _ => best = Some(bucket),
        }
    }
    best
}

// =============================================================================
// Seasonal Patterns
// =============================================================================

/// Average activity for one calendar month across the years observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalPattern {
    /// Calendar month, 1 = January.
    pub month: u32,

    pub month_name: String,

    /// Gigs per year in this month, rounded to a whole number.
    pub avg_gigs: u32,

    pub avg_income: Money,

    /// Distinct years with at least one gig in this calendar month.
    pub years_observed: u32,
}

/// Seasonal patterns plus busiest and quietest months.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalSummary {
    /// One entry per calendar month present, January first.
    pub patterns: Vec<SeasonalPattern>,
    pub busiest: Option<SeasonalPattern>,
    pub quietest: Option<SeasonalPattern>,
}

#[derive(Default)]
struct SeasonAccumulator {
    gigs: u32,
    income: Money,
    years: u32,
}

/// Re-buckets monthly data by calendar month.
///
/// Ties for busiest/quietest go to the earlier calendar month. That order is
/// an implementation detail, not a contract.
pub fn seasonal_patterns(buckets: &[MonthlyBucket]) -> SeasonalSummary {
    let mut by_month: BTreeMap<u32, SeasonAccumulator> = BTreeMap::new();

    // Buckets are unique per (year, month), so each one is one more year
    for bucket in buckets {
        let acc = by_month.entry(bucket.month.month).or_default();
        acc.gigs += bucket.count;
        acc.income += bucket.total;
        acc.years += 1;
    }

    let patterns: Vec<SeasonalPattern> = by_month
        .into_iter()
        .map(|(month, acc)| SeasonalPattern {
            month,
            month_name: month_name(month),
            avg_gigs: rounded_average(acc.gigs, acc.years),
            avg_income: acc.income.split(acc.years as i64),
            years_observed: acc.years,
        })
        .collect();

    let mut busiest: Option<&SeasonalPattern> = None;
    let mut quietest: Option<&SeasonalPattern> = None;
    for pattern in &patterns {
        if busiest.map_or(true, |b| pattern.avg_gigs > b.avg_gigs) {
            busiest = Some(pattern);
        }
        if quietest.map_or(true, |q| pattern.avg_gigs < q.avg_gigs) {
            quietest = Some(pattern);
        }
    }

    SeasonalSummary {
        busiest: busiest.cloned(),
        quietest: quietest.cloned(),
        patterns,
    }
}

/// Half-up integer average; zero when there is nothing to average.
fn rounded_average(total: u32, count: u32) -> u32 {
    if count == 0 {
        return 0;
    }
    let total = total as u64;
    let count = count as u64;
    ((2 * total + count) / (2 * count)) as u32
}

fn month_name(month: u32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name().to_string())
        .unwrap_or_else(|| format!("Month {}", month))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn gig(id: &str, y: i32, m: u32, d: u32) -> GigRecord {
        GigRecord {
            performance_fee: Money::from_cents(50_000),
            technical_fee: Money::from_cents(10_000),
            ..GigRecord::new(id, NaiveDate::from_ymd_opt(y, m, d).unwrap())
        }
    }

    fn paid(mut g: GigRecord) -> GigRecord {
        g.payment_received = true;
        g
    }

    #[test]
    fn test_month_key_format_and_parse() {
        let key = MonthKey { year: 2024, month: 3 };
        assert_eq!(key.to_string(), "2024-03");
        assert_eq!("2024-03".parse::<MonthKey>().unwrap(), key);
        assert!("2024-13".parse::<MonthKey>().is_err());
        assert!("March".parse::<MonthKey>().is_err());
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"2024-03\"");
    }

    #[test]
    fn test_monthly_counts_and_paid_totals() {
        let gigs = vec![
            paid(gig("a", 2024, 3, 1)),
            gig("b", 2024, 3, 15),
            GigRecord { is_charity: true, ..paid(gig("c", 2024, 3, 20)) },
            paid(gig("d", 2024, 4, 2)),
        ];
        let months = monthly_breakdown(&gigs);
        assert_eq!(months.len(), 2);

        let march = &months[0];
        assert_eq!(march.month.to_string(), "2024-03");
        assert_eq!(march.count, 3);
        assert_eq!(march.charity_count, 1);
        assert_eq!(march.paid_gigs, 2);
        // Unpaid and charity gigs add nothing to the total
        assert_eq!(march.total.cents(), 60_000);

        assert_eq!(months[1].month.to_string(), "2024-04");
        assert_eq!(months[1].total.cents(), 60_000);
    }

    #[test]
    fn test_monthly_keeps_newest_twelve_ascending() {
        let mut gigs = Vec::new();
        for i in 0..15 {
            let year = 2023 + (i / 12) as i32;
            let month = (i % 12) as u32 + 1;
            gigs.push(gig(&format!("g{}", i), year, month, 10));
        }
        let months = monthly_breakdown(&gigs);
        assert_eq!(months.len(), 12);
        assert_eq!(months.first().unwrap().month.to_string(), "2023-04");
        assert_eq!(months.last().unwrap().month.to_string(), "2024-03");
    }

    #[test]
    fn test_highest_month_first_wins_ties() {
        let gigs = vec![
            paid(gig("a", 2024, 1, 1)),
            paid(gig("b", 2024, 2, 1)),
            gig("c", 2024, 3, 1),
        ];
        let months = monthly_breakdown(&gigs);
        assert_eq!(highest_month(&months).unwrap().month.to_string(), "2024-01");
        assert!(highest_month(&[]).is_none());
    }

    #[test]
    fn test_seasonal_averages_across_years() {
        let gigs = vec![
            paid(gig("a", 2023, 12, 1)),
            paid(gig("b", 2023, 12, 8)),
            paid(gig("c", 2023, 12, 15)),
            paid(gig("d", 2024, 12, 1)),
            gig("e", 2024, 6, 1),
        ];
        let months = monthly_breakdown(&gigs);
        let summary = seasonal_patterns(&months);

        assert_eq!(summary.patterns.len(), 2);
        let june = &summary.patterns[0];
        assert_eq!(june.month_name, "June");
        assert_eq!(june.avg_gigs, 1);
        assert_eq!(june.years_observed, 1);
        assert!(june.avg_income.is_zero());

        let december = &summary.patterns[1];
        assert_eq!(december.years_observed, 2);
        // 4 gigs over 2 years
        assert_eq!(december.avg_gigs, 2);
        // $2400.00 over 2 years
        assert_eq!(december.avg_income.cents(), 120_000);

        assert_eq!(summary.busiest.unwrap().month, 12);
        assert_eq!(summary.quietest.unwrap().month, 6);
    }

    #[test]
    fn test_seasonal_ties_go_to_earlier_month() {
        let gigs = vec![gig("a", 2024, 5, 1), gig("b", 2024, 2, 1), gig("c", 2024, 9, 1)];
        let summary = seasonal_patterns(&monthly_breakdown(&gigs));
        assert_eq!(summary.busiest.as_ref().unwrap().month, 2);
        assert_eq!(summary.quietest.as_ref().unwrap().month, 2);
    }

    #[test]
    fn test_seasonal_empty() {
        let summary = seasonal_patterns(&[]);
        assert!(summary.patterns.is_empty());
        assert!(summary.busiest.is_none());
        assert!(summary.quietest.is_none());
    }

    #[test]
    fn test_rounded_average() {
        assert_eq!(rounded_average(0, 0), 0);
        assert_eq!(rounded_average(3, 2), 2);
        assert_eq!(rounded_average(5, 3), 2);
        assert_eq!(rounded_average(7, 2), 4);
    }
}
