//! # Money Module
//!
//! Provides the `Money` and `Percentage` types used by every fee calculation.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004                                      │
//! │                                                                         │
//! │  Splitting a fee three ways:                                            │
//! │    $1000.00 / 3 = $333.33 (×3 = $999.99)  → 1 cent nobody is paid      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    100000 cents / 3 = 33333 cents (×3 = 99999 cents)                   │
//! │    A musician is paid whole cents, and the remainder is visible        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Floats only appear at the boundary: [`Money::from_major`] when a caller
//! hands over a loosely typed amount, and [`Money::to_major`] for export.
//!
//! ## Usage
//! ```rust
//! use gigbook_core::money::{Money, Percentage};
//!
//! let fee = Money::from_cents(100_000); // $1000.00
//! let share = fee.split(3);             // $333.33
//! assert_eq!(share.cents(), 33_333);
//!
//! let bonus = fee.percent_of(Percentage::from_bps(1250)); // 12.5%
//! assert_eq!(bonus.cents(), 12_500);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: intermediate differences may dip below zero before
///   being clamped with [`Money::non_negative`]
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serializes as cents**: formatting to "$1,250.00" belongs to the caller
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  GigInput (f64) ──► Money::from_major ──► GigRecord                     │
/// │                                              │                          │
/// │                                              ▼                          │
/// │                                        calculate() ──► GigCalculation   │
/// │                                              │                          │
/// │                                              ▼                          │
/// │                 aggregate() ──► dashboard / analytics / export          │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use gigbook_core::money::Money;
    ///
    /// let fee = Money::from_cents(125_000); // $1250.00
    /// assert_eq!(fee.cents(), 125_000);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal amount (e.g. `333.335`) into cents.
    ///
    /// NaN and infinities become zero. Everything else is rounded half away
    /// from zero, so `0.005` becomes one cent.
    ///
    /// ```rust
    /// use gigbook_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(1250.0).cents(), 125_000);
    /// assert_eq!(Money::from_major(0.125).cents(), 13);
    /// assert_eq!(Money::from_major(f64::NAN).cents(), 0);
    /// ```
    pub fn from_major(amount: f64) -> Self {
        if !amount.is_finite() {
            return Money::zero();
        }
        // The epsilon keeps values like 1.005 (stored as 1.00499999...) from
        // rounding down.
        let scaled = amount * 100.0;
        let nudged = scaled + scaled.signum() * 1e-7;
        let cents = nudged.round();
        if cents >= i64::MAX as f64 {
            Money(i64::MAX)
        } else if cents <= i64::MIN as f64 {
            Money(i64::MIN)
        } else {
            Money(cents as i64)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns the value as a decimal number of major units.
    ///
    /// Only for export consumers that need plain JSON numbers.
    #[inline]
    pub fn to_major(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.saturating_abs())
    }

    /// Clamps negative values to zero.
    ///
    /// ```rust
    /// use gigbook_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(-500).non_negative(), Money::zero());
    /// assert_eq!(Money::from_cents(500).non_negative().cents(), 500);
    /// ```
    #[inline]
    pub const fn non_negative(self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            self
        }
    }

    /// Divides the amount into `parts` equal shares, rounded half up to the cent.
    ///
    /// `parts <= 0` yields zero rather than panicking.
    ///
    /// ## Example
    /// ```text
    /// $1000.00 split 4 ways → $250.00
    /// $1000.00 split 3 ways → $333.33  (333.333... rounds down)
    /// $0.05    split 2 ways → $0.03    (2.5 cents rounds up)
    /// ```
    pub fn split(&self, parts: i64) -> Money {
        if parts <= 0 {
            return Money::zero();
        }
        let amount = self.0 as i128;
        let parts = parts as i128;
        // Half away from zero: (2a + n) / 2n for a >= 0
        let rounded = if amount >= 0 {
            (2 * amount + parts) / (2 * parts)
        } else {
            -((2 * -amount + parts) / (2 * parts))
        };
        Money(rounded as i64)
    }

    /// Calculates `amount × rate`, rounded half up to the cent.
    ///
    /// ## Implementation
    /// Integer math in i128: `(amount * units + SCALE/2) / SCALE`, where
    /// `SCALE` is 100% in [`Percentage`] units. The rate is exact up to six
    /// decimals of a percent, so the only rounding is this final one.
    ///
    /// ```rust
    /// use gigbook_core::money::{Money, Percentage};
    ///
    /// let fee = Money::from_cents(33_333);          // $333.33
    /// let bonus = fee.percent_of(Percentage::from_bps(1000)); // 10%
    /// assert_eq!(bonus.cents(), 3_333);             // $33.333 → $33.33
    ///
    /// let fee = Money::from_cents(100_000);         // $1000.00
    /// let bonus = fee.percent_of(Percentage::from_percent(33.333));
    /// assert_eq!(bonus.cents(), 33_333);
    /// ```
    pub fn percent_of(&self, rate: Percentage) -> Money {
        let amount = self.0 as i128;
        let scale = Percentage::SCALE as i128;
        let product = amount * rate.units() as i128;
        let rounded = if product >= 0 {
            (product + scale / 2) / scale
        } else {
            -((-product + scale / 2) / scale)
        };
        // |rate| <= 100%, so the result never exceeds |amount|
        Money(rounded as i64)
    }

    /// Multiplies money by a count (musicians, gigs), saturating at the i64 range.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money in a human-readable format.
///
/// ## Note
/// This is for logs and debugging. Locale-aware rendering belongs to the
/// presentation layer.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().unsigned_abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// Arithmetic saturates instead of overflowing: a dashboard total over
// absurd input pins at the i64 bound rather than panicking or wrapping.

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Percentage
// =============================================================================

/// A percentage stored in millionths of a percent.
///
/// ## Why Not Basis Points?
/// Basis points (0.01%) would quietly turn a 33.333% bonus into 33.33%.
/// At a millionth of a percent, any rate a manager types is held exactly,
/// and 100% is `100_000_000`, well inside a u32.
/// Manager percentage bonuses are always a percentage of the performance fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Percentage(u32);

impl Percentage {
    /// Units per whole percent.
    pub const UNITS_PER_PERCENT: u32 = 1_000_000;

    /// 100% in units.
    pub const SCALE: u32 = 100 * Self::UNITS_PER_PERCENT;

    /// Creates a percentage from basis points, clamped to 100%.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        if bps >= 10_000 {
            Percentage(Self::SCALE)
        } else {
            Percentage(bps * (Self::UNITS_PER_PERCENT / 100))
        }
    }

    /// Creates a percentage from a 0-100 value.
    ///
    /// NaN becomes 0%; anything outside 0-100 is clamped. Precision beyond
    /// six decimals of a percent is rounded away.
    ///
    /// ```rust
    /// use gigbook_core::money::Percentage;
    ///
    /// assert_eq!(Percentage::from_percent(12.5), Percentage::from_bps(1250));
    /// assert_eq!(Percentage::from_percent(33.333).units(), 33_333_000);
    /// assert_eq!(Percentage::from_percent(250.0).units(), Percentage::SCALE);
    /// assert_eq!(Percentage::from_percent(f64::NAN).units(), 0);
    /// ```
    pub fn from_percent(pct: f64) -> Self {
        if pct.is_nan() || pct <= 0.0 {
            return Percentage(0);
        }
        if pct >= 100.0 {
            return Percentage(Self::SCALE);
        }
        Percentage((pct * Self::UNITS_PER_PERCENT as f64).round() as u32)
    }

    /// Returns the raw rate in millionths of a percent.
    #[inline]
    pub const fn units(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percent(&self) -> f64 {
        self.0 as f64 / Self::UNITS_PER_PERCENT as f64
    }

    /// Zero percent.
    #[inline]
    pub const fn zero() -> Self {
        Percentage(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Percentage::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_major_rounds_half_up() {
        assert_eq!(Money::from_major(333.33).cents(), 33_333);
        assert_eq!(Money::from_major(1.005).cents(), 101);
        assert_eq!(Money::from_major(2.675).cents(), 268);
        assert_eq!(Money::from_major(-5.5).cents(), -550);
        assert_eq!(Money::from_major(0.0).cents(), 0);
    }

    #[test]
    fn test_from_major_non_finite_is_zero() {
        assert!(Money::from_major(f64::NAN).is_zero());
        assert!(Money::from_major(f64::INFINITY).is_zero());
        assert!(Money::from_major(f64::NEG_INFINITY).is_zero());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        let tripled: Money = a * 3;
        assert_eq!(tripled.cents(), 3000);

        let total: Money = [a, b, b].iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_split_even_and_uneven() {
        let fee = Money::from_cents(100_000);
        assert_eq!(fee.split(4).cents(), 25_000);
        assert_eq!(fee.split(3).cents(), 33_333);
        assert_eq!(Money::from_cents(5).split(2).cents(), 3);
        assert_eq!(Money::from_cents(200).split(3).cents(), 67);
    }

    #[test]
    fn test_split_by_zero_is_zero() {
        assert!(Money::from_cents(100_000).split(0).is_zero());
        assert!(Money::from_cents(100_000).split(-2).is_zero());
    }

    /// $1000.00 / 3 × 3 loses a cent; this is the per-musician quantization
    #[test]
    fn test_split_precision_loss_documented() {
        let fee = Money::from_cents(100_000);
        let reconstructed: Money = fee.split(3) * 3;
        assert_eq!(reconstructed.cents(), 99_999);
        assert_eq!((fee - reconstructed).cents(), 1);
    }

    #[test]
    fn test_percent_of() {
        let fee = Money::from_cents(100_000);
        assert_eq!(fee.percent_of(Percentage::from_bps(1000)).cents(), 10_000);
        assert_eq!(fee.percent_of(Percentage::from_bps(1250)).cents(), 12_500);
        assert_eq!(fee.percent_of(Percentage::zero()).cents(), 0);
        // $10.00 at 8.25% = $0.825 → $0.83
        assert_eq!(Money::from_cents(1000).percent_of(Percentage::from_bps(825)).cents(), 83);
    }

    #[test]
    fn test_percent_of_keeps_sub_basis_point_rates() {
        let fee = Money::from_cents(100_000);
        // 33.333% of $1000.00 is $333.33 exactly, not 33.33%'s $333.30
        assert_eq!(fee.percent_of(Percentage::from_percent(33.333)).cents(), 33_333);
        // 7.4999% of $100.00 = $7.4999 → $7.50
        let fee = Money::from_cents(10_000);
        assert_eq!(fee.percent_of(Percentage::from_percent(7.4999)).cents(), 750);
        assert_eq!(fee.percent_of(Percentage::from_percent(0.0001)).cents(), 0);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let max = Money::from_cents(i64::MAX);
        assert_eq!((max + Money::from_cents(1)).cents(), i64::MAX);
        assert_eq!((Money::from_cents(i64::MIN) - Money::from_cents(1)).cents(), i64::MIN);
        assert_eq!((max * 3i64).cents(), i64::MAX);
        assert_eq!(max.multiply_quantity(99).cents(), i64::MAX);

        let mut total = max;
        total += max;
        assert_eq!(total.cents(), i64::MAX);

        let summed: Money = [max, max, max].iter().sum();
        assert_eq!(summed.cents(), i64::MAX);
        assert_eq!(format!("{}", Money::from_cents(i64::MIN)).chars().next(), Some('-'));
    }

    #[test]
    fn test_non_negative() {
        assert!(Money::from_cents(-1).non_negative().is_zero());
        assert_eq!(Money::from_cents(42).non_negative().cents(), 42);
    }

    #[test]
    fn test_percentage_clamps() {
        assert_eq!(Percentage::from_bps(20_000).units(), Percentage::SCALE);
        assert_eq!(Percentage::from_percent(-5.0).units(), 0);
        assert_eq!(Percentage::from_percent(100.0).units(), Percentage::SCALE);
        assert_eq!(Percentage::from_percent(f64::INFINITY).units(), Percentage::SCALE);
        assert!((Percentage::from_bps(825).percent() - 8.25).abs() < 1e-9);
        assert!((Percentage::from_percent(33.333).percent() - 33.333).abs() < 1e-9);
    }
}
