//! # Domain Types
//!
//! Core domain types used throughout Gigbook.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐  sanitize   ┌─────────────────┐                   │
//! │  │    GigInput     │ ──────────► │    GigRecord    │                   │
//! │  │  ─────────────  │             │  ─────────────  │                   │
//! │  │  camelCase JSON │             │  Money fields   │                   │
//! │  │  Option<f64>    │             │  NaiveDate      │                   │
//! │  │  date strings   │             │  musicians >= 1 │                   │
//! │  └─────────────────┘             └────────┬────────┘                   │
//! │                                           │                             │
//! │  ┌─────────────────┐   ┌─────────────────┐│                            │
//! │  │  ManagerBonus   │   │    BonusType    ││ calculate()                │
//! │  │  Fixed(Money)   │   │  Fixed          │▼                            │
//! │  │  Percentage(%)  │   │  Percentage     │ GigCalculation              │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `GigRecord` is owned by the persistence layer; the engine only reads it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{Money, Percentage};
use crate::UNKNOWN_BAND;

// =============================================================================
// Manager Bonus
// =============================================================================

/// How the manager bonus amount is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BonusType {
    /// A flat amount on top of the manager's split.
    #[default]
    Fixed,
    /// A percentage (0-100) of the performance fee.
    Percentage,
}

impl std::fmt::Display for BonusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BonusType::Fixed => write!(f, "fixed"),
            BonusType::Percentage => write!(f, "percentage"),
        }
    }
}

impl std::str::FromStr for BonusType {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fixed" | "" => Ok(BonusType::Fixed),
            "percentage" | "percent" | "%" => Ok(BonusType::Percentage),
            other => Err(crate::error::ValidationError::InvalidFormat {
                field: "managerBonusType".to_string(),
                reason: format!("unknown bonus type '{}', expected fixed or percentage", other),
            }),
        }
    }
}

/// The manager bonus with its amount already typed by kind.
///
/// A percentage bonus is always a percentage of the performance fee,
/// never of the technical fee or the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", content = "amount", rename_all = "snake_case")]
pub enum ManagerBonus {
    Fixed(Money),
    Percentage(Percentage),
}

impl ManagerBonus {
    /// Returns the bonus kind.
    pub fn kind(&self) -> BonusType {
        match self {
            ManagerBonus::Fixed(_) => BonusType::Fixed,
            ManagerBonus::Percentage(_) => BonusType::Percentage,
        }
    }

    /// Resolves the bonus to an amount for the given performance fee.
    pub fn resolve(&self, performance_fee: Money) -> Money {
        match self {
            ManagerBonus::Fixed(amount) => amount.non_negative(),
            ManagerBonus::Percentage(rate) => performance_fee.non_negative().percent_of(*rate),
        }
    }
}

impl Default for ManagerBonus {
    fn default() -> Self {
        ManagerBonus::Fixed(Money::zero())
    }
}

// =============================================================================
// Gig Input (raw)
// =============================================================================

/// A gig exactly as a caller hands it over: camelCase JSON, loosely typed.
///
/// ## Example
/// ```json
/// {
///   "id": "clx01",
///   "date": "2024-06-14T19:30:00.000Z",
///   "performers": "The Blue Notes",
///   "numberOfMusicians": 4,
///   "performanceFee": 1000,
///   "technicalFee": 200,
///   "managerBonusType": "fixed",
///   "managerBonusAmount": 50,
///   "paymentReceived": false
/// }
/// ```
///
/// Missing numbers default to zero, missing claim/distribution flags to
/// `true`, everything else to `false`/empty. See [`GigRecord::from_input`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GigInput {
    pub id: String,
    pub date: Option<String>,
    pub booking_date: Option<String>,
    pub performers: Option<String>,
    pub venue: Option<String>,
    pub number_of_musicians: Option<f64>,
    pub manager_participates: Option<bool>,
    pub performance_fee: Option<f64>,
    pub technical_fee: Option<f64>,
    pub manager_bonus_type: Option<String>,
    pub manager_bonus_amount: Option<f64>,
    pub claim_performance_fee: Option<bool>,
    pub claim_technical_fee: Option<bool>,
    pub technical_fee_claim_amount: Option<f64>,
    pub advance_received_by_manager: Option<f64>,
    pub advance_to_musicians: Option<f64>,
    pub payment_received: Option<bool>,
    pub payment_received_date: Option<String>,
    pub band_paid: Option<bool>,
    pub band_paid_date: Option<String>,
    pub manager_handles_distribution: Option<bool>,
    pub is_charity: Option<bool>,
    pub notes: Option<String>,
}

// =============================================================================
// Gig Record (sanitized)
// =============================================================================

/// A single booked performance with its fees and payment state.
///
/// Every money field is non-negative and `number_of_musicians` is at least 1
/// when built through [`GigRecord::from_input`]. The calculator still clamps
/// defensively, since fields are public.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct GigRecord {
    /// Opaque identifier from the persistence layer.
    pub id: String,

    /// Performance date.
    #[ts(as = "String")]
    pub date: NaiveDate,

    /// When the gig was booked.
    #[ts(as = "Option<String>")]
    pub booking_date: Option<NaiveDate>,

    /// Band / performers name. May be empty; see [`GigRecord::band_key`].
    pub performers: String,

    pub venue: Option<String>,

    /// Musicians on stage, manager included when they participate.
    pub number_of_musicians: u32,

    pub manager_participates: bool,

    /// Base fee for playing, split among musicians.
    pub performance_fee: Money,

    /// Equipment/sound fee, not split.
    pub technical_fee: Money,

    pub manager_bonus: ManagerBonus,

    /// Manager takes a share of the performance fee.
    pub claim_performance_fee: bool,

    /// Manager takes (part of) the technical fee.
    pub claim_technical_fee: bool,

    /// Partial technical claim; `None` means the whole technical fee.
    pub technical_fee_claim_amount: Option<Money>,

    /// Advance paid by the client to the manager.
    pub advance_received_by_manager: Money,

    /// Advance paid by the manager to the other musicians.
    pub advance_to_musicians: Money,

    pub payment_received: bool,
    #[ts(as = "Option<String>")]
    pub payment_received_date: Option<NaiveDate>,

    pub band_paid: bool,
    #[ts(as = "Option<String>")]
    pub band_paid_date: Option<NaiveDate>,

    /// When false, a third party pays the band and the manager owes nothing
    /// for musician shares.
    pub manager_handles_distribution: bool,

    /// Zero-revenue performance: every monetary output is zero.
    pub is_charity: bool,

    pub notes: Option<String>,
}

impl GigRecord {
    /// Creates an unpaid, non-charity gig with no fees and a single musician.
    ///
    /// Both claim flags and `manager_handles_distribution` start as `true`,
    /// matching the defaults of [`GigInput`].
    pub fn new(id: impl Into<String>, date: NaiveDate) -> Self {
        GigRecord {
            id: id.into(),
            date,
            booking_date: None,
            performers: String::new(),
            venue: None,
            number_of_musicians: 1,
            manager_participates: true,
            performance_fee: Money::zero(),
            technical_fee: Money::zero(),
            manager_bonus: ManagerBonus::default(),
            claim_performance_fee: true,
            claim_technical_fee: true,
            technical_fee_claim_amount: None,
            advance_received_by_manager: Money::zero(),
            advance_to_musicians: Money::zero(),
            payment_received: false,
            payment_received_date: None,
            band_paid: false,
            band_paid_date: None,
            manager_handles_distribution: true,
            is_charity: false,
            notes: None,
        }
    }

    /// Grouping key for per-band totals.
    pub fn band_key(&self) -> &str {
        let trimmed = self.performers.trim();
        if trimmed.is_empty() {
            UNKNOWN_BAND
        } else {
            trimmed
        }
    }

    /// Both the client has paid and the band has been paid.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.payment_received && self.band_paid
    }

    /// Performance fee plus technical fee (the bonus excluded).
    #[inline]
    pub fn gross_fees(&self) -> Money {
        self.performance_fee.non_negative() + self.technical_fee.non_negative()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()
    }

    #[test]
    fn test_bonus_type_parsing() {
        assert_eq!("fixed".parse::<BonusType>().unwrap(), BonusType::Fixed);
        assert_eq!("Percentage".parse::<BonusType>().unwrap(), BonusType::Percentage);
        assert_eq!("".parse::<BonusType>().unwrap(), BonusType::Fixed);
        assert!("tip".parse::<BonusType>().is_err());
    }

    #[test]
    fn test_manager_bonus_resolve() {
        let fee = Money::from_cents(100_000);
        assert_eq!(ManagerBonus::Fixed(Money::from_cents(5_000)).resolve(fee).cents(), 5_000);
        assert_eq!(
            ManagerBonus::Percentage(Percentage::from_bps(1000)).resolve(fee).cents(),
            10_000
        );
        assert!(ManagerBonus::Fixed(Money::from_cents(-1)).resolve(fee).is_zero());
    }

    #[test]
    fn test_band_key_defaults_to_unknown() {
        let mut gig = GigRecord::new("g1", date());
        assert_eq!(gig.band_key(), "Unknown Band");
        gig.performers = "  The Blue Notes ".to_string();
        assert_eq!(gig.band_key(), "The Blue Notes");
    }

    #[test]
    fn test_is_settled() {
        let mut gig = GigRecord::new("g1", date());
        assert!(!gig.is_settled());
        gig.payment_received = true;
        assert!(!gig.is_settled());
        gig.band_paid = true;
        assert!(gig.is_settled());
    }

    #[test]
    fn test_gig_input_deserializes_camel_case() {
        let json = r#"{
            "id": "clx01",
            "date": "2024-06-14",
            "performers": "The Blue Notes",
            "numberOfMusicians": 4,
            "performanceFee": 1000,
            "managerBonusType": "percentage",
            "managerBonusAmount": 10,
            "isCharity": false
        }"#;
        let input: GigInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.id, "clx01");
        assert_eq!(input.number_of_musicians, Some(4.0));
        assert_eq!(input.performance_fee, Some(1000.0));
        assert_eq!(input.manager_bonus_type.as_deref(), Some("percentage"));
        assert_eq!(input.technical_fee, None);
        assert_eq!(input.is_charity, Some(false));
    }

    #[test]
    fn test_manager_bonus_serialization() {
        let bonus = ManagerBonus::Fixed(Money::from_cents(5_000));
        let json = serde_json::to_string(&bonus).unwrap();
        assert_eq!(json, r#"{"type":"fixed","amount":5000}"#);
    }
}
