//! # Validation Module
//!
//! Turns loosely typed [`GigInput`]s into [`GigRecord`]s.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Creation/update boundary (strict)                            │
//! │  ├── validate_gig_input → ValidationError                              │
//! │  └── Rejects bad numbers instead of repairing them                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Read boundary (lenient, THIS MODULE's sanitize)              │
//! │  ├── NaN → 0, negative money → 0, huge money → MAX_AMOUNT_CENTS        │
//! │  ├── musicians < 1 → 1, percentage → 0..=100                           │
//! │  ├── technicalFeeClaimAmount → 0..=technicalFee                        │
//! │  └── every correction logged with tracing::warn!                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Calculator                                                   │
//! │  └── clamps again, never fails                                         │
//! │                                                                         │
//! │  A dashboard render must never crash on one bad record.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use gigbook_core::types::{GigInput, GigRecord};
//!
//! let input = GigInput {
//!     id: "g1".into(),
//!     date: Some("2024-06-14".into()),
//!     performance_fee: Some(-250.0),
//!     ..Default::default()
//! };
//! let gig = GigRecord::from_input(&input).unwrap();
//! assert!(gig.performance_fee.is_zero());
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::warn;

use crate::error::ValidationError;
use crate::money::{Money, Percentage};
use crate::types::{BonusType, GigInput, GigRecord, ManagerBonus};
use crate::{MAX_AMOUNT_CENTS, MAX_MUSICIANS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Date Parsing
// =============================================================================

/// Parses a gig date from `YYYY-MM-DD` or an RFC 3339 timestamp.
///
/// Timestamps keep their calendar date as written (the offset is not applied),
/// so `2024-06-14T23:30:00-05:00` is still the 14th.
///
/// ```rust
/// use gigbook_core::validation::parse_gig_date;
///
/// assert!(parse_gig_date("date", "2024-06-14").is_ok());
/// assert!(parse_gig_date("date", "2024-06-14T19:30:00.000Z").is_ok());
/// assert!(parse_gig_date("date", "14/06/2024").is_err());
/// ```
pub fn parse_gig_date(field: &str, raw: &str) -> ValidationResult<NaiveDate> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_local().date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt.date());
    }

    Err(ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: format!("'{}' is not a YYYY-MM-DD date or RFC 3339 timestamp", raw),
    })
}

// =============================================================================
// Sanitization (lenient)
// =============================================================================

impl GigRecord {
    /// Builds a record from raw input, silently repairing bad numbers.
    ///
    /// Only fails when the performance date is missing or unparseable.
    pub fn from_input(input: &GigInput) -> ValidationResult<GigRecord> {
        sanitize(input)
    }
}

/// See [`GigRecord::from_input`].
pub fn sanitize(input: &GigInput) -> ValidationResult<GigRecord> {
    let id = input.id.as_str();

    let date = match input.date.as_deref() {
        Some(raw) => parse_gig_date("date", raw)?,
        None => {
            return Err(ValidationError::Required {
                field: "date".to_string(),
            })
        }
    };

    let performance_fee = sanitize_money(id, "performanceFee", input.performance_fee);
    let technical_fee = sanitize_money(id, "technicalFee", input.technical_fee);

    let bonus_type = match input.manager_bonus_type.as_deref() {
        Some(raw) => raw.parse().unwrap_or_else(|err| {
            warn!(gig_id = %id, %err, "Unknown bonus type, treating as fixed");
            BonusType::Fixed
        }),
        None => BonusType::Fixed,
    };
    let manager_bonus = match bonus_type {
        BonusType::Fixed => {
            ManagerBonus::Fixed(sanitize_money(id, "managerBonusAmount", input.manager_bonus_amount))
        }
        BonusType::Percentage => {
            ManagerBonus::Percentage(sanitize_percentage(id, input.manager_bonus_amount))
        }
    };

    let technical_fee_claim_amount = input.technical_fee_claim_amount.map(|raw| {
        let claim = sanitize_money(id, "technicalFeeClaimAmount", Some(raw));
        if claim > technical_fee {
            warn!(
                gig_id = %id,
                claim = %claim,
                technical_fee = %technical_fee,
                "Technical claim exceeds technical fee, clamped"
            );
            technical_fee
        } else {
            claim
        }
    });

    Ok(GigRecord {
        id: input.id.clone(),
        date,
        booking_date: sanitize_optional_date(id, "bookingDate", input.booking_date.as_deref()),
        performers: input.performers.as_deref().unwrap_or_default().trim().to_string(),
        venue: input.venue.clone(),
        number_of_musicians: sanitize_musicians(id, input.number_of_musicians),
        manager_participates: input.manager_participates.unwrap_or(true),
        performance_fee,
        technical_fee,
        manager_bonus,
        claim_performance_fee: input.claim_performance_fee.unwrap_or(true),
        claim_technical_fee: input.claim_technical_fee.unwrap_or(true),
        technical_fee_claim_amount,
        advance_received_by_manager: sanitize_money(
            id,
            "advanceReceivedByManager",
            input.advance_received_by_manager,
        ),
        advance_to_musicians: sanitize_money(id, "advanceToMusicians", input.advance_to_musicians),
        payment_received: input.payment_received.unwrap_or(false),
        payment_received_date: sanitize_optional_date(
            id,
            "paymentReceivedDate",
            input.payment_received_date.as_deref(),
        ),
        band_paid: input.band_paid.unwrap_or(false),
        band_paid_date: sanitize_optional_date(id, "bandPaidDate", input.band_paid_date.as_deref()),
        manager_handles_distribution: input.manager_handles_distribution.unwrap_or(true),
        is_charity: input.is_charity.unwrap_or(false),
        notes: input.notes.clone(),
    })
}

/// Sanitizes a batch, returning the usable records and the rejected ids.
///
/// Input order is preserved in both lists.
pub fn sanitize_all(inputs: &[GigInput]) -> (Vec<GigRecord>, Vec<(String, ValidationError)>) {
    let mut records = Vec::with_capacity(inputs.len());
    let mut rejected = Vec::new();

    for input in inputs {
        match sanitize(input) {
            Ok(record) => records.push(record),
            Err(err) => {
                warn!(gig_id = %input.id, %err, "Gig skipped");
                rejected.push((input.id.clone(), err));
            }
        }
    }

    (records, rejected)
}

fn sanitize_money(gig_id: &str, field: &'static str, value: Option<f64>) -> Money {
    let Some(value) = value else {
        return Money::zero();
    };

    if value.is_nan() {
        warn!(gig_id = %gig_id, field, "Amount is not a number, using 0");
        return Money::zero();
    }
    if value < 0.0 {
        warn!(gig_id = %gig_id, field, value, "Negative amount clamped to 0");
        return Money::zero();
    }

    let amount = Money::from_major(value);
    if amount.cents() > MAX_AMOUNT_CENTS {
        warn!(gig_id = %gig_id, field, value, "Amount above maximum clamped");
        return Money::from_cents(MAX_AMOUNT_CENTS);
    }
    amount
}

fn sanitize_percentage(gig_id: &str, value: Option<f64>) -> Percentage {
    let Some(value) = value else {
        return Percentage::zero();
    };

    if value.is_nan() || value < 0.0 || value > 100.0 {
        warn!(gig_id = %gig_id, value, "Bonus percentage outside 0-100, clamped");
    }

    Percentage::from_percent(value)
}

fn sanitize_musicians(gig_id: &str, value: Option<f64>) -> u32 {
    let Some(value) = value else {
        return 1;
    };

    if value.is_nan() || value < 1.0 {
        warn!(gig_id = %gig_id, value, "Musician count below 1, using 1");
        return 1;
    }
    if value.fract() != 0.0 {
        warn!(gig_id = %gig_id, value, "Fractional musician count rounded down");
    }
    if value > MAX_MUSICIANS as f64 {
        warn!(gig_id = %gig_id, value, max = MAX_MUSICIANS, "Musician count clamped");
        return MAX_MUSICIANS;
    }

    value.floor() as u32
}

fn sanitize_optional_date(gig_id: &str, field: &str, raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?;
    if raw.trim().is_empty() {
        return None;
    }
    match parse_gig_date(field, raw) {
        Ok(date) => Some(date),
        Err(err) => {
            warn!(gig_id = %gig_id, %err, "Ignoring unparseable date");
            None
        }
    }
}

// =============================================================================
// Strict Validators
// =============================================================================

/// Validates a gig at the creation/update boundary.
///
/// ## Rules
/// - `id` and `date` are required, `date` must parse
/// - money fields, when present, must be finite, non-negative and at most
///   [`MAX_AMOUNT_CENTS`]
/// - `numberOfMusicians`, when present, must be a whole number in 1..=100
/// - a percentage bonus must be within 0..=100
/// - `technicalFeeClaimAmount` cannot exceed `technicalFee`
///
/// Returns the first failure found.
pub fn validate_gig_input(input: &GigInput) -> ValidationResult<()> {
    if input.id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    match input.date.as_deref() {
        Some(raw) => {
            parse_gig_date("date", raw)?;
        }
        None => {
            return Err(ValidationError::Required {
                field: "date".to_string(),
            })
        }
    }

    validate_money_amount("performanceFee", input.performance_fee)?;
    validate_money_amount("technicalFee", input.technical_fee)?;
    validate_money_amount("managerBonusAmount", input.manager_bonus_amount)?;
    validate_money_amount("technicalFeeClaimAmount", input.technical_fee_claim_amount)?;
    validate_money_amount("advanceReceivedByManager", input.advance_received_by_manager)?;
    validate_money_amount("advanceToMusicians", input.advance_to_musicians)?;

    if let Some(count) = input.number_of_musicians {
        validate_musician_count(count)?;
    }

    let bonus_type = match input.manager_bonus_type.as_deref() {
        Some(raw) => raw.parse::<BonusType>()?,
        None => BonusType::Fixed,
    };
    if bonus_type == BonusType::Percentage {
        validate_bonus_percentage(input.manager_bonus_amount.unwrap_or(0.0))?;
    }

    if let Some(claim) = input.technical_fee_claim_amount {
        validate_technical_claim(claim, input.technical_fee.unwrap_or(0.0))?;
    }

    Ok(())
}

/// Validates an optional money amount.
///
/// ```rust
/// use gigbook_core::validation::validate_money_amount;
///
/// assert!(validate_money_amount("performanceFee", Some(1000.0)).is_ok());
/// assert!(validate_money_amount("performanceFee", None).is_ok());
/// assert!(validate_money_amount("performanceFee", Some(-1.0)).is_err());
/// assert!(validate_money_amount("performanceFee", Some(f64::NAN)).is_err());
/// assert!(validate_money_amount("performanceFee", Some(5e16)).is_err());
/// ```
pub fn validate_money_amount(field: &str, value: Option<f64>) -> ValidationResult<()> {
    let Some(v) = value else {
        return Ok(());
    };

    if !v.is_finite() || v < 0.0 {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    let amount = Money::from_major(v);
    let limit = Money::from_cents(MAX_AMOUNT_CENTS);
    if amount > limit {
        return Err(ValidationError::ExceedsLimit {
            field: field.to_string(),
            value: amount.to_string(),
            limit_field: "maximum amount".to_string(),
            limit: limit.to_string(),
        });
    }

    Ok(())
}

/// Validates the number of musicians.
///
/// ## Rules
/// - Whole number
/// - Between 1 and MAX_MUSICIANS (100)
pub fn validate_musician_count(count: f64) -> ValidationResult<()> {
    if !count.is_finite() || count.fract() != 0.0 {
        return Err(ValidationError::InvalidFormat {
            field: "numberOfMusicians".to_string(),
            reason: "must be a whole number".to_string(),
        });
    }

    if count < 1.0 || count > MAX_MUSICIANS as f64 {
        return Err(ValidationError::OutOfRange {
            field: "numberOfMusicians".to_string(),
            min: 1,
            max: MAX_MUSICIANS as i64,
        });
    }

    Ok(())
}

/// Validates a percentage bonus (0-100 of the performance fee).
pub fn validate_bonus_percentage(pct: f64) -> ValidationResult<()> {
    if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
        return Err(ValidationError::OutOfRange {
            field: "managerBonusAmount".to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

/// Validates that a partial technical claim fits within the technical fee.
pub fn validate_technical_claim(claim: f64, technical_fee: f64) -> ValidationResult<()> {
    let claim_money = Money::from_major(claim);
    let fee_money = Money::from_major(technical_fee);

    if claim_money > fee_money {
        return Err(ValidationError::ExceedsLimit {
            field: "technicalFeeClaimAmount".to_string(),
            value: claim_money.to_string(),
            limit_field: "technicalFee".to_string(),
            limit: fee_money.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
