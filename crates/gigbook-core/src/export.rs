//! # Export Rows
//!
//! Flat, serializable rows for CSV and JSON exports. Each row carries the
//! calculator's numbers, so a spreadsheet and the dashboard always agree.
//!
//! Writing the rows out (CSV quoting, files, pretty JSON) is the caller's job.

use chrono::NaiveDate;
use serde::Serialize;
use ts_rs::TS;

use crate::aggregator::{aggregate, AggregateSummary};
use crate::calculator::calculate;
use crate::types::{BonusType, GigRecord};

/// One gig, flattened for export. Amounts are in major units (dollars).
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ExportRow {
    pub id: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub band: String,
    pub venue: String,
    pub number_of_musicians: u32,
    pub performance_fee: f64,
    pub technical_fee: f64,
    pub bonus_type: BonusType,
    pub actual_manager_bonus: f64,
    pub total_received: f64,
    pub amount_per_musician: f64,
    pub my_earnings: f64,
    pub my_earnings_received: f64,
    pub my_earnings_pending: f64,
    pub amount_owed_to_others: f64,
    pub payment_received: bool,
    #[ts(as = "Option<String>")]
    pub payment_received_date: Option<NaiveDate>,
    pub band_paid: bool,
    #[ts(as = "Option<String>")]
    pub band_paid_date: Option<NaiveDate>,
    pub manager_handles_distribution: bool,
    pub is_charity: bool,
}

impl ExportRow {
    /// Column names in serialization order.
    pub const CSV_HEADERS: [&'static str; 21] = [
        "id",
        "date",
        "band",
        "venue",
        "numberOfMusicians",
        "performanceFee",
        "technicalFee",
        "bonusType",
        "actualManagerBonus",
        "totalReceived",
        "amountPerMusician",
        "myEarnings",
        "myEarningsReceived",
        "myEarningsPending",
        "amountOwedToOthers",
        "paymentReceived",
        "paymentReceivedDate",
        "bandPaid",
        "bandPaidDate",
        "managerHandlesDistribution",
        "isCharity",
    ];

    pub fn from_gig(gig: &GigRecord) -> Self {
        let calc = calculate(gig);

        ExportRow {
            id: gig.id.clone(),
            date: gig.date,
            band: gig.band_key().to_string(),
            venue: gig.venue.clone().unwrap_or_default(),
            number_of_musicians: gig.number_of_musicians,
            performance_fee: gig.performance_fee.to_major(),
            technical_fee: gig.technical_fee.to_major(),
            bonus_type: gig.manager_bonus.kind(),
            actual_manager_bonus: calc.actual_manager_bonus.to_major(),
            total_received: calc.total_received.to_major(),
            amount_per_musician: calc.amount_per_musician.to_major(),
            my_earnings: calc.my_earnings.to_major(),
            my_earnings_received: calc.my_earnings_already_received.to_major(),
            my_earnings_pending: calc.my_earnings_still_owed.to_major(),
            amount_owed_to_others: calc.amount_owed_to_others.to_major(),
            payment_received: gig.payment_received,
            payment_received_date: gig.payment_received_date,
            band_paid: gig.band_paid,
            band_paid_date: gig.band_paid_date,
            manager_handles_distribution: gig.manager_handles_distribution,
            is_charity: gig.is_charity,
        }
    }
}

/// Export rows sorted by date, then id.
pub fn export_rows(gigs: &[GigRecord]) -> Vec<ExportRow> {
    let mut rows: Vec<ExportRow> = gigs.iter().map(ExportRow::from_gig).collect();
    rows.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
    rows
}

/// A full JSON export: rows plus the summary computed from the same gigs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub rows: Vec<ExportRow>,
    pub summary: AggregateSummary,
}

pub fn export_document(gigs: &[GigRecord]) -> ExportDocument {
    ExportDocument {
        rows: export_rows(gigs),
        summary: aggregate(gigs),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn gig(id: &str, d: u32) -> GigRecord {
        GigRecord {
            performers: "The Blue Notes".to_string(),
            number_of_musicians: 3,
            performance_fee: Money::from_cents(100_000),
            ..GigRecord::new(id, NaiveDate::from_ymd_opt(2024, 6, d).unwrap())
        }
    }

    #[test]
    fn test_row_matches_calculator() {
        let g = gig("g1", 14);
        let row = ExportRow::from_gig(&g);
        let calc = calculate(&g);
        assert_eq!(row.my_earnings, calc.my_earnings.to_major());
        assert_eq!(row.amount_per_musician, 333.33);
        assert_eq!(row.amount_owed_to_others, 666.66);
        assert_eq!(row.band, "The Blue Notes");
        assert_eq!(row.venue, "");
    }

    #[test]
    fn test_rows_sorted_by_date_then_id() {
        let gigs = vec![gig("b", 20), gig("c", 1), gig("a", 20)];
        let ids: Vec<String> = export_rows(&gigs).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_csv_headers_match_fields() {
        let value = serde_json::to_value(ExportRow::from_gig(&gig("g1", 14))).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), ExportRow::CSV_HEADERS.len());
        for header in ExportRow::CSV_HEADERS {
            assert!(object.contains_key(header), "missing {}", header);
        }
    }

    #[test]
    fn test_export_document_shares_numbers() {
        let gigs = vec![gig("a", 1), gig("b", 2)];
        let doc = export_document(&gigs);
        let row_total: f64 = doc.rows.iter().map(|r| r.my_earnings).sum();
        assert!((row_total - doc.summary.total_earnings.to_major()).abs() < 1e-9);
    }
}
