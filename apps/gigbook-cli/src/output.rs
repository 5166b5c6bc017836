//! # Report Output
//!
//! Renders engine results as terminal tables, JSON or CSV.
//!
//! The engine only hands out integer-cent `Money`; turning that into
//! "$1,250.00" happens here and nowhere else. JSON output keeps the engine's
//! shapes as-is (amounts in cents), CSV output uses decimal amounts so it
//! opens cleanly in a spreadsheet.

use std::io::Write;

use gigbook_core::calculator::CalculatedGig;
use gigbook_core::{
    export_document, export_rows, AggregateSummary, Dashboard, GigPartition, GigRecord, Money,
    MonthlyBucket, SeasonalSummary,
};
use serde::Serialize;

use crate::config::{ReportFormat, ReportSettings};
use crate::error::CliResult;

// =============================================================================
// Currency Display
// =============================================================================

/// Formats money with a currency symbol and thousands separators.
///
/// ```text
/// 125000 cents, "$"  → "$1,250.00"
/// -550 cents,   "€"  → "-€5.50"
/// ```
pub fn format_money(amount: Money, symbol: &str) -> String {
    let sign = if amount.is_negative() { "-" } else { "" };
    let digits = amount.dollars().abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}{}{}.{:02}", sign, symbol, grouped, amount.cents_part())
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

// =============================================================================
// Dashboard Summary
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BandCsvRow<'a> {
    band: &'a str,
    gigs: u32,
    earnings: f64,
    received: f64,
    pending: f64,
    owed: f64,
    average_per_gig: f64,
    pending_client_amount: f64,
}

/// Writes the dashboard summary.
pub fn write_summary<W: Write>(
    out: &mut W,
    dashboard: &Dashboard<'_>,
    settings: &ReportSettings,
) -> CliResult<()> {
    match settings.format {
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &dashboard.summary)?;
            writeln!(out)?;
        }
        ReportFormat::Csv => write_summary_csv(out, &dashboard.summary)?,
        ReportFormat::Text => write_summary_text(out, dashboard, &settings.currency_symbol)?,
    }
    Ok(())
}

fn write_summary_csv<W: Write>(out: &mut W, summary: &AggregateSummary) -> CliResult<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for band in &summary.per_band {
        let pending_client = summary
            .pending_by_band
            .iter()
            .find(|p| p.band == band.band)
            .map(|p| p.amount)
            .unwrap_or_default();
        wtr.serialize(BandCsvRow {
            band: &band.band,
            gigs: band.gigs,
            earnings: band.earnings.to_major(),
            received: band.received.to_major(),
            pending: band.pending.to_major(),
            owed: band.owed.to_major(),
            average_per_gig: band.average_per_gig.to_major(),
            pending_client_amount: pending_client.to_major(),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_summary_text<W: Write>(out: &mut W, dashboard: &Dashboard<'_>, symbol: &str) -> CliResult<()> {
    let summary = &dashboard.summary;
    let money = |m: Money| format_money(m, symbol);

    writeln!(out, "Dashboard for {}", dashboard.today)?;
    writeln!(out)?;
    writeln!(out, "  Gigs                  {:>14}", summary.total_gigs)?;
    writeln!(out, "  Upcoming              {:>14}", dashboard.upcoming_gigs)?;
    writeln!(out, "  Total earnings        {:>14}", money(summary.total_earnings))?;
    writeln!(out, "  Received              {:>14}", money(summary.total_earnings_received))?;
    writeln!(out, "  Pending               {:>14}", money(summary.total_earnings_pending))?;
    writeln!(out, "  Average per gig       {:>14}", money(summary.average_earnings_per_gig))?;
    writeln!(
        out,
        "  Unpaid by clients     {:>14}  ({} gigs)",
        money(summary.pending_client_amount),
        summary.pending_client_payments
    )?;
    writeln!(out, "  Owed to musicians     {:>14}", money(summary.outstanding_to_band))?;

    if let Some(ref best) = summary.best_band {
        writeln!(out, "  Best band             {:>14}", best)?;
    }

    if !summary.per_band.is_empty() {
        writeln!(out)?;
        writeln!(
            out,
            "  {:<24} {:>5} {:>14} {:>14} {:>14} {:>14}",
            "Band", "Gigs", "Earnings", "Received", "Pending", "Owed"
        )?;
        for band in &summary.per_band {
            writeln!(
                out,
                "  {:<24} {:>5} {:>14} {:>14} {:>14} {:>14}",
                band.band,
                band.gigs,
                money(band.earnings),
                money(band.received),
                money(band.pending),
                money(band.owed)
            )?;
        }
    }

    if !summary.pending_by_band.is_empty() {
        writeln!(out)?;
        writeln!(out, "  Waiting on clients")?;
        for pending in &summary.pending_by_band {
            writeln!(
                out,
                "  {:<24} {:>5} {:>14}",
                pending.band,
                pending.count,
                money(pending.amount)
            )?;
        }
    }

    Ok(())
}

// =============================================================================
// Single Gig
// =============================================================================

#[derive(Serialize)]
struct GigReport<'a> {
    gig: &'a GigRecord,
    calculation: gigbook_core::GigCalculation,
}

/// Writes one gig's calculation breakdown.
pub fn write_gig<W: Write>(
    out: &mut W,
    entry: &CalculatedGig<'_>,
    settings: &ReportSettings,
) -> CliResult<()> {
    match settings.format {
        ReportFormat::Json => {
            let report = GigReport {
                gig: entry.gig,
                calculation: entry.calc,
            };
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
        ReportFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(out);
            for row in export_rows(std::slice::from_ref(entry.gig)) {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
        ReportFormat::Text => {
            let gig = entry.gig;
            let calc = &entry.calc;
            let money = |m: Money| format_money(m, &settings.currency_symbol);

            writeln!(out, "{} · {} · {}", gig.id, gig.date, gig.band_key())?;
            if gig.is_charity {
                writeln!(out, "  Charity gig: no money changes hands")?;
            }
            writeln!(out, "  Musicians             {:>14}", gig.number_of_musicians)?;
            writeln!(out, "  Split between         {:>14}", calc.musicians_in_split)?;
            writeln!(out, "  Manager bonus         {:>14}", money(calc.actual_manager_bonus))?;
            writeln!(out, "  Total received        {:>14}", money(calc.total_received))?;
            writeln!(out, "  Per musician          {:>14}", money(calc.amount_per_musician))?;
            writeln!(out, "  My earnings           {:>14}", money(calc.my_earnings))?;
            writeln!(out, "    already received    {:>14}", money(calc.my_earnings_already_received))?;
            writeln!(out, "    still owed          {:>14}", money(calc.my_earnings_still_owed))?;
            writeln!(out, "  Owed to others        {:>14}", money(calc.amount_owed_to_others))?;
            writeln!(out, "    musicians           {:>14}", money(calc.amount_owed_to_band))?;
            writeln!(out, "    technical           {:>14}", money(calc.amount_owed_for_technical))?;
            writeln!(out, "  Client paid           {:>14}", yes_no(gig.payment_received))?;
            writeln!(out, "  Band paid             {:>14}", yes_no(gig.band_paid))?;
            if !gig.manager_handles_distribution {
                writeln!(out, "  Band is paid directly by the client")?;
            }
        }
    }
    Ok(())
}

// =============================================================================
// Active / Handled Lists
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GigListRow<'a> {
    section: &'static str,
    id: &'a str,
    date: chrono::NaiveDate,
    band: &'a str,
    my_earnings: f64,
    payment_received: bool,
    band_paid: bool,
}

/// Writes the active and handled gig lists.
pub fn write_gig_lists<W: Write>(
    out: &mut W,
    lists: &GigPartition<'_>,
    settings: &ReportSettings,
) -> CliResult<()> {
    match settings.format {
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, lists)?;
            writeln!(out)?;
        }
        ReportFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(out);
            let sections = [("active", &lists.active), ("handled", &lists.handled)];
            for (section, gigs) in sections {
                for gig in gigs.iter() {
                    wtr.serialize(GigListRow {
                        section,
                        id: &gig.id,
                        date: gig.date,
                        band: gig.band_key(),
                        my_earnings: gigbook_core::calculate(gig).my_earnings.to_major(),
                        payment_received: gig.payment_received,
                        band_paid: gig.band_paid,
                    })?;
                }
            }
            wtr.flush()?;
        }
        ReportFormat::Text => {
            write_gig_section(out, "Active", &lists.active, &settings.currency_symbol)?;
            writeln!(out)?;
            write_gig_section(out, "Handled", &lists.handled, &settings.currency_symbol)?;
        }
    }
    Ok(())
}

fn write_gig_section<W: Write>(
    out: &mut W,
    title: &str,
    gigs: &[&GigRecord],
    symbol: &str,
) -> CliResult<()> {
    writeln!(out, "{} ({})", title, gigs.len())?;
    for gig in gigs {
        let calc = gigbook_core::calculate(gig);
        writeln!(
            out,
            "  {}  {:<12} {:<24} {:>14}  client:{:<3} band:{:<3}",
            gig.date,
            gig.id,
            gig.band_key(),
            format_money(calc.my_earnings, symbol),
            yes_no(gig.payment_received),
            yes_no(gig.band_paid)
        )?;
    }
    Ok(())
}

// =============================================================================
// Analytics
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyticsReport<'a> {
    monthly: &'a [MonthlyBucket],
    highest_month: Option<&'a MonthlyBucket>,
    seasonal: &'a SeasonalSummary,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MonthCsvRow {
    month: String,
    count: u32,
    charity_count: u32,
    paid_gigs: u32,
    total: f64,
}

/// Writes the monthly breakdown and seasonal patterns.
pub fn write_analytics<W: Write>(
    out: &mut W,
    summary: &AggregateSummary,
    settings: &ReportSettings,
) -> CliResult<()> {
    match settings.format {
        ReportFormat::Json => {
            let report = AnalyticsReport {
                monthly: &summary.monthly,
                highest_month: summary.highest_month.as_ref(),
                seasonal: &summary.seasonal,
            };
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
        ReportFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(out);
            for bucket in &summary.monthly {
                wtr.serialize(MonthCsvRow {
                    month: bucket.month.to_string(),
                    count: bucket.count,
                    charity_count: bucket.charity_count,
                    paid_gigs: bucket.paid_gigs,
                    total: bucket.total.to_major(),
                })?;
            }
            wtr.flush()?;
        }
        ReportFormat::Text => {
            let money = |m: Money| format_money(m, &settings.currency_symbol);

            writeln!(out, "Monthly (last {} months with gigs)", summary.monthly.len())?;
            for bucket in &summary.monthly {
                writeln!(
                    out,
                    "  {}  {:>3} gigs  {:>3} paid  {:>3} charity  {:>14}",
                    bucket.month,
                    bucket.count,
                    bucket.paid_gigs,
                    bucket.charity_count,
                    money(bucket.total)
                )?;
            }
            if let Some(ref best) = summary.highest_month {
                writeln!(out, "  Highest month: {} ({})", best.month, money(best.total))?;
            }

            writeln!(out)?;
            writeln!(out, "Seasonal patterns")?;
            for pattern in &summary.seasonal.patterns {
                writeln!(
                    out,
                    "  {:<10} {:>3} gigs/yr  {:>14}/yr  ({} yr)",
                    pattern.month_name,
                    pattern.avg_gigs,
                    money(pattern.avg_income),
                    pattern.years_observed
                )?;
            }
            if let Some(ref busiest) = summary.seasonal.busiest {
                writeln!(out, "  Busiest: {}", busiest.month_name)?;
            }
            if let Some(ref quietest) = summary.seasonal.quietest {
                writeln!(out, "  Quietest: {}", quietest.month_name)?;
            }
        }
    }
    Ok(())
}

// =============================================================================
// Export
// =============================================================================

/// Writes every gig as export rows.
///
/// JSON exports carry the summary computed from the same gigs.
pub fn write_export<W: Write>(
    out: &mut W,
    gigs: &[GigRecord],
    settings: &ReportSettings,
) -> CliResult<()> {
    match settings.format {
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &export_document(gigs))?;
            writeln!(out)?;
        }
        ReportFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(out);
            for row in export_rows(gigs) {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
        ReportFormat::Text => {
            for row in export_rows(gigs) {
                writeln!(
                    out,
                    "{}  {:<12} {:<24} {:>12.2} {:>12.2} {:>12.2}",
                    row.date,
                    row.id,
                    row.band,
                    row.total_received,
                    row.my_earnings,
                    row.amount_owed_to_others
                )?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use gigbook_core::{ExportRow, ManagerBonus};

    fn settings(format: ReportFormat) -> ReportSettings {
        ReportSettings {
            format,
            ..ReportSettings::default()
        }
    }

    fn gig(id: &str, day: u32, paid: bool) -> GigRecord {
        GigRecord {
            performers: "Alpha".to_string(),
            number_of_musicians: 4,
            performance_fee: Money::from_cents(100_000),
            technical_fee: Money::from_cents(20_000),
            manager_bonus: ManagerBonus::Fixed(Money::from_cents(5_000)),
            payment_received: paid,
            band_paid: paid,
            ..GigRecord::new(id, NaiveDate::from_ymd_opt(2024, 6, day).unwrap())
        }
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> CliResult<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(Money::from_cents(125_000), "$"), "$1,250.00");
        assert_eq!(format_money(Money::from_cents(0), "$"), "$0.00");
        assert_eq!(format_money(Money::from_cents(99), "$"), "$0.99");
        assert_eq!(format_money(Money::from_cents(-550), "€"), "-€5.50");
        assert_eq!(format_money(Money::from_cents(123_456_789), "£"), "£1,234,567.89");
        assert_eq!(format_money(Money::from_cents(100_000_00), "$"), "$100,000.00");
    }

    #[test]
    fn test_export_csv_header_matches_row_columns() {
        let gigs = vec![gig("a", 1, true), gig("b", 2, false)];
        let text = render(|out| write_export(out, &gigs, &settings(ReportFormat::Csv)));

        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), ExportRow::CSV_HEADERS.join(","));
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn test_export_json_has_rows_and_summary() {
        let gigs = vec![gig("a", 1, true)];
        let text = render(|out| write_export(out, &gigs, &settings(ReportFormat::Json)));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["rows"].as_array().unwrap().len(), 1);
        assert_eq!(value["summary"]["totalEarnings"], 50_000);
    }

    #[test]
    fn test_summary_text_lists_bands() {
        let gigs = vec![gig("a", 1, true), gig("b", 20, false)];
        let dashboard = Dashboard::build(&gigs, NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
        let text = render(|out| write_summary(out, &dashboard, &settings(ReportFormat::Text)));

        assert!(text.contains("Dashboard for 2024-06-10"));
        assert!(text.contains("$1,000.00"));
        assert!(text.contains("Alpha"));
        assert!(text.contains("Waiting on clients"));
    }

    #[test]
    fn test_summary_csv_one_row_per_band() {
        let gigs = vec![gig("a", 1, true), gig("b", 2, false)];
        let dashboard = Dashboard::build(&gigs, NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
        let text = render(|out| write_summary(out, &dashboard, &settings(ReportFormat::Csv)));

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("band,gigs,earnings"));
        assert!(lines[1].starts_with("Alpha,2,1000.0"));
    }

    #[test]
    fn test_gig_lists_csv_sections() {
        let gigs = vec![gig("old", 1, true), gig("new", 20, false)];
        let lists = gigbook_core::partition(&gigs, NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
        let text = render(|out| write_gig_lists(out, &lists, &settings(ReportFormat::Csv)));

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("active,new,"));
        assert!(lines[2].starts_with("handled,old,"));
    }

    #[test]
    fn test_charity_gig_text() {
        let charity = GigRecord {
            is_charity: true,
            ..gig("c", 5, false)
        };
        let entry = CalculatedGig::new(&charity);
        let text = render(|out| write_gig(out, &entry, &settings(ReportFormat::Text)));
        assert!(text.contains("Charity gig"));
        assert!(text.contains("$0.00"));
    }

    #[test]
    fn test_analytics_empty() {
        let summary = gigbook_core::aggregate(&[]);
        let text = render(|out| write_analytics(out, &summary, &settings(ReportFormat::Text)));
        assert!(text.contains("Monthly (last 0 months with gigs)"));
        assert!(!text.contains("Busiest"));
    }
}
