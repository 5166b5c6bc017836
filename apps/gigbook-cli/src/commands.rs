//! # Command Handlers
//!
//! Each handler loads what it needs, calls the engine once and hands the
//! result to `output`. The engine never sees the clock: `today` is resolved
//! here and passed in.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use gigbook_core::calculator::find_and_calculate;
use gigbook_core::{aggregate, partition, Dashboard, GigRecord};
use tracing::{debug, info};

use crate::config::{CliConfig, ReportSettings};
use crate::error::{CliError, CliResult};
use crate::input::load_gigs;
use crate::output;

/// Resolves `--today`, falling back to the local date.
pub fn resolve_today(raw: Option<&str>) -> CliResult<NaiveDate> {
    match raw {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|_| CliError::InvalidDate(raw.to_string())),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

/// Loads the configured gig file.
pub fn load_configured_gigs(config: &CliConfig) -> CliResult<Vec<GigRecord>> {
    let path = config.input.path.as_deref().ok_or(CliError::MissingInput)?;
    load_gigs(path, config.input.strict)
}

pub fn summary<W: Write>(
    out: &mut W,
    gigs: &[GigRecord],
    today: NaiveDate,
    settings: &ReportSettings,
) -> CliResult<()> {
    let dashboard = Dashboard::build(gigs, today);
    debug!(
        active = dashboard.gigs.active.len(),
        handled = dashboard.gigs.handled.len(),
        "Dashboard built"
    );
    output::write_summary(out, &dashboard, settings)
}

pub fn gig<W: Write>(
    out: &mut W,
    gigs: &[GigRecord],
    id: &str,
    settings: &ReportSettings,
) -> CliResult<()> {
    let entry = find_and_calculate(gigs, id)?;
    output::write_gig(out, &entry, settings)
}

pub fn gig_lists<W: Write>(
    out: &mut W,
    gigs: &[GigRecord],
    today: NaiveDate,
    settings: &ReportSettings,
) -> CliResult<()> {
    output::write_gig_lists(out, &partition(gigs, today), settings)
}

pub fn analytics<W: Write>(out: &mut W, gigs: &[GigRecord], settings: &ReportSettings) -> CliResult<()> {
    output::write_analytics(out, &aggregate(gigs), settings)
}

/// Writes the export to `path`, or stdout when no path is given.
pub fn export(gigs: &[GigRecord], path: Option<&Path>, settings: &ReportSettings) -> CliResult<()> {
    match path {
        Some(path) => {
            let mut file = BufWriter::new(File::create(path)?);
            output::write_export(&mut file, gigs, settings)?;
            file.flush()?;
            info!(?path, gigs = gigs.len(), format = %settings.format, "Export written");
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            output::write_export(&mut out, gigs, settings)?;
        }
    }
    Ok(())
}

/// Writes a default config, seeded with any `--input` given.
pub fn init_config(path: Option<PathBuf>, input: Option<PathBuf>, force: bool) -> CliResult<PathBuf> {
    let target = path
        .or_else(CliConfig::default_config_path)
        .ok_or_else(|| CliError::ConfigSaveFailed("No config path available".into()))?;

    if target.exists() && !force {
        return Err(CliError::ConfigSaveFailed(format!(
            "{} already exists (use --force to overwrite)",
            target.display()
        )));
    }

    let mut config = CliConfig::default();
    config.input.path = input;
    config.save(Some(target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportFormat;

    const GIGS: &str = r#"[
        {"id": "a", "date": "2024-05-10", "performers": "Alpha", "numberOfMusicians": 4,
         "performanceFee": 1000, "technicalFee": 200, "managerBonusAmount": 50,
         "paymentReceived": true, "bandPaid": true},
        {"id": "b", "date": "2024-06-20", "performers": "Alpha", "numberOfMusicians": 4,
         "performanceFee": 1000, "technicalFee": 200, "managerBonusAmount": 50,
         "advanceReceivedByManager": 400}
    ]"#;

    fn gigs() -> Vec<GigRecord> {
        crate::input::parse_gigs(GIGS, false).unwrap()
    }

    fn json() -> ReportSettings {
        ReportSettings {
            format: ReportFormat::Json,
            ..ReportSettings::default()
        }
    }

    #[test]
    fn test_resolve_today() {
        assert_eq!(
            resolve_today(Some("2024-06-01")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
        assert!(matches!(resolve_today(Some("06/01/2024")), Err(CliError::InvalidDate(_))));
        assert!(resolve_today(None).is_ok());
    }

    #[test]
    fn test_missing_input_path() {
        let config = CliConfig::default();
        assert!(matches!(load_configured_gigs(&config), Err(CliError::MissingInput)));
    }

    #[test]
    fn test_summary_json() {
        let mut out = Vec::new();
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        summary(&mut out, &gigs(), today, &json()).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["totalGigs"], 2);
        assert_eq!(value["totalEarnings"], 100_000);
        assert_eq!(value["totalEarningsReceived"], 90_000);
        assert_eq!(value["totalEarningsPending"], 10_000);
        assert_eq!(value["perBand"][0]["band"], "Alpha");
    }

    #[test]
    fn test_unknown_gig() {
        let mut out = Vec::new();
        let err = gig(&mut out, &gigs(), "nope", &json()).unwrap_err();
        assert_eq!(err.to_string(), "Gig not found: nope");
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gigs.csv");
        let settings = ReportSettings {
            format: ReportFormat::Csv,
            ..ReportSettings::default()
        };

        export(&gigs(), Some(&path), &settings).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 3);
        assert!(contents.starts_with("id,date,band"));
    }

    #[test]
    fn test_init_config_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gigbook.toml");

        let written = init_config(Some(path.clone()), Some(PathBuf::from("gigs.json")), false).unwrap();
        assert_eq!(written, path);
        assert!(std::fs::read_to_string(&path).unwrap().contains("gigs.json"));

        assert!(matches!(
            init_config(Some(path.clone()), None, false),
            Err(CliError::ConfigSaveFailed(_))
        ));
        assert!(init_config(Some(path), None, true).is_ok());
    }
}
