//! # Gig Input
//!
//! Reads a JSON export of gigs and turns it into `GigRecord`s.
//!
//! ## Accepted Shapes
//! ```text
//! [ { "id": "...", "date": "...", ... }, ... ]          plain array
//! { "gigs": [ { ... }, ... ] }                          API response body
//! ```
//!
//! ## Lenient vs Strict
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  lenient (default): sanitize_all                                        │
//! │    bad numbers repaired with a warning, undated gigs skipped            │
//! │                                                                         │
//! │  strict: validate_gig_input on every gig first                          │
//! │    the first invalid gig aborts the run                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::Path;

use gigbook_core::validation::{sanitize_all, validate_gig_input};
use gigbook_core::{GigInput, GigRecord};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{CliError, CliResult};

#[derive(Deserialize)]
#[serde(untagged)]
enum GigFile {
    List(Vec<GigInput>),
    Wrapped { gigs: Vec<GigInput> },
}

impl GigFile {
    fn into_inputs(self) -> Vec<GigInput> {
        match self {
            GigFile::List(gigs) | GigFile::Wrapped { gigs } => gigs,
        }
    }
}

/// Parses gig JSON from a string.
pub fn parse_gigs(json: &str, strict: bool) -> CliResult<Vec<GigRecord>> {
    let inputs = serde_json::from_str::<GigFile>(json)?.into_inputs();

    if strict {
        for input in &inputs {
            validate_gig_input(input).map_err(|source| CliError::InvalidGig {
                id: input.id.clone(),
                source,
            })?;
        }
    }

    let (records, rejected) = sanitize_all(&inputs);
    if !rejected.is_empty() {
        warn!(
            skipped = rejected.len(),
            kept = records.len(),
            "Some gigs could not be read"
        );
    }

    Ok(records)
}

/// Reads and parses a gig file.
pub fn load_gigs(path: &Path, strict: bool) -> CliResult<Vec<GigRecord>> {
    let contents = std::fs::read_to_string(path)?;
    let gigs = parse_gigs(&contents, strict)?;
    info!(?path, gigs = gigs.len(), strict, "Gigs loaded");
    Ok(gigs)
}
