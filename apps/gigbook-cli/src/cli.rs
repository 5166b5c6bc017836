//! # Command-Line Arguments
//!
//! ```text
//! gigbook [--config PATH] [--input PATH] [--format text|json|csv] [--strict] <COMMAND>
//!
//!   summary     [--today DATE]     dashboard totals, per-band, pending
//!   gig         <ID>               one gig's breakdown
//!   gigs        [--today DATE]     active and handled lists
//!   analytics                      monthly buckets and seasonal patterns
//!   export      [--output PATH]    every gig as CSV/JSON rows
//!   init-config [--force]          write a default gigbook.toml
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::ReportFormat;

#[derive(Debug, Parser)]
#[command(name = "gigbook", version, about = "Gig earnings, splits and dashboards for band managers")]
pub struct Cli {
    /// Config file (defaults to the platform config dir).
    #[arg(long, global = true, env = "GIGBOOK_CONFIG")]
    pub config: Option<PathBuf>,

    /// JSON file of gigs; overrides the config file and GIGBOOK_INPUT.
    #[arg(long, short, global = true)]
    pub input: Option<PathBuf>,

    /// Output format; overrides the config file and GIGBOOK_FORMAT.
    #[arg(long, short, global = true, value_enum)]
    pub format: Option<ReportFormat>,

    /// Reject invalid gigs instead of repairing them.
    #[arg(long, global = true)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Dashboard totals, per-band breakdown and pending payments.
    Summary {
        /// Treat this date (YYYY-MM-DD) as today.
        #[arg(long)]
        today: Option<String>,
    },

    /// Calculation breakdown for a single gig.
    Gig {
        /// Gig id.
        id: String,
    },

    /// Active gigs (upcoming or unsettled) and handled gigs.
    Gigs {
        /// Treat this date (YYYY-MM-DD) as today.
        #[arg(long)]
        today: Option<String>,
    },

    /// Monthly breakdown and seasonal patterns.
    Analytics,

    /// Every gig with its calculated amounts.
    Export {
        /// Write to a file instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Write a default config file.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}
