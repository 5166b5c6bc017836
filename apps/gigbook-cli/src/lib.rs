//! # Gigbook CLI Library
//!
//! Thin caller around `gigbook-core`. Owns every bit of I/O the engine
//! refuses to do: config files, the gig JSON, the clock, stdout.
//!
//! ## Module Organization
//! ```text
//! gigbook_cli/
//! ├── lib.rs       ◄─── You are here (run: config → gigs → command)
//! ├── cli.rs       ◄─── clap argument definitions
//! ├── config.rs    ◄─── gigbook.toml + GIGBOOK_* overrides
//! ├── input.rs     ◄─── gig JSON → GigRecord (lenient or strict)
//! ├── commands.rs  ◄─── one handler per subcommand
//! ├── output.rs    ◄─── text tables, JSON, CSV, currency display
//! └── error.rs     ◄─── CliError
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod output;

use std::io;

use anyhow::Context;
use tracing::info;

use cli::{Cli, Command};
use config::CliConfig;

/// Runs one CLI invocation.
///
/// ## Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. init-config short-circuits (no gigs needed)                         │
/// │  2. Load config: file → env → flags                                     │
/// │  3. Load gigs (strict or lenient)                                       │
/// │  4. Resolve today if the command needs it                               │
/// │  5. Run the command, write to stdout or the export file                 │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run(cli: Cli) -> anyhow::Result<()> {
    if let Command::InitConfig { force } = cli.command {
        let path = commands::init_config(cli.config, cli.input, force)
            .context("Could not write config file")?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let mut config = CliConfig::load(cli.config.clone()).context("Could not load configuration")?;
    if let Some(input) = cli.input {
        config.input.path = Some(input);
    }
    if let Some(format) = cli.format {
        config.report.format = format;
    }
    if cli.strict {
        config.input.strict = true;
    }

    let gigs = commands::load_configured_gigs(&config).with_context(|| match config.input.path {
        Some(ref path) => format!("Failed to load gigs from {}", path.display()),
        None => "Failed to load gigs".to_string(),
    })?;
    info!(gigs = gigs.len(), format = %config.report.format, "Running command");

    let settings = &config.report;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Summary { today } => {
            let today = commands::resolve_today(today.as_deref())?;
            commands::summary(&mut out, &gigs, today, settings)?;
        }
        Command::Gig { id } => commands::gig(&mut out, &gigs, &id, settings)?,
        Command::Gigs { today } => {
            let today = commands::resolve_today(today.as_deref())?;
            commands::gig_lists(&mut out, &gigs, today, settings)?;
        }
        Command::Analytics => commands::analytics(&mut out, &gigs, settings)?,
        Command::Export { output } => {
            drop(out);
            commands::export(&gigs, output.as_deref(), settings)
                .context("Export failed")?;
        }
        // Written before any gigs are loaded
        Command::InitConfig { .. } => {}
    }

    Ok(())
}
