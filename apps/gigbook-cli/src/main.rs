//! # Gigbook CLI Entry Point
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging to stderr, stdout stays clean for reports)
//! 2. Parse arguments
//! 3. Hand off to `gigbook_cli::run`
//! 4. Print the error chain and exit non-zero on failure

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use gigbook_cli::cli::Cli;

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    match gigbook_cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("gigbook: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=gigbook_core=warn` - Only sanitization warnings from the engine
/// - Default: INFO, DEBUG for gigbook crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,gigbook_core=debug,gigbook_cli=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
