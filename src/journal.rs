//! Logging bootstrap
//!
//! The `run` subcommand writes two places: the console, and an activity log
//! file that is truncated at startup and opens with a banner line. The other
//! subcommands log to the console only.

use crate::Result;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// First line of every activity log.
pub const BANNER: &str = "=== Faroswap Automated Log Start ===";

/// Console-only logging.
pub fn init(verbose: bool) {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter(verbose))
        .init();
}

/// Console plus the activity log file.
pub fn init_with_journal(path: &Path, verbose: bool) -> Result<()> {
    let file = create_journal_file(path)?;
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Arc::new(file)),
        )
        .with(filter(verbose))
        .init();
    Ok(())
}

/// Truncate any previous run's log and write the banner.
fn create_journal_file(path: &Path) -> Result<File> {
    let mut file = File::create(path)?;
    writeln!(file, "{BANNER}")?;
    Ok(file)
}

fn filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    }
}
