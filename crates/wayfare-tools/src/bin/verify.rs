//! `wayfare-verify` -- read-back checks against a deployed store.
//!
//! Exits 0 when every required table is present and the probe round
//! trip succeeds, 1 otherwise.

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use wayfare_tools::cli;
use wayfare_tools::verify;

/// Verify the schema and reachability of a Wayfare database.
#[derive(Parser)]
#[command(name = "wayfare-verify", version)]
struct Cli {
    /// Database file (platform default when omitted).
    #[arg(long)]
    db: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    cli::init_tracing("info,wayfare_tools=debug");

    let args = Cli::parse();
    let db = cli::open_database(args.db.as_deref())?;

    let report = verify::verify_store(&db)?;

    for table in &report.tables {
        match table.rows {
            Some(rows) => info!(table = %table.name, rows, "ok"),
            None => error!(table = %table.name, "missing"),
        }
    }

    if report.is_healthy() {
        info!("store verified");
        Ok(())
    } else {
        error!("store verification failed");
        std::process::exit(1);
    }
}
