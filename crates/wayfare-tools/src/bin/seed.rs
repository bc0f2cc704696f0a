//! `wayfare-seed` -- insert the demo fixture set.
//!
//! Upserts the demo users and inserts two backdated conversations.
//! Safe to re-run; duplicate messages are expected on repeat runs
//! (the store allows them), duplicate users are not (phone upsert).

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use wayfare_tools::cli;
use wayfare_tools::fixtures;

/// Insert the demo fixture set into a Wayfare database.
#[derive(Parser)]
#[command(name = "wayfare-seed", version)]
struct Cli {
    /// Database file (platform default when omitted).
    #[arg(long)]
    db: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    cli::init_tracing("info,wayfare_tools=debug");

    let args = Cli::parse();
    let db = cli::open_database(args.db.as_deref())?;

    info!("applying demo fixture set");
    let report = fixtures::demo_set().apply(&db)?;

    info!(
        users = report.users_applied,
        messages = report.messages_applied,
        skipped = report.messages_skipped,
        "seeding finished"
    );

    Ok(())
}
