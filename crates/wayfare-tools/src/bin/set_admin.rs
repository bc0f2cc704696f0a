//! `wayfare-set-admin` -- promote an account to admin.
//!
//! ```text
//! WAYFARE_ADMIN_TOKEN=... wayfare-set-admin \
//!     --token ...  --phone 15988859056 --name Operator --password ... \
//!     [--db path/to/wayfare.db]
//! ```
//!
//! Promotion requires the token from the environment to be repeated on
//! the command line; without both, the tool refuses to run.  The
//! account is created if it does not exist, its password hash is set,
//! and its role becomes admin.

use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;
use tracing::info;

use wayfare_tools::admin::{self, OperatorGate};
use wayfare_tools::cli;

/// Promote a Wayfare account to admin and set its credential.
#[derive(Parser)]
#[command(name = "wayfare-set-admin", version)]
struct Cli {
    /// Database file (platform default when omitted).
    #[arg(long)]
    db: Option<PathBuf>,

    /// Operator token; must match the WAYFARE_ADMIN_TOKEN environment
    /// variable on this machine.
    #[arg(long)]
    token: String,

    /// Phone number of the account to promote.
    #[arg(long)]
    phone: String,

    /// Display name used if the account has to be created.
    #[arg(long, default_value = "Administrator")]
    name: String,

    /// Password to set on the promoted account.
    #[arg(long)]
    password: String,
}

fn main() -> anyhow::Result<()> {
    cli::init_tracing("info,wayfare_tools=debug");

    let args = Cli::parse();

    let Some(gate) = OperatorGate::from_env() else {
        bail!("{} is not set; admin promotion is disabled", admin::ADMIN_TOKEN_ENV);
    };

    let db = cli::open_database(args.db.as_deref())?;

    let promoted = admin::promote_to_admin(
        &db,
        &gate,
        &args.token,
        &args.phone,
        &args.name,
        &args.password,
    )?;
    info!(phone = %promoted.phone, id = %promoted.id, "admin account ready");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn valueless_flag_is_a_parse_error() {
        let result = Cli::try_parse_from([
            "wayfare-set-admin",
            "--phone",
            "15988859056",
            "--password",
            "hunter22",
            "--token",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_flag_is_rejected() {
        let result = Cli::try_parse_from([
            "wayfare-set-admin",
            "--token",
            "s3cret",
            "--phone",
            "15988859056",
            "--password",
            "hunter22",
            "--bogus",
            "x",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn full_flag_set_parses() {
        let args = Cli::try_parse_from([
            "wayfare-set-admin",
            "--token",
            "s3cret",
            "--phone",
            "15988859056",
            "--password",
            "hunter22",
            "--db",
            "/tmp/wayfare.db",
        ])
        .unwrap();

        assert_eq!(args.name, "Administrator");
        assert_eq!(args.db.as_deref(), Some(std::path::Path::new("/tmp/wayfare.db")));
    }
}
