//! Shared binary plumbing: tracing setup and database opening.
//!
//! Argument parsing itself lives in each binary as a `clap` derive
//! struct; this module only hosts what the binaries have in common.

use std::path::Path;

use tracing_subscriber::EnvFilter;

use wayfare_store::{Database, StoreConfig};

use crate::Result;

/// Initialize tracing for a tool binary (respects `RUST_LOG`).
pub fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();
}

/// Open the given database file, or the platform default when `None`.
pub fn open_database(path: Option<&Path>) -> Result<Database> {
    let config = match path {
        Some(path) => StoreConfig::new(path),
        None => StoreConfig::default_path()?,
    };
    Ok(Database::open(&config)?)
}
