//! Database connection management.
//!
//! The [`Database`] struct owns a [`rusqlite::Connection`] and
//! guarantees that migrations are run before any other operation.

use std::path::PathBuf;

use rusqlite::Connection;

use crate::config::StoreConfig;
use crate::error::Result;
use crate::migrations;

/// Wrapper around a [`rusqlite::Connection`].
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database described by `config`.
    ///
    /// Applies the recommended pragmas (WAL journal, foreign keys on,
    /// busy timeout) and runs any pending schema migrations before
    /// returning.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        tracing::info!(path = %config.path.display(), "opening database");

        let conn = Connection::open(&config.path)?;

        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.busy_timeout(config.busy_timeout)?;

        migrations::run_migrations(&conn)?;

        Ok(Self { conn })
    }

    /// Open (or create) the database in the platform data directory.
    ///
    /// Shorthand for `Database::open(&StoreConfig::default_path()?)`.
    pub fn open_default() -> Result<Self> {
        Self::open(&StoreConfig::default_path()?)
    }

    /// Return a reference to the underlying `rusqlite::Connection`.
    ///
    /// Callers should prefer the typed CRUD helpers, but direct access
    /// is occasionally needed for ad-hoc queries (the verification
    /// tooling inspects `sqlite_master` through this).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Return the filesystem path of the open database (if any).
    pub fn path(&self) -> Option<PathBuf> {
        self.conn.path().map(PathBuf::from)
    }
}
