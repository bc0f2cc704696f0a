//! Read-back verification of a deployed store.
//!
//! Confirms the schema is present and reachable: required tables
//! exist, row counts are readable, and a probe user survives a full
//! upsert / read / delete round trip.

use wayfare_store::{Database, Role};

use crate::Result;

/// Tables every deployment must have.
const REQUIRED_TABLES: &[&str] = &["users", "messages"];

/// Phone reserved for the verification probe row.
const PROBE_PHONE: &str = "00000000000";

/// State of one required table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCheck {
    pub name: String,
    pub present: bool,
    pub rows: Option<i64>,
}

/// Outcome of a [`verify_store`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyReport {
    pub tables: Vec<TableCheck>,
    pub probe_ok: bool,
}

impl VerifyReport {
    /// True when every table is present and the probe round trip
    /// succeeded.
    pub fn is_healthy(&self) -> bool {
        self.probe_ok && self.tables.iter().all(|t| t.present)
    }
}

/// Run all checks against an open database.
pub fn verify_store(db: &Database) -> Result<VerifyReport> {
    let mut tables = Vec::new();

    for &name in REQUIRED_TABLES {
        let present = table_exists(db, name)?;
        let rows = if present { Some(count_rows(db, name)?) } else { None };

        match rows {
            Some(n) => tracing::info!(table = name, rows = n, "table present"),
            None => tracing::warn!(table = name, "table missing"),
        }

        tables.push(TableCheck {
            name: name.to_string(),
            present,
            rows,
        });
    }

    let probe_ok = if tables.iter().all(|t| t.present) {
        probe_round_trip(db)?
    } else {
        false
    };

    Ok(VerifyReport { tables, probe_ok })
}

fn table_exists(db: &Database, name: &str) -> Result<bool> {
    let count: i64 = db
        .conn()
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get(0),
        )
        .map_err(wayfare_store::StoreError::from)?;
    Ok(count > 0)
}

/// Count rows in one of the [`REQUIRED_TABLES`].
fn count_rows(db: &Database, name: &str) -> Result<i64> {
    let count: i64 = db
        .conn()
        .query_row(&format!("SELECT COUNT(*) FROM {name}"), [], |row| row.get(0))
        .map_err(wayfare_store::StoreError::from)?;
    Ok(count)
}

/// Insert, read back, and delete a probe user.
fn probe_round_trip(db: &Database) -> Result<bool> {
    let probe = db.upsert_user(PROBE_PHONE, "verification probe", Role::User)?;
    let found = db.find_user_by_phone(PROBE_PHONE)?.is_some();
    db.delete_user(probe.id)?;

    tracing::info!(ok = found, "probe round trip");
    Ok(found)
}
