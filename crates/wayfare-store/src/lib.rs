//! # wayfare-store
//!
//! Local storage for the Wayfare guide marketplace, backed by SQLite.
//!
//! The crate exposes a synchronous [`Database`] handle that wraps a
//! `rusqlite::Connection` and provides typed CRUD helpers for the two
//! persisted entities (users and messages) plus the derived
//! conversation views.  Consistency is delegated to SQLite: every
//! helper is a single statement, so callers never observe a
//! partially-written row.

pub mod config;
pub mod conversations;
pub mod database;
pub mod messages;
pub mod migrations;
pub mod models;
pub mod users;

mod error;

pub use config::StoreConfig;
pub use database::Database;
pub use error::StoreError;
pub use models::*;
