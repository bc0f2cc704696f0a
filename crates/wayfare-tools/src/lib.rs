//! # wayfare-tools
//!
//! One-shot administrative tooling for a Wayfare deployment: fixture
//! seeding, schema verification, and admin-account bootstrap.
//!
//! These are batch clients of `wayfare-store`.  They run sequentially,
//! one statement at a time, and are idempotent in intent (upserts
//! where possible) but not atomic: a failure mid-batch leaves the rows
//! already applied in place.

pub mod admin;
pub mod cli;
pub mod fixtures;
pub mod verify;

use thiserror::Error;

/// Errors produced by the administrative tooling.
#[derive(Error, Debug)]
pub enum ToolsError {
    /// Underlying store failure.
    #[error(transparent)]
    Store(#[from] wayfare_store::StoreError),

    /// Credential hashing failure.
    #[error(transparent)]
    Auth(#[from] wayfare_auth::AuthError),

    /// The operator gate rejected the presented token.
    #[error("Operator authorization failed: {0}")]
    Unauthorized(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ToolsError>;
