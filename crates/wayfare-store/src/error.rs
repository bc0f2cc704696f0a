use thiserror::Error;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Malformed input rejected before any statement ran.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Foreign-key or uniqueness violation.
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// The acting user is not permitted to perform the operation.
    #[error("Not authorized: {0}")]
    Authorization(String),

    /// A query expected exactly one row but found none.
    #[error("Record not found")]
    NotFound,

    /// The database was busy or locked; the call may succeed if retried.
    #[error("Transient store error: {0}")]
    Transient(String),

    /// Any other SQLite error.
    #[error("Database error: {0}")]
    Sqlite(rusqlite::Error),

    /// Failed to determine a platform data directory.
    #[error("Could not determine application data directory")]
    NoDataDir,

    /// Generic I/O error (e.g. creating the database directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Migration failure.
    #[error("Migration error: {0}")]
    Migration(String),

    /// UUID parsing error.
    #[error("UUID error: {0}")]
    Uuid(#[from] uuid::Error),

    /// Chrono parsing error.
    #[error("Timestamp parse error: {0}")]
    ChronoParse(#[from] chrono::ParseError),
}

impl From<rusqlite::Error> for StoreError {
    /// Classify SQLite errors into the store taxonomy.  Constraint
    /// failures and busy/locked conditions get their own variants so
    /// callers can react without matching on SQLite error codes.
    fn from(e: rusqlite::Error) -> Self {
        match &e {
            rusqlite::Error::SqliteFailure(failure, message) => match failure.code {
                rusqlite::ErrorCode::ConstraintViolation => StoreError::Constraint(
                    message.clone().unwrap_or_else(|| failure.to_string()),
                ),
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked => {
                    StoreError::Transient(message.clone().unwrap_or_else(|| failure.to_string()))
                }
                _ => StoreError::Sqlite(e),
            },
            _ => StoreError::Sqlite(e),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
