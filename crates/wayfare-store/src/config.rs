//! Store configuration.
//!
//! All store settings travel in an explicit [`StoreConfig`] handed to
//! [`Database::open`](crate::Database::open); the library itself never
//! reads environment variables.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;

use crate::error::{Result, StoreError};

/// Configuration for opening a [`Database`](crate::Database).
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Filesystem path of the SQLite database file.
    pub path: PathBuf,

    /// Optional 256-bit at-rest key.  Reserved for the `sqlcipher`
    /// feature; ignored by the plain SQLite build.
    pub db_key: Option<[u8; 32]>,

    /// How long a statement waits on a locked database before failing
    /// with [`StoreError::Transient`].
    pub busy_timeout: Duration,
}

impl StoreConfig {
    /// Configuration pointing at an explicit database file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            db_key: None,
            busy_timeout: Duration::from_secs(5),
        }
    }

    /// Configuration using the platform-appropriate data directory:
    /// - Linux:   `~/.local/share/wayfare/wayfare.db`
    /// - macOS:   `~/Library/Application Support/com.wayfare.wayfare/wayfare.db`
    /// - Windows: `{FOLDERID_RoamingAppData}\wayfare\wayfare\data\wayfare.db`
    ///
    /// Creates the data directory if it does not exist.
    pub fn default_path() -> Result<Self> {
        let project_dirs =
            ProjectDirs::from("com", "wayfare", "wayfare").ok_or(StoreError::NoDataDir)?;

        let data_dir = project_dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        Ok(Self::new(data_dir.join("wayfare.db")))
    }

    /// Set the at-rest key (SQLCipher builds only).
    pub fn with_db_key(mut self, key: [u8; 32]) -> Self {
        self.db_key = Some(key);
        self
    }

    /// Override the busy timeout.
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides() {
        let config = StoreConfig::new("/tmp/x.db")
            .with_busy_timeout(Duration::from_millis(250))
            .with_db_key([7u8; 32]);

        assert_eq!(config.path, PathBuf::from("/tmp/x.db"));
        assert_eq!(config.busy_timeout, Duration::from_millis(250));
        assert_eq!(config.db_key, Some([7u8; 32]));
    }
}
