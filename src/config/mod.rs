//! Storage configuration.
//!
//! Both backend paths are carried in an explicit config struct handed to the
//! history service; nothing in the crate reads ambient global paths.

use crate::history::HistoryError;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the relational store inside a data directory.
pub const DB_FILE_NAME: &str = "history.db";

/// File name of the mirror log inside a data directory.
pub const MIRROR_FILE_NAME: &str = "history.json";

/// Locations of the two history backends.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Path of the SQLite database file.
    pub db_path: PathBuf,

    /// Path of the mirror log file.
    pub mirror_path: PathBuf,
}

impl StorageConfig {
    /// Creates a config from explicit backend paths.
    pub fn new(db_path: impl Into<PathBuf>, mirror_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            mirror_path: mirror_path.into(),
        }
    }

    /// Places both backend files inside the given directory.
    ///
    /// Uses [`DB_FILE_NAME`] and [`MIRROR_FILE_NAME`]. The directory is not
    /// created here; the store creates parent directories on open.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            db_path: dir.join(DB_FILE_NAME),
            mirror_path: dir.join(MIRROR_FILE_NAME),
        }
    }

    /// Resolves the default per-user data directory and returns a config
    /// pointing into it.
    ///
    /// Returns `~/.config/api-tester/` on Unix-like systems, or the roaming
    /// AppData equivalent on Windows. The directory is created if missing.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Io` if no home directory can be determined or
    /// the data directory cannot be created.
    pub fn default_paths() -> Result<Self, HistoryError> {
        let config_dir = if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home).join(".config")
        } else if let Some(user_profile) = std::env::var_os("USERPROFILE") {
            PathBuf::from(user_profile).join("AppData").join("Roaming")
        } else {
            return Err(HistoryError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine home directory",
            )));
        };

        let data_dir = config_dir.join("api-tester");
        if !data_dir.exists() {
            fs::create_dir_all(&data_dir)?;
        }

        Ok(Self::in_dir(data_dir))
    }
}
