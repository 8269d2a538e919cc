//! Path resolution for pomosync configuration and data files.
//!
//! All pomosync data is stored in `~/.pomosync/`:
//! - `config.yaml` - Main configuration file
//! - `pomosync.db` - SQLite database holding focus sessions

use std::path::PathBuf;

use crate::error::PomosyncError;

/// Paths to pomosync configuration and data files.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.pomosync/`
    pub root: PathBuf,
    /// Config file: `~/.pomosync/config.yaml`
    pub config_file: PathBuf,
    /// Database file: `~/.pomosync/pomosync.db`
    pub database: PathBuf,
}

impl Paths {
    /// Create paths based on the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, PomosyncError> {
        let home = std::env::var("HOME").map_err(|_| {
            PomosyncError::Config("Could not determine home directory".to_string())
        })?;

        Ok(Self::with_root(PathBuf::from(home).join(".pomosync")))
    }

    /// Create paths with a custom root directory (useful for testing).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            database: root.join("pomosync.db"),
            root,
        }
    }

    /// Use `database` instead of the default database file.
    #[must_use]
    pub fn with_database(mut self, database: PathBuf) -> Self {
        self.database = database;
        self
    }

    /// Ensure the data directories exist, creating them if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), PomosyncError> {
        let db_dir = self.database.parent().filter(|p| !p.as_os_str().is_empty());
        let dirs = std::iter::once(self.root.as_path()).chain(db_dir);

        for dir in dirs {
            if !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| {
                    PomosyncError::Config(format!(
                        "Failed to create directory {}: {e}",
                        dir.display()
                    ))
                })?;
            }
        }

        Ok(())
    }
}
