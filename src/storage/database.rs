//! `SQLite` database connection.
//!
//! The database lives at `~/.pomosync/pomosync.db` unless a path is given,
//! and holds the focus session table that acts as the store of record.

use std::path::Path;

use rusqlite::Connection;
use tracing::debug;

use crate::error::PomosyncError;

use super::migrations;

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at a specific path, creating it if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail.
    pub fn open_at(path: &Path) -> Result<Self, PomosyncError> {
        let conn = Connection::open(path).map_err(|e| {
            PomosyncError::Database(format!("Failed to open database {}: {e}", path.display()))
        })?;
        debug!(path = %path.display(), "Opened session database");

        Self::init(conn)
    }

    /// Open an in-memory database (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail.
    pub fn open_in_memory() -> Result<Self, PomosyncError> {
        let conn = Connection::open_in_memory().map_err(|e| {
            PomosyncError::Database(format!("Failed to open in-memory database: {e}"))
        })?;

        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, PomosyncError> {
        // Other processes (the CLI actions) write while `watch` reads
        conn.busy_timeout(std::time::Duration::from_secs(2))
            .map_err(|e| PomosyncError::Database(format!("Failed to set busy timeout: {e}")))?;

        let db = Self { conn };
        migrations::run(&db.conn)?;
        Ok(db)
    }

    /// Get the current schema version.
    ///
    /// # Errors
    ///
    /// Returns an error if the version cannot be read.
    pub fn schema_version(&self) -> Result<i32, PomosyncError> {
        migrations::get_version(&self.conn)
    }

    /// Get a reference to the underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Get a mutable reference to the underlying connection (for transactions).
    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}
