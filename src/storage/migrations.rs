//! Database migrations for pomosync.
//!
//! Each migration is a function that upgrades the schema by one version.
//! Migrations are run automatically when the database is opened.

use rusqlite::Connection;

use crate::error::PomosyncError;

/// Current schema version.
const CURRENT_VERSION: i32 = 1;

/// Get the current schema version from the database.
///
/// Returns 0 if no version has been set (new database).
pub fn get_version(conn: &Connection) -> Result<i32, PomosyncError> {
    let version: i32 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| PomosyncError::Database(format!("Failed to get schema version: {e}")))?;

    Ok(version)
}

fn set_version(conn: &Connection, version: i32) -> Result<(), PomosyncError> {
    conn.execute_batch(&format!("PRAGMA user_version = {version};"))
        .map_err(|e| PomosyncError::Database(format!("Failed to set schema version: {e}")))
}

/// Run all pending migrations.
pub fn run(conn: &Connection) -> Result<(), PomosyncError> {
    let current = get_version(conn)?;

    if current >= CURRENT_VERSION {
        return Ok(());
    }

    for version in (current + 1)..=CURRENT_VERSION {
        run_migration(conn, version)?;
        set_version(conn, version)?;
    }

    Ok(())
}

fn run_migration(conn: &Connection, version: i32) -> Result<(), PomosyncError> {
    match version {
        1 => migrate_v1(conn),
        _ => Err(PomosyncError::Database(format!(
            "Unknown migration version: {version}"
        ))),
    }
}

/// Migration v1: focus session table.
///
/// Status and timestamps are stored in their wire form (`IN_PROGRESS`,
/// RFC 3339) so rows map one-to-one onto `SessionRecord`.
fn migrate_v1(conn: &Connection) -> Result<(), PomosyncError> {
    conn.execute_batch(
        r"
        CREATE TABLE IF NOT EXISTS focus_sessions (
            id TEXT PRIMARY KEY,
            task_id TEXT NOT NULL DEFAULT '',
            status TEXT NOT NULL,
            duration_minutes INTEGER NOT NULL,
            break_minutes INTEGER NOT NULL DEFAULT 0,
            started_at TEXT NOT NULL,
            paused_at TEXT,
            completed_at TEXT,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_focus_sessions_status
        ON focus_sessions(status);

        CREATE INDEX IF NOT EXISTS idx_focus_sessions_started
        ON focus_sessions(started_at);
        ",
    )
    .map_err(|e| PomosyncError::Database(format!("Migration v1 failed: {e}")))
}
