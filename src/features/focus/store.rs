//! SQLite-backed store of record for focus sessions.
//!
//! The CLI actions (`start`, `pause`, `resume`, `finish`) write here, and the
//! poller reads the active session back through [`RemoteStore`].

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use tracing::{debug, info};

use super::remote::RemoteStore;
use super::session::{Session, SessionId, SessionRecord, SessionStatus};
use crate::error::PomosyncError;
use crate::storage::Database;

const SELECT_COLUMNS: &str = "SELECT id, task_id, status, duration_minutes, break_minutes,
        started_at, paused_at, completed_at
 FROM focus_sessions";

/// Session store backed by the local database.
pub struct SqliteSessionStore {
    db: Mutex<Database>,
}

impl SqliteSessionStore {
    /// Open the store at a specific database file.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open_at(path: &Path) -> Result<Self, PomosyncError> {
        Ok(Self::with_database(Database::open_at(path)?))
    }

    /// Create a store with an existing database connection.
    #[must_use]
    pub const fn with_database(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    fn lock(&self) -> MutexGuard<'_, Database> {
        self.db.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The session currently occupying the active slot, if any.
    ///
    /// # Errors
    ///
    /// Returns `Database` on query failure and `MalformedSession` if the
    /// stored row does not describe a valid session.
    pub fn active(&self) -> Result<Option<Session>, PomosyncError> {
        let db = self.lock();
        query_active(db.connection())
    }

    /// Get a session by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is malformed.
    pub fn get(&self, id: &SessionId) -> Result<Option<Session>, PomosyncError> {
        let db = self.lock();
        let mut stmt = db
            .connection()
            .prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
            .map_err(|e| PomosyncError::Database(format!("Failed to prepare query: {e}")))?;

        let record = stmt
            .query_row([id.as_str()], row_to_record)
            .optional()
            .map_err(|e| PomosyncError::Database(format!("Failed to query session: {e}")))?;

        record.map(Session::try_from).transpose()
    }

    /// Start a new in-progress session.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if a session is already active and
    /// `MalformedSession` if `duration` is not positive.
    pub fn start(
        &self,
        task_id: &str,
        duration: i64,
        break_time: i64,
        now: DateTime<Utc>,
    ) -> Result<Session, PomosyncError> {
        let session = Session::new(
            SessionId::new(uuid::Uuid::new_v4().to_string()),
            task_id,
            duration,
            break_time.max(0),
            now,
        );
        session.validate()?;

        let mut db = self.lock();
        let tx = db
            .connection_mut()
            .transaction()
            .map_err(|e| PomosyncError::Database(format!("Failed to begin transaction: {e}")))?;

        if let Some(existing) = query_active(&tx)? {
            return Err(PomosyncError::Conflict(format!(
                "session {} is already {}",
                existing.id,
                existing.status.to_string().to_lowercase()
            )));
        }

        let record = SessionRecord::from(&session);
        tx.execute(
            r"INSERT INTO focus_sessions
              (id, task_id, status, duration_minutes, break_minutes,
               started_at, paused_at, completed_at, updated_at)
              VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                record.id,
                record.task_id,
                record.status,
                record.duration,
                record.break_time,
                record.started_at,
                record.paused_at,
                record.completed_at,
                now.to_rfc3339(),
            ],
        )
        .map_err(|e| PomosyncError::Database(format!("Failed to insert session: {e}")))?;

        tx.commit()
            .map_err(|e| PomosyncError::Database(format!("Failed to commit session: {e}")))?;

        info!(session_id = %session.id, duration, "Started focus session");
        Ok(session)
    }

    /// Pause the running session.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when nothing is active and `Conflict` when the
    /// active session is already paused.
    pub fn pause(&self, now: DateTime<Utc>) -> Result<Session, PomosyncError> {
        self.transition(now, |mut session| {
            if session.status != SessionStatus::InProgress {
                return Err(PomosyncError::Conflict(format!(
                    "session {} is already paused",
                    session.id
                )));
            }
            session.status = SessionStatus::Paused;
            session.paused_at = Some(now);
            Ok(session)
        })
    }

    /// Resume the paused session.
    ///
    /// `started_at` keeps recording the first entry into progress.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when nothing is active and `Conflict` when the
    /// active session is not paused.
    pub fn resume(&self, now: DateTime<Utc>) -> Result<Session, PomosyncError> {
        self.transition(now, |mut session| {
            if session.status != SessionStatus::Paused {
                return Err(PomosyncError::Conflict(format!(
                    "session {} is not paused",
                    session.id
                )));
            }
            session.status = SessionStatus::InProgress;
            Ok(session)
        })
    }

    /// Complete the active session, running or paused.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when nothing is active.
    pub fn complete(&self, now: DateTime<Utc>) -> Result<Session, PomosyncError> {
        self.transition(now, |mut session| {
            session.status = SessionStatus::Completed;
            session.completed_at = Some(now);
            Ok(session)
        })
    }

    /// Most recent sessions first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is malformed.
    pub fn history(&self, limit: usize) -> Result<Vec<Session>, PomosyncError> {
        let db = self.lock();
        let mut stmt = db
            .connection()
            .prepare(&format!(
                "{SELECT_COLUMNS} ORDER BY started_at DESC, rowid DESC LIMIT ?1"
            ))
            .map_err(|e| PomosyncError::Database(format!("Failed to prepare query: {e}")))?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt
            .query_map([limit], row_to_record)
            .map_err(|e| PomosyncError::Database(format!("Failed to query sessions: {e}")))?;

        let mut sessions = Vec::new();
        for row in rows {
            let record = row.map_err(|e| PomosyncError::Database(e.to_string()))?;
            sessions.push(Session::try_from(record)?);
        }

        Ok(sessions)
    }

    fn transition<F>(&self, now: DateTime<Utc>, apply: F) -> Result<Session, PomosyncError>
    where
        F: FnOnce(Session) -> Result<Session, PomosyncError>,
    {
        let mut db = self.lock();
        let tx = db
            .connection_mut()
            .transaction()
            .map_err(|e| PomosyncError::Database(format!("Failed to begin transaction: {e}")))?;

        let current = query_active(&tx)?
            .ok_or_else(|| PomosyncError::NotFound("No active focus session".to_string()))?;
        let from = current.status;
        let updated = apply(current)?;

        let record = SessionRecord::from(&updated);
        tx.execute(
            r"UPDATE focus_sessions SET
              status = ?1,
              paused_at = ?2,
              completed_at = ?3,
              updated_at = ?4
              WHERE id = ?5",
            params![
                record.status,
                record.paused_at,
                record.completed_at,
                now.to_rfc3339(),
                record.id,
            ],
        )
        .map_err(|e| PomosyncError::Database(format!("Failed to update session: {e}")))?;

        tx.commit()
            .map_err(|e| PomosyncError::Database(format!("Failed to commit session: {e}")))?;

        info!(session_id = %updated.id, from = from.as_str(), to = updated.status.as_str(), "Session transition");
        Ok(updated)
    }
}

#[async_trait]
impl RemoteStore for SqliteSessionStore {
    async fn fetch_active_session(&self) -> Result<Option<Session>, PomosyncError> {
        let result = self.active().map_err(|e| match e {
            PomosyncError::Database(msg) => PomosyncError::RemoteUnavailable(msg),
            other => other,
        });
        debug!(ok = result.is_ok(), "Fetched active session from database");
        result
    }
}

fn query_active(conn: &Connection) -> Result<Option<Session>, PomosyncError> {
    let mut stmt = conn
        .prepare(&format!(
            "{SELECT_COLUMNS}
             WHERE status IN ('IN_PROGRESS', 'PAUSED')
             ORDER BY started_at DESC
             LIMIT 1"
        ))
        .map_err(|e| PomosyncError::Database(format!("Failed to prepare query: {e}")))?;

    let record = stmt
        .query_row([], row_to_record)
        .optional()
        .map_err(|e| PomosyncError::Database(format!("Failed to query active session: {e}")))?;

    record.map(Session::try_from).transpose()
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<SessionRecord> {
    Ok(SessionRecord {
        id: row.get(0)?,
        task_id: row.get(1)?,
        status: row.get(2)?,
        duration: row.get(3)?,
        break_time: row.get(4)?,
        started_at: row.get(5)?,
        paused_at: row.get(6)?,
        completed_at: row.get(7)?,
    })
}

/// Extension trait for optional query results.
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error>;
}

impl<T> OptionalExt<T> for Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
