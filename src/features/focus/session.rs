//! Focus session entity.
//!
//! Defines the canonical shape of a session as reported by the store of
//! record. There is no mutation logic here: sessions change state remotely
//! and this crate only observes the result.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PomosyncError;

/// Longest planned duration a session may carry: one week, in minutes.
pub const MAX_DURATION_MINUTES: i64 = 7 * 24 * 60;

/// Opaque session identifier assigned by the store of record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status of a focus session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    /// Timer is counting down
    InProgress,
    /// Timer is paused
    Paused,
    /// Session finished (only the store of record moves a session here)
    Completed,
}

impl SessionStatus {
    /// Wire representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "IN_PROGRESS",
            Self::Paused => "PAUSED",
            Self::Completed => "COMPLETED",
        }
    }

    /// Parse the wire representation. Unknown values are rejected.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "IN_PROGRESS" => Some(Self::InProgress),
            "PAUSED" => Some(Self::Paused),
            "COMPLETED" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InProgress => write!(f, "In progress"),
            Self::Paused => write!(f, "Paused"),
            Self::Completed => write!(f, "Completed"),
        }
    }
}

/// A focus session snapshot.
///
/// Deserializing goes through [`SessionRecord`], so a `Session` read from the
/// wire has always passed structural validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "SessionRecord")]
pub struct Session {
    pub id: SessionId,
    pub status: SessionStatus,
    /// Planned work length in minutes
    pub duration: i64,
    /// Planned break length in minutes
    pub break_time: i64,
    /// First entry into `InProgress`
    pub started_at: DateTime<Utc>,
    /// Most recent transition into `Paused`
    pub paused_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Work item this session belongs to; owned by the task manager
    pub task_id: String,
}

impl Session {
    /// Create an in-progress session starting at `started_at`.
    #[must_use]
    pub fn new(
        id: SessionId,
        task_id: impl Into<String>,
        duration: i64,
        break_time: i64,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            status: SessionStatus::InProgress,
            duration,
            break_time,
            started_at,
            paused_at: None,
            completed_at: None,
            task_id: task_id.into(),
        }
    }

    /// Check structural validity.
    ///
    /// # Errors
    ///
    /// Returns `PomosyncError::MalformedSession` if the planned duration is
    /// not positive or longer than [`MAX_DURATION_MINUTES`].
    pub fn validate(&self) -> Result<(), PomosyncError> {
        if self.duration <= 0 {
            return Err(PomosyncError::MalformedSession(format!(
                "session {} has non-positive duration {}",
                self.id, self.duration
            )));
        }
        if self.duration > MAX_DURATION_MINUTES {
            return Err(PomosyncError::MalformedSession(format!(
                "session {} duration {} exceeds {MAX_DURATION_MINUTES} minutes",
                self.id, self.duration
            )));
        }
        Ok(())
    }

    /// Whether the session occupies the active slot (running or paused).
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.status, SessionStatus::InProgress | SessionStatus::Paused)
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status == SessionStatus::InProgress
    }

    /// Planned work length in seconds.
    #[must_use]
    pub const fn planned_seconds(&self) -> i64 {
        self.duration.saturating_mul(60)
    }

    /// Get start time in local timezone.
    #[must_use]
    pub fn started_at_local(&self) -> DateTime<Local> {
        self.started_at.with_timezone(&Local)
    }
}

/// Raw, unvalidated session as it arrives from the wire or a database row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: String,
    pub status: String,
    pub duration: i64,
    #[serde(default)]
    pub break_time: i64,
    pub started_at: String,
    #[serde(default)]
    pub paused_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub task_id: String,
}

impl TryFrom<SessionRecord> for Session {
    type Error = PomosyncError;

    fn try_from(record: SessionRecord) -> Result<Self, Self::Error> {
        if record.id.trim().is_empty() {
            return Err(PomosyncError::MalformedSession(
                "session id is empty".to_string(),
            ));
        }

        let status = SessionStatus::parse(&record.status).ok_or_else(|| {
            PomosyncError::MalformedSession(format!(
                "session {} has unknown status {:?}",
                record.id, record.status
            ))
        })?;

        let started_at = parse_timestamp(&record.id, "startedAt", &record.started_at)?;
        let paused_at = record
            .paused_at
            .as_deref()
            .map(|s| parse_timestamp(&record.id, "pausedAt", s))
            .transpose()?;
        let completed_at = record
            .completed_at
            .as_deref()
            .map(|s| parse_timestamp(&record.id, "completedAt", s))
            .transpose()?;

        let session = Self {
            id: SessionId(record.id),
            status,
            duration: record.duration,
            break_time: record.break_time,
            started_at,
            paused_at,
            completed_at,
            task_id: record.task_id,
        };
        session.validate()?;
        Ok(session)
    }
}

impl From<&Session> for SessionRecord {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id.as_str().to_string(),
            status: session.status.as_str().to_string(),
            duration: session.duration,
            break_time: session.break_time,
            started_at: session.started_at.to_rfc3339(),
            paused_at: session.paused_at.map(|t| t.to_rfc3339()),
            completed_at: session.completed_at.map(|t| t.to_rfc3339()),
            task_id: session.task_id.clone(),
        }
    }
}

fn parse_timestamp(id: &str, field: &str, value: &str) -> Result<DateTime<Utc>, PomosyncError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| {
            PomosyncError::MalformedSession(format!(
                "session {id} has invalid {field} {value:?}: {e}"
            ))
        })
}
