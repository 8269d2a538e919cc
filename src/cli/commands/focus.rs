//! Session action and status commands.

use chrono::Utc;

use crate::cli::args::OutputFormat;
use crate::config::FocusConfig;
use crate::error::PomosyncError;
use crate::features::focus::{get_timer_view, parse_duration, SqliteSessionStore};
use crate::output::{format_history, format_session, format_status};

/// Arguments for `start`, still in their command-line form.
#[derive(Debug, Default, Clone)]
pub struct StartOptions {
    pub task: Option<String>,
    pub duration: Option<String>,
    pub break_time: Option<String>,
}

/// Start a new focus session.
///
/// # Errors
///
/// Returns `Parse` for an unreadable duration, `Conflict` if a session is
/// already active, or a database error.
pub fn start(
    store: &SqliteSessionStore,
    defaults: &FocusConfig,
    options: StartOptions,
    format: OutputFormat,
) -> Result<String, PomosyncError> {
    let duration = match options.duration.as_deref() {
        Some(raw) => parse_minutes(raw, false)?,
        None => i64::from(defaults.duration_minutes),
    };
    let break_time = match options.break_time.as_deref() {
        Some(raw) => parse_minutes(raw, true)?,
        None => i64::from(defaults.break_minutes),
    };

    let task = options.task.unwrap_or_default();
    let session = store.start(&task, duration, break_time, Utc::now())?;
    format_session(&session, "Focus session started", format)
}

/// Pause the running session.
///
/// # Errors
///
/// Returns `NotFound` or `Conflict` if there is nothing to pause.
pub fn pause(store: &SqliteSessionStore, format: OutputFormat) -> Result<String, PomosyncError> {
    let session = store.pause(Utc::now())?;
    format_session(&session, "Session paused", format)
}

/// Resume the paused session.
///
/// # Errors
///
/// Returns `NotFound` or `Conflict` if there is nothing to resume.
pub fn resume(store: &SqliteSessionStore, format: OutputFormat) -> Result<String, PomosyncError> {
    let session = store.resume(Utc::now())?;
    format_session(&session, "Session resumed", format)
}

/// Complete the active session.
///
/// # Errors
///
/// Returns `NotFound` if nothing is active.
pub fn finish(store: &SqliteSessionStore, format: OutputFormat) -> Result<String, PomosyncError> {
    let session = store.complete(Utc::now())?;
    format_session(&session, "Session completed", format)
}

/// Show the active session with its derived countdown.
///
/// # Errors
///
/// Returns an error if the store cannot be read or holds a malformed session.
pub fn status(store: &SqliteSessionStore, format: OutputFormat) -> Result<String, PomosyncError> {
    let active = store.active()?;
    let view = get_timer_view(active.as_ref(), Utc::now())?;
    format_status(active.as_ref(), &view, format)
}

/// List recent sessions.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn history(
    store: &SqliteSessionStore,
    limit: usize,
    format: OutputFormat,
) -> Result<String, PomosyncError> {
    let sessions = store.history(limit)?;
    format_history(&sessions, format)
}

/// Parse a duration argument into whole minutes, rounding seconds up.
fn parse_minutes(raw: &str, allow_zero: bool) -> Result<i64, PomosyncError> {
    if allow_zero && raw.trim() == "0" {
        return Ok(0);
    }

    let duration = parse_duration(raw).ok_or_else(|| {
        PomosyncError::Parse(format!(
            "Invalid duration '{raw}'. Use e.g. 25m, 1h30m, 90s or a number of minutes"
        ))
    })?;

    Ok((duration.num_seconds() + 59) / 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;

    fn create_test_store() -> SqliteSessionStore {
        SqliteSessionStore::with_database(Database::open_in_memory().unwrap())
    }

    #[test]
    fn test_parse_minutes() {
        assert_eq!(parse_minutes("25m", false).unwrap(), 25);
        assert_eq!(parse_minutes("1h30m", false).unwrap(), 90);
        assert_eq!(parse_minutes("50", false).unwrap(), 50);
        assert_eq!(parse_minutes("90s", false).unwrap(), 2);
        assert_eq!(parse_minutes("0", true).unwrap(), 0);
        assert!(parse_minutes("0", false).is_err());
        assert!(matches!(
            parse_minutes("999999999999999", false),
            Err(PomosyncError::Parse(_))
        ));
        assert!(parse_minutes("99999999999999999h", true).is_err());
        assert!(matches!(
            parse_minutes("soon", false),
            Err(PomosyncError::Parse(_))
        ));
    }

    #[test]
    fn test_start_uses_config_defaults() {
        let store = create_test_store();
        let defaults = FocusConfig {
            duration_minutes: 40,
            break_minutes: 8,
        };

        start(&store, &defaults, StartOptions::default(), OutputFormat::Json).unwrap();

        let active = store.active().unwrap().unwrap();
        assert_eq!(active.duration, 40);
        assert_eq!(active.break_time, 8);
        assert_eq!(active.task_id, "");
    }

    #[test]
    fn test_start_with_options_json() {
        let store = create_test_store();
        let options = StartOptions {
            task: Some("T-1".to_string()),
            duration: Some("50m".to_string()),
            break_time: Some("10m".to_string()),
        };

        let output = start(&store, &FocusConfig::default(), options, OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["taskId"], "T-1");
        assert_eq!(parsed["duration"], 50);
        assert_eq!(parsed["breakTime"], 10);
        assert_eq!(parsed["status"], "IN_PROGRESS");
    }

    #[test]
    fn test_full_lifecycle() {
        let store = create_test_store();
        let defaults = FocusConfig::default();

        start(&store, &defaults, StartOptions::default(), OutputFormat::Pretty).unwrap();
        assert!(start(&store, &defaults, StartOptions::default(), OutputFormat::Pretty).is_err());

        let output = pause(&store, OutputFormat::Json).unwrap();
        assert!(output.contains("PAUSED"));

        let output = resume(&store, OutputFormat::Json).unwrap();
        assert!(output.contains("IN_PROGRESS"));

        let output = status(&store, OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["timer"]["isActive"], true);

        let output = finish(&store, OutputFormat::Json).unwrap();
        assert!(output.contains("COMPLETED"));

        let output = status(&store, OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(parsed["session"].is_null());

        let output = history(&store, 5, OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["count"], 1);
    }

    #[test]
    fn test_pause_without_session() {
        let store = create_test_store();
        let err = pause(&store, OutputFormat::Pretty).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
