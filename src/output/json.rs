//! JSON output formatting for pomosync.

use serde::Serialize;
use serde_json::json;

use crate::error::PomosyncError;
use crate::features::focus::{Session, TimerView};

/// Format the active session and its countdown as JSON
///
/// # Errors
///
/// Returns `PomosyncError::Json` if JSON serialization fails.
pub fn format_status_json(
    session: Option<&Session>,
    view: &TimerView,
) -> Result<String, PomosyncError> {
    let output = json!({
        "session": session,
        "timer": view,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format session history as JSON
///
/// # Errors
///
/// Returns `PomosyncError::Json` if JSON serialization fails.
pub fn format_history_json(sessions: &[Session]) -> Result<String, PomosyncError> {
    let output = json!({
        "count": sessions.len(),
        "items": sessions
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Generic JSON formatter for any serializable type
///
/// # Errors
///
/// Returns `PomosyncError::Json` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, PomosyncError> {
    Ok(serde_json::to_string_pretty(value)?)
}
