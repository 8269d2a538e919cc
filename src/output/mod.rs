//! Output formatting for pomosync.
//!
//! This module provides formatters for displaying sessions and countdowns in
//! various formats.

mod json;
mod pretty;

use crate::cli::args::OutputFormat;
use crate::error::PomosyncError;
use crate::features::focus::{Session, TimerView};

pub use json::*;
pub use pretty::*;

/// Format the result of a session action (start, pause, ...).
///
/// # Errors
///
/// Returns `PomosyncError::Json` if JSON serialization fails.
pub fn format_session(
    session: &Session,
    headline: &str,
    format: OutputFormat,
) -> Result<String, PomosyncError> {
    match format {
        OutputFormat::Pretty => Ok(format_session_pretty(session, headline)),
        OutputFormat::Json => to_json(session),
    }
}

/// Format the active session together with its derived countdown.
///
/// # Errors
///
/// Returns `PomosyncError::Json` if JSON serialization fails.
pub fn format_status(
    session: Option<&Session>,
    view: &TimerView,
    format: OutputFormat,
) -> Result<String, PomosyncError> {
    match format {
        OutputFormat::Pretty => Ok(format_status_pretty(session, view)),
        OutputFormat::Json => format_status_json(session, view),
    }
}

/// Format session history.
///
/// # Errors
///
/// Returns `PomosyncError::Json` if JSON serialization fails.
pub fn format_history(sessions: &[Session], format: OutputFormat) -> Result<String, PomosyncError> {
    match format {
        OutputFormat::Pretty => Ok(format_history_pretty(sessions)),
        OutputFormat::Json => format_history_json(sessions),
    }
}
