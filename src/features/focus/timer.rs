//! Timer derivation for focus sessions.
//!
//! The countdown is derived from absolute timestamps on every read instead of
//! being decremented tick by tick, so a process that was suspended shows the
//! correct remaining time as soon as it recomputes. Nothing here holds state.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::session::{Session, SessionStatus};
use crate::error::PomosyncError;

/// Display-ready view of a session at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerView {
    /// Remaining seconds
    pub time_left: u64,
    /// Fraction of the planned duration already elapsed (0.0 - 1.0)
    pub progress: f64,
    pub is_active: bool,
    pub is_completed: bool,
    /// Remaining time as MM:SS
    pub formatted_time: String,
}

impl TimerView {
    /// View shown when there is no running session.
    #[must_use]
    pub fn idle() -> Self {
        Self {
            time_left: 0,
            progress: 0.0,
            is_active: false,
            is_completed: false,
            formatted_time: format_mmss(0),
        }
    }
}

/// Derive the timer view for `session` at wall-clock time `now`.
///
/// Only an `InProgress` session counts down. A paused session reports zero
/// time left and inactive, matching what the store of record exposes while
/// paused.
///
/// # Errors
///
/// Returns `PomosyncError::MalformedSession` if the session fails validation.
pub fn get_timer_view(
    session: Option<&Session>,
    now: DateTime<Utc>,
) -> Result<TimerView, PomosyncError> {
    let Some(session) = session else {
        return Ok(TimerView::idle());
    };
    session.validate()?;

    match session.status {
        SessionStatus::InProgress => {}
        SessionStatus::Paused => return Ok(TimerView::idle()),
        SessionStatus::Completed => {
            return Ok(TimerView {
                progress: 1.0,
                is_completed: true,
                ..TimerView::idle()
            })
        }
    }

    let total_seconds = session.planned_seconds();
    let elapsed_seconds = elapsed_seconds(session.started_at, now);
    let time_left = (total_seconds - elapsed_seconds).max(0);

    #[allow(clippy::cast_precision_loss)]
    let progress = if total_seconds > 0 {
        (1.0 - time_left as f64 / total_seconds as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };

    #[allow(clippy::cast_sign_loss)]
    let time_left = time_left as u64;

    Ok(TimerView {
        time_left,
        progress,
        is_active: time_left > 0,
        is_completed: time_left == 0,
        formatted_time: format_mmss(time_left),
    })
}

/// Whole seconds between `started_at` and `now`, truncated, never negative.
fn elapsed_seconds(started_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    now.signed_duration_since(started_at)
        .num_milliseconds()
        .max(0)
        / 1000
}

/// Format seconds as MM:SS. Minutes are padded to two digits but not capped.
#[must_use]
pub fn format_mmss(total_seconds: u64) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}

/// Format a duration as a human-readable string.
#[must_use]
pub fn format_duration(d: Duration) -> String {
    let total_minutes = d.num_minutes();

    if total_minutes < 1 {
        let seconds = d.num_seconds();
        return format!("{} second{}", seconds, if seconds == 1 { "" } else { "s" });
    }

    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 {
        if minutes > 0 {
            format!(
                "{} hour{}, {} minute{}",
                hours,
                if hours == 1 { "" } else { "s" },
                minutes,
                if minutes == 1 { "" } else { "s" }
            )
        } else {
            format!("{} hour{}", hours, if hours == 1 { "" } else { "s" })
        }
    } else {
        format!("{} minute{}", minutes, if minutes == 1 { "" } else { "s" })
    }
}

/// Parse a duration string like "25m", "1h30m", "90s". A bare number is minutes.
///
/// Returns `None` for zero, malformed input, or values too large to represent.
#[must_use]
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim().to_lowercase();

    if let Ok(minutes) = s.parse::<i64>() {
        return if minutes > 0 { Duration::try_minutes(minutes) } else { None };
    }

    let mut total_seconds: i64 = 0;
    let mut current_num = String::new();

    for c in s.chars() {
        if c.is_ascii_digit() {
            current_num.push(c);
        } else if !current_num.is_empty() {
            let num: i64 = current_num.parse().ok()?;
            current_num.clear();

            let unit = match c {
                'h' => 3600,
                'm' => 60,
                's' => 1,
                _ => return None,
            };
            total_seconds = total_seconds.checked_add(num.checked_mul(unit)?)?;
        } else {
            return None;
        }
    }

    if !current_num.is_empty() {
        let num: i64 = current_num.parse().ok()?;
        total_seconds = total_seconds.checked_add(num.checked_mul(60)?)?;
    }

    if total_seconds > 0 {
        Duration::try_seconds(total_seconds)
    } else {
        None
    }
}

/// Format a length in minutes, saturating values chrono cannot represent.
#[must_use]
pub fn format_minutes(minutes: i64) -> String {
    format_duration(Duration::try_minutes(minutes).unwrap_or(Duration::MAX))
}

/// Render a progress bar.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn render_progress_bar(progress: f64, width: usize) -> String {
    let filled = ((progress.clamp(0.0, 1.0) * width as f64) as usize).min(width);
    let empty = width - filled;

    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}
