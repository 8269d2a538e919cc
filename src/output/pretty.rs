use std::fmt::Write as _;

use colored::{ColoredString, Colorize};

use crate::features::focus::timer::{format_minutes, render_progress_bar};
use crate::features::focus::{Session, SessionStatus, TimerView};

const BAR_WIDTH: usize = 30;

fn status_icon(status: SessionStatus) -> ColoredString {
    match status {
        SessionStatus::InProgress => "▶".green(),
        SessionStatus::Paused => "⏸".yellow(),
        SessionStatus::Completed => "✓".blue(),
    }
}

fn task_label(session: &Session) -> &str {
    if session.task_id.is_empty() {
        "(no task)"
    } else {
        &session.task_id
    }
}

/// Format a session after an action, led by `headline`
pub fn format_session_pretty(session: &Session, headline: &str) -> String {
    let mut output = format!("{} {}\n", status_icon(session.status), headline.bold());
    let _ = writeln!(output, "  {}: {}", "ID".dimmed(), session.id);
    let _ = writeln!(output, "  {}: {}", "Task".dimmed(), task_label(session));
    let _ = writeln!(output, "  {}: {}", "Status".dimmed(), session.status);
    let _ = writeln!(
        output,
        "  {}: {}",
        "Duration".dimmed(),
        format_minutes(session.duration)
    );
    if session.break_time > 0 {
        let _ = writeln!(
            output,
            "  {}: {}",
            "Break".dimmed(),
            format_minutes(session.break_time)
        );
    }
    let _ = writeln!(
        output,
        "  {}: {}",
        "Started".dimmed(),
        session.started_at_local().format("%Y-%m-%d %H:%M")
    );

    output
}

/// Format the active session with its countdown
pub fn format_status_pretty(session: Option<&Session>, view: &TimerView) -> String {
    let Some(session) = session else {
        return format!(
            "{}\n  {}",
            "No active focus session".dimmed(),
            "Start one with 'pomosync start'".dimmed()
        );
    };

    let mut output = format!(
        "{} {}  {}\n",
        status_icon(session.status),
        view.formatted_time.bold(),
        session.status
    );
    output.push_str(&"─".repeat(40));
    output.push('\n');
    let _ = writeln!(output, "{}", render_progress_bar(view.progress, BAR_WIDTH));
    let _ = writeln!(output, "  {}: {}", "Task".dimmed(), task_label(session));
    let _ = writeln!(
        output,
        "  {}: {} of {}",
        "Progress".dimmed(),
        format_percent(view.progress),
        format_minutes(session.duration)
    );

    if view.is_completed {
        let _ = writeln!(output, "  {}", "Time is up!".green().bold());
    } else if session.status == SessionStatus::Paused {
        let _ = writeln!(output, "  {}", "Resume with 'pomosync resume'".dimmed());
    }

    output
}

/// Single-line countdown for in-place redraws in `watch`
pub fn format_countdown_line(session: Option<&Session>, view: &TimerView) -> String {
    let icon = session.map_or_else(|| "■".dimmed(), |s| status_icon(s.status));
    let label = session.map_or("idle", task_label);
    let time = if view.is_completed {
        view.formatted_time.green().bold()
    } else {
        view.formatted_time.bold()
    };

    format!(
        "{} {} {} {}  {}",
        icon,
        time,
        render_progress_bar(view.progress, BAR_WIDTH),
        format_percent(view.progress),
        label.dimmed()
    )
}

/// Format session history as a list
pub fn format_history_pretty(sessions: &[Session]) -> String {
    if sessions.is_empty() {
        return "Focus sessions (0)\n  No sessions".to_string();
    }

    let mut output = format!("Focus sessions ({})\n", sessions.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for session in sessions {
        let _ = writeln!(
            output,
            "{} {}  {:>10}  {}  {}",
            status_icon(session.status),
            session.started_at_local().format("%Y-%m-%d %H:%M"),
            format_minutes(session.duration),
            task_label(session).bold(),
            session.status.to_string().dimmed()
        );
    }

    output
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn format_percent(progress: f64) -> String {
    format!("{}%", (progress.clamp(0.0, 1.0) * 100.0).round() as u32)
}
