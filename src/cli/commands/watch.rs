//! Live countdown.
//!
//! Composition root for the synchronization pieces: seeds the cache from the
//! store, lets the poller keep it fresh, and redraws the derived countdown
//! until the session ends or the user interrupts.

use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::json;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, warn};

use crate::cli::args::OutputFormat;
use crate::config::SyncConfig;
use crate::error::PomosyncError;
use crate::features::focus::{
    get_timer_view, RemoteStore, Session, SessionCache, SessionStatus, SqliteSessionStore,
    SyncPoller, TimerView,
};
use crate::output::{format_countdown_line, format_status};

/// Redraw and poll cadence for [`follow`].
#[derive(Debug, Clone, Copy)]
pub struct Timing {
    pub poll: Duration,
    pub redraw: Duration,
}

impl From<&SyncConfig> for Timing {
    fn from(config: &SyncConfig) -> Self {
        Self {
            poll: config.poll_interval(),
            redraw: config.display_refresh(),
        }
    }
}

/// Follow the active session until it ends or Ctrl-C is pressed.
///
/// # Errors
///
/// Returns an error if the runtime cannot be built, the store cannot be
/// reached, or polling stops after a failed fetch.
pub fn watch(
    store: SqliteSessionStore,
    sync: &SyncConfig,
    format: OutputFormat,
) -> Result<String, PomosyncError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let remote: Arc<dyn RemoteStore> = Arc::new(store);
    let timing = Timing::from(sync);

    runtime.block_on(async move {
        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Cannot listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        };
        follow(remote, timing, format, &mut std::io::stdout(), shutdown).await
    })
}

/// Drive the countdown, writing redraws to `out` until the session ends,
/// polling stops, or `shutdown` resolves.
pub(crate) async fn follow<W, F>(
    remote: Arc<dyn RemoteStore>,
    timing: Timing,
    format: OutputFormat,
    out: &mut W,
    shutdown: F,
) -> Result<String, PomosyncError>
where
    W: Write,
    F: Future<Output = ()>,
{
    let cache = SessionCache::with_session(remote.fetch_active_session().await?);
    if !cache.has_active_session() {
        let session = cache.get();
        let view = get_timer_view(session.as_ref(), Utc::now())?;
        return format_status(session.as_ref(), &view, format);
    }

    let poller = SyncPoller::with_interval(remote, cache.clone(), timing.poll);
    let follower = poller.follow_cache();
    poller.start();

    let mut redraw = time::interval(timing.redraw);
    redraw.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    let mut last_frame = String::new();
    let mut interrupted = false;
    let result = loop {
        tokio::select! {
            () = &mut shutdown => {
                interrupted = true;
                break Ok(());
            }
            _ = redraw.tick() => {
                match redraw_once(&cache, &poller, format, out, &mut last_frame) {
                    Ok(true) => {}
                    Ok(false) => break Ok(()),
                    Err(e) => break Err(e),
                }
            }
        }
    };

    poller.stop();
    follower.abort();
    if format == OutputFormat::Pretty && !last_frame.is_empty() {
        writeln!(out)?;
    }
    result?;

    let last = cache.get();
    if interrupted {
        debug!("Watch interrupted");
        return Ok(summary(format, "Stopped watching"));
    }

    match last {
        Some(session) if session.is_active() => Err(PomosyncError::RemoteUnavailable(
            "Lost contact with the session store; run 'pomosync watch' again".to_string(),
        )),
        Some(Session {
            status: SessionStatus::Completed,
            ..
        }) => Ok(summary(format, "Session completed")),
        _ => Ok(summary(format, "Session ended")),
    }
}

/// Draw the current frame if it changed. Returns whether to keep going.
fn redraw_once<W: Write>(
    cache: &SessionCache,
    poller: &SyncPoller,
    format: OutputFormat,
    out: &mut W,
    last_frame: &mut String,
) -> Result<bool, PomosyncError> {
    let snapshot = cache.snapshot();
    let view = get_timer_view(snapshot.session.as_ref(), Utc::now())?;
    let frame = render_frame(snapshot.session.as_ref(), &view, format)?;
    if frame != *last_frame {
        draw(out, &frame, format)?;
        *last_frame = frame;
    }
    Ok(poller.is_polling())
}

fn render_frame(
    session: Option<&Session>,
    view: &TimerView,
    format: OutputFormat,
) -> Result<String, PomosyncError> {
    match format {
        OutputFormat::Pretty => Ok(format_countdown_line(session, view)),
        OutputFormat::Json => Ok(serde_json::to_string(&json!({
            "session": session,
            "timer": view,
        }))?),
    }
}

fn draw<W: Write>(out: &mut W, frame: &str, format: OutputFormat) -> Result<(), PomosyncError> {
    match format {
        // Carriage return plus clear-to-end-of-line redraws in place
        OutputFormat::Pretty => write!(out, "\r{frame}\x1b[K")?,
        OutputFormat::Json => writeln!(out, "{frame}")?,
    }
    out.flush()?;
    Ok(())
}

fn summary(format: OutputFormat, message: &str) -> String {
    match format {
        OutputFormat::Pretty => message.to_string(),
        OutputFormat::Json => String::new(),
    }
}
