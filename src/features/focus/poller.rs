//! Synchronization poller.
//!
//! Keeps the [`SessionCache`] aligned with the store of record while a
//! session is active and the host is visible. At most one polling loop runs
//! per poller; the loop stops itself when the session ends or a fetch fails,
//! and is never retried automatically.
//!
//! ```text
//!            start() / on_visible() with active session
//!   ┌──────┐ ───────────────────────────────────────────▶ ┌─────────┐
//!   │ Idle │                                              │ Polling │
//!   └──────┘ ◀─────────────────────────────────────────── └─────────┘
//!            no active session / fetch error / hidden / stop()
//! ```

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::cache::SessionCache;
use super::remote::RemoteStore;
use super::session::Session;
use super::visibility::{Visibility, VisibilityObserver};

/// Default time between fetches.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Whether a polling loop is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    Polling,
}

/// Result of a single poll step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Cache overwritten with a still-active session
    Refreshed,
    /// Host was hidden; nothing fetched
    SkippedHidden,
    /// Another fetch was outstanding; nothing fetched
    SkippedInFlight,
    /// Store reported no active session; polling stopped
    SessionEnded,
    /// Fetch failed; polling stopped
    FetchFailed,
    /// Poller was stopped while the fetch was outstanding; result discarded
    Superseded,
}

impl PollOutcome {
    /// Whether this outcome ends the polling loop.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::SessionEnded | Self::FetchFailed | Self::Superseded)
    }
}

/// Handle to the session poller.
///
/// Cloning yields another handle to the same poller. Build one at startup
/// and hand clones to whatever needs to start or stop it.
#[derive(Clone)]
pub struct SyncPoller {
    inner: Arc<Inner>,
}

struct Inner {
    remote: Arc<dyn RemoteStore>,
    cache: SessionCache,
    interval: Duration,
    visible: AtomicBool,
    in_flight: AtomicBool,
    /// Fetches that have not returned yet, whatever epoch started them
    outstanding: AtomicUsize,
    slot: Mutex<LoopSlot>,
}

/// Counts one outstanding fetch for as long as it lives.
struct FetchGuard<'a>(&'a AtomicUsize);

impl<'a> FetchGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
struct LoopSlot {
    handle: Option<JoinHandle<()>>,
    /// Bumped by `stop()`; fetches started under an older epoch are discarded
    epoch: u64,
}

impl LoopSlot {
    fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl SyncPoller {
    /// Create a poller with the default interval.
    #[must_use]
    pub fn new(remote: Arc<dyn RemoteStore>, cache: SessionCache) -> Self {
        Self::with_interval(remote, cache, DEFAULT_POLL_INTERVAL)
    }

    /// Create a poller with a custom interval.
    #[must_use]
    pub fn with_interval(
        remote: Arc<dyn RemoteStore>,
        cache: SessionCache,
        interval: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                remote,
                cache,
                interval: interval.max(MIN_POLL_INTERVAL),
                visible: AtomicBool::new(true),
                in_flight: AtomicBool::new(false),
                outstanding: AtomicUsize::new(0),
                slot: Mutex::new(LoopSlot::default()),
            }),
        }
    }

    /// The cache this poller writes to.
    #[must_use]
    pub fn cache(&self) -> &SessionCache {
        &self.inner.cache
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.inner.interval
    }

    #[must_use]
    pub fn state(&self) -> PollerState {
        if self.is_polling() {
            PollerState::Polling
        } else {
            PollerState::Idle
        }
    }

    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.inner.lock_slot().is_running()
    }

    /// Last visibility reported by the host.
    #[must_use]
    pub fn visibility(&self) -> Visibility {
        if self.inner.visible.load(Ordering::SeqCst) {
            Visibility::Visible
        } else {
            Visibility::Hidden
        }
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visibility().is_visible()
    }

    /// Start polling.
    ///
    /// Returns `true` if a new loop was spawned. Calling this while a loop is
    /// already running, while the host is hidden, or outside a tokio runtime
    /// does nothing and returns `false`.
    pub fn start(&self) -> bool {
        if !self.is_visible() {
            debug!("Host hidden, not starting poller");
            return false;
        }

        let Ok(runtime) = Handle::try_current() else {
            warn!("No async runtime available, cannot start poller");
            return false;
        };

        let mut slot = self.inner.lock_slot();
        if slot.is_running() {
            debug!("Poller already running");
            return false;
        }

        let epoch = slot.epoch;
        slot.handle = Some(runtime.spawn(Inner::run(Arc::clone(&self.inner), epoch)));
        info!(
            interval_ms = u64::try_from(self.inner.interval.as_millis()).unwrap_or(u64::MAX),
            "Started session polling"
        );
        true
    }

    /// Record a session that was just started or resumed elsewhere and begin
    /// polling for its updates.
    pub fn session_started(&self, session: Session) -> bool {
        debug!(session_id = %session.id, "Session started notification");
        self.inner.cache.set(Some(session));
        self.start()
    }

    /// Stop polling.
    ///
    /// Aborts the loop, drops its handle and clears the in-flight guard so a
    /// later `start()` is never blocked. A fetch already on the wire keeps
    /// running; until it returns, new steps skip instead of overlapping it.
    /// Safe to call when idle.
    pub fn stop(&self) {
        let mut slot = self.inner.lock_slot();
        slot.epoch = slot.epoch.wrapping_add(1);
        if let Some(handle) = slot.handle.take() {
            handle.abort();
            info!("Stopped session polling");
        }
        self.inner.in_flight.store(false, Ordering::SeqCst);
    }

    /// Run one poll step immediately, outside the regular schedule.
    ///
    /// Shares the in-flight guard with the loop. A terminal outcome stops the
    /// loop just as it would from a scheduled tick.
    pub async fn refresh(&self) -> PollOutcome {
        let epoch = self.inner.lock_slot().epoch;
        self.inner.poll_step(epoch).await
    }

    /// Start polling whenever an active session appears in the cache.
    ///
    /// The returned task runs until aborted. Must be called from within a
    /// tokio runtime.
    #[must_use]
    pub fn follow_cache(&self) -> JoinHandle<()> {
        let poller = self.clone();
        let mut rx = self.inner.cache.subscribe();

        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let active = rx.borrow_and_update().has_active_session();
                if active && !poller.is_polling() {
                    debug!("Active session appeared in cache");
                    poller.start();
                }
            }
        })
    }
}

impl VisibilityObserver for SyncPoller {
    fn on_visible(&self) {
        self.inner.visible.store(true, Ordering::SeqCst);
        if self.inner.cache.has_active_session() {
            self.start();
        }
    }

    fn on_hidden(&self) {
        self.inner.visible.store(false, Ordering::SeqCst);
        self.stop();
    }
}

impl std::fmt::Debug for SyncPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncPoller")
            .field("interval", &self.inner.interval)
            .field("state", &self.state())
            .field("visibility", &self.visibility())
            .finish_non_exhaustive()
    }
}

impl Inner {
    fn lock_slot(&self) -> MutexGuard<'_, LoopSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Tick forever; each tick runs a poll step as its own task so a slow
    /// fetch never delays the schedule. Terminal steps abort this task
    /// through the loop slot.
    async fn run(inner: Arc<Self>, epoch: u64) {
        let mut ticker = time::interval_at(Instant::now() + inner.interval, inner.interval);
        // After a suspension, fire once and realign instead of bursting
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            let step = Arc::clone(&inner);
            tokio::spawn(async move { step.poll_step(epoch).await });
        }
    }

    async fn poll_step(&self, epoch: u64) -> PollOutcome {
        if !self.visible.load(Ordering::SeqCst) {
            debug!("Host hidden, skipping poll");
            return PollOutcome::SkippedHidden;
        }
        if self.outstanding.load(Ordering::SeqCst) > 0 {
            debug!("Fetch from a stopped loop still outstanding, skipping poll");
            return PollOutcome::SkippedInFlight;
        }
        if self.in_flight.swap(true, Ordering::SeqCst) {
            debug!("Fetch already in flight, skipping poll");
            return PollOutcome::SkippedInFlight;
        }

        let result = {
            let _fetching = FetchGuard::enter(&self.outstanding);
            self.remote.fetch_active_session().await
        };

        let mut slot = self.lock_slot();
        if slot.epoch != epoch {
            // stop() already cleared the guard; it may belong to a newer fetch now
            debug!("Poller stopped during fetch, discarding result");
            return PollOutcome::Superseded;
        }
        self.in_flight.store(false, Ordering::SeqCst);

        let outcome = match result {
            Ok(Some(session)) if session.is_active() => {
                debug!(session_id = %session.id, status = ?session.status, "Session refreshed");
                self.cache.set(Some(session));
                PollOutcome::Refreshed
            }
            Ok(session) => {
                info!(
                    session_id = ?session.as_ref().map(|s| s.id.as_str()),
                    "No active session remains, stopping poller"
                );
                self.cache.set(session);
                PollOutcome::SessionEnded
            }
            Err(err) => {
                warn!(error = %err, "Session fetch failed, stopping poller");
                PollOutcome::FetchFailed
            }
        };

        if outcome.is_terminal() {
            if let Some(handle) = slot.handle.take() {
                handle.abort();
            }
        }
        outcome
    }
}
