//! Local snapshot of the active session.
//!
//! A single observable slot shared by the poller, the timer derivation and
//! any display code. Writes are last-write-wins; every write bumps a version
//! counter so readers can tell whether they are looking at stale data.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use super::session::Session;
use super::timer::{get_timer_view, TimerView};
use crate::error::PomosyncError;

/// Contents of the cache slot at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CachedSnapshot {
    /// Last known session, `None` when there is no active session
    pub session: Option<Session>,
    /// Incremented on every write
    pub version: u64,
    /// When the slot was last written
    pub updated_at: Option<DateTime<Utc>>,
}

impl CachedSnapshot {
    #[must_use]
    pub fn has_active_session(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_active)
    }
}

/// Cloneable handle to the shared session slot.
#[derive(Debug, Clone)]
pub struct SessionCache {
    tx: Arc<watch::Sender<CachedSnapshot>>,
}

impl SessionCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(CachedSnapshot::default());
        Self { tx: Arc::new(tx) }
    }

    /// Create a cache seeded with a session.
    #[must_use]
    pub fn with_session(session: Option<Session>) -> Self {
        let cache = Self::new();
        if session.is_some() {
            cache.set(session);
        }
        cache
    }

    /// Current session, if any.
    #[must_use]
    pub fn get(&self) -> Option<Session> {
        self.tx.borrow().session.clone()
    }

    /// Current slot contents including version.
    #[must_use]
    pub fn snapshot(&self) -> CachedSnapshot {
        self.tx.borrow().clone()
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.tx.borrow().version
    }

    /// Whether the slot holds a running or paused session.
    #[must_use]
    pub fn has_active_session(&self) -> bool {
        self.tx.borrow().has_active_session()
    }

    /// Overwrite the slot. Returns the new version.
    pub fn set(&self, session: Option<Session>) -> u64 {
        let mut version = 0;
        self.tx.send_modify(|snapshot| {
            snapshot.version += 1;
            snapshot.session = session;
            snapshot.updated_at = Some(Utc::now());
            version = snapshot.version;
        });
        version
    }

    /// Empty the slot. Returns the new version.
    pub fn clear(&self) -> u64 {
        self.set(None)
    }

    /// Receive a notification on every write.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CachedSnapshot> {
        self.tx.subscribe()
    }

    /// Derive the timer view from the cached session.
    ///
    /// # Errors
    ///
    /// Returns `PomosyncError::MalformedSession` if the cached session is invalid.
    pub fn timer_view(&self, now: DateTime<Utc>) -> Result<TimerView, PomosyncError> {
        let snapshot = self.tx.borrow();
        get_timer_view(snapshot.session.as_ref(), now)
    }
}

impl Default for SessionCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::focus::session::{SessionId, SessionStatus};
    use chrono::Duration;

    fn session(id: &str) -> Session {
        Session::new(SessionId::new(id), "task", 25, 5, Utc::now())
    }

    #[test]
    fn test_new_cache_is_empty() {
        let cache = SessionCache::new();
        assert!(cache.get().is_none());
        assert_eq!(cache.version(), 0);
        assert!(!cache.has_active_session());
        assert!(cache.snapshot().updated_at.is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let cache = SessionCache::new();
        assert_eq!(cache.set(Some(session("a"))), 1);
        assert_eq!(cache.set(Some(session("b"))), 2);

        let current = cache.get().unwrap();
        assert_eq!(current.id.as_str(), "b");
        assert_eq!(cache.version(), 2);
    }

    #[test]
    fn test_clear_bumps_version() {
        let cache = SessionCache::with_session(Some(session("a")));
        assert_eq!(cache.version(), 1);
        assert_eq!(cache.clear(), 2);
        assert!(cache.get().is_none());
    }

    #[test]
    fn test_clones_share_the_slot() {
        let cache = SessionCache::new();
        let other = cache.clone();
        other.set(Some(session("shared")));
        assert_eq!(cache.get().unwrap().id.as_str(), "shared");
    }

    #[test]
    fn test_completed_session_is_not_active() {
        let mut done = session("a");
        done.status = SessionStatus::Completed;
        let cache = SessionCache::with_session(Some(done));
        assert!(cache.get().is_some());
        assert!(!cache.has_active_session());
    }

    #[test]
    fn test_timer_view_reads_cached_session() {
        let started = Utc::now();
        let cache = SessionCache::with_session(Some(Session::new(
            SessionId::new("a"),
            "task",
            25,
            5,
            started,
        )));
        let view = cache.timer_view(started + Duration::minutes(10)).unwrap();
        assert_eq!(view.formatted_time, "15:00");
    }

    #[tokio::test]
    async fn test_subscribers_see_writes() {
        let cache = SessionCache::new();
        let mut rx = cache.subscribe();

        cache.set(Some(session("a")));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().version, 1);
    }
}
