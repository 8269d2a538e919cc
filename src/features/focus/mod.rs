//! Focus sessions and their synchronized countdown.
//!
//! - `session`: the session entity as the store of record reports it
//! - `timer`: pure derivation of the countdown from timestamps
//! - `cache`: last-write-wins local slot that consumers observe
//! - `poller`: keeps the cache in step with the store while a session runs
//! - `store`: SQLite store of record and the session actions

pub mod cache;
pub mod poller;
pub mod remote;
pub mod session;
pub mod store;
pub mod timer;
pub mod visibility;

pub use cache::{CachedSnapshot, SessionCache};
pub use poller::{PollOutcome, PollerState, SyncPoller, DEFAULT_POLL_INTERVAL};
pub use remote::RemoteStore;
pub use session::{Session, SessionId, SessionRecord, SessionStatus};
pub use store::SqliteSessionStore;
pub use timer::{format_duration, format_mmss, get_timer_view, parse_duration, TimerView};
pub use visibility::{forward_visibility, Visibility, VisibilityEvent, VisibilityObserver};
