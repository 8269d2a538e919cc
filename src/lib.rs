//! pomosync - a resumable focus session timer
//!
//! One focus session lives in a store of record. Consumers never count down
//! on their own: they derive the remaining time from the session's
//! timestamps, and a background poller keeps a local cache in step with the
//! store while a session is active.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod features;
pub mod logging;
pub mod output;
pub mod storage;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::PomosyncError;
pub use features::focus::{
    get_timer_view, RemoteStore, Session, SessionCache, SessionStatus, SyncPoller, TimerView,
};
