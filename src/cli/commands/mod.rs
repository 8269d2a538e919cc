//! Command implementations for pomosync.
//!
//! Each handler returns the text to print; `main` does the printing.

mod completions;
mod focus;
mod watch;

pub use completions::completions;
pub use focus::{finish, history, pause, resume, start, status, StartOptions};
pub use watch::watch;
