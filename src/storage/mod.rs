//! Storage layer for pomosync.
//!
//! SQLite-backed persistence for focus sessions.

mod database;
mod migrations;

pub use database::Database;
