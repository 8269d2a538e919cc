//! Feature implementations for pomosync.

pub mod focus;
