//! Configuration management for pomosync.
//!
//! This module handles loading configuration from `~/.pomosync/`.

mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{ColorSetting, Config, FocusConfig, GeneralConfig, LoggingConfig, SyncConfig};
