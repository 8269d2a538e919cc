//! Configuration settings for pomosync.
//!
//! Settings are loaded from `~/.pomosync/config.yaml`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cli::args::OutputFormat;
use crate::error::PomosyncError;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Default session lengths.
    pub focus: FocusConfig,
    /// Synchronization cadence.
    pub sync: SyncConfig,
    /// Log output.
    pub logging: LoggingConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default output format.
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    /// Color output setting.
    #[serde(default = "default_color")]
    pub color: ColorSetting,
}

/// Color output setting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorSetting {
    /// Auto-detect based on terminal.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

impl ColorSetting {
    /// Apply the setting to the `colored` crate's global override.
    pub fn apply(self) {
        match self {
            Self::Auto => colored::control::unset_override(),
            Self::Always => colored::control::set_override(true),
            Self::Never => colored::control::set_override(false),
        }
    }
}

/// Defaults for new focus sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
    /// Work length in minutes.
    #[serde(default = "default_duration")]
    pub duration_minutes: u32,
    /// Break length in minutes.
    #[serde(default = "default_break")]
    pub break_minutes: u32,
}

/// Synchronization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Seconds between fetches of the active session.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Milliseconds between countdown redraws in `watch`.
    #[serde(default = "default_display_refresh")]
    pub display_refresh_ms: u64,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when neither `RUST_LOG` nor `-v` is given.
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions for serde
const fn default_output_format() -> OutputFormat {
    OutputFormat::Pretty
}

const fn default_color() -> ColorSetting {
    ColorSetting::Auto
}

const fn default_duration() -> u32 {
    25
}

const fn default_break() -> u32 {
    5
}

const fn default_poll_interval() -> u64 {
    5
}

const fn default_display_refresh() -> u64 {
    1000
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: default_output_format(),
            color: default_color(),
        }
    }
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            duration_minutes: default_duration(),
            break_minutes: default_break(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            display_refresh_ms: default_display_refresh(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl SyncConfig {
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Redraw cadence, never faster than 50ms.
    #[must_use]
    pub fn display_refresh(&self) -> Duration {
        Duration::from_millis(self.display_refresh_ms.max(50))
    }
}

impl Config {
    /// Load configuration from a specific path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, PomosyncError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            PomosyncError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            PomosyncError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.general.default_output, OutputFormat::Pretty);
        assert_eq!(config.general.color, ColorSetting::Auto);
        assert_eq!(config.focus.duration_minutes, 25);
        assert_eq!(config.focus.break_minutes, 5);
        assert_eq!(config.sync.poll_interval(), Duration::from_secs(5));
        assert_eq!(config.sync.display_refresh(), Duration::from_secs(1));
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let config = Config::load_from_path(&config_path).unwrap();

        // Should return defaults when file doesn't exist
        assert_eq!(config.general.default_output, OutputFormat::Pretty);
    }

    #[test]
    fn test_partial_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let partial_yaml = r"
focus:
  duration_minutes: 45
sync:
  poll_interval_secs: 2
";
        std::fs::write(&config_path, partial_yaml).unwrap();

        let config = Config::load_from_path(&config_path).unwrap();

        assert_eq!(config.focus.duration_minutes, 45);
        assert_eq!(config.sync.poll_interval_secs, 2);
        // Defaults should be used for missing fields
        assert_eq!(config.focus.break_minutes, 5);
        assert_eq!(config.sync.display_refresh_ms, 1000);
        assert_eq!(config.general.default_output, OutputFormat::Pretty);
    }

    #[test]
    fn test_invalid_config_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        std::fs::write(&config_path, "general: [not, a, map]").unwrap();

        let err = Config::load_from_path(&config_path).unwrap_err();
        assert!(matches!(err, PomosyncError::Config(_)));
    }

    #[test]
    fn test_display_refresh_floor() {
        let sync = SyncConfig {
            poll_interval_secs: 5,
            display_refresh_ms: 1,
        };
        assert_eq!(sync.display_refresh(), Duration::from_millis(50));
    }

    #[test]
    fn test_json_output_and_color_parse() {
        let config: Config = serde_yaml::from_str(
            "general:\n  default_output: json\n  color: never\nlogging:\n  level: debug\n",
        )
        .unwrap();
        assert_eq!(config.general.default_output, OutputFormat::Json);
        assert_eq!(config.general.color, ColorSetting::Never);
        assert_eq!(config.logging.level, "debug");
    }
}
