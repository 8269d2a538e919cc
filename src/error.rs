//! Error types for pomosync.

use thiserror::Error;

/// All errors that can occur in pomosync operations.
#[derive(Debug, Error)]
pub enum PomosyncError {
    /// A session snapshot failed structural validation.
    #[error("Malformed session: {0}")]
    MalformedSession(String),

    /// The store of record could not be reached or answered with a failure.
    #[error("Remote store unavailable: {0}")]
    RemoteUnavailable(String),

    /// Configuration could not be read, parsed, or written.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local database failure.
    #[error("Database error: {0}")]
    Database(String),

    /// The requested item does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The action conflicts with the current session state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Input could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl PomosyncError {
    /// Whether this error came from the store of record rather than local input.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::RemoteUnavailable(_))
    }

    /// Process exit code for the CLI.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound(_) | Self::Conflict(_) => 2,
            Self::MalformedSession(_) | Self::Parse(_) | Self::Json(_) => 3,
            Self::RemoteUnavailable(_) | Self::Database(_) => 4,
            Self::Config(_) | Self::Io(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = PomosyncError::MalformedSession("duration must be positive".to_string());
        assert_eq!(err.to_string(), "Malformed session: duration must be positive");

        let err = PomosyncError::RemoteUnavailable("connection refused".to_string());
        assert_eq!(err.to_string(), "Remote store unavailable: connection refused");
    }

    #[test]
    fn test_is_remote() {
        assert!(PomosyncError::RemoteUnavailable("down".to_string()).is_remote());
        assert!(!PomosyncError::MalformedSession("bad".to_string()).is_remote());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(PomosyncError::NotFound("x".to_string()).exit_code(), 2);
        assert_eq!(PomosyncError::Database("x".to_string()).exit_code(), 4);
        assert_eq!(PomosyncError::Config("x".to_string()).exit_code(), 1);
    }
}
