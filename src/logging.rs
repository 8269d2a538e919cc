//! Diagnostic logging to stderr.

use tracing_subscriber::EnvFilter;

/// Filter directive for a `-v` count, or `None` when no flag was given.
#[must_use]
pub const fn verbosity_directive(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("pomosync=info"),
        2 => Some("pomosync=debug"),
        _ => Some("pomosync=trace"),
    }
}

/// Build the filter: `RUST_LOG` wins, then `-v`, then the configured level.
#[must_use]
pub fn build_filter(verbose: u8, configured: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = verbosity_directive(verbose)
            .map_or_else(|| format!("pomosync={configured}"), str::to_string);
        EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("pomosync=warn"))
    })
}

/// Install the global subscriber. Later calls are ignored.
pub fn init(verbose: u8, configured: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbose, configured))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_directive() {
        assert_eq!(verbosity_directive(0), None);
        assert_eq!(verbosity_directive(1), Some("pomosync=info"));
        assert_eq!(verbosity_directive(2), Some("pomosync=debug"));
        assert_eq!(verbosity_directive(9), Some("pomosync=trace"));
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(0, "warn");
        init(2, "debug");
    }
}
