use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "pomosync")]
#[command(about = "A resumable focus timer backed by a single store of record")]
#[command(long_about = "pomosync - a focus session timer

One session at a time lives in the store of record. Every view derives the
countdown from the session's timestamps, so closing the terminal, suspending
the machine, or watching from a second shell never drifts the timer.

QUICK START:
  pomosync start              Start a 25-minute session
  pomosync watch              Live countdown that follows the store
  pomosync pause / resume     Pause and resume the running session
  pomosync finish             Complete the session

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

For more information on a specific command, run:
  pomosync <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output,
    /// or 'json' for machine-readable output suitable for scripting.
    /// Defaults to `general.default_output` from the config file.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Session database to use instead of ~/.pomosync/pomosync.db
    #[arg(long, global = true, env = "POMOSYNC_DB")]
    pub db: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start a new focus session
    ///
    /// Fails if a session is already running or paused.
    ///
    /// # Examples
    ///
    ///   pomosync start                     25-minute session
    ///   pomosync start --task ABC123       Attach to a task
    ///   pomosync start -d 50m --break 10m  Longer session and break
    Start {
        /// Task ID the session belongs to
        #[arg(long, short = 't')]
        task: Option<String>,

        /// Session duration (e.g., 25m, 1h, 50). Rounded up to whole minutes.
        #[arg(long, short = 'd')]
        duration: Option<String>,

        /// Break duration that follows the session (e.g., 5m)
        #[arg(long = "break", short = 'b')]
        break_time: Option<String>,
    },

    /// Pause the running session
    Pause,

    /// Resume the paused session
    Resume,

    /// Complete the active session
    #[command(alias = "stop")]
    Finish,

    /// Show the active session and its countdown
    #[command(alias = "s")]
    Status,

    /// Live countdown that stays in step with the store
    ///
    /// Polls the store every `sync.poll_interval_secs` and redraws every
    /// `sync.display_refresh_ms`. Exits when no session is active any more,
    /// or on Ctrl-C.
    #[command(alias = "w")]
    Watch,

    /// List past sessions, newest first
    History {
        /// Maximum number of sessions to show
        #[arg(long, short = 'n', default_value = "10")]
        limit: usize,
    },

    /// Generate shell completion scripts
    ///
    /// # Examples
    ///
    ///   pomosync completions zsh > ~/.zsh/completions/_pomosync
    ///   source <(pomosync completions bash)
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_start_defaults() {
        let cli = Cli::try_parse_from(["pomosync", "start"]).unwrap();
        if let Commands::Start {
            task,
            duration,
            break_time,
        } = cli.command
        {
            assert!(task.is_none());
            assert!(duration.is_none());
            assert!(break_time.is_none());
        } else {
            panic!("Expected Start command");
        }
        assert!(cli.output.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_cli_start_with_options() {
        let cli = Cli::try_parse_from([
            "pomosync", "start", "--task", "ABC", "-d", "50m", "--break", "10m",
        ])
        .unwrap();
        if let Commands::Start {
            task,
            duration,
            break_time,
        } = cli.command
        {
            assert_eq!(task.as_deref(), Some("ABC"));
            assert_eq!(duration.as_deref(), Some("50m"));
            assert_eq!(break_time.as_deref(), Some("10m"));
        } else {
            panic!("Expected Start command");
        }
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["pomosync", "status", "-o", "json", "--db", "/tmp/x.db", "-vv"])
                .unwrap();
        assert!(matches!(cli.command, Commands::Status));
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_finish_alias() {
        let cli = Cli::try_parse_from(["pomosync", "stop"]).unwrap();
        assert!(matches!(cli.command, Commands::Finish));
    }

    #[test]
    fn test_cli_history_limit() {
        let cli = Cli::try_parse_from(["pomosync", "history"]).unwrap();
        assert!(matches!(cli.command, Commands::History { limit: 10 }));

        let cli = Cli::try_parse_from(["pomosync", "history", "-n", "3"]).unwrap();
        assert!(matches!(cli.command, Commands::History { limit: 3 }));
    }

    #[test]
    fn test_cli_completions() {
        let cli = Cli::try_parse_from(["pomosync", "completions", "zsh"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Completions { shell: Shell::Zsh }
        ));
        assert!(Cli::try_parse_from(["pomosync", "completions", "tcsh"]).is_err());
    }

    #[test]
    fn test_cli_unknown_output_rejected() {
        assert!(Cli::try_parse_from(["pomosync", "status", "-o", "xml"]).is_err());
    }
}
