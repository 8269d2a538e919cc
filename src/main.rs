use clap::Parser;
use colored::Colorize;

use pomosync::cli::args::{Cli, Commands};
use pomosync::cli::commands::{self, StartOptions};
use pomosync::config::{Config, Paths};
use pomosync::error::PomosyncError;
use pomosync::features::focus::SqliteSessionStore;
use pomosync::logging;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

fn run() -> Result<(), PomosyncError> {
    let cli = Cli::parse();

    // Completions need neither config nor database
    if let Commands::Completions { shell } = cli.command {
        print!("{}", commands::completions(shell)?);
        return Ok(());
    }

    let mut paths = Paths::new()?;
    let config = Config::load_from_path(&paths.config_file)?;
    logging::init(cli.verbose, &config.logging.level);
    config.general.color.apply();

    if let Some(db) = cli.db {
        paths = paths.with_database(db);
    }
    paths.ensure_dirs()?;

    let format = cli.output.unwrap_or(config.general.default_output);
    let store = SqliteSessionStore::open_at(&paths.database)?;

    let output = match cli.command {
        Commands::Start {
            task,
            duration,
            break_time,
        } => commands::start(
            &store,
            &config.focus,
            StartOptions {
                task,
                duration,
                break_time,
            },
            format,
        )?,
        Commands::Pause => commands::pause(&store, format)?,
        Commands::Resume => commands::resume(&store, format)?,
        Commands::Finish => commands::finish(&store, format)?,
        Commands::Status => commands::status(&store, format)?,
        Commands::Watch => commands::watch(store, &config.sync, format)?,
        Commands::History { limit } => commands::history(&store, limit, format)?,
        Commands::Completions { .. } => String::new(),
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
