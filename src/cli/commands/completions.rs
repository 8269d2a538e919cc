//! Shell completions generation.

use std::io::Write;

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::args::Cli;
use crate::error::PomosyncError;

/// Generate the completion script for `shell`.
///
/// # Errors
///
/// Returns `PomosyncError::Parse` if the generated script is not UTF-8.
pub fn completions(shell: Shell) -> Result<String, PomosyncError> {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    generate_to(&mut buf, shell, &mut cmd);
    String::from_utf8(buf).map_err(|e| PomosyncError::Parse(format!("UTF-8 error: {e}")))
}

fn generate_to<W: Write>(buf: &mut W, shell: Shell, cmd: &mut clap::Command) {
    clap_complete::generate(shell, cmd, "pomosync", buf);
}
