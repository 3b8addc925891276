use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::domain::{AppError, ExternalCommand};
use crate::ports::{CommandOutput, CommandRunner};

/// Runs external commands as child processes and waits for them.
#[derive(Debug, Clone, Default)]
pub struct ProcessCommandRunner {
    /// Capture child output instead of streaming it to the terminal.
    quiet: bool,
}

impl ProcessCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture stdout/stderr so that only railsmith's own output reaches the terminal.
    pub fn quiet() -> Self {
        Self { quiet: true }
    }
}

/// Resolve `bin/rails`-style program paths against the working directory; bare names are
/// left to `PATH` lookup.
fn resolve_program(program: &str, cwd: &Path) -> PathBuf {
    let path = Path::new(program);
    if path.is_relative() && path.components().count() > 1 {
        cwd.join(path)
    } else {
        path.to_path_buf()
    }
}

impl CommandRunner for ProcessCommandRunner {
    fn run(&self, command: &ExternalCommand, cwd: &Path) -> Result<CommandOutput, AppError> {
        if command.argv.is_empty() {
            return Err(AppError::config_error("External command has no program"));
        }

        let program = resolve_program(command.program(), cwd);
        debug!(program = %program.display(), cwd = %cwd.display(), "spawning");

        let mut process = Command::new(&program);
        process.args(command.args()).current_dir(cwd).stdin(Stdio::null());
        if self.quiet {
            process.stdout(Stdio::piped()).stderr(Stdio::piped());
        } else {
            process.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        }

        let output = process.output().map_err(|e| AppError::CommandFailed {
            command: command.display(),
            exit_code: None,
            details: e.to_string(),
        })?;

        let stderr = if self.quiet {
            String::from_utf8_lossy(&output.stderr).trim().to_string()
        } else {
            String::new()
        };

        Ok(CommandOutput { exit_code: output.status.code().unwrap_or(-1), stderr })
    }
}
