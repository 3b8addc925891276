use std::path::Path;

use crate::domain::{AppError, ExternalCommand};

/// Result of a finished external process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit status; `-1` when the process was terminated by a signal.
    pub exit_code: i32,
    /// Captured stderr, empty when output was streamed to the terminal.
    pub stderr: String,
}

impl CommandOutput {
    pub fn success() -> Self {
        Self::default()
    }

    pub fn exited(exit_code: i32) -> Self {
        Self { exit_code, stderr: String::new() }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Capability to run delegated generator and version-control commands.
///
/// Implementations block until the process exits. An `Err` means the command could not be
/// started at all; a non-zero exit is reported through [`CommandOutput::exit_code`].
pub trait CommandRunner {
    fn run(&self, command: &ExternalCommand, cwd: &Path) -> Result<CommandOutput, AppError>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, command: &ExternalCommand, cwd: &Path) -> Result<CommandOutput, AppError> {
        (**self).run(command, cwd)
    }
}
