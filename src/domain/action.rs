//! Action primitives as data: what a step does, before anything runs.

use std::fmt;

use serde::Serialize;

use crate::domain::DependencyManifest;

/// How a file action treats its target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum FileMode {
    /// Write a new file; an existing file with different content is a conflict.
    Create,
    /// Create or replace.
    Overwrite,
    /// Append to an existing file.
    Append,
    /// Insert after the first occurrence of `anchor` in an existing file.
    Inject { anchor: String },
}

/// A single file effect, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileAction {
    pub path: String,
    #[serde(flatten)]
    pub mode: FileMode,
    pub content: String,
    /// Mark the file executable (Unix 0o755) after writing.
    pub executable: bool,
}

impl FileAction {
    pub fn create(path: &str, content: impl Into<String>) -> Self {
        Self::with_mode(path, FileMode::Create, content)
    }

    pub fn overwrite(path: &str, content: impl Into<String>) -> Self {
        Self::with_mode(path, FileMode::Overwrite, content)
    }

    pub fn append(path: &str, content: impl Into<String>) -> Self {
        Self::with_mode(path, FileMode::Append, content)
    }

    pub fn inject_after(path: &str, anchor: &str, content: impl Into<String>) -> Self {
        Self::with_mode(path, FileMode::Inject { anchor: anchor.to_string() }, content)
    }

    pub fn executable(mut self) -> Self {
        self.executable = true;
        self
    }

    fn with_mode(path: &str, mode: FileMode, content: impl Into<String>) -> Self {
        Self { path: path.to_string(), mode, content: content.into(), executable: false }
    }
}

/// Delegation to an external program, run from the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalCommand {
    pub argv: Vec<String>,
    /// A non-zero exit aborts the run when set; otherwise it is only reported.
    pub must_succeed: bool,
}

impl ExternalCommand {
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { argv: argv.into_iter().map(Into::into).collect(), must_succeed: true }
    }

    /// Allow the command to fail without stopping the run.
    pub fn allow_failure(mut self) -> Self {
        self.must_succeed = false;
        self
    }

    pub fn program(&self) -> &str {
        self.argv.first().map(String::as_str).unwrap_or_default()
    }

    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or_default()
    }

    /// Shell-like rendering for logs and error messages.
    pub fn display(&self) -> String {
        self.argv
            .iter()
            .map(|arg| {
                if arg.is_empty() || arg.contains(char::is_whitespace) || arg.contains('\'') {
                    format!("\"{}\"", arg.replace('"', "\\\""))
                } else {
                    arg.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// One entry of a step body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Action {
    File(FileAction),
    /// Remove a file or directory tree; a missing path is not an error.
    Remove { path: String },
    Command(ExternalCommand),
    /// Render the declarations into the Gemfile.
    Dependencies(DependencyManifest),
}

impl Action {
    /// Short human description used in logs and failure messages.
    pub fn describe(&self) -> String {
        match self {
            Action::File(file) => match &file.mode {
                FileMode::Create => format!("create {}", file.path),
                FileMode::Overwrite => format!("write {}", file.path),
                FileMode::Append => format!("append to {}", file.path),
                FileMode::Inject { .. } => format!("inject into {}", file.path),
            },
            Action::Remove { path } => format!("remove {}", path),
            Action::Command(command) => format!("run `{}`", command.display()),
            Action::Dependencies(manifest) => {
                format!("declare {} gem(s) in Gemfile", manifest.declarations().len())
            }
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// What an executed action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    Created,
    Overwritten,
    /// Create target already held exactly this content.
    Identical,
    Appended,
    Injected,
    /// Injected content was already present after the anchor.
    Unchanged,
    Removed,
    /// Remove target did not exist.
    Missing,
    /// Command exited with this status; non-zero only when failure was allowed.
    Ran { exit_code: i32 },
}

impl ActionOutcome {
    pub fn label(&self) -> String {
        match self {
            ActionOutcome::Created => "create".into(),
            ActionOutcome::Overwritten => "force".into(),
            ActionOutcome::Identical => "identical".into(),
            ActionOutcome::Appended => "append".into(),
            ActionOutcome::Injected => "insert".into(),
            ActionOutcome::Unchanged => "unchanged".into(),
            ActionOutcome::Removed => "remove".into(),
            ActionOutcome::Missing => "missing".into(),
            ActionOutcome::Ran { exit_code: 0 } => "run".into(),
            ActionOutcome::Ran { exit_code } => format!("run (exit {})", exit_code),
        }
    }
}
