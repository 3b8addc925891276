//! Action primitives: the only code that touches the project tree or spawns processes.

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::domain::{
    Action, ActionOutcome, AppError, DependencyManifest, ExternalCommand, FileAction, FileMode,
    Insertion, insert_after_anchor,
};
use crate::ports::{CommandRunner, ProjectFilesystem};

pub const GEMFILE: &str = "Gemfile";
const GEMFILE_HEADER: &str = "source \"https://rubygems.org\"\n";

/// Result of one applied action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub outcome: ActionOutcome,
    /// SHA-256 of the file content after a file action.
    pub digest: Option<String>,
}

impl Applied {
    fn file(outcome: ActionOutcome, content: &str) -> Self {
        Self { outcome, digest: Some(sha256_hex(content)) }
    }

    fn bare(outcome: ActionOutcome) -> Self {
        Self { outcome, digest: None }
    }
}

/// Dispatch an action to its primitive.
pub fn apply<F, R>(fs: &F, runner: &R, action: &Action) -> Result<Applied, AppError>
where
    F: ProjectFilesystem + ?Sized,
    R: CommandRunner + ?Sized,
{
    match action {
        Action::File(file) => apply_file_action(fs, file),
        Action::Remove { path } => remove_path(fs, path).map(Applied::bare),
        Action::Command(command) => run_external_command(runner, fs, command).map(Applied::bare),
        Action::Dependencies(manifest) => declare_dependencies(fs, manifest),
    }
}

pub fn apply_file_action<F>(fs: &F, action: &FileAction) -> Result<Applied, AppError>
where
    F: ProjectFilesystem + ?Sized,
{
    let applied = match &action.mode {
        FileMode::Create => write_file(fs, &action.path, &action.content, false)?,
        FileMode::Overwrite => write_file(fs, &action.path, &action.content, true)?,
        FileMode::Append => append_to_file(fs, &action.path, &action.content)?,
        FileMode::Inject { anchor } => {
            inject_after(fs, &action.path, anchor, &action.content)?
        }
    };
    if action.executable {
        fs.set_executable(&action.path)?;
    }
    Ok(applied)
}

/// Write a file. Without `overwrite`, an existing file must already hold exactly `content`.
pub fn write_file<F>(
    fs: &F,
    path: &str,
    content: &str,
    overwrite: bool,
) -> Result<Applied, AppError>
where
    F: ProjectFilesystem + ?Sized,
{
    if fs.file_exists(path) {
        if !overwrite {
            if fs.read_file(path)? == content {
                return Ok(Applied::file(ActionOutcome::Identical, content));
            }
            return Err(AppError::PathConflict { path: path.to_string() });
        }
        fs.write_file(path, content)?;
        return Ok(Applied::file(ActionOutcome::Overwritten, content));
    }
    fs.write_file(path, content)?;
    Ok(Applied::file(ActionOutcome::Created, content))
}

pub fn append_to_file<F>(fs: &F, path: &str, content: &str) -> Result<Applied, AppError>
where
    F: ProjectFilesystem + ?Sized,
{
    if !fs.file_exists(path) {
        return Err(AppError::NotFound { path: path.to_string() });
    }
    fs.append_file(path, content)?;
    let updated = fs.read_file(path)?;
    Ok(Applied::file(ActionOutcome::Appended, &updated))
}

/// Insert `content` after the first occurrence of `anchor`; a repeat is a no-op.
pub fn inject_after<F>(fs: &F, path: &str, anchor: &str, content: &str) -> Result<Applied, AppError>
where
    F: ProjectFilesystem + ?Sized,
{
    if !fs.file_exists(path) {
        return Err(AppError::NotFound { path: path.to_string() });
    }
    let current = fs.read_file(path)?;
    match insert_after_anchor(&current, anchor, content) {
        Insertion::Applied(patched) => {
            fs.write_file(path, &patched)?;
            Ok(Applied::file(ActionOutcome::Injected, &patched))
        }
        Insertion::AlreadyPresent => {
            debug!(path, "injected content already present");
            Ok(Applied::file(ActionOutcome::Unchanged, &current))
        }
        Insertion::AnchorMissing => {
            Err(AppError::AnchorNotFound { path: path.to_string(), anchor: anchor.to_string() })
        }
    }
}

pub fn remove_path<F>(fs: &F, path: &str) -> Result<ActionOutcome, AppError>
where
    F: ProjectFilesystem + ?Sized,
{
    if fs.remove_path(path)? { Ok(ActionOutcome::Removed) } else { Ok(ActionOutcome::Missing) }
}

/// Run a command from the project root, blocking until it exits.
pub fn run_external_command<R, F>(
    runner: &R,
    fs: &F,
    command: &ExternalCommand,
) -> Result<ActionOutcome, AppError>
where
    R: CommandRunner + ?Sized,
    F: ProjectFilesystem + ?Sized,
{
    let output = runner.run(command, fs.root())?;
    if output.is_success() {
        return Ok(ActionOutcome::Ran { exit_code: 0 });
    }
    if command.must_succeed {
        return Err(AppError::CommandFailed {
            command: command.display(),
            exit_code: Some(output.exit_code),
            details: output.stderr,
        });
    }
    warn!(command = %command.display(), exit_code = output.exit_code, "command failed; continuing");
    Ok(ActionOutcome::Ran { exit_code: output.exit_code })
}

/// Append rendered declarations to the Gemfile, creating it when the project has none.
pub fn declare_dependencies<F>(fs: &F, manifest: &DependencyManifest) -> Result<Applied, AppError>
where
    F: ProjectFilesystem + ?Sized,
{
    let fragment = manifest.render();
    if !fs.file_exists(GEMFILE) {
        let content = format!("{}{}", GEMFILE_HEADER, fragment);
        fs.write_file(GEMFILE, &content)?;
        return Ok(Applied::file(ActionOutcome::Created, &content));
    }
    append_to_file(fs, GEMFILE, &fragment)
}

pub fn sha256_hex(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}
