use std::io;

use thiserror::Error;

/// Library-wide error type for railsmith operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration or environment issue.
    #[error("{0}")]
    Configuration(String),

    /// Target file exists and the action was not allowed to replace it.
    #[error("{path} already exists with different content")]
    PathConflict { path: String },

    /// A file the action expected to find is missing.
    #[error("{path} not found")]
    NotFound { path: String },

    /// Injection anchor is absent from the target file.
    #[error("anchor {anchor:?} not found in {path}")]
    AnchorNotFound { path: String, anchor: String },

    /// Delegated external command failed or could not be started.
    #[error("{}", describe_command_failure(command, *exit_code, details))]
    CommandFailed { command: String, exit_code: Option<i32>, details: String },

    /// Path resolves outside the project root.
    #[error("Path escapes the project root: {0}")]
    PathTraversal(String),

    /// The same dependency was declared twice for one group.
    #[error("Dependency '{name}' is already declared for group '{group}'")]
    DuplicateDependency { name: String, group: String },

    /// A gem was redeclared with a different version or require option.
    #[error("Dependency '{name}' conflicts with an earlier declaration: {existing} vs {requested}")]
    ConflictingDependency { name: String, existing: String, requested: String },

    /// Two steps share a name.
    #[error("Step '{0}' is already registered")]
    DuplicateStep(String),

    /// Step registered into an earlier phase than its predecessor.
    #[error("Step '{step}' ({phase}) cannot follow a {previous} step")]
    PhaseOrder { step: String, phase: String, previous: String },

    /// More than one dependency-installation step registered.
    #[error("Step '{step}' is a second install step; '{existing}' already installs dependencies")]
    DuplicateInstallStep { step: String, existing: String },

    /// A post-install step is about to run without a completed install step.
    #[error("Step '{0}' requires dependency installation to complete first")]
    BarrierNotSatisfied(String),

    /// Executor was driven through an invalid state transition.
    #[error("Invalid executor transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// Embedded template asset failed to load or render.
    #[error("Template error in {path}: {details}")]
    Template { path: String, details: String },

    /// Unknown template variant requested.
    #[error("Unknown variant '{0}': must be one of standard, api, tailwind-rails")]
    UnknownVariant(String),

    /// Target directory already has content and the operator did not confirm.
    #[error("{0} is not empty; pass --yes to scaffold into it anyway")]
    TargetNotEmpty(String),

    /// An action failed inside a step; the run stopped there.
    #[error("Step '{step}' failed at {action}: {source}")]
    StepFailed {
        step: String,
        action: String,
        #[source]
        source: Box<AppError>,
    },

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn describe_command_failure(command: &str, exit_code: Option<i32>, details: &str) -> String {
    let mut message = match exit_code {
        Some(code) => format!("'{}' exited with status {}", command, code),
        None => format!("'{}' could not be started", command),
    };
    if !details.is_empty() {
        message.push_str(": ");
        message.push_str(details);
    }
    message
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

    /// Wrap an action failure with the step and action that produced it.
    pub fn in_step(self, step: &str, action: &str) -> Self {
        AppError::StepFailed {
            step: step.to_string(),
            action: action.to_string(),
            source: Box::new(self),
        }
    }

    /// Innermost error, unwrapping any step context.
    pub fn root_cause(&self) -> &AppError {
        match self {
            AppError::StepFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Provide an `io::ErrorKind`-like view for callers expecting legacy behavior.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            AppError::Io(err) => err.kind(),
            AppError::Configuration(_)
            | AppError::DuplicateDependency { .. }
            | AppError::ConflictingDependency { .. }
            | AppError::DuplicateStep(_)
            | AppError::PhaseOrder { .. }
            | AppError::DuplicateInstallStep { .. }
            | AppError::Template { .. }
            | AppError::UnknownVariant(_)
            | AppError::TomlParseError(_) => io::ErrorKind::InvalidInput,
            AppError::NotFound { .. } | AppError::AnchorNotFound { .. } => io::ErrorKind::NotFound,
            AppError::PathConflict { .. } | AppError::TargetNotEmpty(_) => {
                io::ErrorKind::AlreadyExists
            }
            AppError::PathTraversal(_) => io::ErrorKind::PermissionDenied,
            AppError::CommandFailed { .. }
            | AppError::BarrierNotSatisfied(_)
            | AppError::InvalidTransition { .. }
            | AppError::Json(_) => io::ErrorKind::Other,
            AppError::StepFailed { source, .. } => source.kind(),
        }
    }
}
