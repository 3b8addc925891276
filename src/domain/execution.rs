//! Executor state machine and the transient execution log.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{ActionOutcome, AppError, Variant};

/// Lifecycle of a single executor.
///
/// ```text
/// Idle -> Running -> Completed
///                 \-> Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutorState {
    Idle,
    Running,
    Completed,
    Failed,
}

impl ExecutorState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExecutorState::Completed | ExecutorState::Failed)
    }

    /// Validate and perform a transition.
    pub fn advance(self, next: ExecutorState) -> Result<ExecutorState, AppError> {
        let valid = matches!(
            (self, next),
            (ExecutorState::Idle, ExecutorState::Running)
                | (ExecutorState::Running, ExecutorState::Running)
                | (ExecutorState::Running, ExecutorState::Completed)
                | (ExecutorState::Running, ExecutorState::Failed)
        );
        if valid {
            Ok(next)
        } else {
            Err(AppError::InvalidTransition { from: self.to_string(), to: next.to_string() })
        }
    }
}

impl fmt::Display for ExecutorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExecutorState::Idle => "idle",
            ExecutorState::Running => "running",
            ExecutorState::Completed => "completed",
            ExecutorState::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// One executed action.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub step: String,
    pub action: String,
    pub outcome: ActionOutcome,
    /// SHA-256 of the file content after a file action, hex encoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    pub at: DateTime<Utc>,
}

/// Summary of a run, complete or not.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionReport {
    pub variant: Variant,
    pub root: PathBuf,
    pub state: ExecutorState,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub steps_completed: Vec<String>,
    pub entries: Vec<LogEntry>,
}

impl ExecutionReport {
    pub fn new(variant: Variant, root: PathBuf) -> Self {
        Self {
            variant,
            root,
            state: ExecutorState::Idle,
            started_at: Utc::now(),
            finished_at: None,
            steps_completed: Vec::new(),
            entries: Vec::new(),
        }
    }
}
