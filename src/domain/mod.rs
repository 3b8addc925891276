pub mod action;
pub mod context;
pub mod dependency;
pub mod error;
pub mod execution;
pub mod patch;
pub mod registry;
pub mod step;

pub use action::{Action, ActionOutcome, ExternalCommand, FileAction, FileMode};
pub use context::{DatabaseAdapter, ProjectContext, Variant};
pub use dependency::{DependencyDeclaration, DependencyGroup, DependencyManifest};
pub use error::AppError;
pub use execution::{ExecutionReport, ExecutorState, LogEntry};
pub use patch::{Insertion, insert_after_anchor};
pub use registry::StepRegistry;
pub use step::{Phase, Step};
