//! railsmith: Scaffold Rails applications by running an ordered sequence of checked steps.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

pub use app::api::{Plan, ScaffoldOptions, plan, scaffold, scaffold_with_runner, variants};
pub use app::config::{ContextOverrides, TemplateConfig};
pub use domain::{AppError, ExecutionReport, ExecutorState, ProjectContext, StepRegistry, Variant};
