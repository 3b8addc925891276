//! Plan command implementation.

use std::path::Path;

use super::{ContextArgs, OutputFormat};
use crate::app::api::{self, Plan};
use crate::domain::AppError;

pub(super) fn run_plan(
    dir: &Path,
    context: &ContextArgs,
    format: OutputFormat,
) -> Result<(), AppError> {
    let plan = api::plan(dir, context.config.as_deref(), &context.overrides())?;
    match format {
        OutputFormat::Text => print!("{}", render_plan(&plan)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan.registry)?),
    }
    Ok(())
}

/// Human-readable listing of every step and its actions.
pub fn render_plan(plan: &Plan) -> String {
    let ctx = &plan.context;
    let mut out = format!(
        "Plan for {} ({}, {}) in {}\n",
        ctx.app_name,
        ctx.variant,
        ctx.database.name(),
        ctx.root().display()
    );
    for step in plan.registry.all() {
        out.push_str(&format!("{:>3}. {} [{}]\n", step.ordinal, step.name, step.phase));
        if step.body.is_empty() {
            out.push_str("       (nothing to do)\n");
        }
        for action in &step.body {
            out.push_str(&format!("       {}\n", action.describe()));
        }
    }
    out
}
