//! API Facade for the application.
//!
//! Glues configuration, context creation and execution together for the CLI and for
//! library callers.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::adapters::{LocalProjectFilesystem, ProcessCommandRunner};
use crate::app::AppContext;
use crate::app::config::{ContextOverrides, load_config, resolve_context};
use crate::app::recipes;
use crate::domain::{AppError, ExecutionReport, ProjectContext, StepRegistry, Variant};
use crate::ports::CommandRunner;

/// Inputs for scaffolding a project.
#[derive(Debug, Clone, Default)]
pub struct ScaffoldOptions {
    pub root: PathBuf,
    pub config: Option<PathBuf>,
    pub overrides: ContextOverrides,
    /// Proceed even if the target directory already has content.
    pub allow_non_empty: bool,
    /// Capture child process output instead of streaming it.
    pub quiet_commands: bool,
    /// Print per-action status lines on stdout.
    pub print_status: bool,
}

/// A resolved context together with the steps it would run.
#[derive(Debug, Clone)]
pub struct Plan {
    pub context: ProjectContext,
    pub registry: StepRegistry,
}

/// Resolve configuration and build the step registry without executing anything.
pub fn plan(
    root: &Path,
    config: Option<&Path>,
    overrides: &ContextOverrides,
) -> Result<Plan, AppError> {
    let cwd = std::env::current_dir()?;
    let file_config = load_config(config, &cwd)?;
    let root = std::path::absolute(root)?;
    let context = resolve_context(root, &file_config, overrides)?;
    let registry = recipes::build_registry(&context)?;
    Ok(Plan { context, registry })
}

/// Scaffold a project on disk using real processes.
pub fn scaffold(options: &ScaffoldOptions) -> Result<ExecutionReport, AppError> {
    let runner = if options.quiet_commands {
        ProcessCommandRunner::quiet()
    } else {
        ProcessCommandRunner::new()
    };
    scaffold_with_runner(options, runner)
}

/// Scaffold a project on disk, delegating external commands to `runner`.
pub fn scaffold_with_runner<R: CommandRunner>(
    options: &ScaffoldOptions,
    runner: R,
) -> Result<ExecutionReport, AppError> {
    let Plan { context, registry } =
        plan(&options.root, options.config.as_deref(), &options.overrides)?;
    let filesystem = LocalProjectFilesystem::new(context.root().to_path_buf());

    if context.bootstrap {
        if !options.allow_non_empty && !filesystem.root_is_empty()? {
            return Err(AppError::TargetNotEmpty(context.root().display().to_string()));
        }
        filesystem.ensure_root()?;
    } else if !context.root().join("Gemfile").is_file() {
        return Err(AppError::config_error(format!(
            "No Rails application found at {} (Gemfile missing)",
            context.root().display()
        )));
    }

    info!(root = %context.root().display(), variant = %context.variant, "scaffolding");
    let app = AppContext::new(context, filesystem, runner);
    let mut executor = app.executor();
    if !options.print_status {
        executor = executor.silent();
    }
    executor.run(&registry)
}

/// Whether `root` is missing or has no entries.
pub fn target_is_empty(root: &Path) -> Result<bool, AppError> {
    LocalProjectFilesystem::new(root.to_path_buf()).root_is_empty()
}

/// All variants in listing order.
pub fn variants() -> &'static [Variant] {
    &Variant::ALL
}
