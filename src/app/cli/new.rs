//! New command implementation.

use std::io::{ErrorKind, IsTerminal};
use std::path::{Path, PathBuf};

use dialoguer::{Confirm, Error as DialoguerError};

use super::plan::render_plan;
use super::{ContextArgs, OutputFormat};
use crate::app::api::{self, ScaffoldOptions};
use crate::domain::{AppError, ExecutionReport};

pub(super) struct NewArgs {
    pub(super) dir: PathBuf,
    pub(super) context: ContextArgs,
    pub(super) dry_run: bool,
    pub(super) yes: bool,
    pub(super) report: OutputFormat,
}

pub(super) fn run_new(args: NewArgs) -> Result<(), AppError> {
    let overrides = args.context.overrides();

    if args.dry_run {
        let plan = api::plan(&args.dir, args.context.config.as_deref(), &overrides)?;
        print!("{}", render_plan(&plan));
        return Ok(());
    }

    let allow_non_empty =
        args.yes || overrides.existing || api::target_is_empty(&args.dir)? || confirm(&args.dir)?;

    let options = ScaffoldOptions {
        root: args.dir,
        config: args.context.config,
        overrides,
        allow_non_empty,
        quiet_commands: args.report == OutputFormat::Json,
        print_status: args.report == OutputFormat::Text,
    };
    let report = api::scaffold(&options)?;

    match args.report {
        OutputFormat::Text => print_summary(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

/// Ask before writing into a directory that already has content. Non-interactive runs decline.
fn confirm(dir: &Path) -> Result<bool, AppError> {
    if !std::io::stdin().is_terminal() {
        return Ok(false);
    }
    let prompt = format!("{} is not empty. Scaffold into it anyway?", dir.display());
    match Confirm::new().with_prompt(prompt).default(false).interact_opt() {
        Ok(answer) => Ok(answer.unwrap_or(false)),
        Err(DialoguerError::IO(err)) if err.kind() == ErrorKind::Interrupted => Ok(false),
        Err(err) => Err(AppError::config_error(format!("Failed to read confirmation: {}", err))),
    }
}

fn print_summary(report: &ExecutionReport) {
    println!(
        "✅ Scaffolded {} app in {} ({} steps)",
        report.variant,
        report.root.display(),
        report.steps_completed.len()
    );
    if report.variant.has_frontend() {
        println!("To start your server, run `bin/dev`");
    } else {
        println!("To start your server, run `bin/rails server`");
    }
}
