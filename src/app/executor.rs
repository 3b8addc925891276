//! Sequential step executor.
//!
//! Runs every registered step in order on the calling thread. The first failing action
//! stops the run; nothing is retried or rolled back. Post-install steps only run once the
//! install step has completed.

use chrono::Utc;
use tracing::{debug, error, info};

use crate::app::primitives;
use crate::domain::{
    Action, AppError, ExecutionReport, ExecutorState, LogEntry, Phase, ProjectContext, Step,
    StepRegistry,
};
use crate::ports::{CommandRunner, ProjectFilesystem};

/// Drives a [`StepRegistry`] against a project through the action primitives.
pub struct Executor<'a, F: ?Sized, R: ?Sized> {
    fs: &'a F,
    runner: &'a R,
    state: ExecutorState,
    report: ExecutionReport,
    print_status: bool,
}

impl<'a, F, R> Executor<'a, F, R>
where
    F: ProjectFilesystem + ?Sized,
    R: CommandRunner + ?Sized,
{
    pub fn new(ctx: &ProjectContext, fs: &'a F, runner: &'a R) -> Self {
        Self {
            fs,
            runner,
            state: ExecutorState::Idle,
            report: ExecutionReport::new(ctx.variant, ctx.root().to_path_buf()),
            print_status: true,
        }
    }

    /// Suppress status lines on stdout; tracing output is unaffected.
    pub fn silent(mut self) -> Self {
        self.print_status = false;
        self
    }

    pub fn state(&self) -> ExecutorState {
        self.state
    }

    /// Log of everything executed so far, including after a failure.
    pub fn report(&self) -> &ExecutionReport {
        &self.report
    }

    /// Execute all steps in registration order.
    pub fn run(&mut self, registry: &StepRegistry) -> Result<ExecutionReport, AppError> {
        self.transition(ExecutorState::Running)?;
        self.report.started_at = Utc::now();
        info!(steps = registry.len(), variant = %self.report.variant, "starting run");

        match self.run_steps(registry) {
            Ok(()) => {
                self.transition(ExecutorState::Completed)?;
                info!("run completed");
                Ok(self.report.clone())
            }
            Err(err) => {
                self.transition(ExecutorState::Failed)?;
                error!(%err, "run failed");
                Err(err)
            }
        }
    }

    fn run_steps(&mut self, registry: &StepRegistry) -> Result<(), AppError> {
        let has_install = registry.install_step().is_some();
        let mut installed = false;

        for step in registry.all() {
            if step.phase == Phase::PostInstall && !installed {
                let reason = if has_install {
                    "dependency installation has not completed"
                } else {
                    "no dependency installation step is registered"
                };
                debug!(step = %step.name, reason, "barrier not satisfied");
                return Err(AppError::BarrierNotSatisfied(step.name.clone()));
            }

            self.transition(ExecutorState::Running)?;
            self.run_step(step)?;

            // An install step with no actions installs nothing.
            if step.phase == Phase::Install && !step.body.is_empty() {
                installed = true;
            }
            self.report.steps_completed.push(step.name.clone());
        }
        Ok(())
    }

    fn run_step(&mut self, step: &Step) -> Result<(), AppError> {
        if step.body.is_empty() {
            debug!(step = %step.name, "nothing to do");
            return Ok(());
        }
        info!(step = %step.name, ordinal = step.ordinal, phase = %step.phase, "running step");
        if let Some(message) = &step.announce {
            self.status(message);
        }

        for action in &step.body {
            let description = action.describe();
            let applied = primitives::apply(self.fs, self.runner, action)
                .map_err(|err| err.in_step(&step.name, &description))?;

            self.status(&format!("{:>12}  {}", applied.outcome.label(), status_target(action)));
            self.report.entries.push(LogEntry {
                step: step.name.clone(),
                action: description,
                outcome: applied.outcome,
                digest: applied.digest,
                at: Utc::now(),
            });
        }
        Ok(())
    }

    fn transition(&mut self, next: ExecutorState) -> Result<(), AppError> {
        self.state = self.state.advance(next)?;
        self.report.state = self.state;
        if self.state.is_terminal() {
            self.report.finished_at = Some(Utc::now());
        }
        Ok(())
    }

    fn status(&self, line: &str) {
        if self.print_status {
            println!("{}", line);
        }
    }
}

fn status_target(action: &Action) -> String {
    match action {
        Action::File(file) => file.path.clone(),
        Action::Remove { path } => path.clone(),
        Action::Command(command) => command.display(),
        Action::Dependencies(_) => primitives::GEMFILE.to_string(),
    }
}
