use crate::app::executor::Executor;
use crate::domain::ProjectContext;
use crate::ports::{CommandRunner, ProjectFilesystem};

/// Application context holding the project settings and the ports a run acts through.
pub struct AppContext<F: ProjectFilesystem, R: CommandRunner> {
    project: ProjectContext,
    filesystem: F,
    runner: R,
}

impl<F: ProjectFilesystem, R: CommandRunner> AppContext<F, R> {
    /// Create a new application context.
    pub fn new(project: ProjectContext, filesystem: F, runner: R) -> Self {
        Self { project, filesystem, runner }
    }

    /// Fresh executor bound to this context's ports.
    pub fn executor(&self) -> Executor<'_, F, R> {
        Executor::new(&self.project, &self.filesystem, &self.runner)
    }
}
