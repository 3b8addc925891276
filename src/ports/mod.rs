mod command_runner;
mod project_filesystem;

pub use command_runner::{CommandOutput, CommandRunner};
pub use project_filesystem::ProjectFilesystem;
