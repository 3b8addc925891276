mod process_runner;
mod project_filesystem;
pub mod template_assets;

pub use process_runner::ProcessCommandRunner;
pub use project_filesystem::LocalProjectFilesystem;
pub use template_assets::TemplateAssets;
