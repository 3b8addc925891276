use std::path::Path;

use crate::domain::AppError;

/// File effects rooted at the project being scaffolded.
///
/// Every `path` is relative to [`ProjectFilesystem::root`]; implementations reject paths
/// that escape it.
pub trait ProjectFilesystem {
    /// Project root all paths resolve against.
    fn root(&self) -> &Path;

    fn file_exists(&self, path: &str) -> bool;

    fn read_file(&self, path: &str) -> Result<String, AppError>;

    /// Write `content`, creating parent directories as needed.
    fn write_file(&self, path: &str, content: &str) -> Result<(), AppError>;

    /// Append `content` to an existing file.
    fn append_file(&self, path: &str, content: &str) -> Result<(), AppError>;

    /// Remove a file or directory tree. Returns false if nothing was there.
    fn remove_path(&self, path: &str) -> Result<bool, AppError>;

    /// Mark a file executable.
    fn set_executable(&self, path: &str) -> Result<(), AppError>;
}
