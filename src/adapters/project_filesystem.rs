use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use crate::domain::AppError;
use crate::ports::ProjectFilesystem;

/// Filesystem-backed project tree rooted at a directory on disk.
#[derive(Debug, Clone)]
pub struct LocalProjectFilesystem {
    root: PathBuf,
}

impl LocalProjectFilesystem {
    /// Create a project filesystem for the given root directory.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Create the root directory if it does not exist yet.
    pub fn ensure_root(&self) -> Result<(), AppError> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Whether the root holds no entries (or does not exist).
    pub fn root_is_empty(&self) -> Result<bool, AppError> {
        if !self.root.exists() {
            return Ok(true);
        }
        Ok(fs::read_dir(&self.root)?.next().is_none())
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, AppError> {
        let full_path = self.root.join(path);
        self.validate_path_within_root(&full_path)?;
        Ok(full_path)
    }

    /// Validates that a path is within the project root.
    ///
    /// Uses logical normalization of `.` and `..` so that paths through directories that do
    /// not exist yet are still checked.
    fn validate_path_within_root(&self, path: &Path) -> Result<(), AppError> {
        let normalized_path = normalize_path(path);
        let normalized_root = normalize_path(&self.root);

        if !normalized_path.starts_with(&normalized_root) || normalized_path == normalized_root {
            return Err(AppError::PathTraversal(path.display().to_string()));
        }

        Ok(())
    }
}

impl ProjectFilesystem for LocalProjectFilesystem {
    fn root(&self) -> &Path {
        &self.root
    }

    fn file_exists(&self, path: &str) -> bool {
        match self.resolve(path) {
            Ok(full_path) => full_path.is_file(),
            Err(_) => false,
        }
    }

    fn read_file(&self, path: &str) -> Result<String, AppError> {
        let full_path = self.resolve(path)?;
        if !full_path.is_file() {
            return Err(AppError::NotFound { path: path.to_string() });
        }
        Ok(fs::read_to_string(full_path)?)
    }

    fn write_file(&self, path: &str, content: &str) -> Result<(), AppError> {
        let full_path = self.resolve(path)?;
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(full_path, content)?;
        Ok(())
    }

    fn append_file(&self, path: &str, content: &str) -> Result<(), AppError> {
        let full_path = self.resolve(path)?;
        if !full_path.is_file() {
            return Err(AppError::NotFound { path: path.to_string() });
        }
        let mut file = OpenOptions::new().append(true).open(full_path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }

    fn remove_path(&self, path: &str) -> Result<bool, AppError> {
        let full_path = self.resolve(path)?;
        // symlink_metadata so a dangling link still counts as present
        match fs::symlink_metadata(&full_path) {
            Ok(meta) if meta.is_dir() => fs::remove_dir_all(&full_path)?,
            Ok(_) => fs::remove_file(&full_path)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(err) => return Err(err.into()),
        }
        Ok(true)
    }

    fn set_executable(&self, path: &str) -> Result<(), AppError> {
        let full_path = self.resolve(path)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&full_path)?.permissions();
            perms.set_mode(0o755);
            fs::set_permissions(&full_path, perms)?;
        }
        #[cfg(not(unix))]
        let _ = full_path;
        Ok(())
    }
}

/// Normalize path by resolving `.` and `..` components logically.
/// This does not access the filesystem.
fn normalize_path(path: &Path) -> PathBuf {
    let mut components = path.components().peekable();
    let mut ret = if let Some(Component::RootDir) = components.peek() {
        components.next();
        PathBuf::from("/")
    } else {
        PathBuf::new()
    };

    for component in components {
        match component {
            Component::Prefix(..) | Component::RootDir => ret.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                ret.pop();
            }
            Component::Normal(c) => ret.push(c),
        }
    }
    ret
}
