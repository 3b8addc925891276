//! In-memory doubles for the filesystem and command ports.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::domain::{AppError, ExternalCommand};
use crate::ports::{CommandOutput, CommandRunner, ProjectFilesystem};

/// In-memory project tree. Clones share state.
#[derive(Debug, Clone)]
pub struct MemoryProjectFilesystem {
    root: PathBuf,
    files: Arc<Mutex<BTreeMap<String, String>>>,
    executables: Arc<Mutex<BTreeSet<String>>>,
}

impl MemoryProjectFilesystem {
    pub fn new() -> Self {
        Self {
            root: PathBuf::from("/memory/app"),
            files: Arc::new(Mutex::new(BTreeMap::new())),
            executables: Arc::new(Mutex::new(BTreeSet::new())),
        }
    }

    pub fn seed(&self, path: &str, content: &str) {
        self.files.lock().unwrap().insert(path.to_string(), content.to_string());
    }

    pub fn contents(&self, path: &str) -> Option<String> {
        self.files.lock().unwrap().get(path).cloned()
    }

    pub fn is_executable(&self, path: &str) -> bool {
        self.executables.lock().unwrap().contains(path)
    }

    pub fn paths(&self) -> Vec<String> {
        self.files.lock().unwrap().keys().cloned().collect()
    }

    /// Full tree snapshot, for byte-for-byte comparisons between runs.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.files.lock().unwrap().clone()
    }
}

impl ProjectFilesystem for MemoryProjectFilesystem {
    fn root(&self) -> &Path {
        &self.root
    }

    fn file_exists(&self, path: &str) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    fn read_file(&self, path: &str) -> Result<String, AppError> {
        self.contents(path).ok_or_else(|| AppError::NotFound { path: path.to_string() })
    }

    fn write_file(&self, path: &str, content: &str) -> Result<(), AppError> {
        if path.split('/').any(|part| part == "..") {
            return Err(AppError::PathTraversal(path.to_string()));
        }
        self.seed(path, content);
        Ok(())
    }

    fn append_file(&self, path: &str, content: &str) -> Result<(), AppError> {
        let mut files = self.files.lock().unwrap();
        let existing =
            files.get_mut(path).ok_or_else(|| AppError::NotFound { path: path.to_string() })?;
        existing.push_str(content);
        Ok(())
    }

    fn remove_path(&self, path: &str) -> Result<bool, AppError> {
        let prefix = format!("{}/", path.trim_end_matches('/'));
        let mut files = self.files.lock().unwrap();
        let before = files.len();
        files.retain(|p, _| p != path && !p.starts_with(&prefix));
        Ok(files.len() != before)
    }

    fn set_executable(&self, path: &str) -> Result<(), AppError> {
        if !self.file_exists(path) {
            return Err(AppError::NotFound { path: path.to_string() });
        }
        self.executables.lock().unwrap().insert(path.to_string());
        Ok(())
    }
}

/// Command runner that records invocations and simulates generator side effects.
///
/// Commands are matched by prefix of their display string, so `"bin/rails generate"`
/// matches every generator call.
#[derive(Debug, Default)]
pub struct ScriptedCommandRunner {
    calls: Mutex<Vec<String>>,
    failures: HashMap<String, i32>,
    effects: Vec<(String, String, String)>,
    fs: Option<MemoryProjectFilesystem>,
}

impl ScriptedCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write simulated generator output into this filesystem.
    pub fn with_filesystem(mut self, fs: &MemoryProjectFilesystem) -> Self {
        self.fs = Some(fs.clone());
        self
    }

    /// Exit with `exit_code` when a command starting with `prefix` runs.
    pub fn fail_on(mut self, prefix: &str, exit_code: i32) -> Self {
        self.failures.insert(prefix.to_string(), exit_code);
        self
    }

    /// Write `path` when a command starting with `prefix` succeeds.
    pub fn creates(mut self, prefix: &str, path: &str, content: &str) -> Self {
        self.effects.push((prefix.to_string(), path.to_string(), content.to_string()));
        self
    }

    /// Simulate the skeleton `rails new` and the stock generators leave behind.
    pub fn rails_skeleton(self) -> Self {
        self.creates(
            "rails new",
            "Gemfile",
            "source \"https://rubygems.org\"\n\ngem \"rails\", \"~> 8.0.2\"\n",
        )
            .creates(
                "rails new",
                "config/routes.rb",
                "Rails.application.routes.draw do\n  \
                 get \"up\" => \"rails/health#show\", as: :rails_health_check\nend\n",
            )
            .creates(
                "rails new",
                "config/environments/development.rb",
                "require \"active_support/core_ext/integer/time\"\n\n\
                 Rails.application.configure do\n  config.enable_reloading = true\nend\n",
            )
            .creates(
                "rails new",
                "Procfile.dev",
                "web: env RUBY_DEBUG_OPEN=true bin/rails server\njs: bun run build --watch\n",
            )
            .creates("rails new", "test/test_helper.rb", "ENV[\"RAILS_ENV\"] ||= \"test\"\n")
            .creates(
                "bin/rails generate rspec:install",
                "spec/rails_helper.rb",
                "require 'spec_helper'\n\nRSpec.configure do |config|\n  \
                 config.use_transactional_fixtures = true\nend\n",
            )
            .creates(
                "bin/rails generate controller Welcome index",
                "app/views/welcome/index.html.erb",
                "<h1>Welcome#index</h1>\n<p>Find me in app/views/welcome/index.html.erb</p>\n",
            )
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn ran(&self, prefix: &str) -> bool {
        self.calls().iter().any(|c| c.starts_with(prefix))
    }
}

impl CommandRunner for ScriptedCommandRunner {
    fn run(&self, command: &ExternalCommand, _cwd: &Path) -> Result<CommandOutput, AppError> {
        let line = command.display();
        self.calls.lock().unwrap().push(line.clone());

        if let Some((_, code)) =
            self.failures.iter().find(|(prefix, _)| line.starts_with(prefix.as_str()))
        {
            return Ok(CommandOutput::exited(*code));
        }

        if let Some(fs) = &self.fs {
            for (prefix, path, content) in &self.effects {
                if line.starts_with(prefix.as_str()) {
                    fs.seed(path, content);
                }
            }
        }
        Ok(CommandOutput::success())
    }
}
