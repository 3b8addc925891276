use std::fmt;

use serde::Serialize;

use crate::domain::{Action, DependencyManifest, ExternalCommand, FileAction};

/// Execution phase of a step. Phases never go backwards within a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Generates the application skeleton (`rails new`).
    Bootstrap,
    /// Declares dependencies and pins versions before installation.
    Setup,
    /// The dependency-installation barrier (`bundle install`).
    Install,
    /// Everything that needs installed dependencies.
    PostInstall,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Bootstrap => "bootstrap",
            Phase::Setup => "setup",
            Phase::Install => "install",
            Phase::PostInstall => "post-install",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A named, ordered unit of work.
#[derive(Debug, Clone, Serialize)]
pub struct Step {
    pub name: String,
    /// Assigned by the registry on registration.
    pub ordinal: usize,
    pub phase: Phase,
    /// Status line printed when the step starts.
    pub announce: Option<String>,
    pub body: Vec<Action>,
}

impl Step {
    pub fn new(name: &str, phase: Phase) -> Self {
        Self { name: name.to_string(), ordinal: 0, phase, announce: None, body: Vec::new() }
    }

    pub fn announce(mut self, message: &str) -> Self {
        self.announce = Some(message.to_string());
        self
    }

    pub fn file(mut self, action: FileAction) -> Self {
        self.body.push(Action::File(action));
        self
    }

    pub fn remove(mut self, path: &str) -> Self {
        self.body.push(Action::Remove { path: path.to_string() });
        self
    }

    pub fn command(mut self, command: ExternalCommand) -> Self {
        self.body.push(Action::Command(command));
        self
    }

    pub fn dependencies(mut self, manifest: DependencyManifest) -> Self {
        self.body.push(Action::Dependencies(manifest));
        self
    }

    /// Push an action only when `condition` holds.
    pub fn when(mut self, condition: bool, action: Action) -> Self {
        if condition {
            self.body.push(action);
        }
        self
    }
}
