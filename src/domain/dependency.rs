//! Gem declarations and their rendering into a Gemfile fragment.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::domain::AppError;

/// Bundler group a gem is declared for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyGroup {
    Runtime,
    Development,
    Test,
}

impl DependencyGroup {
    pub fn name(&self) -> &'static str {
        match self {
            DependencyGroup::Runtime => "runtime",
            DependencyGroup::Development => "development",
            DependencyGroup::Test => "test",
        }
    }
}

impl fmt::Display for DependencyGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single gem requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyDeclaration {
    pub name: String,
    pub version: Option<String>,
    pub group: DependencyGroup,
    /// `false` renders `require: false`.
    pub require: bool,
}

impl DependencyDeclaration {
    pub fn new(name: &str, group: DependencyGroup) -> Self {
        Self { name: name.to_string(), version: None, group, require: true }
    }

    pub fn version(mut self, constraint: &str) -> Self {
        self.version = Some(constraint.to_string());
        self
    }

    pub fn no_require(mut self) -> Self {
        self.require = false;
        self
    }

    fn gem_line(&self) -> String {
        let mut line = format!("gem \"{}\"", self.name);
        if let Some(version) = &self.version {
            line.push_str(&format!(", \"{}\"", version));
        }
        if !self.require {
            line.push_str(", require: false");
        }
        line
    }
}

/// Ordered set of declarations, unique by `(name, group)`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DependencyManifest {
    declarations: Vec<DependencyDeclaration>,
}

impl DependencyManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration; the same gem may not be declared twice for one group.
    ///
    /// A gem renders as a single Gemfile line, so every group it is declared for must agree
    /// on its version constraint and require option.
    pub fn declare(&mut self, declaration: DependencyDeclaration) -> Result<(), AppError> {
        for existing in self.declarations.iter().filter(|d| d.name == declaration.name) {
            if existing.group == declaration.group {
                return Err(AppError::DuplicateDependency {
                    name: declaration.name,
                    group: declaration.group.to_string(),
                });
            }
            if existing.version != declaration.version || existing.require != declaration.require
            {
                return Err(AppError::ConflictingDependency {
                    name: declaration.name.clone(),
                    existing: existing.gem_line(),
                    requested: declaration.gem_line(),
                });
            }
        }
        self.declarations.push(declaration);
        Ok(())
    }

    /// Declare one gem for several groups at once (`group :development, :test do`).
    pub fn declare_in(
        &mut self,
        groups: &[DependencyGroup],
        declaration: DependencyDeclaration,
    ) -> Result<(), AppError> {
        for group in groups {
            self.declare(DependencyDeclaration { group: *group, ..declaration.clone() })?;
        }
        Ok(())
    }

    pub fn declarations(&self) -> &[DependencyDeclaration] {
        &self.declarations
    }

    pub fn contains(&self, name: &str) -> bool {
        self.declarations.iter().any(|d| d.name == name)
    }

    /// Render the Gemfile fragment.
    ///
    /// Gems are bucketed by the set of groups they were declared in. Buckets appear in the
    /// order their first gem was declared; runtime-only gems render as bare `gem` lines.
    pub fn render(&self) -> String {
        let mut gems: Vec<(&DependencyDeclaration, BTreeSet<DependencyGroup>)> = Vec::new();
        for declaration in &self.declarations {
            match gems.iter_mut().find(|(d, _)| d.name == declaration.name) {
                Some((_, groups)) => {
                    groups.insert(declaration.group);
                }
                None => gems.push((declaration, BTreeSet::from([declaration.group]))),
            }
        }

        let mut buckets: Vec<(BTreeSet<DependencyGroup>, Vec<&DependencyDeclaration>)> =
            Vec::new();
        for (declaration, mut groups) in gems {
            // A runtime gem is loaded everywhere; narrower groups add nothing.
            if groups.contains(&DependencyGroup::Runtime) {
                groups = BTreeSet::from([DependencyGroup::Runtime]);
            }
            match buckets.iter_mut().find(|(g, _)| *g == groups) {
                Some((_, members)) => members.push(declaration),
                None => buckets.push((groups, vec![declaration])),
            }
        }

        let mut out = String::new();
        for (groups, members) in buckets {
            if groups.contains(&DependencyGroup::Runtime) {
                out.push('\n');
                for member in members {
                    out.push_str(&member.gem_line());
                    out.push('\n');
                }
                continue;
            }
            let names: Vec<String> = groups.iter().map(|g| format!(":{}", g.name())).collect();
            out.push_str(&format!("\ngroup {} do\n", names.join(", ")));
            for member in members {
                out.push_str("  ");
                out.push_str(&member.gem_line());
                out.push('\n');
            }
            out.push_str("end\n");
        }
        out
    }
}
