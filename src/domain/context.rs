//! Explicit project context consulted by every step body.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::AppError;

/// Ruby version pinned in `.ruby-version` when none is configured.
pub const DEFAULT_RUBY_VERSION: &str = "3.4.4";

/// CORS origin written into the initializer when none is configured.
pub const DEFAULT_CORS_ORIGINS: &str = "*";

/// The template variants this tool can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// PostgreSQL, Bun, Tailwind through postcss, Kamal, Welcome landing page.
    Standard,
    /// API-only application with CORS and a health route.
    Api,
    /// Importmap with the tailwindcss-rails gem and a Welcome landing page.
    TailwindRails,
}

impl Variant {
    /// All variants in listing order.
    pub const ALL: [Variant; 3] = [Variant::Standard, Variant::Api, Variant::TailwindRails];

    pub fn name(&self) -> &'static str {
        match self {
            Variant::Standard => "standard",
            Variant::Api => "api",
            Variant::TailwindRails => "tailwind-rails",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Variant::Standard => {
                "PostgreSQL, Bun, Tailwind via postcss, RSpec, Kamal and a Welcome landing page"
            }
            Variant::Api => "API-only app with rack-cors, RSpec, Kamal and a health root route",
            Variant::TailwindRails => {
                "Importmap with the tailwindcss-rails gem, RSpec and a Welcome landing page"
            }
        }
    }

    /// Parse a variant from its CLI name.
    pub fn from_name(name: &str) -> Option<Variant> {
        match name.to_lowercase().as_str() {
            "standard" | "default" => Some(Variant::Standard),
            "api" => Some(Variant::Api),
            "tailwind-rails" | "tailwind_rails" | "classic" => Some(Variant::TailwindRails),
            _ => None,
        }
    }

    /// Whether this variant serves HTML and therefore gets CSS tooling and a landing page.
    pub fn has_frontend(&self) -> bool {
        !matches!(self, Variant::Api)
    }

    /// CORS is on by default for variants that expect cross-origin API clients.
    pub fn default_cors(&self) -> bool {
        !matches!(self, Variant::TailwindRails)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Database adapter handed to `rails new -d`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseAdapter {
    #[default]
    Postgresql,
    Mysql,
    Sqlite3,
}

impl DatabaseAdapter {
    pub fn name(&self) -> &'static str {
        match self {
            DatabaseAdapter::Postgresql => "postgresql",
            DatabaseAdapter::Mysql => "mysql",
            DatabaseAdapter::Sqlite3 => "sqlite3",
        }
    }

    pub fn from_name(name: &str) -> Option<DatabaseAdapter> {
        match name.to_lowercase().as_str() {
            "postgresql" | "postgres" | "pg" => Some(DatabaseAdapter::Postgresql),
            "mysql" => Some(DatabaseAdapter::Mysql),
            "sqlite3" | "sqlite" => Some(DatabaseAdapter::Sqlite3),
            _ => None,
        }
    }
}

impl fmt::Display for DatabaseAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything a step body may consult: where the project lives and which flags were chosen.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectContext {
    root: PathBuf,
    pub app_name: String,
    pub variant: Variant,
    pub database: DatabaseAdapter,
    pub ruby_version: String,
    pub cors: bool,
    pub cors_origins: String,
    pub deploy: bool,
    pub git: bool,
    /// Run `rails new` first; false when applying to an existing application.
    pub bootstrap: bool,
}

impl ProjectContext {
    /// Create a context with the variant's defaults. The app name comes from the root's
    /// final path component.
    pub fn new(root: PathBuf, variant: Variant) -> Result<Self, AppError> {
        let app_name = app_name_from_root(&root)?;
        Self::named(root, variant, &app_name)
    }

    /// Create a context with an explicit app name, independent of the root's name.
    pub fn named(root: PathBuf, variant: Variant, app_name: &str) -> Result<Self, AppError> {
        validate_app_name(app_name)?;
        Ok(Self {
            root,
            app_name: app_name.to_string(),
            variant,
            database: DatabaseAdapter::default(),
            ruby_version: DEFAULT_RUBY_VERSION.to_string(),
            cors: variant.default_cors(),
            cors_origins: DEFAULT_CORS_ORIGINS.to_string(),
            deploy: true,
            git: true,
            bootstrap: true,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn app_name_from_root(root: &Path) -> Result<String, AppError> {
    let name = root.file_name().map(|n| n.to_string_lossy().to_string()).ok_or_else(|| {
        AppError::config_error(format!("Cannot derive an app name from {}", root.display()))
    })?;
    Ok(name)
}

fn validate_app_name(name: &str) -> Result<(), AppError> {
    let valid = name.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
        return Err(AppError::config_error(format!(
            "Invalid app name '{}': must start with a letter and contain only letters, \
             digits, '-' or '_'",
            name
        )));
    }
    Ok(())
}
