//! `railsmith.toml` loading and merging with command-line overrides.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::{AppError, DatabaseAdapter, ProjectContext, Variant};

/// File looked up in the current directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "railsmith.toml";

/// Template settings read from a TOML file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateConfig {
    pub variant: Option<Variant>,
    pub app_name: Option<String>,
    pub database: Option<DatabaseAdapter>,
    pub ruby_version: Option<String>,
    pub cors: Option<bool>,
    pub cors_origins: Option<String>,
    pub deploy: Option<bool>,
    pub git: Option<bool>,
}

/// Values given on the command line; `None` defers to the config file.
#[derive(Debug, Clone, Default)]
pub struct ContextOverrides {
    pub variant: Option<Variant>,
    pub app_name: Option<String>,
    pub database: Option<DatabaseAdapter>,
    pub ruby_version: Option<String>,
    pub cors: Option<bool>,
    pub deploy: Option<bool>,
    pub git: Option<bool>,
    pub existing: bool,
}

impl TemplateConfig {
    pub fn parse(content: &str) -> Result<Self, AppError> {
        let config: TemplateConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if let Some(version) = &self.ruby_version {
            validate_ruby_version(version)?;
        }
        if let Some(origins) = &self.cors_origins
            && (origins.is_empty() || origins.contains('\''))
        {
            return Err(AppError::config_error(format!("Invalid cors_origins '{}'", origins)));
        }
        Ok(())
    }
}

/// The version lands verbatim in `.ruby-version`, so only plain version strings pass.
fn validate_ruby_version(version: &str) -> Result<(), AppError> {
    let valid = !version.is_empty()
        && version.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    if !valid {
        return Err(AppError::config_error(format!("Invalid ruby_version '{}'", version)));
    }
    Ok(())
}

/// Load the template config from `path`, or from `railsmith.toml` in `cwd` when present.
pub fn load_config(path: Option<&Path>, cwd: &Path) -> Result<TemplateConfig, AppError> {
    let path: PathBuf = match path {
        Some(explicit) => {
            if !explicit.is_file() {
                return Err(AppError::config_error(format!(
                    "Config file not found: {}",
                    explicit.display()
                )));
            }
            explicit.to_path_buf()
        }
        None => {
            let candidate = cwd.join(DEFAULT_CONFIG_FILE);
            if !candidate.is_file() {
                return Ok(TemplateConfig::default());
            }
            candidate
        }
    };
    let content = fs::read_to_string(&path)?;
    TemplateConfig::parse(&content).map_err(|err| match err {
        AppError::TomlParseError(inner) => {
            AppError::config_error(format!("{}: {}", path.display(), inner))
        }
        other => other,
    })
}

/// Build the project context: command line first, then config file, then variant defaults.
pub fn resolve_context(
    root: PathBuf,
    config: &TemplateConfig,
    overrides: &ContextOverrides,
) -> Result<ProjectContext, AppError> {
    let variant = overrides.variant.or(config.variant).unwrap_or(Variant::Standard);
    let mut ctx = match overrides.app_name.as_ref().or(config.app_name.as_ref()) {
        Some(name) => ProjectContext::named(root, variant, name)?,
        None => ProjectContext::new(root, variant)?,
    };
    if let Some(database) = overrides.database.or(config.database) {
        ctx.database = database;
    }
    if let Some(version) = overrides.ruby_version.as_ref().or(config.ruby_version.as_ref()) {
        validate_ruby_version(version)?;
        ctx.ruby_version = version.clone();
    }
    if let Some(origins) = &config.cors_origins {
        ctx.cors_origins = origins.clone();
    }
    if let Some(cors) = overrides.cors.or(config.cors) {
        ctx.cors = cors;
    }
    if let Some(deploy) = overrides.deploy.or(config.deploy) {
        ctx.deploy = deploy;
    }
    if let Some(git) = overrides.git.or(config.git) {
        ctx.git = git;
    }
    ctx.bootstrap = !overrides.existing;
    Ok(ctx)
}
