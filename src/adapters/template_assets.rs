use include_dir::{Dir, DirEntry, include_dir};
use minijinja::{Environment, UndefinedBehavior, Value, context};

use crate::domain::{AppError, ProjectContext};

static TEMPLATES_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/assets/templates");

/// Embedded file bodies, rendered against a project context.
pub struct TemplateAssets {
    context: Value,
}

impl TemplateAssets {
    pub fn new(ctx: &ProjectContext) -> Self {
        let context = context! {
            app_name => ctx.app_name.as_str(),
            ruby_version => ctx.ruby_version.as_str(),
            cors_origins => ctx.cors_origins.as_str(),
            database => ctx.database.name(),
            variant => ctx.variant.name(),
        };
        Self { context }
    }

    /// Render the embedded template stored at `path`.
    pub fn render(&self, path: &str) -> Result<String, AppError> {
        let source = raw_asset(path)?;
        render_template(source, &self.context, path)
    }
}

/// Unrendered asset content.
pub fn raw_asset(path: &str) -> Result<&'static str, AppError> {
    let file = TEMPLATES_DIR.get_file(path).ok_or_else(|| AppError::Template {
        path: path.to_string(),
        details: "no such embedded template".to_string(),
    })?;
    file.contents_utf8().ok_or_else(|| AppError::Template {
        path: path.to_string(),
        details: "template is not UTF-8".to_string(),
    })
}

/// Paths of every embedded template, sorted.
pub fn asset_paths() -> Vec<String> {
    let mut paths = Vec::new();
    collect_paths(&TEMPLATES_DIR, &mut paths);
    paths.sort();
    paths
}

fn collect_paths(dir: &Dir, paths: &mut Vec<String>) {
    for entry in dir.entries() {
        match entry {
            DirEntry::File(file) => paths.push(file.path().to_string_lossy().to_string()),
            DirEntry::Dir(subdir) => collect_paths(subdir, paths),
        }
    }
}

fn render_template(content: &str, context: &Value, path: &str) -> Result<String, AppError> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);

    let template_error = |err: minijinja::Error| AppError::Template {
        path: path.to_string(),
        details: err.to_string(),
    };

    env.add_template(path, content).map_err(template_error)?;
    env.get_template(path).map_err(template_error)?.render(context).map_err(template_error)
}
