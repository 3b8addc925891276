//! Step registries for each template variant.
//!
//! Every variant registers the same named steps in the same order. Flags in the
//! [`ProjectContext`] only decide what goes into a step's body.

use crate::adapters::TemplateAssets;
use crate::adapters::template_assets::raw_asset;
use crate::domain::{
    Action, AppError, DependencyDeclaration, DependencyGroup, DependencyManifest,
    ExternalCommand, FileAction, Phase, ProjectContext, Step, StepRegistry, Variant,
};

pub const RSPEC_ANCHOR: &str = "RSpec.configure do |config|\n";
pub const ENVIRONMENT_ANCHOR: &str = "Rails.application.configure do\n";
pub const ROUTES_ANCHOR: &str = "Rails.application.routes.draw do\n";

pub const LANDING_PAGE: &str = "app/views/welcome/index.html.erb";
pub const STARTUP_SCRIPT: &str = "bin/dev";
pub const COMMIT_MESSAGE: &str = "Initial commit: Rails app configured with custom template";

/// Name of the dependency-installation step.
pub const INSTALL_STEP: &str = "bundle_install";

/// Build the ordered step registry for the context's variant.
pub fn build_registry(ctx: &ProjectContext) -> Result<StepRegistry, AppError> {
    let assets = TemplateAssets::new(ctx);
    let mut registry = StepRegistry::new();

    registry.register(rails_new(ctx))?;
    registry.register(add_gems(ctx, &assets)?)?;
    registry.register(
        Step::new(INSTALL_STEP, Phase::Install)
            .command(ExternalCommand::new(["bundle", "install"])),
    )?;
    registry.register(setup_api(ctx, &assets)?)?;
    registry.register(setup_rspec()?)?;
    registry.register(setup_development_environment(&assets)?)?;
    registry.register(setup_tailwind(ctx, &assets)?)?;
    registry.register(setup_kamal(ctx))?;
    registry.register(setup_root_route_and_view(ctx, &assets)?)?;
    registry.register(setup_database())?;
    registry.register(initial_commit(ctx))?;

    Ok(registry)
}

fn rails(args: &[&str]) -> ExternalCommand {
    ExternalCommand::new(std::iter::once("bin/rails").chain(args.iter().copied()))
}

fn rails_new(ctx: &ProjectContext) -> Step {
    let mut argv = vec![
        "rails".to_string(),
        "new".to_string(),
        ".".to_string(),
        format!("--name={}", ctx.app_name),
        "-d".to_string(),
        ctx.database.name().to_string(),
    ];
    match ctx.variant {
        Variant::Standard => argv.push("--javascript=bun".to_string()),
        Variant::Api => argv.push("--api".to_string()),
        Variant::TailwindRails => argv.push("--javascript=importmap".to_string()),
    }
    argv.extend(["--skip-kamal", "--skip-bundle", "--skip-git"].map(String::from));

    Step::new("rails_new", Phase::Bootstrap)
        .announce(&format!("Generating Rails application '{}'...", ctx.app_name))
        .when(ctx.bootstrap, Action::Command(ExternalCommand::new(argv)))
}

/// Gems every variant installs, in Gemfile order.
pub fn dependency_manifest(ctx: &ProjectContext) -> Result<DependencyManifest, AppError> {
    use DependencyGroup::{Development, Runtime, Test};

    let mut manifest = DependencyManifest::new();
    if ctx.cors {
        manifest.declare(DependencyDeclaration::new("rack-cors", Runtime))?;
    }
    if ctx.deploy {
        manifest.declare(DependencyDeclaration::new("kamal", Runtime))?;
    }
    if ctx.variant == Variant::TailwindRails {
        manifest.declare(DependencyDeclaration::new("tailwindcss-rails", Runtime))?;
    }

    for (name, version) in [
        ("rspec-rails", "~> 6.1"),
        ("factory_bot_rails", "~> 6.4"),
        ("faker", "~> 3.3"),
        ("shoulda-matchers", "~> 5.3"),
        ("database_cleaner-active_record", "~> 2.1"),
    ] {
        manifest.declare_in(
            &[Development, Test],
            DependencyDeclaration::new(name, Development).version(version),
        )?;
    }

    manifest.declare(DependencyDeclaration::new("ruby-lsp", Development).no_require())?;
    for (name, version) in [
        ("letter_opener", "~> 1.8"),
        ("bullet", "~> 7.1"),
        ("better_errors", "~> 2.10"),
        ("binding_of_caller", "~> 1.0"),
        ("annotate", "~> 3.2"),
        ("active_record_query_trace", "~> 2.2"),
    ] {
        manifest.declare(DependencyDeclaration::new(name, Development).version(version))?;
    }
    Ok(manifest)
}

fn add_gems(ctx: &ProjectContext, assets: &TemplateAssets) -> Result<Step, AppError> {
    Ok(Step::new("add_gems", Phase::Setup)
        .file(FileAction::overwrite(".ruby-version", assets.render(".ruby-version")?))
        .dependencies(dependency_manifest(ctx)?))
}

fn setup_api(ctx: &ProjectContext, assets: &TemplateAssets) -> Result<Step, AppError> {
    let path = "config/initializers/cors.rb";
    Ok(Step::new("setup_api", Phase::PostInstall)
        .announce("Setting up for API...")
        .when(ctx.cors, Action::File(FileAction::overwrite(path, assets.render(path)?))))
}

fn setup_rspec() -> Result<Step, AppError> {
    Ok(Step::new("setup_rspec", Phase::PostInstall)
        .command(rails(&["generate", "rspec:install"]))
        .remove("test")
        .file(FileAction::append(
            "spec/rails_helper.rb",
            raw_asset("snippets/shoulda_matchers.rb")?,
        ))
        .file(FileAction::inject_after(
            "spec/rails_helper.rb",
            RSPEC_ANCHOR,
            raw_asset("snippets/database_cleaner.rb")?,
        )))
}

fn setup_development_environment(assets: &TemplateAssets) -> Result<Step, AppError> {
    let environment = "config/environments/development.rb";
    let bullet = "config/initializers/bullet.rb";
    Ok(Step::new("setup_development_environment", Phase::PostInstall)
        .file(FileAction::inject_after(
            environment,
            ENVIRONMENT_ANCHOR,
            "  config.action_mailer.delivery_method = :letter_opener\n",
        ))
        .file(FileAction::inject_after(
            environment,
            ENVIRONMENT_ANCHOR,
            "  config.action_mailer.perform_deliveries = true\n",
        ))
        .file(FileAction::create(bullet, assets.render(bullet)?))
        .command(
            ExternalCommand::new(["bundle", "exec", "rails", "g", "annotate:install"])
                .allow_failure(),
        ))
}

fn setup_tailwind(ctx: &ProjectContext, assets: &TemplateAssets) -> Result<Step, AppError> {
    let step = Step::new("setup_tailwind", Phase::PostInstall);
    let startup =
        FileAction::overwrite(STARTUP_SCRIPT, assets.render(STARTUP_SCRIPT)?).executable();

    let step = match ctx.variant {
        Variant::Api => step,
        Variant::Standard => {
            let mut step = step
                .announce("Setting up Tailwind CSS manually...")
                .command(ExternalCommand::new([
                    "bun",
                    "add",
                    "tailwindcss",
                    "postcss",
                    "autoprefixer",
                ]));
            for path in [
                "tailwind.config.js",
                "postcss.config.js",
                "app/assets/stylesheets/application.tailwind.css",
            ] {
                step = step.file(FileAction::create(path, assets.render(path)?));
            }
            step.file(FileAction::append("Procfile.dev", raw_asset("snippets/procfile_css.txt")?))
                .file(startup)
        }
        Variant::TailwindRails => step
            .announce("Setting up Tailwind CSS with tailwindcss-rails...")
            .command(rails(&["tailwindcss:install"]))
            .file(FileAction::overwrite("Procfile.dev", assets.render("Procfile.dev")?))
            .file(startup),
    };
    Ok(step)
}

fn setup_kamal(ctx: &ProjectContext) -> Step {
    Step::new("setup_kamal", Phase::PostInstall)
        .announce("Setting up Kamal for deployment...")
        .when(ctx.deploy, Action::Command(rails(&["kamal:install"])))
}

fn setup_root_route_and_view(
    ctx: &ProjectContext,
    assets: &TemplateAssets,
) -> Result<Step, AppError> {
    let step = Step::new("setup_root_route_and_view", Phase::PostInstall);
    if !ctx.variant.has_frontend() {
        return Ok(step.announce("Routing root to the health check...").file(
            FileAction::inject_after(
                "config/routes.rb",
                ROUTES_ANCHOR,
                "  root \"rails/health#show\"\n",
            ),
        ));
    }
    Ok(step
        .announce("Creating Welcome controller and view...")
        .command(rails(&["generate", "controller", "Welcome", "index"]))
        .file(FileAction::inject_after(
            "config/routes.rb",
            ROUTES_ANCHOR,
            "  root 'welcome#index'\n",
        ))
        .file(FileAction::overwrite(LANDING_PAGE, assets.render(LANDING_PAGE)?)))
}

fn setup_database() -> Step {
    Step::new("setup_database", Phase::PostInstall)
        .announce("Creating and migrating database...")
        .command(rails(&["db:create"]))
        .command(rails(&["db:migrate"]))
}

fn initial_commit(ctx: &ProjectContext) -> Step {
    let commands = [
        ExternalCommand::new(["git", "init"]),
        ExternalCommand::new(["git", "add", "."]),
        ExternalCommand::new(["git", "commit", "-m", COMMIT_MESSAGE]),
    ];
    commands.into_iter().fold(
        Step::new("initial_commit", Phase::PostInstall)
            .announce("Initializing Git repository and making initial commit..."),
        |step, command| step.when(ctx.git, Action::Command(command)),
    )
}
