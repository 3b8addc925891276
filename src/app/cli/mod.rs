//! CLI Adapter.

mod new;
mod plan;

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::app::config::ContextOverrides;
use crate::domain::{AppError, DatabaseAdapter, Variant};

#[derive(Parser)]
#[command(name = "railsmith")]
#[command(version)]
#[command(
    about = "Scaffold Rails applications from an ordered, checked sequence of steps",
    long_about = None
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate and configure a new Rails application in DIR
    #[clap(visible_alias = "n")]
    New {
        /// Target directory; its name becomes the app name
        dir: PathBuf,
        #[command(flatten)]
        context: ContextArgs,
        /// Print the steps that would run and exit
        #[arg(long)]
        dry_run: bool,
        /// Do not ask before scaffolding into a non-empty directory
        #[arg(short, long)]
        yes: bool,
        /// Output written after a successful run
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        report: OutputFormat,
    },
    /// Show the ordered steps and actions without executing them
    #[clap(visible_alias = "p")]
    Plan {
        /// Target directory
        #[arg(default_value = ".")]
        dir: PathBuf,
        #[command(flatten)]
        context: ContextArgs,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List available template variants
    #[clap(visible_alias = "v")]
    Variants,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Flags that shape the project context, shared by `new` and `plan`.
#[derive(Args, Clone)]
struct ContextArgs {
    /// Template variant (standard, api, tailwind-rails)
    #[arg(long, value_parser = parse_variant)]
    variant: Option<Variant>,
    /// Application name (defaults to the directory name)
    #[arg(long)]
    name: Option<String>,
    /// Database adapter (postgresql, mysql, sqlite3)
    #[arg(short, long, value_parser = parse_database)]
    database: Option<DatabaseAdapter>,
    /// Ruby version written to .ruby-version
    #[arg(long)]
    ruby_version: Option<String>,
    /// Configure rack-cors
    #[arg(long, conflicts_with = "no_cors")]
    cors: bool,
    /// Skip rack-cors
    #[arg(long)]
    no_cors: bool,
    /// Skip Kamal deployment setup
    #[arg(long)]
    no_deploy: bool,
    /// Skip git init and the initial commit
    #[arg(long)]
    no_git: bool,
    /// Apply to an existing Rails app instead of running `rails new`
    #[arg(long)]
    existing: bool,
    /// Config file (defaults to ./railsmith.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl ContextArgs {
    fn overrides(&self) -> ContextOverrides {
        let cors = match (self.cors, self.no_cors) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        ContextOverrides {
            variant: self.variant,
            app_name: self.name.clone(),
            database: self.database,
            ruby_version: self.ruby_version.clone(),
            cors,
            deploy: self.no_deploy.then_some(false),
            git: self.no_git.then_some(false),
            existing: self.existing,
        }
    }
}

fn parse_variant(value: &str) -> Result<Variant, AppError> {
    Variant::from_name(value).ok_or_else(|| AppError::UnknownVariant(value.to_string()))
}

fn parse_database(value: &str) -> Result<DatabaseAdapter, AppError> {
    DatabaseAdapter::from_name(value)
        .ok_or_else(|| AppError::config_error(format!("Unsupported database '{}'", value)))
}

/// Entry point for the CLI.
pub fn run() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<(), AppError> = match cli.command {
        Commands::New { dir, context, dry_run, yes, report } => {
            new::run_new(new::NewArgs { dir, context, dry_run, yes, report })
        }
        Commands::Plan { dir, context, format } => plan::run_plan(&dir, &context, format),
        Commands::Variants => {
            run_variants();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run_variants() {
    for variant in crate::app::api::variants() {
        println!("{:<16}{}", variant.name(), variant.description());
    }
}
