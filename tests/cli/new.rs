use crate::harness::TestContext;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;

#[test]
fn new_scaffolds_standard_app_in_empty_directory() {
    let ctx = TestContext::new();

    ctx.cli()
        .args(["new", "blog"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("✅ Scaffolded standard app"))
        .stdout(predicate::str::contains("run `bin/dev`"));

    let gemfile = ctx.read("blog", "Gemfile");
    assert!(gemfile.starts_with("source \"https://rubygems.org\"\n"));
    assert!(gemfile.contains("gem \"rack-cors\"\n"));
    assert!(gemfile.contains("group :development, :test do\n  gem \"rspec-rails\", \"~> 6.1\""));
    assert!(gemfile.contains("gem \"ruby-lsp\", require: false"));
    assert_eq!(ctx.read("blog", ".ruby-version"), "3.4.4");

    let landing = ctx.read("blog", "app/views/welcome/index.html.erb");
    assert!(landing.contains("Welcome to Your Rails 8 App!"));
    assert!(ctx.read("blog", "config/routes.rb").contains("  root 'welcome#index'\n"));
    assert!(ctx.read("blog", "spec/rails_helper.rb").contains("DatabaseCleaner.strategy"));
    assert!(ctx.exists("blog", "config/initializers/cors.rb"));
    assert!(ctx.exists("blog", "tailwind.config.js"));
    assert!(!ctx.exists("blog", "test"));

    let mode = fs::metadata(ctx.app_dir("blog").join("bin/dev")).unwrap().permissions().mode();
    assert_ne!(mode & 0o111, 0, "bin/dev should be executable");

    let toolchain = ctx.toolchain();
    assert!(toolchain.ran("rails new . --name=blog -d postgresql --javascript=bun"));
    assert!(toolchain.ran("bun add tailwindcss postcss autoprefixer"));
    assert!(toolchain.ran("bin/rails db:migrate"));
    assert_eq!(
        toolchain.calls().last().map(String::as_str),
        Some("git commit -m Initial commit: Rails app configured with custom template")
    );
}

#[test]
fn new_stops_at_failed_dependency_installation() {
    let ctx = TestContext::new();

    ctx.cli()
        .args(["new", "blog"])
        .env("FAKE_BUNDLE_EXIT", "5")
        .write_stdin("")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("bundle_install"))
        .stderr(predicate::str::contains("exited with status 5"));

    assert!(ctx.exists("blog", "Gemfile"));
    assert!(!ctx.exists("blog", "config/initializers/cors.rb"));
    assert!(!ctx.toolchain().ran("bin/rails"));
    assert!(!ctx.toolchain().ran("git"));
}

#[test]
fn new_aborts_when_generator_output_lacks_anchor() {
    let ctx = TestContext::new();

    ctx.cli()
        .args(["new", "blog"])
        .env("FAKE_RSPEC_WITHOUT_CONFIGURE", "1")
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("setup_rspec"))
        .stderr(predicate::str::contains("not found in spec/rails_helper.rb"));

    assert!(!ctx.exists("blog", "config/initializers/bullet.rb"));
    assert!(!ctx.toolchain().ran("git"));
}

#[test]
fn new_refuses_non_empty_directory_without_yes() {
    let ctx = TestContext::new();
    ctx.write_work_file("blog/README.md", "notes\n");

    ctx.cli()
        .args(["new", "blog"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not empty"));
    assert!(!ctx.toolchain().ran("rails new"));

    ctx.cli().args(["new", "blog", "--yes"]).write_stdin("").assert().success();
    assert_eq!(ctx.read("blog", "README.md"), "notes\n");
}

#[test]
fn new_api_variant_routes_root_to_health_check() {
    let ctx = TestContext::new();

    ctx.cli()
        .args(["n", "svc", "--variant", "api", "--no-git", "--no-deploy", "-d", "sqlite3"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("bin/rails server"));

    assert!(ctx.read("svc", "config/routes.rb").contains("  root \"rails/health#show\"\n"));
    assert!(ctx.exists("svc", "config/initializers/cors.rb"));
    assert!(!ctx.exists("svc", "tailwind.config.js"));
    assert!(!ctx.exists("svc", "app/views/welcome/index.html.erb"));
    assert!(!ctx.read("svc", "Gemfile").contains("gem \"kamal\""));

    let toolchain = ctx.toolchain();
    assert!(toolchain.ran("rails new . --name=svc -d sqlite3 --api"));
    assert!(!toolchain.ran("git"));
    assert!(!toolchain.ran("bin/rails kamal:install"));
}

#[test]
fn new_dry_run_prints_plan_and_touches_nothing() {
    let ctx = TestContext::new();

    ctx.cli()
        .args(["new", "blog", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Plan for blog (standard, postgresql)"))
        .stdout(predicate::str::contains("3. bundle_install [install]"));

    assert!(!ctx.app_dir("blog").exists());
    assert!(ctx.toolchain().calls().is_empty());
}

#[test]
fn new_reads_settings_from_config_file() {
    let ctx = TestContext::new();
    ctx.write_work_file(
        "railsmith.toml",
        "variant = \"tailwind-rails\"\nruby_version = \"3.3.6\"\n",
    );

    ctx.cli().args(["new", "shop"]).write_stdin("").assert().success();

    assert_eq!(ctx.read("shop", ".ruby-version"), "3.3.6");
    assert_eq!(
        ctx.read("shop", "Procfile.dev"),
        "web: bin/rails server\ncss: bin/rails tailwindcss:watch\n"
    );
    assert!(ctx.read("shop", "Gemfile").contains("gem \"tailwindcss-rails\"\n"));
    assert!(!ctx.exists("shop", "config/initializers/cors.rb"));
    assert!(ctx.toolchain().ran("bin/rails tailwindcss:install"));
}

#[test]
fn new_rejects_invalid_config_file() {
    let ctx = TestContext::new();
    ctx.write_work_file("custom.toml", "colour = \"red\"\n");

    ctx.cli()
        .args(["new", "blog", "--config", "custom.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("custom.toml"));
    assert!(ctx.toolchain().calls().is_empty());
}

#[test]
fn new_rejects_unsafe_ruby_version_flag() {
    let ctx = TestContext::new();

    for version in ["", "3.4 ; touch pwned"] {
        ctx.cli()
            .args(["new", "blog", "--ruby-version", version])
            .write_stdin("")
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("Invalid ruby_version"));
    }

    assert!(!ctx.app_dir("blog").exists());
    assert!(ctx.toolchain().calls().is_empty());
}

#[test]
fn new_json_report_lists_every_action() {
    let ctx = TestContext::new();

    let output = ctx
        .cli()
        .args(["new", "blog", "--report", "json", "--no-git"])
        .write_stdin("")
        .output()
        .expect("Failed to run railsmith");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["state"], "completed");
    assert_eq!(report["variant"], "standard");
    assert_eq!(report["steps_completed"].as_array().unwrap().len(), 11);

    let entries = report["entries"].as_array().unwrap();
    let ruby_version = entries.iter().find(|e| e["action"] == "write .ruby-version").unwrap();
    assert_eq!(ruby_version["digest"].as_str().unwrap().len(), 64);
}

#[test]
fn new_existing_requires_a_rails_app() {
    let ctx = TestContext::new();
    fs::create_dir_all(ctx.app_dir("blog")).unwrap();

    ctx.cli()
        .args(["new", "blog", "--existing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Gemfile missing"));
}
