use crate::harness::TestContext;
use predicates::prelude::*;

#[test]
fn plan_lists_steps_in_registration_order() {
    let ctx = TestContext::new();

    let output = ctx.cli().args(["plan", "blog"]).output().expect("Failed to run railsmith");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();

    let order = [
        "rails_new [bootstrap]",
        "add_gems [setup]",
        "bundle_install [install]",
        "setup_api [post-install]",
        "setup_rspec [post-install]",
        "setup_development_environment [post-install]",
        "setup_tailwind [post-install]",
        "setup_kamal [post-install]",
        "setup_root_route_and_view [post-install]",
        "setup_database [post-install]",
        "initial_commit [post-install]",
    ];
    let positions: Vec<usize> = order
        .iter()
        .map(|step| stdout.find(step).unwrap_or_else(|| panic!("missing {}", step)))
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(stdout.contains("inject into spec/rails_helper.rb"));
    assert!(ctx.toolchain().calls().is_empty());
}

#[test]
fn plan_shows_empty_steps_for_disabled_features() {
    let ctx = TestContext::new();

    ctx.cli()
        .args(["p", "svc", "--variant", "api", "--no-deploy", "--existing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rails_new [bootstrap]\n       (nothing to do)"))
        .stdout(predicate::str::contains("setup_kamal [post-install]\n       (nothing to do)"))
        .stdout(predicate::str::contains("write config/initializers/cors.rb"));
}

#[test]
fn plan_json_serializes_the_registry() {
    let ctx = TestContext::new();

    let output = ctx
        .cli()
        .args(["plan", "shop", "--variant", "tailwind-rails", "--format", "json"])
        .output()
        .expect("Failed to run railsmith");
    assert!(output.status.success());

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let steps = plan["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 11);
    assert_eq!(steps[2]["name"], "bundle_install");
    assert_eq!(steps[2]["phase"], "install");
    assert_eq!(steps[0]["ordinal"], 1);
}

#[test]
fn plan_rejects_unknown_variant() {
    let ctx = TestContext::new();

    ctx.cli()
        .args(["plan", "blog", "--variant", "vue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown variant 'vue'"));
}

#[test]
fn plan_rejects_invalid_app_name() {
    let ctx = TestContext::new();

    ctx.cli().args(["plan", "blog", "--name", "9lives"]).assert().failure();
}
