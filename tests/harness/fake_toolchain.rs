use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const RAILS_SCRIPT: &str = r#"#!/bin/sh
echo "rails $*" >> "__LOG__"
if [ -n "$FAKE_RAILS_EXIT" ]; then exit "$FAKE_RAILS_EXIT"; fi
if [ "$1" = "new" ]; then
    mkdir -p bin config/environments test
    cat > Gemfile <<'EOF'
source "https://rubygems.org"

gem "rails", "~> 8.0.2"
EOF
    cat > config/routes.rb <<'EOF'
Rails.application.routes.draw do
  get "up" => "rails/health#show", as: :rails_health_check
end
EOF
    cat > config/environments/development.rb <<'EOF'
require "active_support/core_ext/integer/time"

Rails.application.configure do
  config.enable_reloading = true
end
EOF
    cat > Procfile.dev <<'EOF'
web: env RUBY_DEBUG_OPEN=true bin/rails server
js: bun run build --watch
EOF
    echo 'ENV["RAILS_ENV"] ||= "test"' > test/test_helper.rb
    cp "__BIN_RAILS__" bin/rails
    chmod 755 bin/rails
fi
exit 0
"#;

const BIN_RAILS_SCRIPT: &str = r#"#!/bin/sh
echo "bin/rails $*" >> "__LOG__"
if [ "$1" = "generate" ] && [ "$2" = "rspec:install" ]; then
    mkdir -p spec
    if [ -n "$FAKE_RSPEC_WITHOUT_CONFIGURE" ]; then
        echo "require 'spec_helper'" > spec/rails_helper.rb
    else
        cat > spec/rails_helper.rb <<'EOF'
require 'spec_helper'

RSpec.configure do |config|
  config.use_transactional_fixtures = true
end
EOF
    fi
elif [ "$1" = "generate" ] && [ "$2" = "controller" ]; then
    mkdir -p app/views/welcome
    echo "<h1>Welcome#index</h1>" > app/views/welcome/index.html.erb
fi
exit 0
"#;

const LOGGING_SCRIPT: &str = r#"#!/bin/sh
echo "__NAME__ $*" >> "__LOG__"
if [ -n "$__EXIT_VAR__" ]; then exit "$__EXIT_VAR__"; fi
exit 0
"#;

/// Stand-ins for `rails`, `bundle`, `bun` and `git` that log their arguments.
///
/// Set `FAKE_<TOOL>_EXIT` on the command to make a tool fail with that status.
pub(crate) struct FakeToolchain {
    pub root: TempDir,
    pub bin_dir: PathBuf,
    pub log_file: PathBuf,
}

impl FakeToolchain {
    pub(crate) fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir for fake toolchain");
        let bin_dir = root.path().join("bin");
        fs::create_dir_all(&bin_dir).expect("Failed to create bin dir");
        let log_file = root.path().join("commands.log");
        let log = log_file.to_string_lossy().to_string();

        let bin_rails = root.path().join("bin-rails");
        write_script(&bin_rails, &BIN_RAILS_SCRIPT.replace("__LOG__", &log));
        write_script(
            &bin_dir.join("rails"),
            &RAILS_SCRIPT
                .replace("__LOG__", &log)
                .replace("__BIN_RAILS__", &bin_rails.to_string_lossy()),
        );
        for name in ["bundle", "bun", "git"] {
            let script = LOGGING_SCRIPT
                .replace("__NAME__", name)
                .replace("__LOG__", &log)
                .replace("__EXIT_VAR__", &format!("FAKE_{}_EXIT", name.to_uppercase()));
            write_script(&bin_dir.join(name), &script);
        }

        Self { root, bin_dir, log_file }
    }

    /// Logged invocations, one per line.
    pub(crate) fn calls(&self) -> Vec<String> {
        fs::read_to_string(&self.log_file)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub(crate) fn ran(&self, prefix: &str) -> bool {
        self.calls().iter().any(|call| call.starts_with(prefix))
    }
}

fn write_script(path: &Path, content: &str) {
    fs::write(path, content).expect("Failed to write fake script");
    let mut perms = fs::metadata(path).expect("Failed to get metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).expect("Failed to set permissions");
}
