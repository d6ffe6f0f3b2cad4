//! Doctor command implementation

use colored::Colorize;
use mcpenv_core::{load_local, load_main};
use mcpenv_fs::Layout;
use mcpenv_git::ConfigRepo;
use mcpenv_secrets::{SopsStore, check_binaries};

use crate::error::{CliError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Pass,
    Warn,
    Fail,
}

struct Check {
    name: String,
    status: Status,
    detail: String,
}

impl Check {
    fn new(name: impl Into<String>, status: Status, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status,
            detail: detail.into(),
        }
    }
}

/// Run diagnostic checks over the config directory and its tooling.
pub fn run_doctor() -> Result<()> {
    let layout = Layout::discover()?;
    let mut checks = Vec::new();

    let tools = check_binaries();
    checks.push(Check::new(
        "sops installed",
        if tools.sops { Status::Pass } else { Status::Warn },
        if tools.sops { "ok" } else { "not found (optional)" },
    ));
    checks.push(Check::new(
        "age installed",
        if tools.age { Status::Pass } else { Status::Warn },
        if tools.age { "ok" } else { "not found (optional)" },
    ));

    let root_exists = layout.root().exists();
    checks.push(Check::new(
        "config directory exists",
        if root_exists { Status::Pass } else { Status::Fail },
        if root_exists {
            layout.root().display().to_string()
        } else {
            "run \"mcp-env init\"".to_string()
        },
    ));

    let repo = ConfigRepo::new(layout.root());
    let is_repo = repo.is_repo();
    checks.push(Check::new(
        "config directory is a git repo",
        if is_repo { Status::Pass } else { Status::Fail },
        if is_repo { "yes" } else { "run \"mcp-env init\"" },
    ));

    let has_remote = is_repo && repo.has_remote();
    checks.push(Check::new(
        "remote configured",
        if has_remote { Status::Pass } else { Status::Warn },
        if has_remote { "yes" } else { "no remote origin" },
    ));

    let key_exists = layout.age_key_file().exists();
    checks.push(Check::new(
        "age key file exists",
        if key_exists { Status::Pass } else { Status::Warn },
        if key_exists {
            layout.age_key_file().display().to_string()
        } else {
            "not found (optional)".to_string()
        },
    ));

    if layout.main_config().exists() {
        checks.push(match load_main(&layout) {
            Ok(_) => Check::new(
                format!("{} parses", mcpenv_fs::MAIN_CONFIG),
                Status::Pass,
                "ok",
            ),
            Err(e) => Check::new(
                format!("{} parses", mcpenv_fs::MAIN_CONFIG),
                Status::Fail,
                e.to_string(),
            ),
        });
    } else {
        checks.push(Check::new(
            format!("{} exists", mcpenv_fs::MAIN_CONFIG),
            Status::Warn,
            "not found",
        ));
    }

    if layout.local_config().exists() {
        checks.push(match load_local(&layout) {
            Ok(_) => Check::new(
                format!("{} parses", mcpenv_fs::LOCAL_CONFIG),
                Status::Pass,
                "ok",
            ),
            Err(e) => Check::new(
                format!("{} parses", mcpenv_fs::LOCAL_CONFIG),
                Status::Fail,
                e.to_string(),
            ),
        });
    }

    if layout.secrets_file().exists() {
        if tools.all_available() && key_exists {
            checks.push(match SopsStore::new(&layout).decrypt() {
                Ok(_) => Check::new("secrets decrypt", Status::Pass, "ok"),
                Err(e) => Check::new("secrets decrypt", Status::Fail, e.to_string()),
            });
        } else {
            checks.push(Check::new(
                "secrets decrypt",
                Status::Warn,
                "skipped (sops/age/key not available)",
            ));
        }
    }

    println!();
    println!("{}", "mcp-env doctor".bold());
    println!();
    let mut failed = false;
    for check in &checks {
        let icon = match check.status {
            Status::Pass => "+".green(),
            Status::Warn => "!".yellow(),
            Status::Fail => "x".red(),
        };
        println!("  {icon} {} ({})", check.name, check.detail.dimmed());
        if check.status == Status::Fail {
            failed = true;
        }
    }
    println!();

    if failed {
        return Err(CliError::user("one or more checks failed"));
    }
    Ok(())
}
