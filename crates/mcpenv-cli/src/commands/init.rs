//! Init command implementation

use std::io::IsTerminal;

use colored::Colorize;
use dialoguer::Input;
use mcpenv_fs::{Layout, write_text};
use mcpenv_git::ConfigRepo;
use mcpenv_secrets::{SopsStore, check_binaries, install_hint};

use crate::error::{CliError, Result};

const GITIGNORE_CONTENT: &str = "\
# machine-local overrides (not synced)
config.local.yaml
*.key
.DS_Store
";

const STARTER_CONFIG: &str = r#"# mcp-env configuration

variables:
  # Define variables here, optionally per-platform
  # MY_VAR: "value"
  # MY_PATH:
  #   darwin: "/usr/local/bin"
  #   linux: "/usr/bin"
  #   win32: "C:\\Program Files"

mcp_servers: {}
  # Example MCP server:
  # my-server:
  #   command: "node"
  #   args: ["${HOME}/mcp/my-server/index.js"]
  #   env:
  #     API_KEY: "${secret:MY_API_KEY}"
"#;

const LOCAL_EXAMPLE: &str = r#"# Machine-local overrides (not committed to git)
# Copy this to config.local.yaml and customize

variables: {}
  # Override or add variables for this machine
  # MY_VAR: "local-value"

mcp_servers: {}
  # Override server settings for this machine
  # my-server:
  #   enabled: false
"#;

const SOPS_RULES_TEMPLATE: &str = r#"creation_rules:
  - path_regex: secrets\.enc\.yaml$
    age: "AGE_PUBLIC_KEY"
"#;

fn ok(message: &str) {
    println!("{} {message}", "+".green());
}

fn note(message: &str) {
    println!("{} {message}", "*".dimmed());
}

fn caution(message: &str) {
    println!("{} {message}", "!".yellow());
}

/// Run the init command: set up the config directory from scratch or join
/// an existing team repo.
pub fn run_init(clone_url: Option<&str>, remote_url: Option<&str>) -> Result<()> {
    let layout = Layout::discover()?;
    let root = layout.root().to_path_buf();

    if !root.exists() {
        std::fs::create_dir_all(&root)?;
        ok(&format!("Created {}", root.display()));
    }

    // Git: clone into an empty directory, otherwise init fresh.
    let repo = ConfigRepo::new(&root);
    if repo.is_repo() {
        note(&format!("{} is already a git repo", root.display()));
    } else if let Some(url) = clone_url {
        if std::fs::read_dir(&root)?.next().is_some() {
            return Err(CliError::user(format!(
                "{} is not empty; cannot clone into it",
                root.display()
            )));
        }
        repo.clone_from(url)?;
        ok(&format!("Cloned {url}"));
    } else {
        repo.init()?;
        ok("Initialized git repo");
    }

    // Remote: flag wins, otherwise prompt on a tty, otherwise skip.
    if repo.has_remote() {
        if let Some(url) = repo.remote_url()? {
            note(&format!("Remote origin: {url}"));
        }
    } else {
        let url = match remote_url {
            Some(url) => url.to_string(),
            None if std::io::stdin().is_terminal() => Input::new()
                .with_prompt("Remote URL for origin (empty to skip)")
                .allow_empty(true)
                .interact_text()?,
            None => String::new(),
        };
        if url.is_empty() {
            caution(&format!(
                "No remote configured. Run: git -C {} remote add origin <url>",
                root.display()
            ));
        } else {
            repo.add_remote(&url)?;
            ok("Added remote origin");
        }
    }

    write_text(&layout.gitignore(), GITIGNORE_CONTENT)?;
    ok("Wrote .gitignore");

    // Secrets tooling: optional, but set it all up when available.
    let tools = check_binaries();
    if !tools.sops {
        caution(&format!("sops not found. {}", install_hint("sops")));
    }
    if !tools.age {
        caution(&format!("age not found. {}", install_hint("age")));
    }

    let mut secrets_ready = tools.all_available();
    if secrets_ready {
        if layout.age_key_file().exists() {
            note(&format!("Age key exists: {}", layout.age_key_file().display()));
        } else {
            match mcpenv_secrets::generate_key(layout.age_key_file()) {
                Ok(()) => ok(&format!(
                    "Generated age key at {}",
                    layout.age_key_file().display()
                )),
                Err(e) => {
                    caution(&format!("Failed to generate age key: {e}"));
                    secrets_ready = false;
                }
            }
        }
    }

    if !layout.main_config().exists() {
        write_text(&layout.main_config(), STARTER_CONFIG)?;
        ok(&format!("Created {}", mcpenv_fs::MAIN_CONFIG));
    } else {
        note(&format!("{} already exists", mcpenv_fs::MAIN_CONFIG));
    }

    if !layout.local_example().exists() {
        write_text(&layout.local_example(), LOCAL_EXAMPLE)?;
        ok("Created config.local.example.yaml");
    }

    if secrets_ready {
        if !layout.sops_rules().exists() {
            if let Some(public) = mcpenv_secrets::public_key(layout.age_key_file())? {
                write_text(
                    &layout.sops_rules(),
                    &SOPS_RULES_TEMPLATE.replace("AGE_PUBLIC_KEY", &public),
                )?;
                ok("Created .sops.yaml with age public key");
            }
        }
        if !layout.secrets_file().exists() {
            match SopsStore::new(&layout).seed() {
                Ok(()) => ok("Created empty secrets.enc.yaml"),
                Err(e) => caution(&format!("Could not create encrypted secrets file: {e}")),
            }
        }
    }

    if !repo.is_clean()? {
        repo.commit_all("mcp-env init")?;
        ok("Created initial commit");
    }

    println!();
    note("Setup complete");
    if !secrets_ready {
        note("Install sops + age to enable encrypted secrets.");
        note("If joining an existing team, copy your age key into place first.");
    }
    note("Run \"mcp-env doctor\" to verify your setup.");
    Ok(())
}
