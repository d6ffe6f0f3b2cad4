//! CLI argument parsing using clap derive

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// mcp-env - Sync and resolve MCP server configuration across machines
#[derive(Parser, Debug)]
#[command(name = "mcp-env")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// First-time setup of the config directory
    ///
    /// Creates the config directory, initializes (or clones) the git repo,
    /// writes starter configs, and sets up sops/age secrets if the binaries
    /// are available.
    ///
    /// Examples:
    ///   mcp-env init                                # fresh setup
    ///   mcp-env init --clone git@host:team/cfg.git  # join an existing team
    Init {
        /// Git URL to clone into the config directory (it must be empty)
        #[arg(long)]
        clone: Option<String>,

        /// Remote URL to add as origin (skips the prompt)
        #[arg(long)]
        remote: Option<String>,
    },

    /// Resolve the config for this platform and display it
    Apply {
        /// Output the resolved config as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show resolved config for the current platform (same as apply)
    Status {
        /// Output the resolved config as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run diagnostic checks
    Doctor,

    /// Pull latest config from the remote (fast-forward only)
    Pull,

    /// Stage, commit, and push config changes
    Push {
        /// Commit message
        message: Option<String>,
    },

    /// Pull latest config from the remote, then resolve and display it
    Sync {
        /// Output the resolved config as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage encrypted secrets
    Secret {
        #[command(subcommand)]
        action: SecretAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Secret subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum SecretAction {
    /// Edit the secrets file in $EDITOR via sops
    Edit,

    /// Set a secret value (prompts, or reads from stdin when piped)
    Set {
        /// Secret key name
        key: String,
    },

    /// List secret keys (not values)
    List,
}
