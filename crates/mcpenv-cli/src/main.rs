//! mcp-env CLI
//!
//! Syncs a git-backed config directory of MCP server definitions across
//! machines and resolves it for the current platform.

mod cli;
mod commands;
mod error;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands, SecretAction};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    }

    match cli.command {
        Some(cmd) => execute_command(cmd),
        None => {
            println!("{} MCP server config manager", "mcp-env".green().bold());
            println!();
            println!("Run {} for available commands.", "mcp-env --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Init { clone, remote } => commands::run_init(clone.as_deref(), remote.as_deref()),
        Commands::Apply { json } => commands::run_apply(json),
        Commands::Status { json } => commands::run_apply(json),
        Commands::Doctor => commands::run_doctor(),
        Commands::Pull => commands::run_pull(),
        Commands::Push { message } => commands::run_push(message.as_deref()),
        Commands::Sync { json } => commands::run_sync(json),
        Commands::Secret { action } => match action {
            SecretAction::Edit => commands::run_secret_edit(),
            SecretAction::Set { key } => commands::run_secret_set(&key),
            SecretAction::List => commands::run_secret_list(),
        },
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "mcp-env", &mut std::io::stdout());
            Ok(())
        }
    }
}
