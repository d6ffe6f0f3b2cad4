//! Git flow commands: pull, push, sync

use colored::Colorize;
use mcpenv_fs::Layout;
use mcpenv_git::ConfigRepo;

use crate::error::{CliError, Result};

fn open_repo() -> Result<ConfigRepo> {
    let layout = Layout::discover()?;
    let repo = ConfigRepo::new(layout.root());
    if !repo.is_repo() {
        return Err(CliError::user(format!(
            "{} is not a git repo. Run \"mcp-env init\" first.",
            layout.root().display()
        )));
    }
    Ok(repo)
}

fn require_remote(repo: &ConfigRepo) -> Result<()> {
    if !repo.has_remote() {
        return Err(CliError::user(format!(
            "No remote configured. Run: git -C {} remote add origin <url>",
            repo.root().display()
        )));
    }
    Ok(())
}

/// Fast-forward the config directory onto the remote branch.
pub fn run_pull() -> Result<()> {
    let repo = open_repo()?;
    require_remote(&repo)?;
    repo.pull()?;
    println!("{} Pulled latest config", "+".green());
    Ok(())
}

/// Stage everything, commit, and push to origin.
pub fn run_push(message: Option<&str>) -> Result<()> {
    let repo = open_repo()?;
    require_remote(&repo)?;

    if repo.is_clean()? {
        println!("Nothing to commit, working tree clean");
        return Ok(());
    }

    let message = message.unwrap_or("mcp-env sync");
    repo.commit_all(message)?;
    println!("{} Committed: {message}", "+".green());

    repo.push()?;
    println!("{} Pushed to remote", "+".green());
    Ok(())
}

/// Pull (when a remote exists) and then resolve and display the config.
pub fn run_sync(json: bool) -> Result<()> {
    let repo = open_repo()?;
    if repo.has_remote() {
        repo.pull()?;
        println!("{} Pulled latest config", "+".green());
    } else {
        println!("{} No remote configured, skipping pull", "!".yellow());
    }

    super::run_apply(json)
}
