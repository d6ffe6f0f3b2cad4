//! Secret management commands

use std::io::{IsTerminal, Read};

use colored::Colorize;
use dialoguer::Input;
use mcpenv_fs::Layout;
use mcpenv_secrets::{SopsStore, check_binaries};

use crate::error::{CliError, Result};

fn open_store() -> Result<(Layout, SopsStore)> {
    let layout = Layout::discover()?;

    let tools = check_binaries();
    if !tools.sops {
        return Err(CliError::user("sops is not installed. Install sops first."));
    }
    if !tools.age {
        return Err(CliError::user("age is not installed. Install age first."));
    }
    if !layout.age_key_file().exists() {
        return Err(CliError::user(format!(
            "Age key not found at {}. Run \"mcp-env init\" first.",
            layout.age_key_file().display()
        )));
    }

    let store = SopsStore::new(&layout);
    Ok((layout, store))
}

/// Open the secrets file in $EDITOR via sops.
pub fn run_secret_edit() -> Result<()> {
    let (_, store) = open_store()?;
    if !store.secrets_file().exists() {
        return Err(CliError::user(format!(
            "Secrets file not found: {}. Run \"mcp-env init\" first.",
            store.secrets_file().display()
        )));
    }
    store.edit()?;
    println!("{} Secrets updated", "+".green());
    Ok(())
}

/// Set one secret. The value comes from stdin when piped, otherwise from a
/// prompt so it never lands in shell history.
pub fn run_secret_set(key: &str) -> Result<()> {
    let (_, store) = open_store()?;

    let value = if std::io::stdin().is_terminal() {
        Input::new()
            .with_prompt(format!("Value for {key}"))
            .interact_text()?
    } else {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer.trim().to_string()
    };

    if value.is_empty() {
        return Err(CliError::user("Empty value provided"));
    }

    store.set(key, &value)?;
    println!("{} Secret \"{key}\" set", "+".green());
    Ok(())
}

/// List secret names, never values.
pub fn run_secret_list() -> Result<()> {
    let (_, store) = open_store()?;
    if !store.secrets_file().exists() {
        println!("No secrets file found");
        return Ok(());
    }
    let keys = store.keys()?;
    if keys.is_empty() {
        println!("No secrets defined");
    } else {
        for key in keys {
            println!("{key}");
        }
    }
    Ok(())
}
