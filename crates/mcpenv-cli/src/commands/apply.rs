//! Apply/status command implementation

use colored::Colorize;
use mcpenv_core::{ProcessEnv, ResolveContext, ResolvedConfig, load_local, load_main, resolve_config};
use mcpenv_fs::Layout;
use mcpenv_secrets::SopsStore;

use crate::error::{CliError, Result};

/// Resolve both documents for this platform and print the result.
pub fn run_apply(json: bool) -> Result<()> {
    let resolved = resolve_current()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
        return Ok(());
    }

    print_resolved(&resolved);
    Ok(())
}

/// Load, resolve, and return the config for the current platform.
pub fn resolve_current() -> Result<ResolvedConfig> {
    let layout = Layout::discover()?;

    let main = load_main(&layout)?;
    let local = load_local(&layout)?;

    let Some(main) = main else {
        return Err(CliError::user(format!(
            "No {} found in {}. Run \"mcp-env init\" first.",
            mcpenv_fs::MAIN_CONFIG,
            layout.root().display()
        )));
    };

    let env = ProcessEnv;
    let secrets = SopsStore::new(&layout);
    let ctx = ResolveContext::detect(&env, &secrets)?;
    Ok(resolve_config(Some(&main), local.as_ref(), &ctx)?)
}

fn print_resolved(resolved: &ResolvedConfig) {
    println!();
    println!("{}: {}", "Platform".bold(), resolved.platform.as_str().cyan());
    println!();

    if !resolved.variables.is_empty() {
        println!("{}:", "Variables".bold());
        for (key, value) in resolved.variables.iter() {
            println!("  {key} = {value}");
        }
        println!();
    }

    if !resolved.servers.is_empty() {
        println!("{}:", "MCP Servers".bold());
        for server in &resolved.servers {
            let status = if server.enabled {
                "enabled".green()
            } else {
                "disabled".yellow()
            };
            println!("  {} ({})", server.name.cyan(), status);
            println!("    command: {}", server.command);
            if !server.args.is_empty() {
                println!(
                    "    args: {}",
                    serde_json::to_string(&server.args).unwrap_or_default()
                );
            }
            if !server.env.is_empty() {
                println!("    env:");
                for (key, value) in server.env.iter() {
                    println!("      {key} = {}", mask(value));
                }
            }
            if !server.passthrough.is_empty() {
                println!(
                    "    passthrough: {}",
                    serde_json::to_string(&server.passthrough).unwrap_or_default()
                );
            }
        }
        println!();
    }

    if !resolved.skipped_servers.is_empty() {
        println!("{}:", "Skipped (no command for platform)".bold());
        for name in &resolved.skipped_servers {
            println!("  {}", name.dimmed());
        }
        println!();
    }

    for warning in &resolved.warnings {
        println!("{}: {warning}", "warning".yellow().bold());
    }
}

/// Mask a potentially sensitive value: keep the first and last two
/// characters when there is enough material, otherwise hide everything.
fn mask(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() > 4 {
        let head: String = chars[..2].iter().collect();
        let tail: String = chars[chars.len() - 2..].iter().collect();
        format!("{head}***{tail}")
    } else {
        "***".to_string()
    }
}
