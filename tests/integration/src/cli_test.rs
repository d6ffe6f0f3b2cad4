//! CLI smoke tests for the mcp-env binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn mcp_env(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("mcp-env").unwrap();
    cmd.env("MCP_ENV_DIR", config_dir.path());
    cmd.env("MCP_ENV_AGE_KEY", config_dir.path().join("key.txt"));
    cmd
}

#[test]
fn help_lists_subcommands() {
    let temp = TempDir::new().unwrap();
    mcp_env(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("apply"))
        .stdout(predicate::str::contains("doctor"))
        .stdout(predicate::str::contains("secret"));
}

#[test]
fn apply_without_config_points_at_init() {
    let temp = TempDir::new().unwrap();
    mcp_env(&temp)
        .arg("apply")
        .assert()
        .failure()
        .stderr(predicate::str::contains("mcp-env init"));
}

#[test]
fn apply_resolves_a_secret_free_config() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("config.yaml"),
        r#"
variables:
  ROOT: /srv/data
mcp_servers:
  files:
    command: files-server
    args: ["--root", "${ROOT}"]
"#,
    )
    .unwrap();

    mcp_env(&temp)
        .arg("apply")
        .assert()
        .success()
        .stdout(predicate::str::contains("files"))
        .stdout(predicate::str::contains("files-server"))
        .stdout(predicate::str::contains("/srv/data"));
}

#[test]
fn apply_json_emits_the_resolved_document() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("config.yaml"),
        "mcp_servers:\n  solo:\n    command: run-me\n",
    )
    .unwrap();

    let output = mcp_env(&temp)
        .args(["apply", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["servers"][0]["name"], "solo");
    assert_eq!(json["servers"][0]["command"], "run-me");
    assert!(json["skippedServers"].as_array().unwrap().is_empty());
}
