//! End-to-end resolution: YAML files on disk through loader and resolver.

use std::fs;

use mcpenv_core::{
    Platform, ResolveContext, StaticEnv, StaticSecrets, load_local, load_main, resolve_config,
};
use mcpenv_fs::Layout;
use tempfile::TempDir;

fn layout_in(temp: &TempDir) -> Layout {
    Layout::new(temp.path(), temp.path().join("key.txt"))
}

fn context<'a>(env: &'a StaticEnv, secrets: &'a StaticSecrets) -> ResolveContext<'a> {
    ResolveContext::with_platform(Platform::Linux, env, secrets)
}

#[test]
fn full_flow_from_files_to_launch_specs() {
    let temp = TempDir::new().unwrap();
    let layout = layout_in(&temp);

    fs::write(
        layout.main_config(),
        r#"
variables:
  TOOLS:
    darwin: /opt/tools
    linux: /usr/local/tools
  BIN: ${TOOLS}/bin
mcp_servers:
  files:
    command: ${BIN}/files-server
    args: ["--root", "${HOME}/data"]
    env:
      API_KEY: ${secret:FILES_KEY}
  mac-only:
    command:
      darwin: /usr/local/bin/mac-server
"#,
    )
    .unwrap();

    fs::write(
        layout.local_config(),
        r#"
variables:
  TOOLS: /home/me/tools
mcp_servers:
  files:
    args: ["--root", "/tmp/override"]
"#,
    )
    .unwrap();

    let main = load_main(&layout).unwrap().unwrap();
    let local = load_local(&layout).unwrap();

    let env = StaticEnv::new().set("HOME", "/home/me");
    let secrets = StaticSecrets::new().set("FILES_KEY", "hunter2");
    let resolved = resolve_config(Some(&main), local.as_ref(), &context(&env, &secrets)).unwrap();

    // Local variable override feeds the self-referential expansion.
    assert_eq!(
        resolved.variables.get("BIN").map(String::as_str),
        Some("/home/me/tools/bin")
    );

    assert_eq!(resolved.servers.len(), 1);
    let files = &resolved.servers[0];
    assert_eq!(files.name, "files");
    assert_eq!(files.command, "/home/me/tools/bin/files-server");
    // Local args replace the shared args wholesale.
    assert_eq!(files.args, vec!["--root", "/tmp/override"]);
    assert_eq!(
        files.env.get("API_KEY").map(String::as_str),
        Some("hunter2")
    );

    // No linux command, so the darwin-only server is skipped, not an error.
    assert_eq!(resolved.skipped_servers, vec!["mac-only"]);
    assert!(resolved.warnings.is_empty());
}

#[test]
fn missing_local_file_resolves_from_main_alone() {
    let temp = TempDir::new().unwrap();
    let layout = layout_in(&temp);

    fs::write(
        layout.main_config(),
        "mcp_servers:\n  solo:\n    command: run-me\n",
    )
    .unwrap();

    let main = load_main(&layout).unwrap().unwrap();
    let local = load_local(&layout).unwrap();
    assert!(local.is_none());

    let env = StaticEnv::new();
    let secrets = StaticSecrets::new();
    let resolved = resolve_config(Some(&main), local.as_ref(), &context(&env, &secrets)).unwrap();

    assert_eq!(resolved.servers.len(), 1);
    assert_eq!(resolved.servers[0].command, "run-me");
}

#[test]
fn unreadable_secret_store_only_fails_when_referenced() {
    struct Broken;
    impl mcpenv_core::SecretSource for Broken {
        fn load(&self) -> Result<mcpenv_core::SecretTable, mcpenv_core::SecretsError> {
            Err(mcpenv_core::SecretsError::new("no key"))
        }
    }

    let temp = TempDir::new().unwrap();
    let layout = layout_in(&temp);

    fs::write(
        layout.main_config(),
        "mcp_servers:\n  plain:\n    command: run-me\n",
    )
    .unwrap();
    let main = load_main(&layout).unwrap().unwrap();

    let env = StaticEnv::new();
    let ctx = ResolveContext::with_platform(Platform::Linux, &env, &Broken);
    assert!(resolve_config(Some(&main), None, &ctx).is_ok());

    fs::write(
        layout.main_config(),
        "mcp_servers:\n  needy:\n    command: run-me\n    env:\n      K: ${secret:X}\n",
    )
    .unwrap();
    let main = load_main(&layout).unwrap().unwrap();
    assert!(resolve_config(Some(&main), None, &ctx).is_err());
}

#[test]
fn serialized_output_is_camel_case_and_ordered() {
    let temp = TempDir::new().unwrap();
    let layout = layout_in(&temp);

    fs::write(
        layout.main_config(),
        r#"
mcp_servers:
  beta:
    command: b
  alpha:
    command: a
  gone:
    enabled: false
    command:
      darwin: mac-only
"#,
    )
    .unwrap();

    let main = load_main(&layout).unwrap().unwrap();
    let env = StaticEnv::new();
    let secrets = StaticSecrets::new();
    let resolved = resolve_config(Some(&main), None, &context(&env, &secrets)).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&serde_json::to_string(&resolved).unwrap()).unwrap();

    // Definition order survives serialization.
    let names: Vec<&str> = json["servers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["beta", "alpha"]);
    assert_eq!(json["skippedServers"][0], "gone");
    assert!(json.get("warnings").is_none());
}
