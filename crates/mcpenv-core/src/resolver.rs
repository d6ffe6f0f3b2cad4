//! The resolution pipeline: raw documents in, materialized launch specs out.
//!
//! Each call is independent and allocates its own tables; nothing is shared
//! or cached across calls.

use serde::Serialize;

use crate::document::{ConfigDocument, LocalConfig, MainConfig, merge_servers};
use crate::env::EnvSource;
use crate::expand::{Expander, Warning};
use crate::platform::Platform;
use crate::secrets::{SecretSource, SecretTable};
use crate::values::{OrderedMap, yaml_to_json};
use crate::{Error, Result};

/// Literal marker that decides whether a secret-store failure matters.
const SECRET_REF_MARKER: &str = "${secret:";

/// The collaborators a resolution run needs, with the platform pinned.
///
/// Platform detection is the first failure exit: `detect` refuses to build a
/// context on platforms outside the closed set.
pub struct ResolveContext<'a> {
    pub platform: Platform,
    pub env: &'a dyn EnvSource,
    pub secrets: &'a dyn SecretSource,
}

impl<'a> ResolveContext<'a> {
    /// Build a context for the detected platform, failing fast on an
    /// unsupported one.
    pub fn detect(env: &'a dyn EnvSource, secrets: &'a dyn SecretSource) -> Result<Self> {
        Ok(Self {
            platform: Platform::detect()?,
            env,
            secrets,
        })
    }

    /// Build a context for a forced platform.
    pub fn with_platform(
        platform: Platform,
        env: &'a dyn EnvSource,
        secrets: &'a dyn SecretSource,
    ) -> Self {
        Self {
            platform,
            env,
            secrets,
        }
    }
}

/// One fully materialized launch spec.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedServer {
    pub name: String,
    pub enabled: bool,
    pub command: String,
    pub args: Vec<String>,
    pub env: OrderedMap<String>,
    /// Platform-resolved but deliberately not variable-expanded.
    #[serde(skip_serializing_if = "OrderedMap::is_empty")]
    pub passthrough: OrderedMap<serde_json::Value>,
}

/// The engine's output, ready to be serialized into the downstream format.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    pub platform: Platform,
    pub variables: OrderedMap<String>,
    pub servers: Vec<ResolvedServer>,
    /// Servers defined in the input but missing a usable command here.
    pub skipped_servers: Vec<String>,
    /// Soft expansion failures, in the order they were encountered.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,
}

/// Resolve the two raw documents into the final server list.
///
/// `None` documents are treated as empty here; the caller decides whether a
/// missing shared document is an error. The only failure exits are an
/// unsupported platform (at context construction) and a secret store that is
/// unavailable while the input actually references secrets.
pub fn resolve_config(
    main: Option<&MainConfig>,
    local: Option<&LocalConfig>,
    ctx: &ResolveContext<'_>,
) -> Result<ResolvedConfig> {
    let platform = ctx.platform;
    let empty = ConfigDocument::default();
    let main = main.unwrap_or(&empty);
    let local = local.unwrap_or(&empty);

    let mut warnings = Vec::new();

    // Variable table: shared document first, local overriding unconditionally.
    // Keys whose per-platform resolution is undefined here are simply absent.
    let mut variables: OrderedMap<String> = OrderedMap::new();
    for (key, value) in main.variables.iter() {
        if let Some(resolved) = value.resolve(platform) {
            variables.insert(key.to_string(), resolved.clone());
        }
    }
    for (key, value) in local.variables.iter() {
        if let Some(resolved) = value.resolve(platform) {
            variables.insert(key.to_string(), resolved.clone());
        }
    }
    tracing::debug!(count = variables.len(), "variable table built");

    // Fetch secrets now, but defer the failure: a config that never
    // references a secret must not be punished for a broken secret store.
    let secrets = match ctx.secrets.load() {
        Ok(table) => table,
        Err(err) => {
            if references_secrets(&variables, main, local)? {
                return Err(Error::Secrets(err));
            }
            tracing::debug!("secret store unavailable, but nothing references secrets");
            SecretTable::new()
        }
    };

    // Self-referential one-pass expansion, in definition order. A variable
    // sees the expanded value of anything defined before it and the raw
    // value of anything defined after it. No fixed point, no cycle
    // detection; cycles terminate with literal tokens left in place.
    let keys: Vec<String> = variables.keys().map(String::from).collect();
    for key in keys {
        let Some(raw) = variables.get(&key).cloned() else {
            continue;
        };
        let expanded =
            Expander::new(&variables, &secrets, platform, ctx.env).expand(&raw, &mut warnings);
        variables.insert(key, expanded);
    }

    let merged = merge_servers(&main.mcp_servers, &local.mcp_servers);

    let mut servers = Vec::new();
    let mut skipped_servers = Vec::new();
    let expander = Expander::new(&variables, &secrets, platform, ctx.env);

    for (name, definition) in merged.iter() {
        let enabled = definition
            .enabled
            .as_ref()
            .and_then(|v| v.resolve(platform))
            .copied()
            .unwrap_or(true);

        let command = definition
            .command
            .as_ref()
            .and_then(|v| v.resolve(platform))
            .cloned();
        let Some(command) = command.filter(|c| !c.is_empty()) else {
            tracing::debug!(server = name, "no command for this platform, skipping");
            skipped_servers.push(name.to_string());
            continue;
        };

        let args = definition
            .args
            .as_ref()
            .and_then(|v| v.resolve(platform))
            .cloned()
            .unwrap_or_default();
        let env_map = definition
            .env
            .as_ref()
            .and_then(|v| v.resolve(platform))
            .cloned()
            .unwrap_or_default();

        // Passthrough fields: platform-resolved only. Strings inside them
        // that look like placeholders are left untouched.
        let mut passthrough = OrderedMap::new();
        for (key, value) in definition.extra.iter() {
            if let Some(resolved) = value.resolve(platform) {
                passthrough.insert(key.to_string(), yaml_to_json(resolved));
            }
        }

        servers.push(ResolvedServer {
            name: name.to_string(),
            enabled,
            command: expander.expand(&command, &mut warnings),
            args: args
                .iter()
                .map(|arg| expander.expand(arg, &mut warnings))
                .collect(),
            env: env_map
                .iter()
                .map(|(k, v)| (k.to_string(), expander.expand(v, &mut warnings)))
                .collect(),
            passthrough,
        });
    }

    tracing::debug!(
        servers = servers.len(),
        skipped = skipped_servers.len(),
        warnings = warnings.len(),
        "resolution complete"
    );

    Ok(ResolvedConfig {
        platform,
        variables,
        servers,
        skipped_servers,
        warnings,
    })
}

/// Whether any input text contains a secret reference. The raw server maps
/// are serialized so references hiding in any field, platform alternative,
/// or passthrough value are seen.
fn references_secrets(
    variables: &OrderedMap<String>,
    main: &ConfigDocument,
    local: &ConfigDocument,
) -> Result<bool> {
    let mut probe = String::new();
    for value in variables.values() {
        probe.push_str(value);
        probe.push('\n');
    }
    probe.push_str(&serde_json::to_string(&main.mcp_servers)?);
    probe.push_str(&serde_json::to_string(&local.mcp_servers)?);
    Ok(probe.contains(SECRET_REF_MARKER))
}
