//! The two raw config documents and the server-definition merge.

use serde::{Deserialize, Serialize};

use crate::values::{OrderedMap, PlatformValue};

/// A parsed config document: named variables plus named server definitions.
///
/// The shared document and the machine-local override have the same shape;
/// the local one simply tends to be sparse. Unrecognized top-level keys are
/// ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub variables: OrderedMap<PlatformValue<String>>,

    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub mcp_servers: OrderedMap<ServerDefinition>,
}

/// The shared, committed document.
pub type MainConfig = ConfigDocument;

/// The machine-local override document. Every field is optional.
pub type LocalConfig = ConfigDocument;

/// A named launch spec for one managed server process.
///
/// The four recognized fields are typed; everything else lands in `extra`
/// and is carried through to the output opaquely (platform-resolved but not
/// variable-expanded).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<PlatformValue<bool>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<PlatformValue<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<PlatformValue<Vec<String>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<PlatformValue<OrderedMap<String>>>,

    #[serde(flatten)]
    pub extra: OrderedMap<PlatformValue<serde_yaml::Value>>,
}

impl ServerDefinition {
    /// Overlay `other` on top of `self`, field by field.
    ///
    /// Every field present in the overlay replaces the base field entirely —
    /// an overlay `env` map replaces the base `env` map wholesale, no
    /// key-by-key union across layers. Predictable beats clever here.
    pub fn merged_with(&self, other: &ServerDefinition) -> ServerDefinition {
        let mut extra = self.extra.clone();
        for (key, value) in other.extra.iter() {
            extra.insert(key.to_string(), value.clone());
        }
        ServerDefinition {
            enabled: other.enabled.clone().or_else(|| self.enabled.clone()),
            command: other.command.clone().or_else(|| self.command.clone()),
            args: other.args.clone().or_else(|| self.args.clone()),
            env: other.env.clone().or_else(|| self.env.clone()),
            extra,
        }
    }
}

/// Merge the shared server map with the local override map.
///
/// Output order is first-insertion order: shared servers in their defined
/// order, then local-only servers in theirs.
pub fn merge_servers(
    main: &OrderedMap<ServerDefinition>,
    local: &OrderedMap<ServerDefinition>,
) -> OrderedMap<ServerDefinition> {
    let mut merged = main.clone();
    for (name, definition) in local.iter() {
        let combined = match merged.get(name) {
            Some(base) => base.merged_with(definition),
            None => definition.clone(),
        };
        merged.insert(name.to_string(), combined);
    }
    merged
}
