//! Configuration resolution engine for mcp-env
//!
//! Takes the two raw YAML documents (shared and machine-local), collapses
//! per-platform values for the current platform, merges server definitions
//! override-wins, expands `${...}` references (variables, secrets,
//! environment), and produces the final ordered list of launch specs.
//!
//! The engine is pure apart from two injected capabilities: an [`EnvSource`]
//! for environment lookups and a [`SecretSource`] for the decrypted secret
//! table. Expansion failures are soft — warnings plus literal tokens in the
//! output — so a partially-resolved config remains usable; only an
//! unsupported platform or a needed-but-broken secret store aborts.

pub mod document;
pub mod env;
pub mod error;
pub mod expand;
pub mod loader;
pub mod platform;
pub mod resolver;
pub mod secrets;
pub mod values;

pub use document::{ConfigDocument, LocalConfig, MainConfig, ServerDefinition, merge_servers};
pub use env::{EnvSource, ProcessEnv, StaticEnv};
pub use error::{Error, Result};
pub use expand::{Expander, Warning};
pub use loader::{load_local, load_main};
pub use platform::Platform;
pub use resolver::{ResolveContext, ResolvedConfig, ResolvedServer, resolve_config};
pub use secrets::{NoSecrets, SecretSource, SecretTable, SecretsError, StaticSecrets};
pub use values::{OrderedMap, PlatformValue, yaml_to_json};
