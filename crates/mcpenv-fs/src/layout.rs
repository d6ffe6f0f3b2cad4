//! Locations of the files mcp-env manages.
//!
//! Everything lives inside a single config root (the directory that gets
//! synced over git), except the age private key, which is deliberately kept
//! outside the root so it can never be committed alongside the secrets it
//! protects.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Environment variable that overrides the config root.
pub const DIR_ENV: &str = "MCP_ENV_DIR";

/// Environment variable that overrides the age key location.
pub const AGE_KEY_ENV: &str = "MCP_ENV_AGE_KEY";

/// Name of the shared (committed) config document.
pub const MAIN_CONFIG: &str = "config.yaml";

/// Name of the machine-local (git-ignored) override document.
pub const LOCAL_CONFIG: &str = "config.local.yaml";

/// Paths to the config root and the files inside and around it.
#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
    age_key: PathBuf,
}

impl Layout {
    /// Build a layout with explicit paths. Primarily for tests and embedding.
    pub fn new(root: impl Into<PathBuf>, age_key: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            age_key: age_key.into(),
        }
    }

    /// Locate the layout for the current user.
    ///
    /// The root is `$MCP_ENV_DIR` when set, otherwise the platform config
    /// directory (`~/.config/mcp-env` on Linux). The age key is
    /// `$MCP_ENV_AGE_KEY` when set, otherwise `~/.mcp-env-key.txt`.
    pub fn discover() -> Result<Self> {
        let root = match env_path(DIR_ENV) {
            Some(p) => p,
            None => dirs::config_dir()
                .ok_or(Error::NoConfigDir)?
                .join("mcp-env"),
        };
        let age_key = match env_path(AGE_KEY_ENV) {
            Some(p) => p,
            None => dirs::home_dir()
                .ok_or(Error::NoHomeDir)?
                .join(".mcp-env-key.txt"),
        };
        Ok(Self { root, age_key })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The shared config document, committed and synced.
    pub fn main_config(&self) -> PathBuf {
        self.root.join(MAIN_CONFIG)
    }

    /// The machine-local override document, never committed.
    pub fn local_config(&self) -> PathBuf {
        self.root.join(LOCAL_CONFIG)
    }

    /// A committed example of the local override document.
    pub fn local_example(&self) -> PathBuf {
        self.root.join("config.local.example.yaml")
    }

    /// The sops-encrypted secrets document.
    pub fn secrets_file(&self) -> PathBuf {
        self.root.join("secrets.enc.yaml")
    }

    /// sops creation rules, committed so every machine encrypts the same way.
    pub fn sops_rules(&self) -> PathBuf {
        self.root.join(".sops.yaml")
    }

    pub fn gitignore(&self) -> PathBuf {
        self.root.join(".gitignore")
    }

    /// The age private key. Lives outside the config root.
    pub fn age_key_file(&self) -> &Path {
        &self.age_key
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .map(|v| v.to_string_lossy().trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
