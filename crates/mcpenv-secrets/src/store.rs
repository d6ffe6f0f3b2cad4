//! The sops-encrypted secret store.
//!
//! All encryption is delegated to the external `sops` binary with age
//! recipients; this module only orchestrates the tool and coerces the
//! decrypted YAML into a flat string table.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use mcpenv_core::{SecretSource, SecretTable, SecretsError};
use mcpenv_fs::Layout;

use crate::{Error, Result};

/// Handle to the encrypted secrets document and the age key that unlocks it.
#[derive(Debug, Clone)]
pub struct SopsStore {
    secrets_file: PathBuf,
    age_key_file: PathBuf,
}

impl SopsStore {
    pub fn new(layout: &Layout) -> Self {
        Self {
            secrets_file: layout.secrets_file(),
            age_key_file: layout.age_key_file().to_path_buf(),
        }
    }

    pub fn from_paths(secrets_file: impl Into<PathBuf>, age_key_file: impl Into<PathBuf>) -> Self {
        Self {
            secrets_file: secrets_file.into(),
            age_key_file: age_key_file.into(),
        }
    }

    pub fn secrets_file(&self) -> &Path {
        &self.secrets_file
    }

    fn sops(&self) -> Command {
        let mut cmd = Command::new("sops");
        cmd.env("SOPS_AGE_KEY_FILE", &self.age_key_file);
        cmd
    }

    /// Decrypt the store into a flat name → plaintext table.
    ///
    /// A missing secrets file is an empty table, not a failure. Any tool or
    /// parse failure collapses into the opaque `Unavailable` condition.
    pub fn decrypt(&self) -> Result<SecretTable> {
        if !self.secrets_file.exists() {
            tracing::debug!(path = ?self.secrets_file, "no secrets file, empty table");
            return Ok(SecretTable::new());
        }
        let output = self
            .sops()
            .arg("--decrypt")
            .arg(&self.secrets_file)
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| Error::unavailable(format!("could not run sops: {e}")))?;
        if !output.status.success() {
            return Err(Error::unavailable("is your age key available?"));
        }
        parse_secret_document(&String::from_utf8_lossy(&output.stdout))
    }

    /// Set one secret: decrypt (or start empty), update, re-encrypt in place.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut secrets = if self.secrets_file.exists() {
            self.decrypt().unwrap_or_default()
        } else {
            SecretTable::new()
        };
        secrets.insert(key.to_string(), value.to_string());

        let plaintext = serde_yaml::to_string(&secrets)
            .map_err(|e| Error::unavailable(format!("could not serialize secrets: {e}")))?;
        mcpenv_fs::write_text(&self.secrets_file, &plaintext)?;

        let status = self
            .sops()
            .args(["--encrypt", "--in-place"])
            .arg(&self.secrets_file)
            .status()?;
        if !status.success() {
            return Err(Error::ToolFailed {
                tool: "sops".to_string(),
                status: status.to_string(),
            });
        }
        Ok(())
    }

    /// Create an empty encrypted store. Overwrites nothing.
    pub fn seed(&self) -> Result<()> {
        if self.secrets_file.exists() {
            return Ok(());
        }
        mcpenv_fs::write_text(&self.secrets_file, "{}\n")?;
        let status = self
            .sops()
            .args(["--encrypt", "--in-place"])
            .arg(&self.secrets_file)
            .status()?;
        if !status.success() {
            // Do not leave a plaintext file behind.
            let _ = std::fs::remove_file(&self.secrets_file);
            return Err(Error::ToolFailed {
                tool: "sops".to_string(),
                status: status.to_string(),
            });
        }
        Ok(())
    }

    /// The secret names, without their values.
    pub fn keys(&self) -> Result<Vec<String>> {
        Ok(self.decrypt()?.into_keys().collect())
    }

    /// Open the store in the user's editor via `sops`, inheriting the tty.
    pub fn edit(&self) -> Result<()> {
        let status = self.sops().arg(&self.secrets_file).status()?;
        if !status.success() {
            return Err(Error::ToolFailed {
                tool: "sops".to_string(),
                status: status.to_string(),
            });
        }
        Ok(())
    }
}

impl SecretSource for SopsStore {
    fn load(&self) -> std::result::Result<SecretTable, SecretsError> {
        self.decrypt().map_err(|e| SecretsError::new(e.to_string()))
    }
}

/// Coerce the decrypted YAML into a flat string table. Null or non-mapping
/// documents count as empty; scalar values are stringified.
fn parse_secret_document(text: &str) -> Result<SecretTable> {
    let value: serde_yaml::Value = serde_yaml::from_str(text)
        .map_err(|e| Error::unavailable(format!("decrypted document is not valid YAML: {e}")))?;

    let serde_yaml::Value::Mapping(mapping) = value else {
        return Ok(SecretTable::new());
    };

    let mut table = SecretTable::new();
    for (key, value) in mapping {
        let Some(name) = key.as_str() else { continue };
        table.insert(name.to_string(), scalar_string(&value));
    }
    Ok(table)
}

fn scalar_string(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Null => String::new(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
