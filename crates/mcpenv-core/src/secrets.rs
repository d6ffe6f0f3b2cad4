//! The secret-table contract the resolver consumes.
//!
//! Decryption itself lives elsewhere; the resolver only needs a flat
//! name-to-plaintext table, or a single opaque failure it can defer until it
//! knows secrets are actually referenced.

use std::collections::BTreeMap;

/// Flat mapping of secret name to plaintext value.
pub type SecretTable = BTreeMap<String, String>;

/// The single opaque "secrets unavailable" condition.
///
/// Whatever went wrong underneath (tool missing, key absent, decryption
/// refused), the resolver treats it the same way.
#[derive(Debug, Clone, thiserror::Error)]
#[error("secrets unavailable: {message}")]
pub struct SecretsError {
    pub message: String,
}

impl SecretsError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Supplies the secret table.
pub trait SecretSource {
    fn load(&self) -> Result<SecretTable, SecretsError>;
}

/// Source for callers with no secret store configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSecrets;

impl SecretSource for NoSecrets {
    fn load(&self) -> Result<SecretTable, SecretsError> {
        Ok(SecretTable::new())
    }
}

/// A fixed in-memory secret table.
#[derive(Debug, Clone, Default)]
pub struct StaticSecrets(SecretTable);

impl StaticSecrets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: &str, value: &str) -> Self {
        self.0.insert(name.to_string(), value.to_string());
        self
    }
}

impl SecretSource for StaticSecrets {
    fn load(&self) -> Result<SecretTable, SecretsError> {
        Ok(self.0.clone())
    }
}
