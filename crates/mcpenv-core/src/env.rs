//! Environment access as an explicit capability.
//!
//! The expander never reads `std::env` directly; it goes through an
//! `EnvSource` so tests (and embedders) can fabricate environments.

use std::collections::BTreeMap;

/// Read-only lookup of named environment variables.
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;

    /// The user's home directory value, `HOME` first, then `USERPROFILE`.
    fn home(&self) -> Option<String> {
        self.var("HOME").or_else(|| self.var("USERPROFILE"))
    }
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// A fixed in-memory environment.
#[derive(Debug, Clone, Default)]
pub struct StaticEnv(BTreeMap<String, String>);

impl StaticEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &str, value: &str) -> Self {
        self.0.insert(key.to_string(), value.to_string());
        self
    }
}

impl EnvSource for StaticEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }
}

impl FromIterator<(String, String)> for StaticEnv {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
