//! The closed set of platforms a config document can target.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

/// One of the three operating system families a launch spec can vary over.
///
/// The identifiers match what config documents use as per-platform map keys
/// (`darwin`, `win32`, `linux`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Platform {
    Darwin,
    Win32,
    Linux,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Darwin, Platform::Win32, Platform::Linux];

    /// Parse a per-platform map key. Only the exact closed set is accepted.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "darwin" => Some(Self::Darwin),
            "win32" => Some(Self::Win32),
            "linux" => Some(Self::Linux),
            _ => None,
        }
    }

    /// Map a Rust OS identifier (`std::env::consts::OS`) into the closed set.
    pub fn from_os_identifier(os: &str) -> Option<Self> {
        match os {
            "macos" => Some(Self::Darwin),
            "windows" => Some(Self::Win32),
            "linux" => Some(Self::Linux),
            _ => None,
        }
    }

    /// Detect the current platform, failing loudly on anything outside the
    /// closed set. Callers on unrecognized platforms must not silently
    /// degrade into wrong launch specs.
    pub fn detect() -> Result<Self> {
        let os = std::env::consts::OS;
        Self::from_os_identifier(os).ok_or_else(|| Error::UnsupportedPlatform { os: os.to_string() })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Darwin => "darwin",
            Self::Win32 => "win32",
            Self::Linux => "linux",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Platform {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Platform {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        Self::from_key(&key).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "unknown platform {key:?}, expected one of: darwin, win32, linux"
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_keys_parse_exactly() {
        assert_eq!(Platform::from_key("darwin"), Some(Platform::Darwin));
        assert_eq!(Platform::from_key("win32"), Some(Platform::Win32));
        assert_eq!(Platform::from_key("linux"), Some(Platform::Linux));
        assert_eq!(Platform::from_key("macos"), None);
        assert_eq!(Platform::from_key("windows"), None);
        assert_eq!(Platform::from_key(""), None);
    }

    #[test]
    fn os_identifiers_map_into_the_closed_set() {
        assert_eq!(Platform::from_os_identifier("macos"), Some(Platform::Darwin));
        assert_eq!(Platform::from_os_identifier("windows"), Some(Platform::Win32));
        assert_eq!(Platform::from_os_identifier("linux"), Some(Platform::Linux));
        assert_eq!(Platform::from_os_identifier("freebsd"), None);
    }

    #[test]
    fn display_matches_map_key_form() {
        assert_eq!(Platform::Darwin.to_string(), "darwin");
        assert_eq!(Platform::Win32.to_string(), "win32");
        assert_eq!(Platform::Linux.to_string(), "linux");
    }

    #[test]
    fn serde_round_trip() {
        for platform in Platform::ALL {
            let json = serde_json::to_string(&platform).unwrap();
            let back: Platform = serde_json::from_str(&json).unwrap();
            assert_eq!(back, platform);
        }
    }
}
