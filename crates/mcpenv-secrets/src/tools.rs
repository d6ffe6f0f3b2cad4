//! Availability probes and install guidance for the external tools.

use std::process::{Command, Stdio};

/// Which of the secret-handling binaries are on the PATH.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolStatus {
    pub sops: bool,
    pub age: bool,
}

impl ToolStatus {
    pub fn all_available(self) -> bool {
        self.sops && self.age
    }
}

/// Probe for the sops and age binaries.
pub fn check_binaries() -> ToolStatus {
    ToolStatus {
        sops: binary_available("sops"),
        age: binary_available("age"),
    }
}

fn binary_available(name: &str) -> bool {
    Command::new(name)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// A per-platform installation hint for a missing binary.
pub fn install_hint(binary: &str) -> String {
    match binary {
        "sops" => {
            if cfg!(target_os = "macos") {
                "Install with: brew install sops".to_string()
            } else {
                "Download from https://github.com/getsops/sops/releases".to_string()
            }
        }
        "age" => {
            if cfg!(target_os = "macos") {
                "Install with: brew install age".to_string()
            } else if cfg!(target_os = "linux") {
                "Install with: sudo apt install age (or download from https://github.com/FiloSottile/age/releases)"
                    .to_string()
            } else {
                "Download from https://github.com/FiloSottile/age/releases".to_string()
            }
        }
        other => format!("Install {other} and ensure it is on your PATH"),
    }
}
