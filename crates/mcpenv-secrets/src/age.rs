//! Age key management: generation and public-key extraction.

use std::path::Path;
use std::process::Command;

use crate::{Error, Result};

/// Generate a new age identity at `path` via `age-keygen -o`.
pub fn generate_key(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let output = Command::new("age-keygen")
        .arg("-o")
        .arg(path)
        .output()
        .map_err(|_| Error::ToolMissing {
            tool: "age".to_string(),
            hint: crate::install_hint("age"),
        })?;
    if !output.status.success() {
        return Err(Error::ToolFailed {
            tool: "age-keygen".to_string(),
            status: output.status.to_string(),
        });
    }
    Ok(())
}

/// Extract the public key from an age identity file.
///
/// Reads the `# public key:` comment age-keygen writes; falls back to
/// `age-keygen -y` for identity files without the comment. Returns `None`
/// when the file is missing or the key cannot be derived.
pub fn public_key(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = mcpenv_fs::read_text(path)?;
    for line in content.lines() {
        if let Some(rest) = line.strip_prefix("# public key: ") {
            return Ok(Some(rest.trim().to_string()));
        }
    }
    let derived = Command::new("age-keygen")
        .arg("-y")
        .arg(path)
        .output()
        .ok()
        .filter(|out| out.status.success())
        .map(|out| String::from_utf8_lossy(&out.stdout).trim().to_string())
        .filter(|key| !key.is_empty());
    Ok(derived)
}
