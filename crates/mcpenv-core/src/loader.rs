//! Loading the two raw config documents.
//!
//! Absence of a file is meaningful and distinct from an empty or
//! non-mapping document: absent maps to `None` (the CLI treats a `None`
//! shared document as "not initialized"), while a file that parses to null
//! or a scalar maps to an empty document. Only malformed YAML, or a
//! recognized field of the wrong shape, is an error.

use std::path::Path;

use mcpenv_fs::Layout;

use crate::document::{ConfigDocument, LocalConfig, MainConfig};
use crate::{Error, Result};

/// Load the shared config document.
pub fn load_main(layout: &Layout) -> Result<Option<MainConfig>> {
    load_document(&layout.main_config())
}

/// Load the machine-local override document.
pub fn load_local(layout: &Layout) -> Result<Option<LocalConfig>> {
    load_document(&layout.local_config())
}

fn load_document(path: &Path) -> Result<Option<ConfigDocument>> {
    if !path.exists() {
        tracing::debug!(?path, "config document not found");
        return Ok(None);
    }
    let text = mcpenv_fs::read_text(path)?;
    let value: serde_yaml::Value = serde_yaml::from_str(&text).map_err(|e| Error::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    if !value.is_mapping() {
        // Empty file, or a document that isn't a mapping at all.
        tracing::debug!(?path, "config document is empty");
        return Ok(Some(ConfigDocument::default()));
    }
    let document = serde_yaml::from_value(value).map_err(|e| Error::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(Some(document))
}
