// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Area document serialization and deserialization.
//!
//! This module handles exporting and importing area documents in YAML
//! and JSON formats.

use crate::models::document::AreaDocument;
use anyhow::{bail, Context, Result};
use std::path::Path;

/// Export an area document to YAML format.
pub fn export_yaml(data: &AreaDocument, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(data)?;
    std::fs::write(path, yaml).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Export an area document to JSON format.
pub fn export_json(data: &AreaDocument, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Import an area document from YAML format.
pub fn import_yaml(path: &Path) -> Result<AreaDocument> {
    let yaml = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let data = serde_yaml::from_str(&yaml)?;
    Ok(data)
}

/// Import an area document from JSON format.
pub fn import_json(path: &Path) -> Result<AreaDocument> {
    let json = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let data = serde_json::from_str(&json)?;
    Ok(data)
}

/// Export, picking the format from the file extension.
pub fn export_document(data: &AreaDocument, path: &Path) -> Result<()> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => export_yaml(data, path),
        Some("json") => export_json(data, path),
        other => bail!("Unsupported file extension: {:?}", other),
    }
}

/// Import, picking the format from the file extension.
pub fn import_document(path: &Path) -> Result<AreaDocument> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => import_yaml(path),
        Some("json") => import_json(path),
        other => bail!("Unsupported file extension: {:?}", other),
    }
}
