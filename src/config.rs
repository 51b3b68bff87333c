// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editor configuration.
//!
//! Settings are read from an optional YAML or JSON file (picked by
//! extension) and then overridden by command-line flags.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Largest canvas width in display pixels.
    #[serde(default = "default_max_width")]
    pub max_width: u32,
    /// Largest canvas height in display pixels.
    #[serde(default = "default_max_height")]
    pub max_height: u32,
    /// Distance in display pixels within which the pointer grabs an edge.
    #[serde(default = "default_active_fuzz")]
    pub active_fuzz: f64,
    /// Priority given to areas that arrive without one.
    #[serde(default = "default_priority")]
    pub default_priority: i32,
    #[serde(default)]
    pub default_name: String,
}

fn default_max_width() -> u32 {
    800
}

fn default_max_height() -> u32 {
    400
}

fn default_active_fuzz() -> f64 {
    10.0
}

fn default_priority() -> i32 {
    3
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_width: default_max_width(),
            max_height: default_max_height(),
            active_fuzz: default_active_fuzz(),
            default_priority: default_priority(),
            default_name: String::new(),
        }
    }
}

impl EditorConfig {
    /// Load configuration from a YAML or JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let extension = path.extension().and_then(|s| s.to_str());
        let config = match extension {
            Some("json") => serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?,
            _ => serde_yaml::from_str(&text)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?,
        };
        Ok(config)
    }

    /// Load configuration from `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) if path.exists() => Self::load(path),
            Some(path) => {
                log::warn!("Config file {} not found, using defaults", path.display());
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: EditorConfig = serde_yaml::from_str("max_width: 640\nactive_fuzz: 4").unwrap();
        assert_eq!(config.max_width, 640);
        assert_eq!(config.max_height, 400);
        assert_eq!(config.active_fuzz, 4.0);
        assert_eq!(config.default_priority, 3);
        assert_eq!(config.default_name, "");
    }

    #[test]
    fn test_load_json_by_extension() {
        let path = std::env::temp_dir().join("area_editor_config_test.json");
        std::fs::write(&path, r#"{"max_height": 300, "default_priority": 1}"#).unwrap();
        let config = EditorConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(config.max_height, 300);
        assert_eq!(config.default_priority, 1);
        assert_eq!(config.max_width, 800);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("area_editor_config_missing.yaml");
        let config = EditorConfig::load_or_default(Some(&path)).unwrap();
        assert_eq!(config, EditorConfig::default());
    }
}
