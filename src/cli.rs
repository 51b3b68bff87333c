// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Command-line arguments.
//!
//! Flags override values read from the configuration file.

use crate::config::EditorConfig;
use clap::Parser;
use std::path::PathBuf;

/// Interactive editor for prioritized rectangular areas on an image.
#[derive(Parser, Debug, Default)]
#[command(name = "area-editor", version)]
pub struct Args {
    /// Image to open on startup
    #[arg(short, long, value_name = "FILE")]
    pub image: Option<PathBuf>,

    /// Areas document (.yaml, .yml or .json). Defaults to <image stem>.areas.yaml
    #[arg(short, long, value_name = "FILE")]
    pub areas: Option<PathBuf>,

    /// Editor configuration file (.yaml, .yml or .json)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Key identifying the image in the areas document. Defaults to the image file name
    #[arg(long, value_name = "KEY")]
    pub storage_path: Option<String>,

    /// Largest canvas width in display pixels
    #[arg(long, value_name = "PX")]
    pub max_width: Option<u32>,

    /// Largest canvas height in display pixels
    #[arg(long, value_name = "PX")]
    pub max_height: Option<u32>,

    /// Edge grab distance in display pixels
    #[arg(long, value_name = "PX")]
    pub fuzz: Option<f64>,
}

impl Args {
    /// Apply command-line overrides on top of a loaded configuration.
    pub fn apply(&self, config: &mut EditorConfig) {
        if let Some(width) = self.max_width {
            config.max_width = width.max(1);
        }
        if let Some(height) = self.max_height {
            config.max_height = height.max(1);
        }
        if let Some(fuzz) = self.fuzz {
            config.active_fuzz = fuzz.max(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_override() {
        let args = Args::parse_from([
            "area-editor",
            "--image",
            "beach.jpg",
            "--max-width",
            "640",
            "--fuzz",
            "6",
        ]);
        assert_eq!(args.image, Some(PathBuf::from("beach.jpg")));
        assert!(args.areas.is_none());

        let mut config = EditorConfig::default();
        args.apply(&mut config);
        assert_eq!(config.max_width, 640);
        assert_eq!(config.max_height, 400);
        assert_eq!(config.active_fuzz, 6.0);
    }

    #[test]
    fn test_no_flags_keeps_config() {
        let args = Args::parse_from(["area-editor"]);
        let mut config = EditorConfig::default();
        args.apply(&mut config);
        assert_eq!(config, EditorConfig::default());
    }
}
