// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image file loading.
//!
//! Decodes the source image once; its natural size drives the canvas
//! dimensions and its pixels feed the raster canvas.

use anyhow::{Context, Result};
use image::RgbaImage;
use std::path::Path;

/// Load an image file as RGBA.
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path).with_context(|| format!("Failed to decode {}", path.display()))?;
    Ok(image.to_rgba8())
}

/// Name used to key an image's areas when none is given.
pub fn default_storage_path(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Areas document that sits next to an image.
pub fn default_areas_path(path: &Path) -> std::path::PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());
    path.with_file_name(format!("{}.areas.yaml", stem))
}
