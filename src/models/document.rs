// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Area document for serialization.
//!
//! One document holds every persisted area of a single image, keyed by the
//! image's storage path.

use super::area::AreaPayload;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaDocument {
    pub storage_path: String,
    pub image_width: u32,
    pub image_height: u32,
    #[serde(default)]
    pub areas: Vec<AreaPayload>,
}

impl AreaDocument {
    /// Create an empty document for the given image.
    pub fn new(storage_path: String, image_width: u32, image_height: u32) -> Self {
        Self {
            storage_path,
            image_width,
            image_height,
            areas: Vec::new(),
        }
    }

    /// Next free id.
    pub fn next_id(&self) -> u64 {
        self.areas.iter().filter_map(|a| a.id).max().map_or(1, |id| id + 1)
    }
}
