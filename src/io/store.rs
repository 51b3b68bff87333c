// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Area persistence.
//!
//! The editor hands complete area records to an [`AreaStore`] and adopts
//! whatever canonical record comes back. [`FileStore`] keeps one image's
//! areas in a YAML or JSON document and writes it after every change.

use super::serialization::{export_document, import_document};
use crate::models::area::{AreaPayload, AreaSpec};
use crate::models::document::AreaDocument;
use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

pub trait AreaStore {
    /// All persisted areas of an image.
    fn load(&self, storage_path: &str) -> Result<Vec<AreaSpec>>;

    /// Create (no id) or update an area. Returns the canonical record.
    fn save(&mut self, payload: &AreaPayload) -> Result<AreaSpec>;

    fn delete(&mut self, storage_path: &str, id: u64) -> Result<()>;
}

pub struct FileStore {
    path: PathBuf,
    document: AreaDocument,
}

impl FileStore {
    /// Open the document at `path`, or start an empty one for the image.
    pub fn open(path: &Path, storage_path: &str, image_width: u32, image_height: u32) -> Result<Self> {
        let document = if path.exists() {
            let document = import_document(path)?;
            log::info!("Loaded {} areas from {}", document.areas.len(), path.display());
            document
        } else {
            AreaDocument::new(storage_path.to_string(), image_width, image_height)
        };
        Ok(Self {
            path: path.to_path_buf(),
            document,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the document to another file and keep using that file.
    pub fn save_as(&mut self, path: &Path) -> Result<()> {
        export_document(&self.document, path)?;
        self.path = path.to_path_buf();
        log::info!("Wrote {} areas to {}", self.document.areas.len(), path.display());
        Ok(())
    }

    /// Reject records that could never describe an area.
    fn validate(payload: &AreaPayload) -> Result<()> {
        if payload.storage_path.is_empty() {
            bail!("Area has no storage path");
        }
        if payload.x1 >= payload.x2 || payload.y1 >= payload.y2 {
            bail!(
                "Area bounds ({}, {})-({}, {}) are not ordered",
                payload.x1,
                payload.y1,
                payload.x2,
                payload.y2
            );
        }
        if payload.priority < 1 {
            bail!("Area priority {} is below 1", payload.priority);
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        export_document(&self.document, &self.path)
    }
}

impl AreaStore for FileStore {
    fn load(&self, storage_path: &str) -> Result<Vec<AreaSpec>> {
        Ok(self
            .document
            .areas
            .iter()
            .filter(|a| a.storage_path == storage_path)
            .cloned()
            .map(AreaSpec::from)
            .collect())
    }

    fn save(&mut self, payload: &AreaPayload) -> Result<AreaSpec> {
        Self::validate(payload)?;
        let existing = payload.id.and_then(|id| {
            self.document
                .areas
                .iter()
                .position(|a| a.id == Some(id) && a.storage_path == payload.storage_path)
        });

        let record = match existing {
            Some(index) => {
                self.document.areas[index] = payload.clone();
                payload.clone()
            }
            None => {
                // Unknown id for this image, or none: store as a new area.
                let mut record = payload.clone();
                record.id = Some(self.document.next_id());
                self.document.areas.push(record.clone());
                record
            }
        };
        self.flush()?;
        Ok(AreaSpec::from(record))
    }

    fn delete(&mut self, storage_path: &str, id: u64) -> Result<()> {
        self.document
            .areas
            .retain(|a| !(a.storage_path == storage_path && a.id == Some(id)));
        self.flush()
    }
}
