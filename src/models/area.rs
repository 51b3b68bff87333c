// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Area data structures.
//!
//! An area is a named, prioritized rectangle in image coordinates. Its
//! bounds are only ever written through [`Area::set_value`], which clamps
//! against bounds derived from the sibling edges at the moment of commit.

use crate::config::EditorConfig;
use crate::util::geometry::{CoordinateMapper, Edge, ImageExtent, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An editable numeric field of an area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    X1,
    Y1,
    X2,
    Y2,
    Priority,
}

impl Field {
    pub const ALL: [Field; 5] = [Field::X1, Field::Y1, Field::X2, Field::Y2, Field::Priority];

    pub fn label(self) -> &'static str {
        match self {
            Field::X1 => "x1",
            Field::Y1 => "y1",
            Field::X2 => "x2",
            Field::Y2 => "y2",
            Field::Priority => "priority",
        }
    }
}

impl From<Edge> for Field {
    fn from(edge: Edge) -> Self {
        match edge {
            Edge::X1 => Field::X1,
            Edge::Y1 => Field::Y1,
            Edge::X2 => Field::X2,
            Edge::Y2 => Field::Y2,
        }
    }
}

/// Errors raised while constructing an area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AreaError {
    /// One or more of x1, y1, x2, y2 was not supplied
    MissingBounds,
    /// The storage path identifying the image was absent or empty
    InvalidStoragePath,
}

impl fmt::Display for AreaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AreaError::MissingBounds => write!(f, "Missing coordinates for area"),
            AreaError::InvalidStoragePath => write!(f, "Invalid storage path for area"),
        }
    }
}

impl std::error::Error for AreaError {}

/// Loose form of an area as it arrives from a document or the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AreaSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub x1: Option<i32>,
    #[serde(default)]
    pub y1: Option<i32>,
    #[serde(default)]
    pub x2: Option<i32>,
    #[serde(default)]
    pub y2: Option<i32>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub priority: Option<i32>,
    #[serde(default)]
    pub storage_path: Option<String>,
}

/// Complete record handed to the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaPayload {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    pub priority: i32,
    pub name: String,
    #[serde(default)]
    pub id: Option<u64>,
    pub storage_path: String,
}

impl From<AreaPayload> for AreaSpec {
    fn from(payload: AreaPayload) -> Self {
        Self {
            id: payload.id,
            x1: Some(payload.x1),
            y1: Some(payload.y1),
            x2: Some(payload.x2),
            y2: Some(payload.y2),
            name: Some(payload.name),
            priority: Some(payload.priority),
            storage_path: Some(payload.storage_path),
        }
    }
}

/// Which edges of an area the pointer currently grabs. Either axis may be
/// absent, meaning that axis is not draggable at this point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActiveRegion {
    pub x: Option<Edge>,
    pub y: Option<Edge>,
}

impl ActiveRegion {
    pub fn has_edge(&self) -> bool {
        self.x.is_some() || self.y.is_some()
    }
}

/// A prioritized rectangle of interest on an image.
#[derive(Debug, Clone, PartialEq)]
pub struct Area {
    /// Persisted id, absent until the store has accepted the area
    pub id: Option<u64>,
    pub storage_path: String,
    pub name: String,
    pub deleted: bool,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    priority: i32,
    /// Last committed bounds on the canvas
    display: Rect,
}

/// Lower and upper bound for `field` given the area's current values.
pub fn bounds(area: &Area, field: Field, extent: ImageExtent) -> (i32, i32) {
    match field {
        Field::X1 => (0, area.x2 - 1),
        Field::X2 => (area.x1 + 1, extent.width),
        Field::Y1 => (0, area.y2 - 1),
        Field::Y2 => (area.y1 + 1, extent.height),
        Field::Priority => (1, area.priority + 1),
    }
}

/// Lower bound first, then upper, so an inverted range resolves to `upper`.
fn clamp_into(value: i32, lower: i32, upper: i32) -> i32 {
    let mut value = value;
    if value < lower {
        value = lower;
    }
    if value > upper {
        value = upper;
    }
    value
}

/// Whether `coord` grabs the edge at `this`, given the opposite edge of the
/// same axis at `opposite`.
///
/// The pointer must lie on the side of the opposite edge that this edge is
/// on, so a very thin rectangle never reports both edges at once.
pub fn is_edge_active(coord: f64, this: i32, opposite: i32, fuzz: f64) -> bool {
    let this = this as f64;
    let opposite = opposite as f64;
    if opposite < this && coord < opposite {
        return false;
    }
    if opposite > this && coord > opposite {
        return false;
    }
    coord > this - fuzz && coord < this + fuzz
}

impl Area {
    /// Build an area from a loose record, validating that every bound and
    /// the storage path are present.
    pub fn from_spec(spec: &AreaSpec, extent: ImageExtent, config: &EditorConfig) -> Result<Self, AreaError> {
        let (Some(x1), Some(y1), Some(x2), Some(y2)) = (spec.x1, spec.y1, spec.x2, spec.y2) else {
            return Err(AreaError::MissingBounds);
        };
        let storage_path = match spec.storage_path.as_deref() {
            Some(path) if !path.is_empty() => path.to_string(),
            _ => return Err(AreaError::InvalidStoragePath),
        };

        let mut area = Self::new(Rect::new(x1, y1, x2, y2), storage_path, extent, config);
        area.id = spec.id;
        if let Some(name) = &spec.name {
            area.name = name.clone();
        }
        if let Some(priority) = spec.priority {
            area.priority = priority.max(1);
        }
        Ok(area)
    }

    /// Build an unsaved area with default name and priority.
    ///
    /// Starts from the whole-image rectangle and commits x1, y1, x2, y2 in
    /// that order, so out-of-range values are clamped rather than rejected.
    pub fn new(bounds: Rect, storage_path: String, extent: ImageExtent, config: &EditorConfig) -> Self {
        let mut area = Self {
            id: None,
            storage_path,
            name: config.default_name.clone(),
            deleted: false,
            x1: 0,
            y1: 0,
            x2: extent.width,
            y2: extent.height,
            priority: config.default_priority.max(1),
            display: Rect::default(),
        };
        area.set_value(Field::X1, bounds.x1, extent);
        area.set_value(Field::Y1, bounds.y1, extent);
        area.set_value(Field::X2, bounds.x2, extent);
        area.set_value(Field::Y2, bounds.y2, extent);
        area
    }

    pub fn x1(&self) -> i32 {
        self.x1
    }

    pub fn y1(&self) -> i32 {
        self.y1
    }

    pub fn x2(&self) -> i32 {
        self.x2
    }

    pub fn y2(&self) -> i32 {
        self.y2
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    pub fn value(&self, field: Field) -> i32 {
        match field {
            Field::X1 => self.x1,
            Field::Y1 => self.y1,
            Field::X2 => self.x2,
            Field::Y2 => self.y2,
            Field::Priority => self.priority,
        }
    }

    /// Image-space bounds.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x1, self.y1, self.x2, self.y2)
    }

    /// Display-space bounds as of the last [`Area::sync_display`].
    pub fn display_rect(&self) -> Rect {
        self.display
    }

    pub fn bounds(&self, field: Field, extent: ImageExtent) -> (i32, i32) {
        bounds(self, field, extent)
    }

    /// Clamp `value` into the field's current bounds and store it.
    /// Returns the committed value.
    pub fn set_value(&mut self, field: Field, value: i32, extent: ImageExtent) -> i32 {
        let (lower, upper) = bounds(self, field, extent);
        let value = clamp_into(value, lower, upper);
        match field {
            Field::X1 => self.x1 = value,
            Field::Y1 => self.y1 = value,
            Field::X2 => self.x2 = value,
            Field::Y2 => self.y2 = value,
            Field::Priority => self.priority = value,
        }
        value
    }

    /// Recompute the display bounds, returning the previous and new values.
    pub fn sync_display(&mut self, mapper: &CoordinateMapper) -> (Rect, Rect) {
        let old = self.display;
        self.display = mapper.display_rect(&self.rect());
        (old, self.display)
    }

    /// Whether the area's display bounds intersect `rect`, shared edges included.
    pub fn overlaps(&self, rect: &Rect) -> bool {
        self.display.overlaps(rect)
    }

    pub fn is_edge_active(&self, coord: f64, edge: Edge, fuzz: f64) -> bool {
        is_edge_active(
            coord,
            self.display.edge(edge),
            self.display.edge(edge.opposite()),
            fuzz,
        )
    }

    /// Edges grabbed by a display-space pointer, or `None` when the pointer
    /// lies outside the area grown by `fuzz` on every side.
    pub fn active_region(&self, x: f64, y: f64, fuzz: f64) -> Option<ActiveRegion> {
        let d = &self.display;
        if x > d.x2 as f64 + fuzz || x < d.x1 as f64 - fuzz {
            return None;
        }
        if y > d.y2 as f64 + fuzz || y < d.y1 as f64 - fuzz {
            return None;
        }

        let x_edge = if self.is_edge_active(x, Edge::X1, fuzz) {
            Some(Edge::X1)
        } else if self.is_edge_active(x, Edge::X2, fuzz) {
            Some(Edge::X2)
        } else {
            None
        };
        let y_edge = if self.is_edge_active(y, Edge::Y1, fuzz) {
            Some(Edge::Y1)
        } else if self.is_edge_active(y, Edge::Y2, fuzz) {
            Some(Edge::Y2)
        } else {
            None
        };
        Some(ActiveRegion { x: x_edge, y: y_edge })
    }

    /// Take over the canonical fields returned by the store.
    pub fn adopt(&mut self, spec: &AreaSpec, extent: ImageExtent, config: &EditorConfig) -> Result<(), AreaError> {
        let canonical = Area::from_spec(spec, extent, config)?;
        self.id = canonical.id;
        self.storage_path = canonical.storage_path;
        self.name = canonical.name;
        self.x1 = canonical.x1;
        self.y1 = canonical.y1;
        self.x2 = canonical.x2;
        self.y2 = canonical.y2;
        self.priority = canonical.priority;
        Ok(())
    }

    pub fn payload(&self) -> AreaPayload {
        AreaPayload {
            x1: self.x1,
            y1: self.y1,
            x2: self.x2,
            y2: self.y2,
            priority: self.priority,
            name: self.name.clone(),
            id: self.id,
            storage_path: self.storage_path.clone(),
        }
    }
}
