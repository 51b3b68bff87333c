// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Full and partial repaint of the canvas.
//!
//! A partial repaint erases a dirty rectangle by blitting the source image
//! back over it and then repaints, bottom to top, every area that touches
//! it, clipped to the rectangle. The geometry (which rectangles are dirty,
//! what each area contributes) is computed by pure functions here; the
//! pixels are pushed through a [`Surface`].

use super::surface::{Stroke, Surface};
use crate::models::collection::AreaCollection;
use crate::util::geometry::{CoordinateMapper, Rect};
use image::Rgba;

/// Opacity of area fills.
pub const FILL_ALPHA: f64 = 0.4;

/// Translucent fill colour for a priority.
pub fn priority_color(priority: i32) -> Rgba<u8> {
    let alpha = (FILL_ALPHA * 255.0).round() as u8;
    match priority {
        1 => Rgba([0, 255, 0, alpha]),
        2 => Rgba([150, 150, 255, alpha]),
        3 => Rgba([225, 225, 125, alpha]),
        _ => Rgba([200, 200, 200, alpha]),
    }
}

/// What one area contributes to a dirty rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaPaint {
    pub fill: Rect,
    pub color: Rgba<u8>,
    pub strokes: Vec<Stroke>,
}

/// Clip an area's display bounds to `dirty`.
///
/// Border strokes are emitted only where the clipped rectangle still runs
/// along one of the area's true edges, so clipping never invents a border.
pub fn plan_area(bounds: &Rect, priority: i32, dirty: &Rect) -> Option<AreaPaint> {
    if !bounds.overlaps(dirty) {
        return None;
    }
    let clip = bounds.intersect(dirty);

    let mut strokes = Vec::with_capacity(4);
    if clip.x1 == bounds.x1 {
        strokes.push(Stroke::Vertical { x: clip.x1, y1: clip.y1, y2: clip.y2 });
    }
    if clip.x2 == bounds.x2 {
        strokes.push(Stroke::Vertical { x: clip.x2 - 1, y1: clip.y1, y2: clip.y2 });
    }
    if clip.y1 == bounds.y1 {
        strokes.push(Stroke::Horizontal { y: clip.y1, x1: clip.x1, x2: clip.x2 });
    }
    if clip.y2 == bounds.y2 {
        strokes.push(Stroke::Horizontal { y: clip.y2 - 1, x1: clip.x1, x2: clip.x2 });
    }
    strokes.retain(|s| !s.is_empty());

    Some(AreaPaint {
        fill: clip,
        color: priority_color(priority),
        strokes,
    })
}

/// Start and end of the strip swept when edge 1 moves from `old1` to `new1`
/// and edge 2 from `old2` to `new2` along one axis.
///
/// Growing strips reach one pixel back into the old bounds so the old border
/// line is erased.
fn swept_span(old1: i32, new1: i32, old2: i32, new2: i32) -> Option<(i32, i32)> {
    let low = match new1.cmp(&old1) {
        std::cmp::Ordering::Less => Some((new1, old1 + 1)),
        std::cmp::Ordering::Greater => Some((old1, new1)),
        std::cmp::Ordering::Equal => None,
    };
    let high = match new2.cmp(&old2) {
        std::cmp::Ordering::Greater => Some((old2 - 1, new2)),
        std::cmp::Ordering::Less => Some((new2, old2)),
        std::cmp::Ordering::Equal => None,
    };
    match (low, high) {
        (Some(a), Some(b)) => Some((a.0.min(b.0), a.1.max(b.1))),
        (a, b) => a.or(b),
    }
}

/// Dirty rectangles after an area's display bounds changed from `old` to `new`.
///
/// At most one strip per axis: the x strip spans the old vertical extent,
/// the y strip spans the new horizontal extent.
pub fn resize_dirty_rects(old: &Rect, new: &Rect) -> Vec<Rect> {
    let mut dirty = Vec::with_capacity(2);
    if let Some((x1, x2)) = swept_span(old.x1, new.x1, old.x2, new.x2) {
        dirty.push(Rect::new(x1, old.y1, x2, old.y2));
    }
    if let Some((y1, y2)) = swept_span(old.y1, new.y1, old.y2, new.y2) {
        dirty.push(Rect::new(new.x1, y1, new.x2, y2));
    }
    dirty.retain(|r| !r.is_empty());
    dirty
}

/// Paint every visible area that touches `dirty`, bottom to top.
fn paint_areas<S: Surface>(surface: &mut S, areas: &AreaCollection, dirty: &Rect) {
    for (_, area) in areas.iter() {
        if area.deleted || !area.overlaps(dirty) {
            continue;
        }
        let Some(paint) = plan_area(&area.display_rect(), area.priority(), dirty) else {
            continue;
        };
        if !paint.fill.is_empty() {
            surface.fill_rect(paint.fill, paint.color);
        }
        for stroke in paint.strokes {
            surface.stroke(stroke);
        }
    }
}

/// Redraw the whole canvas, refreshing every area's display bounds.
pub fn full_repaint<S: Surface>(surface: &mut S, mapper: &CoordinateMapper, areas: &mut AreaCollection) {
    surface.clear();
    let canvas = mapper.display_bounds();
    surface.draw_source(mapper.source_rect(&canvas), canvas);
    for (_, area) in areas.iter_mut() {
        area.sync_display(mapper);
    }
    paint_areas(surface, areas, &canvas);
}

/// Erase and repaint a display-space rectangle.
pub fn partial_repaint<S: Surface>(surface: &mut S, mapper: &CoordinateMapper, areas: &AreaCollection, dirty: Rect) {
    if dirty.is_empty() {
        return;
    }
    surface.draw_source(mapper.source_rect(&dirty), dirty);
    paint_areas(surface, areas, &dirty);
}
