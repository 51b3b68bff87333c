// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drag session state machine.
//!
//! Pointer-down picks a mode from the hit test, pointer-moves apply it,
//! pointer-up returns to idle. Only one session exists at a time.

use super::hit_test::hit_test;
use super::render::resize_dirty_rects;
use crate::models::area::{ActiveRegion, Field};
use crate::models::collection::{AreaCollection, AreaKey};
use crate::util::geometry::{CoordinateMapper, Point, Rect};

/// Current drag session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragMode {
    Idle,
    /// Dragging one or two edges of an area
    Resize { key: AreaKey, region: ActiveRegion },
    /// Dragging an area by its interior; `offset` is the pointer's distance
    /// from the area's top-left corner in display pixels
    Move { key: AreaKey, offset: Point },
    /// Sweeping out a new area from `start`
    Create { start: Point },
}

impl DragMode {
    pub fn label(&self) -> &'static str {
        match self {
            DragMode::Idle => "Idle",
            DragMode::Resize { .. } => "Resize",
            DragMode::Move { .. } => "Move",
            DragMode::Create { .. } => "Create",
        }
    }
}

/// Result of releasing the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    None,
    /// A create gesture finished; image-space bounds of the new area
    Create(Rect),
}

#[derive(Debug)]
pub struct DragController {
    mode: DragMode,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new()
    }
}

impl DragController {
    pub fn new() -> Self {
        Self { mode: DragMode::Idle }
    }

    pub fn mode(&self) -> DragMode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.mode != DragMode::Idle
    }

    /// Start a session. Ignored while one is already running.
    pub fn pointer_down(&mut self, point: Point, areas: &AreaCollection, fuzz: f64) -> DragMode {
        if self.is_active() {
            return self.mode;
        }
        self.mode = match hit_test(areas, point, fuzz) {
            Some(hit) if hit.region.has_edge() => DragMode::Resize {
                key: hit.key,
                region: hit.region,
            },
            Some(hit) => {
                let display = areas
                    .get(hit.key)
                    .map(|a| a.display_rect())
                    .unwrap_or_default();
                DragMode::Move {
                    key: hit.key,
                    offset: Point::new(point.x - display.x1 as f64, point.y - display.y1 as f64),
                }
            }
            None => DragMode::Create { start: point },
        };
        log::debug!("Drag started: {:?}", self.mode);
        self.mode
    }

    /// Apply a pointer move. Returns the display rectangles needing repaint.
    pub fn pointer_move(&mut self, point: Point, areas: &mut AreaCollection, mapper: &CoordinateMapper) -> Vec<Rect> {
        match self.mode {
            DragMode::Idle | DragMode::Create { .. } => Vec::new(),
            DragMode::Resize { key, region } => resize(key, region, point, areas, mapper),
            DragMode::Move { key, offset } => move_area(key, offset, point, areas, mapper),
        }
    }

    /// End the session.
    pub fn pointer_up(&mut self, point: Point, mapper: &CoordinateMapper) -> DragOutcome {
        let mode = std::mem::replace(&mut self.mode, DragMode::Idle);
        log::debug!("Drag finished: {}", mode.label());
        match mode {
            DragMode::Create { start } => {
                DragOutcome::Create(Rect::from_corners(mapper.image_point(start), mapper.image_point(point)))
            }
            _ => DragOutcome::None,
        }
    }
}

fn resize(
    key: AreaKey,
    region: ActiveRegion,
    point: Point,
    areas: &mut AreaCollection,
    mapper: &CoordinateMapper,
) -> Vec<Rect> {
    let extent = mapper.extent();
    let Some(area) = areas.get_mut(key) else {
        return Vec::new();
    };
    let (image_x, image_y) = mapper.image_point(point);
    if let Some(edge) = region.x {
        area.set_value(Field::from(edge), image_x, extent);
    }
    if let Some(edge) = region.y {
        area.set_value(Field::from(edge), image_y, extent);
    }
    let (old, new) = area.sync_display(mapper);
    resize_dirty_rects(&old, &new)
}

/// Move the top-left corner, then re-derive the bottom-right from the
/// original size. Clamping at the image border repositions the area but
/// never shrinks it.
fn move_area(
    key: AreaKey,
    offset: Point,
    point: Point,
    areas: &mut AreaCollection,
    mapper: &CoordinateMapper,
) -> Vec<Rect> {
    let extent = mapper.extent();
    let Some(area) = areas.get_mut(key) else {
        return Vec::new();
    };
    let (image_x1, image_y1) = mapper.image_point(Point::new(point.x - offset.x, point.y - offset.y));
    let width = area.width();
    let height = area.height();

    let mut dirty = Vec::with_capacity(4);

    area.set_value(Field::X1, image_x1.min(extent.width - width), extent);
    area.set_value(Field::Y1, image_y1.min(extent.height - height), extent);
    let (old, new) = area.sync_display(mapper);
    dirty.extend(resize_dirty_rects(&old, &new));

    let x2 = area.x1() + width;
    let y2 = area.y1() + height;
    area.set_value(Field::X2, x2, extent);
    area.set_value(Field::Y2, y2, extent);
    let (old, new) = area.sync_display(mapper);
    dirty.extend(resize_dirty_rects(&old, &new));

    dirty
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::models::area::{Area, AreaSpec};

    fn setup(rect: (i32, i32, i32, i32)) -> (CoordinateMapper, AreaCollection, AreaKey) {
        let mapper = CoordinateMapper::fit(800, 600, 400, 300);
        let spec = AreaSpec {
            x1: Some(rect.0),
            y1: Some(rect.1),
            x2: Some(rect.2),
            y2: Some(rect.3),
            storage_path: Some("img.png".to_string()),
            ..Default::default()
        };
        let mut area = Area::from_spec(&spec, mapper.extent(), &EditorConfig::default()).unwrap();
        area.sync_display(&mapper);
        let mut areas = AreaCollection::new();
        let key = areas.push(area);
        (mapper, areas, key)
    }

    #[test]
    fn test_interior_move() {
        let (mapper, mut areas, key) = setup((100, 100, 300, 300));
        let mut drag = DragController::new();

        let mode = drag.pointer_down(Point::new(100.0, 100.0), &areas, 10.0);
        assert!(matches!(mode, DragMode::Move { .. }));

        let dirty = drag.pointer_move(Point::new(120.0, 110.0), &mut areas, &mapper);
        assert!(!dirty.is_empty());
        assert_eq!(areas.get(key).unwrap().rect(), Rect::new(140, 120, 340, 320));

        assert_eq!(drag.pointer_up(Point::new(120.0, 110.0), &mapper), DragOutcome::None);
        assert!(!drag.is_active());
    }

    #[test]
    fn test_move_clamps_at_border_without_shrinking() {
        let (mapper, mut areas, key) = setup((500, 300, 700, 500));
        let mut drag = DragController::new();

        // Display (250,150)-(350,250); grab the middle and push right/down.
        drag.pointer_down(Point::new(300.0, 200.0), &areas, 10.0);
        drag.pointer_move(Point::new(340.0, 230.0), &mut areas, &mapper);
        let area = areas.get(key).unwrap();
        assert_eq!(area.width(), 200);
        assert_eq!(area.height(), 200);
        assert_eq!(area.rect(), Rect::new(580, 360, 780, 560));

        drag.pointer_move(Point::new(390.0, 290.0), &mut areas, &mapper);
        let area = areas.get(key).unwrap();
        assert_eq!(area.rect(), Rect::new(600, 400, 800, 600));

        // And back out past the top-left corner.
        drag.pointer_move(Point::new(200.0, 200.0), &mut areas, &mapper);
        drag.pointer_move(Point::new(0.0, 0.0), &mut areas, &mapper);
        let area = areas.get(key).unwrap();
        assert_eq!(area.rect(), Rect::new(0, 0, 200, 200));
    }

    #[test]
    fn test_resize_moves_only_active_edge() {
        let (mapper, mut areas, key) = setup((100, 100, 300, 300));
        let mut drag = DragController::new();

        // Right edge at display x=150, vertically in the middle.
        let mode = drag.pointer_down(Point::new(148.0, 100.0), &areas, 10.0);
        assert!(matches!(mode, DragMode::Resize { .. }));

        let dirty = drag.pointer_move(Point::new(180.0, 40.0), &mut areas, &mapper);
        assert_eq!(areas.get(key).unwrap().rect(), Rect::new(100, 100, 360, 300));
        assert_eq!(dirty, vec![Rect::new(149, 50, 180, 150)]);

        // Dragging past the opposite edge stops one pixel short of it.
        drag.pointer_move(Point::new(10.0, 40.0), &mut areas, &mapper);
        assert_eq!(areas.get(key).unwrap().rect(), Rect::new(100, 100, 101, 300));
        drag.pointer_up(Point::new(10.0, 40.0), &mapper);
    }

    #[test]
    fn test_corner_resize_keeps_order_invariant() {
        let (mapper, mut areas, key) = setup((100, 100, 300, 300));
        let mut drag = DragController::new();

        drag.pointer_down(Point::new(52.0, 52.0), &areas, 10.0);
        for (x, y) in [(0.0, 0.0), (400.0, 300.0), (-50.0, 500.0), (149.0, 149.0)] {
            drag.pointer_move(Point::new(x, y), &mut areas, &mapper);
            let area = areas.get(key).unwrap();
            assert!(area.x1() < area.x2());
            assert!(area.y1() < area.y2());
            assert!(area.x1() >= 0 && area.y1() >= 0);
        }
    }

    #[test]
    fn test_create_gesture() {
        let mapper = CoordinateMapper::fit(800, 600, 400, 300);
        let areas = AreaCollection::new();
        let mut drag = DragController::new();

        let mode = drag.pointer_down(Point::new(200.0, 150.0), &areas, 10.0);
        assert!(matches!(mode, DragMode::Create { .. }));
        let outcome = drag.pointer_up(Point::new(10.0, 10.0), &mapper);
        assert_eq!(outcome, DragOutcome::Create(Rect::new(20, 20, 400, 300)));
    }

    #[test]
    fn test_single_session() {
        let (mapper, mut areas, _) = setup((100, 100, 300, 300));
        let mut drag = DragController::new();

        let first = drag.pointer_down(Point::new(300.0, 250.0), &areas, 10.0);
        let second = drag.pointer_down(Point::new(100.0, 100.0), &areas, 10.0);
        assert_eq!(first, second);
        assert!(drag.pointer_move(Point::new(5.0, 5.0), &mut areas, &mapper).is_empty());
    }
}
