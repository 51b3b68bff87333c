// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The area editor instance.
//!
//! Owns the coordinate mapper, the area stack, the drag session and the
//! drawing surface for one loaded image. Every mutation repaints only the
//! display rectangles it actually changed.

use super::drag::{DragController, DragMode, DragOutcome};
use super::hit_test::{hit_test, CursorKind};
use super::render::{full_repaint, partial_repaint, resize_dirty_rects};
use super::surface::Surface;
use crate::config::EditorConfig;
use crate::io::store::AreaStore;
use crate::models::area::{Area, AreaError, AreaPayload, AreaSpec, Field};
use crate::models::collection::{AreaCollection, AreaKey};
use crate::util::accel::{KeyAccelerator, Step};
use crate::util::geometry::{CoordinateMapper, Point, Rect};
use anyhow::{Context, Result};

pub struct Editor<S: Surface> {
    config: EditorConfig,
    storage_path: String,
    mapper: CoordinateMapper,
    areas: AreaCollection,
    drag: DragController,
    accelerator: KeyAccelerator,
    surface: S,
}

impl<S: Surface> Editor<S> {
    /// Create an editor and paint the bare image.
    pub fn new(config: EditorConfig, storage_path: String, mapper: CoordinateMapper, surface: S) -> Self {
        let mut editor = Self {
            config,
            storage_path,
            mapper,
            areas: AreaCollection::new(),
            drag: DragController::new(),
            accelerator: KeyAccelerator::new(),
            surface,
        };
        editor.full_repaint();
        editor
    }

    pub fn storage_path(&self) -> &str {
        &self.storage_path
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn areas(&self) -> &AreaCollection {
        &self.areas
    }

    pub fn area(&self, key: AreaKey) -> Option<&Area> {
        self.areas.get(key)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn drag_mode(&self) -> DragMode {
        self.drag.mode()
    }

    fn repaint(&mut self, dirty: Rect) {
        if dirty.is_empty() {
            return;
        }
        log::debug!("Repainting {:?}", dirty);
        partial_repaint(&mut self.surface, &self.mapper, &self.areas, dirty);
    }

    fn repaint_all(&mut self, dirty: Vec<Rect>) {
        for rect in dirty {
            self.repaint(rect);
        }
    }

    /// Redraw the image and every area from scratch.
    pub fn full_repaint(&mut self) {
        full_repaint(&mut self.surface, &self.mapper, &mut self.areas);
    }

    /// Replace the area stack with persisted records.
    ///
    /// Every record is validated before any is added, so a bad record leaves
    /// the editor unchanged.
    pub fn load_areas(&mut self, specs: &[AreaSpec]) -> Result<Vec<AreaKey>, AreaError> {
        let extent = self.mapper.extent();
        let areas = specs
            .iter()
            .map(|spec| Area::from_spec(spec, extent, &self.config))
            .collect::<Result<Vec<_>, _>>()?;

        self.areas.clear();
        let keys = areas.into_iter().map(|area| self.areas.push(area)).collect();
        self.full_repaint();
        log::info!("Loaded {} areas for {}", self.areas.len(), self.storage_path);
        Ok(keys)
    }

    /// Add an area with the given image-space bounds on top of the stack.
    pub fn add_area(&mut self, bounds: Rect) -> AreaKey {
        let mut area = Area::new(bounds, self.storage_path.clone(), self.mapper.extent(), &self.config);
        let (_, display) = area.sync_display(&self.mapper);
        let key = self.areas.push(area);
        log::info!("Added area {:?} at {:?}", key, bounds);
        self.repaint(display);
        key
    }

    /// Add an area covering the whole image.
    pub fn add_whole_image_area(&mut self) -> AreaKey {
        let extent = self.mapper.extent();
        self.add_area(Rect::new(0, 0, extent.width, extent.height))
    }

    /// Remove an area and repaint where it was. The removed area is returned
    /// flagged deleted so the caller can drop it from the store.
    pub fn delete_area(&mut self, key: AreaKey) -> Option<Area> {
        let mut area = self.areas.remove(key)?;
        area.deleted = true;
        log::info!("Deleted area {:?} ({:?})", key, area.id);
        self.repaint(area.display_rect());
        Some(area)
    }

    /// Toggle the deletion flag without removing the area.
    pub fn set_deleted(&mut self, key: AreaKey, deleted: bool) {
        let Some(area) = self.areas.get_mut(key) else {
            return;
        };
        area.deleted = deleted;
        let display = area.display_rect();
        self.repaint(display);
    }

    /// Raise an area to the top of the paint order.
    pub fn move_to_top(&mut self, key: AreaKey) {
        if self.areas.move_to_top(key) {
            if let Some(display) = self.areas.get(key).map(|a| a.display_rect()) {
                self.repaint(display);
            }
        }
    }

    pub fn rename(&mut self, key: AreaKey, name: &str) {
        if let Some(area) = self.areas.get_mut(key) {
            area.name = name.to_string();
        }
    }

    /// Commit a field value through its clamped setter and repaint.
    /// Returns the stored value.
    pub fn commit_field(&mut self, key: AreaKey, field: Field, value: i32) -> Option<i32> {
        let extent = self.mapper.extent();
        let area = self.areas.get_mut(key)?;
        let committed = area.set_value(field, value, extent);
        let (old, new) = area.sync_display(&self.mapper);
        match field {
            Field::Priority => self.repaint(new),
            _ => self.repaint_all(resize_dirty_rects(&old, &new)),
        }
        Some(committed)
    }

    /// Commit typed text. Text that is not a number leaves the field alone.
    pub fn commit_field_text(&mut self, key: AreaKey, field: Field, text: &str) -> Option<i32> {
        match text.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => self.commit_field(key, field, value.floor() as i32),
            _ => {
                log::warn!("Ignoring non-numeric {} value {:?}", field.label(), text);
                self.area(key).map(|a| a.value(field))
            }
        }
    }

    /// Apply an arrow-key step, accelerating while keys stay held.
    pub fn step_field(&mut self, key: AreaKey, field: Field, step: Step) -> Option<i32> {
        let current = self.areas.get(key)?.value(field);
        let value = self.accelerator.apply(current, step);
        self.commit_field(key, field, value)
    }

    /// Any key released: stepping starts slow again.
    pub fn key_released(&mut self) {
        self.accelerator.key_up();
    }

    /// Glyph for the pointer at a display position.
    pub fn cursor_at(&self, point: Point) -> CursorKind {
        CursorKind::for_hit(hit_test(&self.areas, point, self.config.active_fuzz).as_ref())
    }

    pub fn pointer_down(&mut self, point: Point) -> DragMode {
        self.drag.pointer_down(point, &self.areas, self.config.active_fuzz)
    }

    pub fn pointer_move(&mut self, point: Point) {
        let dirty = self.drag.pointer_move(point, &mut self.areas, &self.mapper);
        self.repaint_all(dirty);
    }

    /// Finish the drag session. A create gesture yields the new area's key.
    pub fn pointer_up(&mut self, point: Point) -> Option<AreaKey> {
        match self.drag.pointer_up(point, &self.mapper) {
            DragOutcome::Create(bounds) => Some(self.add_area(bounds)),
            DragOutcome::None => None,
        }
    }

    pub fn area_payloads(&self) -> Vec<AreaPayload> {
        self.areas.iter().map(|(_, a)| a.payload()).collect()
    }

    /// Persist one area and adopt the store's canonical record. An area
    /// flagged deleted is removed from the store and the collection instead.
    pub fn save_area(&mut self, key: AreaKey, store: &mut dyn AreaStore) -> Result<()> {
        let area = self.areas.get(key).context("No such area")?;
        if area.deleted {
            if let Some(id) = area.id {
                store.delete(&area.storage_path, id)?;
            }
            self.delete_area(key);
            return Ok(());
        }
        let payload = area.payload();
        let canonical = store.save(&payload)?;

        let extent = self.mapper.extent();
        let Some(area) = self.areas.get_mut(key) else {
            return Ok(());
        };
        area.adopt(&canonical, extent, &self.config)?;
        let (old, new) = area.sync_display(&self.mapper);
        log::info!("Saved area {:?} as id {:?}", key, area.id);
        self.repaint(old);
        if old != new {
            self.repaint(new);
        }
        Ok(())
    }

    /// Persist every area, stopping at the first failure.
    pub fn save_all(&mut self, store: &mut dyn AreaStore) -> Result<()> {
        for key in self.areas.keys() {
            self.save_area(key, store)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::render::tests::{Command, Recorder};
    use crate::canvas::surface::RasterCanvas;
    use image::{Rgba, RgbaImage};

    fn editor() -> Editor<Recorder> {
        let config = EditorConfig {
            max_width: 400,
            max_height: 300,
            ..Default::default()
        };
        let mapper = CoordinateMapper::fit(800, 600, config.max_width, config.max_height);
        Editor::new(config, "beach.jpg".to_string(), mapper, Recorder::default())
    }

    fn spec(x1: i32, y1: i32, x2: i32, y2: i32) -> AreaSpec {
        AreaSpec {
            x1: Some(x1),
            y1: Some(y1),
            x2: Some(x2),
            y2: Some(y2),
            storage_path: Some("beach.jpg".to_string()),
            ..Default::default()
        }
    }

    fn sources(editor: &mut Editor<Recorder>) -> Vec<Rect> {
        editor
            .surface_mut()
            .commands
            .drain(..)
            .filter_map(|c| match c {
                Command::Source(_, dst) => Some(dst),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_create_gesture_adds_area() {
        let mut editor = editor();
        editor.pointer_down(Point::new(10.0, 10.0));
        editor.pointer_move(Point::new(100.0, 80.0));
        let key = editor.pointer_up(Point::new(200.0, 150.0)).unwrap();

        let area = editor.area(key).unwrap();
        assert_eq!(area.rect(), Rect::new(20, 20, 400, 300));
        assert_eq!(area.priority(), 3);
        assert_eq!(area.storage_path, "beach.jpg");
        assert_eq!(area.display_rect(), Rect::new(10, 10, 200, 150));
    }

    #[test]
    fn test_click_on_empty_canvas_creates_minimal_area() {
        let mut editor = editor();
        editor.pointer_down(Point::new(50.0, 50.0));
        let key = editor.pointer_up(Point::new(50.0, 50.0)).unwrap();
        assert_eq!(editor.area(key).unwrap().rect(), Rect::new(100, 100, 101, 101));
    }

    #[test]
    fn test_load_areas_fails_fast() {
        let mut editor = editor();
        editor.load_areas(&[spec(0, 0, 10, 10)]).unwrap();

        let mut bad = spec(0, 0, 10, 10);
        bad.x1 = None;
        let err = editor.load_areas(&[spec(5, 5, 20, 20), bad]).unwrap_err();
        assert_eq!(err, AreaError::MissingBounds);
        assert_eq!(editor.areas().len(), 1);
    }

    #[test]
    fn test_move_repaints_only_strips() {
        let mut editor = editor();
        let keys = editor.load_areas(&[spec(100, 100, 300, 300)]).unwrap();
        editor.surface_mut().commands.clear();

        editor.pointer_down(Point::new(100.0, 100.0));
        editor.pointer_move(Point::new(120.0, 110.0));
        editor.pointer_up(Point::new(120.0, 110.0));

        assert_eq!(editor.area(keys[0]).unwrap().rect(), Rect::new(140, 120, 340, 320));
        assert!(!editor.surface().commands.contains(&Command::Clear));
        let dirty = sources(&mut editor);
        assert_eq!(
            dirty,
            vec![
                Rect::new(50, 50, 70, 150),
                Rect::new(70, 50, 150, 60),
                Rect::new(149, 60, 170, 150),
                Rect::new(70, 149, 170, 160),
            ]
        );
    }

    #[test]
    fn test_priority_commit_repaints_whole_area() {
        let mut editor = editor();
        let keys = editor.load_areas(&[spec(100, 100, 300, 300)]).unwrap();
        editor.surface_mut().commands.clear();

        assert_eq!(editor.commit_field(keys[0], Field::Priority, 9), Some(4));
        assert_eq!(sources(&mut editor), vec![Rect::new(50, 50, 150, 150)]);
    }

    #[test]
    fn test_field_text_and_steps() {
        let mut editor = editor();
        let keys = editor.load_areas(&[spec(100, 100, 300, 300)]).unwrap();
        let key = keys[0];

        assert_eq!(editor.commit_field_text(key, Field::X2, " 500 "), Some(500));
        assert_eq!(editor.commit_field_text(key, Field::X2, "abc"), Some(500));
        assert_eq!(editor.commit_field_text(key, Field::X1, "600"), Some(499));

        for _ in 0..10 {
            editor.step_field(key, Field::Y1, Step::Up);
        }
        // Five single steps, then 1, 1, 1, 2, 3.
        assert_eq!(editor.area(key).unwrap().y1(), 113);
        assert_eq!(editor.step_field(key, Field::Y1, Step::Up), Some(117));
        editor.key_released();
        assert_eq!(editor.step_field(key, Field::Y1, Step::Down), Some(116));
    }

    #[test]
    fn test_delete_repaints_last_bounds() {
        let mut editor = editor();
        let keys = editor.load_areas(&[spec(100, 100, 300, 300)]).unwrap();
        editor.surface_mut().commands.clear();

        let removed = editor.delete_area(keys[0]).unwrap();
        assert!(removed.deleted);
        assert!(editor.areas().is_empty());
        assert_eq!(sources(&mut editor), vec![Rect::new(50, 50, 150, 150)]);
        assert!(editor.delete_area(keys[0]).is_none());
    }

    #[test]
    fn test_cursor_follows_top_area() {
        let mut editor = editor();
        let keys = editor
            .load_areas(&[spec(100, 100, 300, 300), spec(200, 200, 400, 400)])
            .unwrap();
        // Display (100,100) is the top-left corner of the second area and
        // lies inside the first.
        assert_eq!(editor.cursor_at(Point::new(100.0, 100.0)), CursorKind::NorthWest);
        editor.move_to_top(keys[0]);
        assert_eq!(editor.cursor_at(Point::new(100.0, 100.0)), CursorKind::Move);
        assert_eq!(editor.cursor_at(Point::new(300.0, 250.0)), CursorKind::Create);
    }

    #[test]
    fn test_save_adopts_canonical_id() {
        struct CountingStore {
            next: u64,
            deleted: Vec<u64>,
        }
        impl AreaStore for CountingStore {
            fn load(&self, _: &str) -> Result<Vec<AreaSpec>> {
                Ok(Vec::new())
            }
            fn save(&mut self, payload: &AreaPayload) -> Result<AreaSpec> {
                let mut record = payload.clone();
                if record.id.is_none() {
                    self.next += 1;
                    record.id = Some(self.next);
                }
                Ok(AreaSpec::from(record))
            }
            fn delete(&mut self, _: &str, id: u64) -> Result<()> {
                self.deleted.push(id);
                Ok(())
            }
        }

        let mut editor = editor();
        let mut store = CountingStore { next: 10, deleted: Vec::new() };
        let keys = editor
            .load_areas(&[spec(0, 0, 10, 10), spec(20, 20, 30, 30)])
            .unwrap();
        editor.save_all(&mut store).unwrap();
        assert_eq!(editor.area(keys[0]).unwrap().id, Some(11));
        assert_eq!(editor.area(keys[1]).unwrap().id, Some(12));
        let payloads = editor.area_payloads();
        assert_eq!(payloads.len(), 2);

        let removed = editor.delete_area(keys[0]).unwrap();
        store.delete(editor.storage_path(), removed.id.unwrap()).unwrap();
        assert_eq!(store.deleted, vec![11]);
    }

    #[test]
    fn test_save_all_drops_areas_flagged_deleted() {
        use crate::io::store::FileStore;

        let path = std::env::temp_dir().join("area_editor_flagged_deleted.yaml");
        std::fs::remove_file(&path).ok();
        let mut store = FileStore::open(&path, "beach.jpg", 800, 600).unwrap();
        let mut editor = editor();

        let key = editor.add_area(Rect::new(10, 10, 50, 50));
        editor.set_deleted(key, true);
        editor.save_all(&mut store).unwrap();
        assert!(editor.area(key).is_none());
        assert_eq!(
            FileStore::open(&path, "beach.jpg", 800, 600).unwrap().load("beach.jpg").unwrap().len(),
            0
        );

        // A stored area flagged later is removed from the file as well.
        let kept = editor.add_area(Rect::new(20, 20, 60, 60));
        let gone = editor.add_area(Rect::new(100, 100, 200, 200));
        editor.save_all(&mut store).unwrap();
        editor.set_deleted(gone, true);
        editor.save_all(&mut store).unwrap();
        let reopened = FileStore::open(&path, "beach.jpg", 800, 600).unwrap();
        std::fs::remove_file(&path).ok();

        let stored = reopened.load("beach.jpg").unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, editor.area(kept).unwrap().id);
        assert_eq!(editor.areas().len(), 1);
    }

    #[test]
    fn test_raster_pixels_after_resize() {
        let config = EditorConfig::default();
        let source = RgbaImage::from_pixel(40, 40, Rgba([255, 255, 255, 255]));
        let mapper = CoordinateMapper::fit(40, 40, 40, 40);
        let canvas = RasterCanvas::new(source, &mapper);
        let mut editor = Editor::new(config, "white.png".to_string(), mapper, canvas);
        let keys = editor.load_areas(&[spec(10, 10, 20, 20)]).unwrap();
        editor.surface_mut().take_damage();

        // Shrink the right edge from 20 to 15.
        editor.commit_field(keys[0], Field::X2, 15);
        let frame = editor.surface().frame();
        assert_eq!(*frame.get_pixel(17, 15), Rgba([255, 255, 255, 255]));
        assert_eq!(*frame.get_pixel(19, 15), Rgba([255, 255, 255, 255]));
        assert_eq!(*frame.get_pixel(14, 15), Rgba([0, 0, 0, 255]));
        assert_eq!(*frame.get_pixel(12, 10), Rgba([0, 0, 0, 255]));
        assert_ne!(*frame.get_pixel(12, 15), Rgba([255, 255, 255, 255]));
        let damage = editor.surface_mut().take_damage().unwrap();
        assert!(damage.x1 >= 14 && damage.x2 <= 21);
    }
}
