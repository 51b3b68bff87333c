// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! Owns at most one editing session (image, editor, texture, store), routes
//! panel actions into the editor and uploads the canvas damage to the GPU
//! texture once per frame.

use crate::canvas::drag::DragMode;
use crate::canvas::editor::Editor;
use crate::canvas::hit_test::CursorKind;
use crate::canvas::surface::RasterCanvas;
use crate::cli::Args;
use crate::config::EditorConfig;
use crate::io::media::{default_areas_path, default_storage_path, load_image};
use crate::io::store::{AreaStore, FileStore};
use crate::models::collection::AreaKey;
use crate::ui::canvas::CanvasAction;
use crate::ui::properties::{FieldBinding, PropertiesAction};
use crate::ui::toolbar::StatusInfo;
use crate::ui::{canvas, properties, toolbar};
use crate::util::geometry::{CoordinateMapper, Rect};
use anyhow::Result;
use image::RgbaImage;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};

/// Result of background image loading.
struct LoadedImage {
    path: PathBuf,
    image: RgbaImage,
}

/// One open image and everything editing it.
struct Session {
    editor: Editor<RasterCanvas>,
    texture: egui::TextureHandle,
    store: FileStore,
    image_path: PathBuf,
}

impl Session {
    /// Push the canvas pixels touched since the last frame to the texture.
    fn upload_damage(&mut self) {
        let Some(damage) = self.editor.surface_mut().take_damage() else {
            return;
        };
        if let Some((pos, patch)) = damage_patch(self.editor.surface().frame(), damage) {
            self.texture.set_partial(pos, patch, egui::TextureOptions::NEAREST);
        }
    }

    fn status(&self) -> StatusInfo {
        let mapper = self.editor.mapper();
        StatusInfo {
            storage_path: self.editor.storage_path().to_string(),
            natural_size: mapper.natural_size(),
            display_size: mapper.display_size(),
            area_count: self.editor.areas().len(),
            drag_mode: self.editor.drag_mode().label(),
        }
    }
}

/// Cut the damaged part of the frame out as a texture patch.
fn damage_patch(frame: &RgbaImage, damage: Rect) -> Option<([usize; 2], egui::ColorImage)> {
    let bounds = Rect::new(0, 0, frame.width() as i32, frame.height() as i32);
    if !damage.overlaps(&bounds) {
        return None;
    }
    let clip = damage.intersect(&bounds);
    if clip.is_empty() {
        return None;
    }
    let patch = image::imageops::crop_imm(
        frame,
        clip.x1 as u32,
        clip.y1 as u32,
        clip.width() as u32,
        clip.height() as u32,
    )
    .to_image();
    let size = [patch.width() as usize, patch.height() as usize];
    let pixels = egui::ColorImage::from_rgba_unmultiplied(size, patch.as_raw());
    Some(([clip.x1 as usize, clip.y1 as usize], pixels))
}

fn frame_image(frame: &RgbaImage) -> egui::ColorImage {
    let size = [frame.width() as usize, frame.height() as usize];
    egui::ColorImage::from_rgba_unmultiplied(size, frame.as_raw())
}

/// Main application state.
pub struct AreaEditorApp {
    config: EditorConfig,

    /// Storage key given on the command line, used for the first image
    storage_override: Option<String>,

    /// Areas document given on the command line, used for the first image
    areas_override: Option<PathBuf>,

    session: Option<Session>,

    binding: FieldBinding,

    selected: Option<AreaKey>,

    /// Glyph chosen at the last hover position
    cursor: CursorKind,

    /// Receiver for background image loading
    image_loader: Option<Receiver<Result<LoadedImage, String>>>,

    /// Loading state message
    loading_message: Option<String>,

    /// Last error shown in the status bar
    message: Option<String>,
}

impl AreaEditorApp {
    pub fn new(config: EditorConfig, args: Args, _ctx: &egui::Context) -> Self {
        let mut app = Self {
            config,
            storage_override: args.storage_path,
            areas_override: args.areas,
            session: None,
            binding: FieldBinding::new(),
            selected: None,
            cursor: CursorKind::Create,
            image_loader: None,
            loading_message: None,
            message: None,
        };
        if let Some(path) = args.image {
            app.load_image_file(path);
        }
        app
    }

    fn report(&mut self, context: &str, error: anyhow::Error) {
        log::error!("{}: {:#}", context, error);
        self.message = Some(format!("{}: {}", context, error));
    }

    /// Decode an image on a background thread.
    fn load_image_file(&mut self, path: PathBuf) {
        let (sender, receiver) = channel();
        self.image_loader = Some(receiver);
        self.loading_message = Some("Loading image...".to_string());

        std::thread::spawn(move || {
            let result = load_image(&path)
                .map(|image| {
                    log::info!("Loaded image: {} ({}x{})", path.display(), image.width(), image.height());
                    LoadedImage { path: path.clone(), image }
                })
                .map_err(|e| format!("{:#}", e));
            let _ = sender.send(result);
        });
    }

    /// Build a session for a freshly decoded image.
    fn open_session(&mut self, loaded: LoadedImage, ctx: &egui::Context) -> Result<()> {
        let storage_path = self
            .storage_override
            .take()
            .unwrap_or_else(|| default_storage_path(&loaded.path));
        let areas_path = self
            .areas_override
            .take()
            .unwrap_or_else(|| default_areas_path(&loaded.path));
        let (width, height) = loaded.image.dimensions();

        let store = FileStore::open(&areas_path, &storage_path, width, height)?;
        let specs = store.load(&storage_path)?;

        let mapper = CoordinateMapper::fit(width, height, self.config.max_width, self.config.max_height);
        let surface = RasterCanvas::new(loaded.image, &mapper);
        let mut editor = Editor::new(self.config.clone(), storage_path, mapper, surface);
        editor.load_areas(&specs)?;
        editor.surface_mut().take_damage();

        let texture = ctx.load_texture(
            "area_canvas",
            frame_image(editor.surface().frame()),
            egui::TextureOptions::NEAREST,
        );

        self.session = Some(Session {
            editor,
            texture,
            store,
            image_path: loaded.path,
        });
        self.selected = None;
        self.binding = FieldBinding::new();
        self.message = None;
        Ok(())
    }

    /// Replace the session's areas with those of another document.
    fn load_areas_document(&mut self, path: &Path) -> Result<()> {
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        let (width, height) = session.editor.mapper().natural_size();
        let storage_path = session.editor.storage_path().to_string();
        let store = FileStore::open(path, &storage_path, width, height)?;
        let specs = store.load(&storage_path)?;
        session.editor.load_areas(&specs)?;
        session.store = store;
        self.selected = None;
        Ok(())
    }

    /// Save every area, then write the document to `path`.
    fn save_areas_document(&mut self, path: Option<&Path>) -> Result<()> {
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        // Retarget first so areas are never flushed to the previous file.
        if let Some(path) = path {
            session.store.save_as(path)?;
        }
        let result = session.editor.save_all(&mut session.store);
        if self.selected.is_some_and(|key| session.editor.area(key).is_none()) {
            self.selected = None;
        }
        result?;
        log::info!(
            "Saved {} areas of {} to {}",
            session.editor.areas().len(),
            session.image_path.display(),
            session.store.path().display()
        );
        Ok(())
    }

    fn delete_area(&mut self, key: AreaKey) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(area) = session.editor.delete_area(key) else {
            return;
        };
        if self.selected == Some(key) {
            self.selected = None;
        }
        if let Some(id) = area.id {
            if let Err(e) = session.store.delete(&area.storage_path, id) {
                self.report("Failed to delete area", e);
            }
        }
    }

    fn handle_canvas(&mut self, actions: Vec<CanvasAction>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        for action in actions {
            match action {
                CanvasAction::Pressed(point) => {
                    session.editor.pointer_down(point);
                }
                CanvasAction::Moved(point) => session.editor.pointer_move(point),
                CanvasAction::Released(point) => {
                    if let Some(key) = session.editor.pointer_up(point) {
                        self.selected = Some(key);
                    }
                    self.cursor = session.editor.cursor_at(point);
                }
                CanvasAction::Hovered(point) => self.cursor = session.editor.cursor_at(point),
            }
        }
    }

    fn handle_properties(&mut self, actions: Vec<PropertiesAction>) {
        for action in actions {
            if let PropertiesAction::Delete(key) = action {
                self.delete_area(key);
                continue;
            }
            let Some(session) = self.session.as_mut() else {
                return;
            };
            let editor = &mut session.editor;
            match action {
                PropertiesAction::Select(key) => {
                    self.selected = Some(key);
                    editor.move_to_top(key);
                }
                PropertiesAction::Rename(key, name) => editor.rename(key, &name),
                PropertiesAction::CommitText(key, field, text) => {
                    editor.commit_field_text(key, field, &text);
                }
                PropertiesAction::Step(key, field, step) => {
                    editor.step_field(key, field, step);
                }
                PropertiesAction::SetDeleted(key, deleted) => editor.set_deleted(key, deleted),
                PropertiesAction::Save(key) => {
                    if let Err(e) = editor.save_area(key, &mut session.store) {
                        self.report("Failed to save area", e);
                    }
                }
                PropertiesAction::MoveToTop(key) => editor.move_to_top(key),
                PropertiesAction::KeyReleased => editor.key_released(),
                PropertiesAction::Delete(_) => {}
            }
        }
    }

    fn menu_bar(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let has_session = self.session.is_some();
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Open Image...").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Images", &["jpg", "jpeg", "png", "bmp", "gif", "tiff", "tif", "webp"])
                        .pick_file()
                    {
                        self.load_image_file(path);
                    }
                    ui.close_menu();
                }
                if ui.add_enabled(has_session, egui::Button::new("Load Areas...")).clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Areas", &["yaml", "yml", "json"])
                        .pick_file()
                    {
                        if let Err(e) = self.load_areas_document(&path) {
                            self.report("Failed to load areas", e);
                        }
                    }
                    ui.close_menu();
                }
                ui.separator();
                if ui.add_enabled(has_session, egui::Button::new("Save Areas")).clicked() {
                    if let Err(e) = self.save_areas_document(None) {
                        self.report("Failed to save areas", e);
                    }
                    ui.close_menu();
                }
                ui.menu_button("Save Areas As", |ui| {
                    for (label, filter, extensions, file_name) in [
                        ("Save as YAML...", "YAML", &["yaml", "yml"][..], "areas.yaml"),
                        ("Save as JSON...", "JSON", &["json"][..], "areas.json"),
                    ] {
                        if ui.add_enabled(has_session, egui::Button::new(label)).clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter(filter, extensions)
                                .set_file_name(file_name)
                                .save_file()
                            {
                                if let Err(e) = self.save_areas_document(Some(&path)) {
                                    self.report("Failed to save areas", e);
                                }
                            }
                            ui.close_menu();
                        }
                    }
                });
                ui.separator();
                if ui.button("Quit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("Edit", |ui| {
                if ui.add_enabled(has_session, egui::Button::new("Add Area")).clicked() {
                    if let Some(session) = self.session.as_mut() {
                        self.selected = Some(session.editor.add_whole_image_area());
                    }
                    ui.close_menu();
                }
                let can_delete = self.selected.is_some();
                if ui.add_enabled(can_delete, egui::Button::new("Delete Selected")).clicked() {
                    if let Some(key) = self.selected {
                        self.delete_area(key);
                    }
                    ui.close_menu();
                }
                if ui.add_enabled(has_session, egui::Button::new("Copy Areas as JSON")).clicked() {
                    if let Some(session) = self.session.as_ref() {
                        match serde_json::to_string_pretty(&session.editor.area_payloads()) {
                            Ok(text) => ctx.output_mut(|o| o.copied_text = text),
                            Err(e) => log::error!("Failed to serialize areas: {}", e),
                        }
                    }
                    ui.close_menu();
                }
                ui.separator();
                if ui.add_enabled(has_session, egui::Button::new("Redraw")).clicked() {
                    if let Some(session) = self.session.as_mut() {
                        session.editor.full_repaint();
                    }
                    ui.close_menu();
                }
            });
        });
    }

    fn poll_loader(&mut self, ctx: &egui::Context) {
        let Some(receiver) = self.image_loader.as_ref() else {
            return;
        };
        let Ok(result) = receiver.try_recv() else {
            return;
        };
        self.image_loader = None;
        self.loading_message = None;

        match result {
            Ok(loaded) => {
                let path = loaded.path.clone();
                match self.open_session(loaded, ctx) {
                    Ok(()) => log::info!("Editing {}", path.display()),
                    Err(e) => self.report("Failed to open image", e),
                }
            }
            Err(e) => {
                log::error!("Failed to load image: {}", e);
                self.message = Some(format!("Failed to load image: {}", e));
            }
        }
    }
}

impl eframe::App for AreaEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_loader(ctx);

        // Keep polling while loading
        if self.loading_message.is_some() {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            self.menu_bar(ui, ctx);
        });

        let status = self.session.as_ref().map(Session::status);
        let message = self.message.clone();
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            toolbar::show(ui, status.as_ref(), message.as_deref());
        });

        let properties_actions = match self.session.as_ref() {
            Some(session) => {
                let binding = &mut self.binding;
                let selected = self.selected;
                egui::SidePanel::right("properties")
                    .default_width(280.0)
                    .show(ctx, |ui| properties::show(ui, session.editor.areas(), binding, selected))
                    .inner
            }
            None => Vec::new(),
        };
        self.handle_properties(properties_actions);

        if !ctx.wants_keyboard_input()
            && ctx.input(|i| i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace))
        {
            if let Some(key) = self.selected {
                self.delete_area(key);
            }
        }

        // Upload edits made by the panels before the canvas draws
        if let Some(session) = self.session.as_mut() {
            session.upload_damage();
        }

        let cursor = self.cursor;
        let loading = self.loading_message.clone();
        let canvas_actions = egui::CentralPanel::default()
            .show(ctx, |ui| match self.session.as_ref() {
                Some(session) if loading.is_none() => {
                    let dragging = session.editor.drag_mode() != DragMode::Idle;
                    egui::ScrollArea::both()
                        .show(ui, |ui| {
                            canvas::show(
                                ui,
                                &session.texture,
                                session.editor.mapper().display_size(),
                                dragging,
                                Some(cursor),
                            )
                        })
                        .inner
                }
                _ => {
                    canvas::show_welcome(ui, loading.as_deref());
                    Vec::new()
                }
            })
            .inner;
        let had_actions = !canvas_actions.is_empty();
        self.handle_canvas(canvas_actions);

        if let Some(session) = self.session.as_mut() {
            session.upload_damage();
        }
        if had_actions {
            ctx.request_repaint();
        }
    }
}
