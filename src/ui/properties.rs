// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Area properties panel.
//!
//! One group per area, topmost first, with the name, priority and bound
//! fields as text boxes. Field text is two-way bound: untouched boxes follow
//! the model every frame, typed text is kept until it is committed.

use crate::models::area::{Area, Field};
use crate::models::collection::{AreaCollection, AreaKey};
use crate::util::accel::Step;
use std::collections::{HashMap, HashSet};

/// Result of properties panel interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertiesAction {
    Select(AreaKey),
    Rename(AreaKey, String),
    CommitText(AreaKey, Field, String),
    Step(AreaKey, Field, Step),
    SetDeleted(AreaKey, bool),
    Save(AreaKey),
    Delete(AreaKey),
    MoveToTop(AreaKey),
    /// Some key went up; resets arrow-key acceleration
    KeyReleased,
}

/// Text buffers behind the numeric fields.
#[derive(Debug, Default)]
pub struct FieldBinding {
    buffers: HashMap<(AreaKey, Field), String>,
    names: HashMap<AreaKey, String>,
    dirty: HashSet<(AreaKey, Field)>,
}

impl FieldBinding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pull model values into every buffer the user is not typing into and
    /// drop buffers of areas that no longer exist.
    pub fn refresh(&mut self, areas: &AreaCollection) {
        self.buffers.retain(|(key, _), _| areas.get(*key).is_some());
        self.names.retain(|key, _| areas.get(*key).is_some());
        self.dirty.retain(|(key, _)| areas.get(*key).is_some());

        for (key, area) in areas.iter() {
            for field in Field::ALL {
                if self.dirty.contains(&(key, field)) {
                    continue;
                }
                let text = area.value(field).to_string();
                match self.buffers.get_mut(&(key, field)) {
                    Some(buffer) if *buffer == text => {}
                    Some(buffer) => *buffer = text,
                    None => {
                        self.buffers.insert((key, field), text);
                    }
                }
            }
            if self.names.get(&key) != Some(&area.name) {
                self.names.insert(key, area.name.clone());
            }
        }
    }

    pub fn is_dirty(&self, key: AreaKey, field: Field) -> bool {
        self.dirty.contains(&(key, field))
    }

    /// Hand out the typed text for a commit and let the model drive the
    /// buffer again.
    pub fn take_commit(&mut self, key: AreaKey, field: Field) -> Option<String> {
        if !self.dirty.remove(&(key, field)) {
            return None;
        }
        self.buffers.get(&(key, field)).cloned()
    }

    /// Actions for an arrow key on a field. Typed text is committed first so
    /// the step starts from what the user sees.
    pub fn step(&mut self, key: AreaKey, field: Field, step: Step) -> Vec<PropertiesAction> {
        let mut actions = Vec::new();
        if let Some(text) = self.take_commit(key, field) {
            actions.push(PropertiesAction::CommitText(key, field, text));
        }
        actions.push(PropertiesAction::Step(key, field, step));
        actions
    }

    fn buffer_mut(&mut self, key: AreaKey, field: Field) -> &mut String {
        self.buffers.entry((key, field)).or_default()
    }

    fn mark_dirty(&mut self, key: AreaKey, field: Field) {
        self.dirty.insert((key, field));
    }
}

fn title(area: &Area) -> String {
    match (area.name.is_empty(), area.id) {
        (false, _) => area.name.clone(),
        (true, Some(id)) => format!("Area {}", id),
        (true, None) => "New area".to_string(),
    }
}

fn field_row(
    ui: &mut egui::Ui,
    binding: &mut FieldBinding,
    key: AreaKey,
    field: Field,
    actions: &mut Vec<PropertiesAction>,
) {
    ui.label(field.label());
    let pending = binding.is_dirty(key, field);
    let mut edit = egui::TextEdit::singleline(binding.buffer_mut(key, field)).desired_width(56.0);
    if pending {
        edit = edit.text_color(egui::Color32::from_rgb(230, 180, 80));
    }
    let response = ui.add(edit);
    if response.changed() {
        binding.mark_dirty(key, field);
    }
    if response.has_focus() {
        if ui.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::ArrowUp)) {
            actions.extend(binding.step(key, field, Step::Up));
        }
        if ui.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::ArrowDown)) {
            actions.extend(binding.step(key, field, Step::Down));
        }
    }
    if response.lost_focus() {
        if let Some(text) = binding.take_commit(key, field) {
            actions.push(PropertiesAction::CommitText(key, field, text));
        }
    }
}

/// Display the properties panel.
pub fn show(
    ui: &mut egui::Ui,
    areas: &AreaCollection,
    binding: &mut FieldBinding,
    selected: Option<AreaKey>,
) -> Vec<PropertiesAction> {
    let mut actions = Vec::new();
    binding.refresh(areas);

    ui.heading("Areas");
    ui.separator();

    if areas.is_empty() {
        ui.label(egui::RichText::new("Drag on the image to add an area").weak());
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        for (key, area) in areas.iter().rev() {
            ui.push_id(key, |ui| {
                let is_selected = selected == Some(key);
                if ui.selectable_label(is_selected, title(area)).clicked() {
                    actions.push(PropertiesAction::Select(key));
                }

                ui.horizontal(|ui| {
                    ui.label("name");
                    let name = binding.names.entry(key).or_default();
                    if ui.text_edit_singleline(name).changed() {
                        actions.push(PropertiesAction::Rename(key, name.clone()));
                    }
                });

                egui::Grid::new("fields").num_columns(4).show(ui, |ui| {
                    field_row(ui, binding, key, Field::Priority, &mut actions);
                    ui.end_row();
                    field_row(ui, binding, key, Field::X1, &mut actions);
                    field_row(ui, binding, key, Field::Y1, &mut actions);
                    ui.end_row();
                    field_row(ui, binding, key, Field::X2, &mut actions);
                    field_row(ui, binding, key, Field::Y2, &mut actions);
                    ui.end_row();
                });

                ui.horizontal(|ui| {
                    let mut deleted = area.deleted;
                    if ui.checkbox(&mut deleted, "Deleted").changed() {
                        actions.push(PropertiesAction::SetDeleted(key, deleted));
                    }
                    if ui.button("Save").clicked() {
                        actions.push(PropertiesAction::Save(key));
                    }
                    if ui.button("Delete").clicked() {
                        actions.push(PropertiesAction::Delete(key));
                    }
                    if ui.button("To top").clicked() {
                        actions.push(PropertiesAction::MoveToTop(key));
                    }
                });
                ui.separator();
            });
        }
    });

    let key_up = ui.input(|i| {
        i.events
            .iter()
            .any(|e| matches!(e, egui::Event::Key { pressed: false, .. }))
    });
    if key_up {
        actions.push(PropertiesAction::KeyReleased);
    }

    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::util::geometry::{ImageExtent, Rect};

    const EXTENT: ImageExtent = ImageExtent { width: 800, height: 600 };

    fn text(binding: &FieldBinding, key: AreaKey, field: Field) -> Option<&str> {
        binding.buffers.get(&(key, field)).map(String::as_str)
    }

    fn collection() -> (AreaCollection, AreaKey) {
        let mut areas = AreaCollection::new();
        let area = Area::new(Rect::new(10, 20, 30, 40), "beach.jpg".to_string(), EXTENT, &EditorConfig::default());
        let key = areas.push(area);
        (areas, key)
    }

    #[test]
    fn test_refresh_follows_model() {
        let (mut areas, key) = collection();
        let mut binding = FieldBinding::new();
        binding.refresh(&areas);
        assert_eq!(text(&binding, key, Field::X1), Some("10"));
        assert_eq!(text(&binding, key, Field::Priority), Some("3"));

        areas.get_mut(key).unwrap().set_value(Field::X1, 15, EXTENT);
        binding.refresh(&areas);
        assert_eq!(text(&binding, key, Field::X1), Some("15"));
    }

    #[test]
    fn test_typed_text_survives_until_commit() {
        let (areas, key) = collection();
        let mut binding = FieldBinding::new();
        binding.refresh(&areas);

        *binding.buffer_mut(key, Field::X2) = "5".to_string();
        binding.mark_dirty(key, Field::X2);
        binding.refresh(&areas);
        assert_eq!(text(&binding, key, Field::X2), Some("5"));
        assert!(binding.is_dirty(key, Field::X2));

        assert_eq!(binding.take_commit(key, Field::X2), Some("5".to_string()));
        assert_eq!(binding.take_commit(key, Field::X2), None);
        // The model clamped the commit; the box shows the stored value.
        binding.refresh(&areas);
        assert_eq!(text(&binding, key, Field::X2), Some("30"));
    }

    #[test]
    fn test_arrow_commits_typed_text_first() {
        let (areas, key) = collection();
        let mut binding = FieldBinding::new();
        binding.refresh(&areas);

        *binding.buffer_mut(key, Field::Y1) = "25".to_string();
        binding.mark_dirty(key, Field::Y1);
        assert_eq!(
            binding.step(key, Field::Y1, Step::Up),
            vec![
                PropertiesAction::CommitText(key, Field::Y1, "25".to_string()),
                PropertiesAction::Step(key, Field::Y1, Step::Up),
            ]
        );
        assert!(!binding.is_dirty(key, Field::Y1));

        // Nothing typed: the step alone.
        assert_eq!(
            binding.step(key, Field::Y1, Step::Down),
            vec![PropertiesAction::Step(key, Field::Y1, Step::Down)]
        );
    }

    #[test]
    fn test_refresh_drops_removed_areas() {
        let (mut areas, key) = collection();
        let mut binding = FieldBinding::new();
        binding.refresh(&areas);
        areas.remove(key);
        binding.refresh(&areas);
        assert_eq!(text(&binding, key, Field::X1), None);
    }
}
