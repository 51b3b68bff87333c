// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Canvas widget.
//!
//! Shows the editor's frame buffer at display size and translates raw
//! pointer input into canvas-relative actions. All area logic lives in the
//! editor; this widget only reports where the pointer is and what it did.

use crate::canvas::hit_test::CursorKind;
use crate::util::geometry::Point;

/// Pointer activity over the canvas, in display coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasAction {
    Pressed(Point),
    Moved(Point),
    Released(Point),
    /// Pointer over the canvas with no button held
    Hovered(Point),
}

/// Pointer glyph for a canvas cursor state.
pub fn cursor_icon(kind: CursorKind) -> egui::CursorIcon {
    match kind {
        CursorKind::Create => egui::CursorIcon::Crosshair,
        CursorKind::Move => egui::CursorIcon::Move,
        CursorKind::North => egui::CursorIcon::ResizeNorth,
        CursorKind::NorthEast => egui::CursorIcon::ResizeNorthEast,
        CursorKind::East => egui::CursorIcon::ResizeEast,
        CursorKind::SouthEast => egui::CursorIcon::ResizeSouthEast,
        CursorKind::South => egui::CursorIcon::ResizeSouth,
        CursorKind::SouthWest => egui::CursorIcon::ResizeSouthWest,
        CursorKind::West => egui::CursorIcon::ResizeWest,
        CursorKind::NorthWest => egui::CursorIcon::ResizeNorthWest,
    }
}

fn to_canvas(pos: egui::Pos2, rect: &egui::Rect) -> Point {
    Point::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64)
}

/// Draw the canvas texture and collect pointer actions.
///
/// `dragging` tells the widget a drag session is open, so moves and the
/// release are reported even when the pointer leaves the canvas.
pub fn show(
    ui: &mut egui::Ui,
    texture: &egui::TextureHandle,
    display_size: (u32, u32),
    dragging: bool,
    cursor: Option<CursorKind>,
) -> Vec<CanvasAction> {
    let mut actions = Vec::new();
    let size = egui::vec2(display_size.0 as f32, display_size.1 as f32);

    let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click_and_drag());
    ui.painter().image(
        texture.id(),
        rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );

    let (pressed, released, moved, latest) = ui.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.pointer.primary_released(),
            i.pointer.is_moving(),
            i.pointer.latest_pos(),
        )
    });
    let Some(pos) = latest else {
        return actions;
    };
    let point = to_canvas(pos, &rect);

    let started = pressed && response.hovered();
    if started {
        actions.push(CanvasAction::Pressed(point));
    }
    if dragging || started {
        if moved {
            actions.push(CanvasAction::Moved(point));
        }
        if released {
            actions.push(CanvasAction::Released(point));
        }
    } else if response.hovered() {
        actions.push(CanvasAction::Hovered(point));
    }

    if let Some(kind) = cursor {
        if response.hovered() || dragging {
            ui.ctx().set_cursor_icon(cursor_icon(kind));
        }
    }

    actions
}

/// Placeholder shown before an image is loaded.
pub fn show_welcome(ui: &mut egui::Ui, message: Option<&str>) {
    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            if let Some(message) = message {
                ui.spinner();
                ui.add_space(10.0);
                ui.label(
                    egui::RichText::new(message)
                        .size(16.0)
                        .color(egui::Color32::from_gray(200)),
                );
                return;
            }
            ui.heading(
                egui::RichText::new("Area Editor")
                    .size(32.0)
                    .color(egui::Color32::from_gray(200)),
            );
            ui.add_space(20.0);
            ui.label(
                egui::RichText::new("Open an image to start marking areas")
                    .color(egui::Color32::from_gray(180)),
            );
            ui.add_space(10.0);
            ui.label(
                egui::RichText::new("File > Open Image...")
                    .weak()
                    .color(egui::Color32::from_gray(130)),
            );
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_icons_are_distinct() {
        let kinds = [
            CursorKind::Create,
            CursorKind::Move,
            CursorKind::North,
            CursorKind::NorthEast,
            CursorKind::East,
            CursorKind::SouthEast,
            CursorKind::South,
            CursorKind::SouthWest,
            CursorKind::West,
            CursorKind::NorthWest,
        ];
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert_ne!(cursor_icon(*a), cursor_icon(*b));
            }
        }
    }

    #[test]
    fn test_to_canvas_is_relative() {
        let rect = egui::Rect::from_min_size(egui::pos2(100.0, 50.0), egui::vec2(400.0, 300.0));
        assert_eq!(to_canvas(egui::pos2(110.0, 80.0), &rect), Point::new(10.0, 30.0));
    }
}
