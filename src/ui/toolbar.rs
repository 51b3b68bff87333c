// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Status bar under the canvas.

/// What the status bar reports about the open image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusInfo {
    pub storage_path: String,
    pub natural_size: (u32, u32),
    pub display_size: (u32, u32),
    pub area_count: usize,
    pub drag_mode: &'static str,
}

impl StatusInfo {
    /// Display pixels per image pixel.
    pub fn scale(&self) -> f64 {
        if self.natural_size.0 == 0 {
            return 1.0;
        }
        self.display_size.0 as f64 / self.natural_size.0 as f64
    }
}

fn hint(drag_mode: &str) -> &'static str {
    match drag_mode {
        "Resize" => "Release to finish resizing",
        "Move" => "Release to drop the area",
        "Create" => "Release to add the area",
        _ => "Drag on empty space to add an area, drag an edge to resize, drag inside to move",
    }
}

/// Display the status bar. `message` is the last error or notice, if any.
pub fn show(ui: &mut egui::Ui, status: Option<&StatusInfo>, message: Option<&str>) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        match status {
            Some(status) => {
                ui.label(&status.storage_path);
                ui.separator();
                ui.label(format!(
                    "{}x{} shown at {}x{} ({:.0}%)",
                    status.natural_size.0,
                    status.natural_size.1,
                    status.display_size.0,
                    status.display_size.1,
                    status.scale() * 100.0
                ));
                ui.separator();
                ui.label(format!("{} areas", status.area_count));
                ui.separator();
                ui.label(egui::RichText::new(hint(status.drag_mode)).italics().weak());
            }
            None => {
                ui.label("No image loaded");
            }
        }

        if let Some(message) = message {
            ui.separator();
            ui.label(egui::RichText::new(message).color(egui::Color32::from_rgb(230, 120, 90)));
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale() {
        let status = StatusInfo {
            natural_size: (1600, 800),
            display_size: (800, 400),
            ..Default::default()
        };
        assert_eq!(status.scale(), 0.5);
        assert_eq!(StatusInfo::default().scale(), 1.0);
    }

    #[test]
    fn test_hint_per_mode() {
        assert_eq!(hint("Move"), "Release to drop the area");
        assert!(hint("Idle").starts_with("Drag on empty space"));
    }
}
