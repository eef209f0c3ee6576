// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Text creation popup.
//!
//! Collects content and styling for a new floating text, or a caption
//! attached to the selected image.

use crate::models::object::TextStyle;
use crate::text::FONT_FAMILIES;
use crate::ui::from_color32;

pub struct TextPopupState {
    pub open: bool,
    pub input: String,
    pub font_family: String,
    pub font_size: f32,
    pub fill: egui::Color32,
    pub outline: egui::Color32,
    pub outline_width: f32,
    /// Create a caption on the selected image instead of a floating text.
    pub attach_to_image: bool,
}

impl Default for TextPopupState {
    fn default() -> Self {
        Self {
            open: false,
            input: String::new(),
            font_family: "Arial".to_string(),
            font_size: 32.0,
            fill: egui::Color32::WHITE,
            outline: egui::Color32::BLACK,
            outline_width: 2.0,
            attach_to_image: false,
        }
    }
}

impl TextPopupState {
    pub fn style(&self) -> TextStyle {
        TextStyle {
            font_family: self.font_family.clone(),
            font_size: self.font_size,
            fill: from_color32(self.fill),
            outline: from_color32(self.outline),
            outline_width: self.outline_width,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextPopupAction {
    None,
    Create,
}

/// Display the popup window while `state.open` is set.
pub fn show(ctx: &egui::Context, state: &mut TextPopupState, image_selected: bool) -> TextPopupAction {
    let mut action = TextPopupAction::None;
    if !state.open {
        return action;
    }

    let mut open = state.open;
    egui::Window::new("Add Text")
        .open(&mut open)
        .resizable(false)
        .default_width(280.0)
        .show(ctx, |ui| {
            ui.text_edit_multiline(&mut state.input);

            // Live preview in the chosen fill color.
            ui.add_space(4.0);
            ui.label(
                egui::RichText::new(if state.input.is_empty() {
                    "Live preview…"
                } else {
                    state.input.as_str()
                })
                .size(state.font_size)
                .color(state.fill),
            );
            ui.add_space(4.0);

            egui::ComboBox::from_label("Font")
                .selected_text(state.font_family.clone())
                .show_ui(ui, |ui| {
                    for family in FONT_FAMILIES {
                        ui.selectable_value(
                            &mut state.font_family,
                            family.to_string(),
                            *family,
                        );
                    }
                });

            ui.add(egui::Slider::new(&mut state.font_size, 12.0..=72.0).text("Size"));

            ui.horizontal(|ui| {
                ui.label("Text color");
                ui.color_edit_button_srgba(&mut state.fill);
                ui.label("Stroke");
                ui.color_edit_button_srgba(&mut state.outline);
            });
            ui.add(egui::Slider::new(&mut state.outline_width, 0.0..=10.0).text("Stroke width"));

            ui.add_enabled(
                image_selected,
                egui::Checkbox::new(&mut state.attach_to_image, "Attach to selected meme"),
            );

            ui.add_space(6.0);
            let can_create = !state.input.trim().is_empty();
            if ui
                .add_enabled(can_create, egui::Button::new("Add Text"))
                .clicked()
            {
                action = TextPopupAction::Create;
            }
        });
    state.open = open;

    action
}
