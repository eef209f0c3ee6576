// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar and tool selection UI.
//!
//! This module provides the toolbar interface for selecting canvas tools,
//! brush settings, and the discrete actions (undo/redo, upload, paste,
//! export, delete) that the app dispatches to the editor.

use crate::engine::{Editor, Tool};
use crate::ui::{from_color32, to_color32};

/// A discrete action requested from the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    Undo,
    Redo,
    UploadImage,
    Paste,
    Export,
    DeleteSelected,
    OpenTextPopup,
}

/// Display the toolbar. Tool and brush changes apply directly; discrete
/// actions are returned for the app to dispatch.
pub fn show(ui: &mut egui::Ui, editor: &mut Editor) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("Tools:");

        ui.separator();

        // Select tool
        if ui
            .selectable_label(editor.tool == Tool::Select, "⬆ Select")
            .clicked()
        {
            editor.tool = Tool::Select;
        }

        // Brush tool
        if ui
            .selectable_label(editor.tool == Tool::Brush, "🖊 Brush")
            .clicked()
        {
            editor.tool = Tool::Brush;
        }

        // Eraser tool
        if ui
            .selectable_label(editor.tool == Tool::Eraser, "⬛ Eraser")
            .clicked()
        {
            editor.tool = Tool::Eraser;
        }

        if editor.tool == Tool::Brush {
            let mut color = to_color32(editor.brush.color);
            if ui.color_edit_button_srgba(&mut color).changed() {
                editor.brush.color = from_color32(color);
            }
            ui.add(
                egui::Slider::new(&mut editor.brush.width, 1.0..=40.0)
                    .integer()
                    .suffix("px"),
            );
        }

        ui.separator();

        // Pan toggle
        if ui.selectable_label(editor.pan_mode, "✋ Pan").clicked() {
            editor.pan_mode = !editor.pan_mode;
        }

        ui.separator();

        if ui
            .add_enabled(editor.history.can_undo(), egui::Button::new("⟲ Undo"))
            .clicked()
        {
            action = ToolbarAction::Undo;
        }
        if ui
            .add_enabled(editor.history.can_redo(), egui::Button::new("⟳ Redo"))
            .clicked()
        {
            action = ToolbarAction::Redo;
        }

        ui.separator();

        if ui.button("⬆ Upload").clicked() {
            action = ToolbarAction::UploadImage;
        }
        if ui.button("📋 Paste").clicked() {
            action = ToolbarAction::Paste;
        }
        if ui.button("💾 Export").clicked() {
            action = ToolbarAction::Export;
        }
        if ui.button("🗑 Delete").clicked() {
            action = ToolbarAction::DeleteSelected;
        }
        if ui.button("🇹 Text").clicked() {
            action = ToolbarAction::OpenTextPopup;
        }

        ui.separator();

        // Tool description
        let tool_text = match editor.tool {
            Tool::Select => "Click to select, drag to move, drag empty space to marquee-select",
            Tool::Brush => "Draw on the selected meme; release to commit the stroke",
            Tool::Eraser => "Click a stroke on the selected meme to remove it",
        };

        ui.label(egui::RichText::new(tool_text).italics().weak());
    });

    action
}
