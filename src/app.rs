// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module owns the editor engine and the pieces only the shell knows
//! about: the texture cache, the background image loader, the OS clipboard,
//! file dialogs, keyboard shortcuts, and the text popup.

use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;

use rand::Rng;

use crate::engine::Editor;
use crate::error::EditorError;
use crate::io::{export, media};
use crate::models::object::{ImagePixels, Point};
use crate::text::FontCatalog;
use crate::ui::canvas;
use crate::ui::text_popup::{self, TextPopupAction, TextPopupState};
use crate::ui::toolbar::{self, ToolbarAction};

/// Main application state.
pub struct MedsApp {
    /// The scene/interaction engine
    editor: Editor,

    /// System font lookup for shaping and export
    fonts: FontCatalog,

    /// Uploaded textures keyed by pixel source id
    textures: HashMap<u64, egui::TextureHandle>,

    /// Text creation popup state
    text_popup: TextPopupState,

    /// Receiver for background image loading
    image_loader: Option<Receiver<Result<media::DecodedImage, EditorError>>>,

    /// Loading state message
    loading_message: Option<String>,

    /// Last user-visible notice (decode failures, export results)
    status_message: Option<String>,

    /// Counter for pixel source ids
    next_source_id: u64,
}

impl Default for MedsApp {
    fn default() -> Self {
        Self::new()
    }
}

impl MedsApp {
    /// Create a new MEDS application instance.
    pub fn new() -> Self {
        Self {
            editor: Editor::new(),
            fonts: FontCatalog::new(),
            textures: HashMap::new(),
            text_popup: TextPopupState::default(),
            image_loader: None,
            loading_message: None,
            status_message: None,
            next_source_id: 1,
        }
    }

    /// Load and decode an image file asynchronously.
    pub fn load_image_file(&mut self, path: std::path::PathBuf) {
        let (sender, receiver) = channel();
        self.image_loader = Some(receiver);
        self.loading_message = Some("Loading image...".to_string());

        // Spawn background thread for decoding
        std::thread::spawn(move || {
            let result = media::decode_file(&path);
            if let Ok(ref decoded) = result {
                log::info!(
                    "Loaded image: {} ({}x{})",
                    path.display(),
                    decoded.width,
                    decoded.height
                );
            }
            let _ = sender.send(result);
        });
    }

    /// Place decoded pixels on the canvas: upload the texture, fit the
    /// display size, and drop it at a random spot.
    fn place_decoded(&mut self, ctx: &egui::Context, decoded: media::DecodedImage) {
        let source_id = self.next_source_id;
        self.next_source_id += 1;

        let size = [decoded.width as usize, decoded.height as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &decoded.rgba);
        let texture = ctx.load_texture(
            format!("meme_{source_id}"),
            color_image,
            egui::TextureOptions::LINEAR,
        );
        self.textures.insert(source_id, texture);

        let pixels = Arc::new(ImagePixels {
            source_id,
            width: decoded.width,
            height: decoded.height,
            rgba: decoded.rgba,
        });
        let (width, height) = media::fitted_size(pixels.width, pixels.height);
        let mut rng = rand::thread_rng();
        let position = Point::new(rng.gen_range(0.0..200.0), rng.gen_range(0.0..200.0));
        self.editor.insert_image(pixels, position, width, height);
    }

    /// Paste: prefer an OS clipboard image, fall back to the internal
    /// copy buffer.
    fn paste(&mut self, ctx: &egui::Context) {
        match read_clipboard_image() {
            Ok(decoded) => self.place_decoded(ctx, decoded),
            Err(_) => {
                log::debug!("Clipboard unavailable, using copied element instead");
                self.editor.paste_internal();
            }
        }
    }

    /// Export the selection to a PNG chosen in a save dialog.
    fn export_selection(&mut self) {
        let (images, texts) = self.editor.export_targets();
        if images.is_empty() && texts.is_empty() {
            self.status_message = Some("Select elements to export.".to_string());
            return;
        }
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name("meme.png")
            .save_file()
        else {
            return;
        };
        match export::render_selection(&self.editor.scene, &images, &texts, &mut self.fonts) {
            Ok(rendered) => match rendered.save(&path) {
                Ok(()) => {
                    log::info!("Exported selection to {}", path.display());
                    self.status_message = Some(format!("Exported {}", path.display()));
                }
                Err(e) => {
                    log::error!("Failed to write export: {}", e);
                    self.status_message = Some(format!("Export failed: {e}"));
                }
            },
            Err(e) => {
                self.status_message = Some(e.to_string());
            }
        }
    }

    /// Create a floating text (or a caption on the selected image) from
    /// the popup contents.
    fn create_text_from_popup(&mut self, ctx: &egui::Context) {
        let text = self.text_popup.input.clone();
        let style = self.text_popup.style();

        if self.text_popup.attach_to_image {
            if let Some(image_id) = self.editor.selection.single_image() {
                self.editor.create_annotation(image_id, text, style);
                self.text_popup.open = false;
                self.text_popup.input.clear();
                return;
            }
        }

        let shaped = self.fonts.shape(&text, &style.font_family, style.font_size);
        let screen_center = ctx.screen_rect().center();
        let center = self
            .editor
            .to_scene(Point::new(screen_center.x, screen_center.y));
        self.editor.create_floating_text(text, style, shaped, center);
        self.text_popup.open = false;
        self.text_popup.input.clear();
    }

    /// Global shortcuts, suppressed while any text field has focus.
    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }

        if ctx.input(|i| i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace)) {
            self.editor.delete_selected();
        }

        // Undo (Ctrl+Z)
        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::Z) && !i.modifiers.shift) {
            self.editor.undo();
        }

        // Redo (Ctrl+Shift+Z or Ctrl+Y)
        if ctx.input(|i| {
            (i.modifiers.command && i.modifiers.shift && i.key_pressed(egui::Key::Z))
                || (i.modifiers.command && i.key_pressed(egui::Key::Y))
        }) {
            self.editor.redo();
        }

        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::C)) {
            self.editor.copy_selected();
        }

        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::V)) {
            self.paste(ctx);
        }
    }

    fn dispatch(&mut self, action: ToolbarAction, ctx: &egui::Context) {
        match action {
            ToolbarAction::None => {}
            ToolbarAction::Undo => self.editor.undo(),
            ToolbarAction::Redo => self.editor.redo(),
            ToolbarAction::UploadImage => {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Images", &["jpg", "jpeg", "png", "bmp", "gif", "webp"])
                    .pick_file()
                {
                    self.load_image_file(path);
                }
            }
            ToolbarAction::Paste => self.paste(ctx),
            ToolbarAction::Export => self.export_selection(),
            ToolbarAction::DeleteSelected => self.editor.delete_selected(),
            ToolbarAction::OpenTextPopup => self.text_popup.open = true,
        }
    }
}

/// Read an image off the OS clipboard as decoded RGBA.
fn read_clipboard_image() -> Result<media::DecodedImage, EditorError> {
    let mut clipboard = arboard::Clipboard::new().map_err(|_| EditorError::ClipboardUnavailable)?;
    let img = clipboard
        .get_image()
        .map_err(|_| EditorError::ClipboardUnavailable)?;
    Ok(media::DecodedImage {
        width: img.width as u32,
        height: img.height as u32,
        rgba: img.bytes.into_owned(),
    })
}

impl eframe::App for MedsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for completed image loading
        if let Some(ref receiver) = self.image_loader {
            if let Ok(result) = receiver.try_recv() {
                self.image_loader = None;
                self.loading_message = None;

                match result {
                    Ok(decoded) => self.place_decoded(ctx, decoded),
                    Err(e) => {
                        log::error!("Failed to load image: {}", e);
                        self.status_message = Some(e.to_string());
                    }
                }
            }
        }

        // Request repaint if still loading (to update spinner)
        if self.loading_message.is_some() {
            ctx.request_repaint();
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Image...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Images", &["jpg", "jpeg", "png", "bmp", "gif", "webp"])
                            .pick_file()
                        {
                            self.load_image_file(path);
                        }
                        ui.close_menu();
                    }
                    if ui.button("Export Selection...").clicked() {
                        self.export_selection();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Edit", |ui| {
                    let can_undo = self.editor.history.can_undo();
                    if ui
                        .add_enabled(can_undo, egui::Button::new("Undo (Ctrl+Z)"))
                        .clicked()
                    {
                        self.editor.undo();
                        ui.close_menu();
                    }

                    let can_redo = self.editor.history.can_redo();
                    if ui
                        .add_enabled(can_redo, egui::Button::new("Redo (Ctrl+Shift+Z)"))
                        .clicked()
                    {
                        self.editor.redo();
                        ui.close_menu();
                    }

                    ui.separator();

                    if ui.button("Delete Selected").clicked() {
                        self.editor.delete_selected();
                        ui.close_menu();
                    }
                });
            });
        });

        // Toolbar
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| toolbar::show(ui, &mut self.editor))
            .inner;
        self.dispatch(toolbar_action, ctx);

        // Text creation popup
        let image_selected = self.editor.selection.single_image().is_some();
        if text_popup::show(ctx, &mut self.text_popup, image_selected) == TextPopupAction::Create {
            self.create_text_from_popup(ctx);
        }

        // Status bar with the last notice
        if self.status_message.is_some() {
            egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if let Some(ref message) = self.status_message {
                        ui.label(message);
                    }
                    if ui.small_button("✕").clicked() {
                        self.status_message = None;
                    }
                });
            });
        }

        // Handle keyboard events
        self.handle_keyboard(ctx);

        // Main canvas (center)
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(ref message) = self.loading_message {
                ui.centered_and_justified(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(20.0);
                        ui.spinner();
                        ui.add_space(10.0);
                        ui.label(
                            egui::RichText::new(message)
                                .size(16.0)
                                .color(egui::Color32::from_gray(200)),
                        );
                    });
                });
            } else {
                canvas::show(ui, &mut self.editor, &self.textures);
            }
        });
    }
}
