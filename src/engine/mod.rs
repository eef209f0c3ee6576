// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The scene/interaction engine.
//!
//! [`Editor`] owns the scene, selection, history, and the active pointer
//! interaction, and exposes the discrete operations the UI shell wires to
//! buttons and shortcuts. Every discrete user-level action ends in exactly
//! one [`Editor::commit`], which snapshots the scene for undo/redo; pointer
//! gestures are handled in [`interaction`].

pub mod clipboard;
pub mod history;
pub mod hit;
pub mod interaction;
pub mod selection;

use std::sync::Arc;

use crate::models::object::{
    Color, FloatingText, ImageObject, ImagePixels, ObjectId, Point, TextAnnotation, TextStyle,
};
use crate::models::scene::Scene;
use crate::text::ShapedText;

pub use clipboard::{CopiedObject, PASTE_OFFSET};
pub use history::History;
pub use hit::{Hit, ResizeHandle};
pub use interaction::Interaction;
pub use selection::{Selection, Target};

/// Currently selected canvas tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Select,
    Brush,
    Eraser,
}

/// Brush settings for freehand drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct BrushStyle {
    pub color: Color,
    pub width: f32,
}

impl Default for BrushStyle {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            width: 3.0,
        }
    }
}

/// Minimum width/height an image can be resized to.
pub const MIN_OBJECT_SIZE: f32 = 50.0;
/// Diameter of the eraser hotspot.
pub const ERASER_DIAMETER: f32 = 24.0;
/// Marquee drags below this span in both axes count as plain clicks.
pub const CLICK_TOLERANCE: f32 = 3.0;

pub struct Editor {
    pub scene: Scene,
    pub selection: Selection,
    pub history: History,
    pub interaction: Interaction,
    /// Scene coordinates plus this offset give screen coordinates.
    pub pan_offset: Point,
    /// When set, pointer-down starts a pan regardless of the active tool.
    pub pan_mode: bool,
    pub tool: Tool,
    pub brush: BrushStyle,
    pub copied: Option<CopiedObject>,
    next_id: u64,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            selection: Selection::None,
            history: History::new(Scene::new()),
            interaction: Interaction::Idle,
            pan_offset: Point::default(),
            pan_mode: false,
            tool: Tool::Select,
            brush: BrushStyle::default(),
            copied: None,
            next_id: 1,
        }
    }

    fn alloc_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Translate a screen position into canvas-local space.
    pub fn to_scene(&self, screen: Point) -> Point {
        Point::new(screen.x - self.pan_offset.x, screen.y - self.pan_offset.y)
    }

    /// Record the current scene in history. Called once per discrete user
    /// action (create, delete, stroke commit, erase, paste).
    pub fn commit(&mut self) {
        self.history.snapshot(&self.scene);
    }

    /// Place a decoded image on the canvas, select it, and commit.
    pub fn insert_image(
        &mut self,
        pixels: Arc<ImagePixels>,
        position: Point,
        width: f32,
        height: f32,
    ) -> ObjectId {
        let id = self.alloc_id();
        self.scene.add_image(ImageObject {
            id,
            position,
            width,
            height,
            pixels,
            strokes: Vec::new(),
            annotations: Vec::new(),
            selected_annotation: None,
        });
        self.selection.select(Target::Image(id));
        self.commit();
        log::info!("Placed image, total: {}", self.scene.images.len());
        id
    }

    /// Create a floating text centered on `center_on`, select it, and commit.
    pub fn create_floating_text(
        &mut self,
        text: String,
        style: TextStyle,
        shaped: ShapedText,
        center_on: Point,
    ) -> ObjectId {
        let id = self.alloc_id();
        let position = Point::new(
            center_on.x - shaped.width / 2.0,
            center_on.y - shaped.height / 2.0,
        );
        self.scene.add_text(FloatingText {
            id,
            position,
            width: shaped.width,
            height: shaped.height,
            rotation: 0.0,
            text,
            style,
            lines: shaped.lines,
        });
        self.selection.select(Target::Text(id));
        self.commit();
        log::info!("Created floating text, total: {}", self.scene.texts.len());
        id
    }

    /// Attach a caption to an image and make it the image's active caption.
    /// Returns `None` without committing if the image does not exist.
    pub fn create_annotation(
        &mut self,
        image_id: ObjectId,
        text: String,
        style: TextStyle,
    ) -> Option<ObjectId> {
        self.scene.image(image_id)?;
        let id = self.alloc_id();
        let position = Point::new(12.0, style.font_size + 12.0);
        self.scene.update_image(image_id, |img| {
            img.annotations.push(TextAnnotation {
                id,
                text,
                position,
                style,
            });
            img.selected_annotation = Some(id);
        });
        self.commit();
        Some(id)
    }

    /// Delete according to the selection: the active caption of a selected
    /// image first, else the selected object, else every group member.
    pub fn delete_selected(&mut self) {
        match self.selection.clone() {
            Selection::None => {}
            Selection::Single(Target::Image(id)) => {
                let Some(image) = self.scene.image(id) else {
                    return;
                };
                if let Some(ann_id) = image.selected_annotation {
                    self.scene.update_image(id, |img| {
                        img.annotations.retain(|a| a.id != ann_id);
                        img.selected_annotation = None;
                    });
                    log::info!("Deleted caption");
                } else {
                    self.scene.remove_image(id);
                    self.selection.clear();
                    log::info!("Deleted image, total: {}", self.scene.images.len());
                }
                self.commit();
            }
            Selection::Single(Target::Text(id)) => {
                if self.scene.text(id).is_none() {
                    return;
                }
                self.scene.remove_text(id);
                self.selection.clear();
                log::info!("Deleted floating text, total: {}", self.scene.texts.len());
                self.commit();
            }
            Selection::Group { images, texts } => {
                for id in &images {
                    self.scene.remove_image(*id);
                }
                for id in &texts {
                    self.scene.remove_text(*id);
                }
                self.selection.clear();
                log::info!("Deleted group of {} object(s)", images.len() + texts.len());
                self.commit();
            }
        }
    }

    /// Copy the current single selection into the internal buffer.
    pub fn copy_selected(&mut self) {
        if let Some(id) = self.selection.single_text() {
            if let Some(text) = self.scene.text(id) {
                self.copied = Some(CopiedObject::Text(text.clone()));
            }
        } else if let Some(id) = self.selection.single_image() {
            if let Some(image) = self.scene.image(id) {
                self.copied = Some(CopiedObject::Image(image.clone()));
            }
        }
    }

    /// Paste from the internal buffer: a fresh copy offset from the source,
    /// selected and committed. Returns whether anything was pasted.
    pub fn paste_internal(&mut self) -> bool {
        let Some(copied) = self.copied.clone() else {
            return false;
        };
        match copied {
            CopiedObject::Image(mut image) => {
                image.id = self.alloc_id();
                image.position.x += PASTE_OFFSET;
                image.position.y += PASTE_OFFSET;
                image.selected_annotation = None;
                let id = image.id;
                self.scene.add_image(image);
                self.selection.select(Target::Image(id));
            }
            CopiedObject::Text(mut text) => {
                text.id = self.alloc_id();
                text.position.x += PASTE_OFFSET;
                text.position.y += PASTE_OFFSET;
                let id = text.id;
                self.scene.add_text(text);
                self.selection.select(Target::Text(id));
            }
        }
        self.commit();
        log::info!("Pasted from internal buffer");
        true
    }

    /// Restore the previous snapshot. Transient interaction state and the
    /// selection are cleared; they are never part of history.
    pub fn undo(&mut self) {
        if let Some(scene) = self.history.undo() {
            self.scene = scene;
            self.interaction = Interaction::Idle;
            self.selection.clear();
            log::info!("Undo");
        }
    }

    /// Restore the next snapshot, if an undo left one available.
    pub fn redo(&mut self) {
        if let Some(scene) = self.history.redo() {
            self.scene = scene;
            self.interaction = Interaction::Idle;
            self.selection.clear();
            log::info!("Redo");
        }
    }

    /// Ids included in an export: the group selection when present, else
    /// the single selection.
    pub fn export_targets(&self) -> (Vec<ObjectId>, Vec<ObjectId>) {
        match &self.selection {
            Selection::Group { images, texts } => (images.clone(), texts.clone()),
            Selection::Single(Target::Image(id)) => (vec![*id], Vec::new()),
            Selection::Single(Target::Text(id)) => (Vec::new(), vec![*id]),
            Selection::None => (Vec::new(), Vec::new()),
        }
    }
}
