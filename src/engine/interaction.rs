// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The pointer interaction state machine.
//!
//! One [`Interaction`] value owns the active manipulation mode; there are
//! no per-entity dragging/resizing flags, so two objects can never claim an
//! exclusive gesture at once. A gesture starts from `Idle` on pointer-down,
//! updates on pointer-move, and commits/clears on pointer-up. Leaving the
//! canvas is treated exactly like releasing the pointer: there is no
//! dangling state and no separate abort gesture.

use super::hit::{self, Hit, ResizeHandle};
use super::selection::{Selection, Target};
use super::{Editor, Tool, CLICK_TOLERANCE, ERASER_DIAMETER, MIN_OBJECT_SIZE};
use crate::models::object::{ObjectId, Point, Stroke};
use crate::util::geometry::{box_intersects_rect, point_segment_distance};

/// The exclusive pointer-interaction state.
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    Idle,
    /// Canvas pan; positions are screen-space.
    Panning {
        pointer_start: Point,
        offset_start: Point,
    },
    /// Marquee selection between two canvas-local corners.
    RectSelecting { start: Point, current: Point },
    /// Single-object drag. `grab_offset` keeps the object from jumping to
    /// the pointer.
    Dragging { target: Target, grab_offset: Point },
    /// Uniform drag of every group member by the delta since `last`.
    GroupDragging { last: Point },
    /// Corner resize with the opposite corner anchored.
    Resizing {
        image: ObjectId,
        handle: ResizeHandle,
        pointer_start: Point,
        start_position: Point,
        start_size: (f32, f32),
    },
    /// Rotation of a floating text about its own center.
    Rotating {
        text: ObjectId,
        start_angle: f32,
        start_rotation: f32,
    },
    /// An uncommitted brush stroke in the owning image's local space.
    FreehandDrawing { image: ObjectId, points: Vec<Point> },
}

/// New position and size for a corner resize, holding the opposite corner
/// fixed. Both dimensions clamp to [`MIN_OBJECT_SIZE`]; the position shift
/// uses the clamped size so the anchor never drifts.
pub fn resized_geometry(
    handle: ResizeHandle,
    start_position: Point,
    start_size: (f32, f32),
    delta: (f32, f32),
) -> (Point, (f32, f32)) {
    let (w0, h0) = start_size;
    let (dx, dy) = delta;
    let (width, height) = match handle {
        ResizeHandle::Br => (w0 + dx, h0 + dy),
        ResizeHandle::Bl => (w0 - dx, h0 + dy),
        ResizeHandle::Tr => (w0 + dx, h0 - dy),
        ResizeHandle::Tl => (w0 - dx, h0 - dy),
    };
    let width = width.max(MIN_OBJECT_SIZE);
    let height = height.max(MIN_OBJECT_SIZE);

    let mut position = start_position;
    if matches!(handle, ResizeHandle::Bl | ResizeHandle::Tl) {
        position.x = start_position.x + (w0 - width);
    }
    if matches!(handle, ResizeHandle::Tr | ResizeHandle::Tl) {
        position.y = start_position.y + (h0 - height);
    }
    (position, (width, height))
}

/// Whether any segment of `stroke` passes within `radius` of `p`.
fn stroke_near_point(stroke: &Stroke, p: Point, radius: f32) -> bool {
    stroke
        .points
        .windows(2)
        .any(|seg| point_segment_distance(p, seg[0], seg[1]) <= radius)
}

impl Editor {
    /// Begin a gesture. Only `Idle` accepts a pointer-down; the transition
    /// priority is pan mode, then the selected text's rotation handle, then
    /// the active tool.
    pub fn pointer_down(&mut self, screen: Point) {
        if !matches!(self.interaction, Interaction::Idle) {
            return;
        }
        if self.pan_mode {
            self.interaction = Interaction::Panning {
                pointer_start: screen,
                offset_start: self.pan_offset,
            };
            return;
        }

        let pos = self.to_scene(screen);
        let hit = hit::resolve(&self.scene, &self.selection, pos);

        // The rotation handle outranks every tool.
        if let Hit::RotationHandle(text_id) = hit {
            if let Some(text) = self.scene.text(text_id) {
                let center = text.center();
                self.interaction = Interaction::Rotating {
                    text: text_id,
                    start_angle: (pos.y - center.y).atan2(pos.x - center.x),
                    start_rotation: text.rotation,
                };
            }
            return;
        }

        match self.tool {
            Tool::Select => match hit {
                Hit::ResizeHandle(image_id, handle) => {
                    if let Some(image) = self.scene.image(image_id) {
                        self.interaction = Interaction::Resizing {
                            image: image_id,
                            handle,
                            pointer_start: pos,
                            start_position: image.position,
                            start_size: (image.width, image.height),
                        };
                        self.selection.select(Target::Image(image_id));
                    }
                }
                Hit::TextBody(id) => self.body_down(Target::Text(id), pos),
                Hit::ImageBody(id) => self.body_down(Target::Image(id), pos),
                Hit::Empty => {
                    self.interaction = Interaction::RectSelecting {
                        start: pos,
                        current: pos,
                    };
                }
                Hit::RotationHandle(_) => {}
            },
            Tool::Brush => {
                if let Some(image_id) = self.selection.single_image() {
                    if let Some(image) = self.scene.image(image_id) {
                        self.interaction = Interaction::FreehandDrawing {
                            image: image_id,
                            points: vec![image.to_local(pos)],
                        };
                    }
                }
            }
            Tool::Eraser => {
                if let Some(image_id) = self.selection.single_image() {
                    self.erase_at(image_id, pos);
                }
            }
        }
    }

    fn body_down(&mut self, target: Target, pos: Point) {
        // A click on a member of a multi-object selection starts a group
        // drag and keeps the group; anything else collapses to a single
        // selection.
        if self.selection.group_len() >= 2 && self.selection.is_group_member(target) {
            self.interaction = Interaction::GroupDragging { last: pos };
            return;
        }
        let grab_offset = match target {
            Target::Image(id) => self
                .scene
                .image(id)
                .map(|i| Point::new(pos.x - i.position.x, pos.y - i.position.y)),
            Target::Text(id) => self
                .scene
                .text(id)
                .map(|t| Point::new(pos.x - t.position.x, pos.y - t.position.y)),
        };
        let Some(grab_offset) = grab_offset else {
            return;
        };
        self.selection.select(target);
        self.interaction = Interaction::Dragging {
            target,
            grab_offset,
        };
    }

    /// Update the active gesture for a new pointer position.
    pub fn pointer_moved(&mut self, screen: Point) {
        let pos = self.to_scene(screen);
        let mut interaction = std::mem::replace(&mut self.interaction, Interaction::Idle);
        match &mut interaction {
            Interaction::Idle => {}
            Interaction::Panning {
                pointer_start,
                offset_start,
            } => {
                self.pan_offset = Point::new(
                    offset_start.x + (screen.x - pointer_start.x),
                    offset_start.y + (screen.y - pointer_start.y),
                );
            }
            Interaction::RectSelecting { current, .. } => {
                *current = pos;
            }
            Interaction::Dragging {
                target,
                grab_offset,
            } => {
                let new_pos = Point::new(pos.x - grab_offset.x, pos.y - grab_offset.y);
                match target {
                    Target::Image(id) => self.scene.update_image(*id, |img| img.position = new_pos),
                    Target::Text(id) => self.scene.update_text(*id, |t| t.position = new_pos),
                }
            }
            Interaction::GroupDragging { last } => {
                let dx = pos.x - last.x;
                let dy = pos.y - last.y;
                let (images, texts) = match &self.selection {
                    Selection::Group { images, texts } => (images.clone(), texts.clone()),
                    _ => (Vec::new(), Vec::new()),
                };
                for id in images {
                    self.scene.update_image(id, |img| {
                        img.position.x += dx;
                        img.position.y += dy;
                    });
                }
                for id in texts {
                    self.scene.update_text(id, |t| {
                        t.position.x += dx;
                        t.position.y += dy;
                    });
                }
                *last = pos;
            }
            Interaction::Resizing {
                image,
                handle,
                pointer_start,
                start_position,
                start_size,
            } => {
                let delta = (pos.x - pointer_start.x, pos.y - pointer_start.y);
                let (position, (width, height)) =
                    resized_geometry(*handle, *start_position, *start_size, delta);
                self.scene.update_image(*image, |img| {
                    img.position = position;
                    img.width = width;
                    img.height = height;
                });
            }
            Interaction::Rotating {
                text,
                start_angle,
                start_rotation,
            } => {
                if let Some(t) = self.scene.text(*text) {
                    let center = t.center();
                    let current = (pos.y - center.y).atan2(pos.x - center.x);
                    let rotation = *start_rotation + (current - *start_angle);
                    self.scene.update_text(*text, |t| t.rotation = rotation);
                }
            }
            Interaction::FreehandDrawing { image, points } => {
                if let Some(img) = self.scene.image(*image) {
                    points.push(img.to_local(pos));
                }
            }
        }
        self.interaction = interaction;
    }

    /// End the active gesture, committing whatever it produced.
    pub fn pointer_up(&mut self) {
        let finished = std::mem::replace(&mut self.interaction, Interaction::Idle);
        match finished {
            Interaction::RectSelecting { start, current } => self.finish_rect_select(start, current),
            Interaction::FreehandDrawing { image, points } => self.finish_stroke(image, points),
            _ => {}
        }
    }

    /// Leaving the canvas commits exactly like releasing the pointer.
    pub fn pointer_left(&mut self) {
        self.pointer_up();
    }

    fn finish_rect_select(&mut self, start: Point, end: Point) {
        // Treat tiny drags as clicks: the prior selection stands.
        if (end.x - start.x).abs() < CLICK_TOLERANCE && (end.y - start.y).abs() < CLICK_TOLERANCE {
            return;
        }
        let x1 = start.x.min(end.x);
        let y1 = start.y.min(end.y);
        let x2 = start.x.max(end.x);
        let y2 = start.y.max(end.y);

        let images: Vec<ObjectId> = self
            .scene
            .images
            .iter()
            .filter(|m| box_intersects_rect(m.position.x, m.position.y, m.width, m.height, x1, y1, x2, y2))
            .map(|m| m.id)
            .collect();
        let texts: Vec<ObjectId> = self
            .scene
            .texts
            .iter()
            .filter(|t| box_intersects_rect(t.position.x, t.position.y, t.width, t.height, x1, y1, x2, y2))
            .map(|t| t.id)
            .collect();
        self.selection.set_group(images, texts);
    }

    fn finish_stroke(&mut self, image: ObjectId, points: Vec<Point>) {
        if points.len() < 2 {
            return;
        }
        let stroke = Stroke {
            points,
            color: self.brush.color,
            width: self.brush.width,
        };
        let mut committed = false;
        self.scene.update_image(image, |img| {
            img.strokes.push(stroke);
            committed = true;
        });
        if committed {
            log::info!("Committed stroke");
            self.commit();
        }
    }

    /// Synchronous erase: remove every stroke of the image with a segment
    /// within the eraser radius of `pos`. No interaction state is held.
    fn erase_at(&mut self, image_id: ObjectId, pos: Point) {
        let Some(local) = self.scene.image(image_id).map(|img| img.to_local(pos)) else {
            return;
        };
        let radius = ERASER_DIAMETER / 2.0;
        let mut removed = 0;
        self.scene.update_image(image_id, |img| {
            let before = img.strokes.len();
            img.strokes.retain(|stroke| !stroke_near_point(stroke, local, radius));
            removed = before - img.strokes.len();
        });
        if removed > 0 {
            log::info!("Erased {} stroke(s)", removed);
            self.commit();
        }
    }
}
