// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas: paints the scene and feeds pointer input to the editor.
//!
//! Painting order matches the scene's z-order: images (with their strokes
//! and captions) first, floating texts above them, selection chrome and the
//! marquee on top. Pointer positions are translated to canvas-local space
//! before they reach the editor; leaving the canvas counts as releasing.

use std::collections::HashMap;

use crate::engine::hit::{self, HANDLE_SIZE};
use crate::engine::{Editor, Interaction, Target};
use crate::models::object::{FloatingText, Point, TextAnnotation, TextStyle};
use crate::text::LINE_HEIGHT_FACTOR;
use crate::ui::to_color32;
use crate::util::geometry::rotate_point;

const MARQUEE_COLOR: egui::Color32 = egui::Color32::from_rgb(0, 255, 255);

/// Display the canvas area, handle pointer interactions, and paint the scene.
pub fn show(
    ui: &mut egui::Ui,
    editor: &mut Editor,
    textures: &HashMap<u64, egui::TextureHandle>,
) {
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::BLACK;

    let status_height = 24.0;
    let canvas_size = egui::vec2(
        ui.available_width(),
        (ui.available_height() - status_height).max(0.0),
    );

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        let (rect, response) =
            ui.allocate_exact_size(canvas_size, egui::Sense::click_and_drag());
        if editor.pan_mode {
            let _ = response.on_hover_cursor(egui::CursorIcon::Grab);
        }

        handle_pointer(ui, editor, rect);

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, egui::Color32::BLACK);
        paint_scene(&painter, editor, textures, rect);
    });

    // Status strip below the canvas.
    ui.horizontal(|ui| {
        let memes = editor.scene.images.len();
        let texts = editor.scene.texts.len();
        ui.label(format!(
            "{} meme{} • {} text{}",
            memes,
            if memes == 1 { "" } else { "s" },
            texts,
            if texts == 1 { "" } else { "s" },
        ));
        ui.separator();
        ui.label(format!("{:?} tool", editor.tool));
        if editor.pan_mode {
            ui.separator();
            ui.label("Pan mode");
        }
    });
}

/// Route primary-button pointer events into the editor state machine.
fn handle_pointer(ui: &egui::Ui, editor: &mut Editor, rect: egui::Rect) {
    // Ctrl+scroll pans vertically.
    let scroll = ui.input(|i| {
        if i.modifiers.ctrl {
            i.raw_scroll_delta.y
        } else {
            0.0
        }
    });
    if scroll != 0.0 {
        editor.pan_offset.y += scroll;
    }

    let (pressed, released, pointer) = ui.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.pointer.primary_released(),
            i.pointer.interact_pos(),
        )
    });

    match pointer {
        Some(pos) if rect.contains(pos) => {
            let local = Point::new(pos.x - rect.min.x, pos.y - rect.min.y);
            if pressed {
                editor.pointer_down(local);
            } else {
                editor.pointer_moved(local);
            }
            if released {
                editor.pointer_up();
            }
        }
        _ => editor.pointer_left(),
    }
}

fn paint_scene(
    painter: &egui::Painter,
    editor: &Editor,
    textures: &HashMap<u64, egui::TextureHandle>,
    rect: egui::Rect,
) {
    let offset = egui::vec2(
        rect.min.x + editor.pan_offset.x,
        rect.min.y + editor.pan_offset.y,
    );
    let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
    let selected_image = editor.selection.single_image();

    for image in &editor.scene.images {
        let image_rect = egui::Rect::from_min_size(
            egui::pos2(image.position.x + offset.x, image.position.y + offset.y),
            egui::vec2(image.width, image.height),
        );
        if !rect.intersects(image_rect) {
            continue;
        }

        if let Some(texture) = textures.get(&image.pixels.source_id) {
            painter.image(texture.id(), image_rect, uv, egui::Color32::WHITE);
        }

        for stroke in &image.strokes {
            paint_stroke(
                painter,
                &stroke.points,
                stroke.width,
                to_color32(stroke.color),
                image_rect.min,
            );
        }

        // The uncommitted stroke previews in real time.
        if let Interaction::FreehandDrawing { image: id, points } = &editor.interaction {
            if *id == image.id {
                paint_stroke(
                    painter,
                    points,
                    editor.brush.width,
                    to_color32(editor.brush.color),
                    image_rect.min,
                );
            }
        }

        for annotation in &image.annotations {
            let active = selected_image == Some(image.id)
                && image.selected_annotation == Some(annotation.id);
            paint_caption(painter, annotation, image_rect.min, active);
        }

        if selected_image == Some(image.id) {
            paint_image_selection(painter, image_rect);
        } else if editor.selection.is_group_member(Target::Image(image.id)) {
            dashed_rect(
                painter,
                image_rect.expand(2.0),
                egui::Stroke::new(1.0, MARQUEE_COLOR),
            );
        }
    }

    for text in &editor.scene.texts {
        paint_floating_text(painter, text, offset);
        if editor.selection.single_text() == Some(text.id) {
            paint_text_selection(painter, text, offset);
        } else if editor.selection.is_group_member(Target::Text(text.id)) {
            let text_rect = egui::Rect::from_min_size(
                egui::pos2(text.position.x + offset.x, text.position.y + offset.y),
                egui::vec2(text.width, text.height),
            );
            dashed_rect(painter, text_rect.expand(2.0), egui::Stroke::new(1.0, MARQUEE_COLOR));
        }
    }

    if let Interaction::RectSelecting { start, current } = &editor.interaction {
        let marquee = egui::Rect::from_two_pos(
            egui::pos2(start.x + offset.x, start.y + offset.y),
            egui::pos2(current.x + offset.x, current.y + offset.y),
        );
        painter.rect_filled(
            marquee,
            0.0,
            egui::Color32::from_rgba_unmultiplied(0, 255, 255, 25),
        );
        dashed_rect(painter, marquee, egui::Stroke::new(2.0, MARQUEE_COLOR));
    }
}

fn paint_stroke(
    painter: &egui::Painter,
    points: &[Point],
    width: f32,
    color: egui::Color32,
    origin: egui::Pos2,
) {
    if points.len() < 2 {
        return;
    }
    let screen: Vec<egui::Pos2> = points
        .iter()
        .map(|p| egui::pos2(origin.x + p.x, origin.y + p.y))
        .collect();
    painter.add(egui::Shape::line(screen, egui::Stroke::new(width, color)));
}

/// Text painted as a stack of offset copies to fake the outline stroke.
fn paint_outlined_line(painter: &egui::Painter, pos: egui::Pos2, text: &str, style: &TextStyle) {
    let font_id = egui::FontId::proportional(style.font_size);
    if style.outline_width > 0.0 {
        let r = (style.outline_width / 2.0).max(0.5);
        for (dx, dy) in [(-r, 0.0), (r, 0.0), (0.0, -r), (0.0, r)] {
            painter.text(
                pos + egui::vec2(dx, dy),
                egui::Align2::LEFT_TOP,
                text,
                font_id.clone(),
                to_color32(style.outline),
            );
        }
    }
    painter.text(
        pos,
        egui::Align2::LEFT_TOP,
        text,
        font_id,
        to_color32(style.fill),
    );
}

fn paint_caption(
    painter: &egui::Painter,
    annotation: &TextAnnotation,
    image_origin: egui::Pos2,
    active: bool,
) {
    let style = &annotation.style;
    // The caption position is the first line's baseline in image space.
    let block_top = egui::pos2(
        image_origin.x + annotation.position.x,
        image_origin.y + annotation.position.y - style.font_size,
    );
    for (idx, line) in annotation.text.split('\n').enumerate() {
        let pos = egui::pos2(
            block_top.x,
            block_top.y + idx as f32 * style.font_size * LINE_HEIGHT_FACTOR,
        );
        paint_outlined_line(painter, pos, line, style);
    }

    if active {
        let galley = painter.layout_no_wrap(
            annotation.text.replace('\n', " "),
            egui::FontId::proportional(style.font_size),
            egui::Color32::WHITE,
        );
        let box_rect =
            egui::Rect::from_min_size(block_top, galley.size()).expand(3.0);
        dashed_rect(painter, box_rect, egui::Stroke::new(1.0, egui::Color32::WHITE));
    }
}

fn paint_floating_text(painter: &egui::Painter, text: &FloatingText, offset: egui::Vec2) {
    let style = &text.style;
    let top_left = Point::new(text.position.x + offset.x, text.position.y + offset.y);
    let center = Point::new(
        top_left.x + text.width / 2.0,
        top_left.y + text.height / 2.0,
    );
    let font_id = egui::FontId::proportional(style.font_size);

    let mut passes: Vec<(f32, f32, egui::Color32)> = Vec::new();
    if style.outline_width > 0.0 {
        let r = (style.outline_width / 2.0).max(0.5);
        for (dx, dy) in [(-r, 0.0), (r, 0.0), (0.0, -r), (0.0, r)] {
            passes.push((dx, dy, to_color32(style.outline)));
        }
    }
    passes.push((0.0, 0.0, to_color32(style.fill)));

    for (idx, line) in text.lines.iter().enumerate() {
        let line_top = Point::new(
            top_left.x,
            top_left.y + idx as f32 * style.font_size * LINE_HEIGHT_FACTOR,
        );
        for (dx, dy, color) in &passes {
            let galley = painter.layout_no_wrap(line.clone(), font_id.clone(), *color);
            let anchor = rotate_point(
                Point::new(line_top.x + dx, line_top.y + dy),
                center,
                text.rotation,
            );
            painter.add(
                egui::epaint::TextShape::new(egui::pos2(anchor.x, anchor.y), galley, *color)
                    .with_angle(text.rotation),
            );
        }
    }
}

fn paint_image_selection(painter: &egui::Painter, image_rect: egui::Rect) {
    dashed_rect(
        painter,
        image_rect.expand(2.0),
        egui::Stroke::new(2.0, egui::Color32::WHITE),
    );
    for corner in [
        image_rect.left_top(),
        image_rect.right_top(),
        image_rect.left_bottom(),
        image_rect.right_bottom(),
    ] {
        painter.rect_filled(
            egui::Rect::from_center_size(corner, egui::vec2(HANDLE_SIZE, HANDLE_SIZE)),
            0.0,
            egui::Color32::WHITE,
        );
    }
}

fn paint_text_selection(painter: &egui::Painter, text: &FloatingText, offset: egui::Vec2) {
    let center_scene = text.center();
    let center = egui::pos2(center_scene.x + offset.x, center_scene.y + offset.y);

    // Rotated dashed border: the expanded box corners swung by the rotation.
    let expand = 5.0;
    let corners_scene = [
        Point::new(text.position.x - expand, text.position.y - expand),
        Point::new(text.position.x + text.width + expand, text.position.y - expand),
        Point::new(
            text.position.x + text.width + expand,
            text.position.y + text.height + expand,
        ),
        Point::new(text.position.x - expand, text.position.y + text.height + expand),
    ];
    let corners: Vec<egui::Pos2> = corners_scene
        .iter()
        .map(|c| {
            let r = rotate_point(*c, center_scene, text.rotation);
            egui::pos2(r.x + offset.x, r.y + offset.y)
        })
        .collect();
    let stroke = egui::Stroke::new(2.0, egui::Color32::WHITE);
    for i in 0..4 {
        painter.extend(egui::Shape::dashed_line(
            &[corners[i], corners[(i + 1) % 4]],
            stroke,
            5.0,
            5.0,
        ));
    }

    // Rotation handle and its tether.
    let handle_scene = hit::rotation_handle_center(text);
    let handle = egui::pos2(handle_scene.x + offset.x, handle_scene.y + offset.y);
    painter.extend(egui::Shape::dashed_line(
        &[center, handle],
        egui::Stroke::new(1.0, egui::Color32::WHITE),
        2.0,
        2.0,
    ));
    painter.circle_filled(handle, 6.0, egui::Color32::GREEN);
}

fn dashed_rect(painter: &egui::Painter, rect: egui::Rect, stroke: egui::Stroke) {
    let corners = [
        rect.left_top(),
        rect.right_top(),
        rect.right_bottom(),
        rect.left_bottom(),
        rect.left_top(),
    ];
    for seg in corners.windows(2) {
        painter.extend(egui::Shape::dashed_line(&[seg[0], seg[1]], stroke, 5.0, 5.0));
    }
}
