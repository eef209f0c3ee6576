// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Hit-testing and handle resolution.
//!
//! Resolves a canvas-local pointer position against the scene into the one
//! interactive target it addresses: the rotation handle of the selected
//! floating text, an image resize handle, an object body, or empty canvas.
//! Later-placed (topmost) objects win; floating texts sit above images for
//! pointer purposes.

use super::selection::Selection;
use crate::models::object::{FloatingText, ImageObject, ObjectId, Point};
use crate::models::scene::Scene;
use crate::util::geometry::{distance, rotate_point};

/// Side length of the square resize handles drawn on image corners.
pub const HANDLE_SIZE: f32 = 8.0;
/// Hit radius of the rotation handle hotspot.
pub const ROTATION_HANDLE_RADIUS: f32 = 8.0;
/// Distance from the top edge of a text block to its rotation handle.
pub const ROTATION_ARM: f32 = 30.0;

/// Corner handles of an image bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeHandle {
    Tl,
    Tr,
    Bl,
    Br,
}

/// The topmost interactive target under a pointer position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hit {
    RotationHandle(ObjectId),
    ResizeHandle(ObjectId, ResizeHandle),
    TextBody(ObjectId),
    ImageBody(ObjectId),
    Empty,
}

/// Center of the rotation handle for a floating text: a point above the
/// top edge midpoint, swung around the block center by its rotation.
pub fn rotation_handle_center(text: &FloatingText) -> Point {
    let center = text.center();
    let arm_end = Point::new(center.x, text.position.y - ROTATION_ARM);
    rotate_point(arm_end, center, text.rotation)
}

pub fn rotation_handle_hit(text: &FloatingText, p: Point) -> bool {
    distance(p, rotation_handle_center(text)) <= ROTATION_HANDLE_RADIUS
}

/// The resize handle of `image` under `p`, if any.
pub fn resize_handle_at(image: &ImageObject, p: Point) -> Option<ResizeHandle> {
    let Point { x, y } = image.position;
    let corners = [
        (ResizeHandle::Tl, Point::new(x, y)),
        (ResizeHandle::Tr, Point::new(x + image.width, y)),
        (ResizeHandle::Bl, Point::new(x, y + image.height)),
        (ResizeHandle::Br, Point::new(x + image.width, y + image.height)),
    ];
    let half = HANDLE_SIZE / 2.0;
    corners
        .into_iter()
        .find(|(_, corner)| (p.x - corner.x).abs() <= half && (p.y - corner.y).abs() <= half)
        .map(|(handle, _)| handle)
}

/// Resolve the topmost interactive target under `p`.
///
/// Priority: the selected floating text's rotation handle, then image
/// resize handles (topmost first), then text bodies, then image bodies.
pub fn resolve(scene: &Scene, selection: &Selection, p: Point) -> Hit {
    if let Some(text_id) = selection.single_text() {
        if let Some(text) = scene.text(text_id) {
            if rotation_handle_hit(text, p) {
                return Hit::RotationHandle(text_id);
            }
        }
    }

    for image in scene.images.iter().rev() {
        if let Some(handle) = resize_handle_at(image, p) {
            return Hit::ResizeHandle(image.id, handle);
        }
    }

    for text in scene.texts.iter().rev() {
        if text.contains(p) {
            return Hit::TextBody(text.id);
        }
    }

    for image in scene.images.iter().rev() {
        if image.contains(p) {
            return Hit::ImageBody(image.id);
        }
    }

    Hit::Empty
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::selection::Target;
    use crate::models::object::{ImagePixels, TextStyle};
    use std::sync::Arc;

    fn image(id: u64, x: f32, y: f32, w: f32, h: f32) -> ImageObject {
        ImageObject {
            id: ObjectId(id),
            position: Point::new(x, y),
            width: w,
            height: h,
            pixels: Arc::new(ImagePixels {
                source_id: id,
                width: 1,
                height: 1,
                rgba: vec![0; 4],
            }),
            strokes: Vec::new(),
            annotations: Vec::new(),
            selected_annotation: None,
        }
    }

    fn text(id: u64, x: f32, y: f32, w: f32, h: f32) -> FloatingText {
        FloatingText {
            id: ObjectId(id),
            position: Point::new(x, y),
            width: w,
            height: h,
            rotation: 0.0,
            text: "hi".to_string(),
            style: TextStyle::default(),
            lines: vec!["hi".to_string()],
        }
    }

    #[test]
    fn test_empty_scene_hits_nothing() {
        let scene = Scene::new();
        assert_eq!(
            resolve(&scene, &Selection::None, Point::new(5.0, 5.0)),
            Hit::Empty
        );
    }

    #[test]
    fn test_topmost_image_wins() {
        let mut scene = Scene::new();
        scene.add_image(image(1, 0.0, 0.0, 100.0, 100.0));
        scene.add_image(image(2, 50.0, 50.0, 100.0, 100.0));
        assert_eq!(
            resolve(&scene, &Selection::None, Point::new(75.0, 75.0)),
            Hit::ImageBody(ObjectId(2))
        );
    }

    #[test]
    fn test_text_body_beats_image_body() {
        let mut scene = Scene::new();
        scene.add_image(image(1, 0.0, 0.0, 200.0, 200.0));
        scene.add_text(text(2, 50.0, 50.0, 80.0, 40.0));
        assert_eq!(
            resolve(&scene, &Selection::None, Point::new(60.0, 60.0)),
            Hit::TextBody(ObjectId(2))
        );
    }

    #[test]
    fn test_resize_handle_beats_any_body() {
        let mut scene = Scene::new();
        scene.add_image(image(1, 0.0, 0.0, 100.0, 100.0));
        scene.add_text(text(2, 80.0, 80.0, 80.0, 40.0));
        // The br corner of the image lies under the text body.
        assert_eq!(
            resolve(&scene, &Selection::None, Point::new(100.0, 100.0)),
            Hit::ResizeHandle(ObjectId(1), ResizeHandle::Br)
        );
    }

    #[test]
    fn test_all_four_handles() {
        let img = image(1, 10.0, 20.0, 100.0, 50.0);
        assert_eq!(
            resize_handle_at(&img, Point::new(10.0, 20.0)),
            Some(ResizeHandle::Tl)
        );
        assert_eq!(
            resize_handle_at(&img, Point::new(110.0, 20.0)),
            Some(ResizeHandle::Tr)
        );
        assert_eq!(
            resize_handle_at(&img, Point::new(10.0, 70.0)),
            Some(ResizeHandle::Bl)
        );
        assert_eq!(
            resize_handle_at(&img, Point::new(110.0, 70.0)),
            Some(ResizeHandle::Br)
        );
        assert_eq!(resize_handle_at(&img, Point::new(60.0, 45.0)), None);
    }

    #[test]
    fn test_rotation_handle_has_absolute_priority() {
        let mut scene = Scene::new();
        let t = text(1, 100.0, 100.0, 80.0, 40.0);
        // Place an image right under the rotation handle hotspot.
        scene.add_image(image(2, 0.0, 0.0, 300.0, 300.0));
        scene.add_text(t);

        let selection = Selection::Single(Target::Text(ObjectId(1)));
        // Handle sits 30 units above the top edge at the horizontal center.
        let handle = Point::new(140.0, 70.0);
        assert_eq!(
            resolve(&scene, &selection, handle),
            Hit::RotationHandle(ObjectId(1))
        );
        // Without the text selected, the same point falls through to the image.
        assert_eq!(
            resolve(&scene, &Selection::None, handle),
            Hit::ImageBody(ObjectId(2))
        );
    }

    #[test]
    fn test_rotation_handle_follows_rotation() {
        let mut t = text(1, 100.0, 100.0, 80.0, 40.0);
        t.rotation = std::f32::consts::PI;
        // Rotated half a turn, the handle sits below the block.
        let center = rotation_handle_center(&t);
        assert!((center.x - 140.0).abs() < 1e-4);
        assert!((center.y - 170.0).abs() < 1e-4);
        assert!(rotation_handle_hit(&t, Point::new(142.0, 173.0)));
        assert!(!rotation_handle_hit(&t, Point::new(140.0, 70.0)));
    }
}
