// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The scene: every placed object at a point in time.
//!
//! Z-order equals insertion order; later objects draw on top and are
//! hit-tested first. Cloning a scene is the snapshot operation used by the
//! history stack; decoded pixels are shared through `Arc`, so clones stay
//! cheap even with large images placed.

use super::object::{FloatingText, ImageObject, ObjectId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub images: Vec<ImageObject>,
    pub texts: Vec<FloatingText>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an image on top of the stack.
    pub fn add_image(&mut self, image: ImageObject) {
        self.images.push(image);
    }

    /// Append a floating text on top of the stack.
    pub fn add_text(&mut self, text: FloatingText) {
        self.texts.push(text);
    }

    /// Apply `f` to the image with the given id. Unknown ids are a no-op.
    pub fn update_image(&mut self, id: ObjectId, f: impl FnOnce(&mut ImageObject)) {
        if let Some(image) = self.images.iter_mut().find(|i| i.id == id) {
            f(image);
        }
    }

    /// Apply `f` to the floating text with the given id. Unknown ids are a no-op.
    pub fn update_text(&mut self, id: ObjectId, f: impl FnOnce(&mut FloatingText)) {
        if let Some(text) = self.texts.iter_mut().find(|t| t.id == id) {
            f(text);
        }
    }

    /// Remove the image with the given id. Unknown ids are a no-op.
    pub fn remove_image(&mut self, id: ObjectId) {
        self.images.retain(|i| i.id != id);
    }

    /// Remove the floating text with the given id. Unknown ids are a no-op.
    pub fn remove_text(&mut self, id: ObjectId) {
        self.texts.retain(|t| t.id != id);
    }

    pub fn image(&self, id: ObjectId) -> Option<&ImageObject> {
        self.images.iter().find(|i| i.id == id)
    }

    pub fn text(&self, id: ObjectId) -> Option<&FloatingText> {
        self.texts.iter().find(|t| t.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.texts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::object::{ImagePixels, Point};
    use std::sync::Arc;

    fn image(id: u64) -> ImageObject {
        ImageObject {
            id: ObjectId(id),
            position: Point::new(0.0, 0.0),
            width: 100.0,
            height: 100.0,
            pixels: Arc::new(ImagePixels {
                source_id: id,
                width: 2,
                height: 2,
                rgba: vec![0; 16],
            }),
            strokes: Vec::new(),
            annotations: Vec::new(),
            selected_annotation: None,
        }
    }

    #[test]
    fn test_z_order_is_insertion_order() {
        let mut scene = Scene::new();
        scene.add_image(image(1));
        scene.add_image(image(2));
        let ids: Vec<_> = scene.images.iter().map(|i| i.id.0).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut scene = Scene::new();
        scene.add_image(image(1));
        let before = scene.clone();
        scene.update_image(ObjectId(99), |i| i.width = 1.0);
        scene.remove_image(ObjectId(99));
        scene.remove_text(ObjectId(99));
        assert_eq!(scene, before);
    }

    #[test]
    fn test_remove_image() {
        let mut scene = Scene::new();
        scene.add_image(image(1));
        scene.add_image(image(2));
        scene.remove_image(ObjectId(1));
        assert_eq!(scene.images.len(), 1);
        assert_eq!(scene.images[0].id, ObjectId(2));
    }

    #[test]
    fn test_snapshot_shares_pixels() {
        let mut scene = Scene::new();
        scene.add_image(image(1));
        let snapshot = scene.clone();
        assert!(Arc::ptr_eq(
            &scene.images[0].pixels,
            &snapshot.images[0].pixels
        ));
    }
}
