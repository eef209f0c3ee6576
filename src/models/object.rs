// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Scene object data structures.
//!
//! This module defines the core data structures for placed images,
//! their strokes and captions, and free-standing text blocks.

use std::sync::Arc;

/// A 2D point in canvas coordinates (or image-local coordinates where noted).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::opaque(255, 255, 255);
    pub const BLACK: Color = Color::opaque(0, 0, 0);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Identity of a scene object or of a caption within an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

/// A committed freehand stroke, in the local space of its owning image.
///
/// Strokes are immutable once committed; the eraser removes whole strokes.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub points: Vec<Point>,
    pub color: Color,
    pub width: f32,
}

/// A text caption bound to an image, positioned relative to the image origin.
#[derive(Debug, Clone, PartialEq)]
pub struct TextAnnotation {
    pub id: ObjectId,
    pub text: String,
    pub position: Point,
    pub style: TextStyle,
}

/// Styling shared by captions and floating text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f32,
    pub fill: Color,
    pub outline: Color,
    pub outline_width: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            font_size: 32.0,
            fill: Color::WHITE,
            outline: Color::BLACK,
            outline_width: 2.0,
        }
    }
}

/// Decoded pixel data, shared read-only between scene objects, history
/// snapshots, and the texture cache. `source_id` is the stable key for
/// render resources derived from these pixels.
#[derive(Debug, PartialEq)]
pub struct ImagePixels {
    pub source_id: u64,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// A placed raster image together with its strokes and captions.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageObject {
    pub id: ObjectId,
    pub position: Point,
    pub width: f32,
    pub height: f32,
    pub pixels: Arc<ImagePixels>,
    pub strokes: Vec<Stroke>,
    pub annotations: Vec<TextAnnotation>,
    /// Caption currently targeted for editing/deletion, if any.
    pub selected_annotation: Option<ObjectId>,
}

impl ImageObject {
    /// Whether a canvas-local point lies within the image bounds.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.position.x
            && p.x <= self.position.x + self.width
            && p.y >= self.position.y
            && p.y <= self.position.y + self.height
    }

    /// Translate a canvas-local point into this image's local space.
    pub fn to_local(&self, p: Point) -> Point {
        Point::new(p.x - self.position.x, p.y - self.position.y)
    }
}

/// A free-standing text block with its own rotation about its center.
///
/// `width`, `height`, and `lines` are derived from shaping the text and are
/// recomputed whenever the text or its font changes; they are never set
/// independently.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingText {
    pub id: ObjectId,
    pub position: Point,
    pub width: f32,
    pub height: f32,
    /// Radians, about the block center.
    pub rotation: f32,
    pub text: String,
    pub style: TextStyle,
    pub lines: Vec<String>,
}

impl FloatingText {
    pub fn center(&self) -> Point {
        Point::new(
            self.position.x + self.width / 2.0,
            self.position.y + self.height / 2.0,
        )
    }

    /// Whether a canvas-local point lies within the unrotated bounding box.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.position.x
            && p.x <= self.position.x + self.width
            && p.y >= self.position.y
            && p.y <= self.position.y + self.height
    }
}
