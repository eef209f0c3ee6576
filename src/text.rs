// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Text shaping: font lookup, measurement, and word wrap.
//!
//! Floating text dimensions are always derived from shaping; the editor
//! re-shapes whenever text content or font settings change. Fonts come
//! from the system database queried at bold weight; when a family (and the
//! sans-serif fallback) is missing entirely, a fixed per-character advance
//! keeps the editor usable.

use std::collections::HashMap;
use std::sync::Arc;

use fontdb::{Database, Family, Query, Source, Stretch, Style, Weight};
use rusttype::{Font, Scale};

/// Maximum line width before text wraps.
pub const WRAP_MAX_WIDTH: f32 = 400.0;
/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f32 = 1.2;
/// Advance per character when no font is available at all.
const FALLBACK_ADVANCE_FACTOR: f32 = 0.6;

/// Families offered in the text popup.
pub const FONT_FAMILIES: &[&str] = &[
    "Arial",
    "Anton",
    "Impact",
    "Comic Sans MS",
    "Times New Roman",
    "Helvetica",
];

/// A shaped text block: wrapped lines plus pixel dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapedText {
    pub lines: Vec<String>,
    pub width: f32,
    pub height: f32,
}

/// Greedy word wrap against a measurement function.
///
/// Words whose test line exceeds `max_width` start a new line; a single
/// overlong word is kept on its own line rather than split.
pub fn wrap_text(
    text: &str,
    font_size: f32,
    max_width: f32,
    measure: impl Fn(&str) -> f32,
) -> ShapedText {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut width: f32 = 0.0;

    for word in text.split(' ') {
        let test_line = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if measure(&test_line) > max_width && !current.is_empty() {
            width = width.max(measure(&current));
            lines.push(current);
            current = word.to_string();
        } else {
            current = test_line;
        }
    }
    if !current.is_empty() {
        width = width.max(measure(&current));
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }

    let height = lines.len() as f32 * font_size * LINE_HEIGHT_FACTOR;
    ShapedText {
        lines,
        width,
        height,
    }
}

/// Width of a line of text in a given font.
pub fn measure_line(font: &Font<'_>, text: &str, font_size: f32) -> f32 {
    let scale = Scale::uniform(font_size);
    font.layout(text, scale, rusttype::point(0.0, 0.0))
        .last()
        .map(|glyph| glyph.position().x + glyph.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

/// System font lookup with a per-family cache.
pub struct FontCatalog {
    db: Database,
    cache: HashMap<String, Option<Arc<Font<'static>>>>,
}

impl Default for FontCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl FontCatalog {
    pub fn new() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        Self {
            db,
            cache: HashMap::new(),
        }
    }

    /// The bold face for `family`, falling back to the system sans-serif.
    /// `None` when neither resolves (e.g. a bare container).
    pub fn font(&mut self, family: &str) -> Option<Arc<Font<'static>>> {
        if let Some(cached) = self.cache.get(family) {
            return cached.clone();
        }
        let loaded = self.load(family).map(Arc::new);
        self.cache.insert(family.to_string(), loaded.clone());
        loaded
    }

    fn load(&self, family: &str) -> Option<Font<'static>> {
        let families = [Family::Name(family), Family::SansSerif];
        let query = Query {
            families: &families,
            weight: Weight::BOLD,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;
        let face = self.db.face(id)?;
        match &face.source {
            Source::File(path) => Font::try_from_vec(std::fs::read(path).ok()?),
            Source::SharedFile(path, _) => Font::try_from_vec(std::fs::read(path).ok()?),
            Source::Binary(bytes) => Font::try_from_vec(bytes.as_ref().as_ref().to_vec()),
        }
    }

    /// Wrap `text` for the given family and size at the standard max width.
    pub fn shape(&mut self, text: &str, family: &str, font_size: f32) -> ShapedText {
        match self.font(family) {
            Some(font) => wrap_text(text, font_size, WRAP_MAX_WIDTH, |line| {
                measure_line(&font, line, font_size)
            }),
            None => wrap_text(text, font_size, WRAP_MAX_WIDTH, |line| {
                line.chars().count() as f32 * font_size * FALLBACK_ADVANCE_FACTOR
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 10 units per character makes wrap boundaries easy to reason about.
    fn measure(line: &str) -> f32 {
        line.chars().count() as f32 * 10.0
    }

    #[test]
    fn test_short_text_stays_on_one_line() {
        let shaped = wrap_text("HELLO", 32.0, 400.0, measure);
        assert_eq!(shaped.lines, vec!["HELLO".to_string()]);
        assert_eq!(shaped.width, 50.0);
        assert!((shaped.height - 38.4).abs() < 1e-4);
    }

    #[test]
    fn test_wraps_at_max_width() {
        // "aaaa bbbb" measures 90; with max 60, "bbbb" wraps.
        let shaped = wrap_text("aaaa bbbb", 10.0, 60.0, measure);
        assert_eq!(shaped.lines, vec!["aaaa".to_string(), "bbbb".to_string()]);
        assert_eq!(shaped.width, 40.0);
        assert_eq!(shaped.height, 2.0 * 10.0 * LINE_HEIGHT_FACTOR);
    }

    #[test]
    fn test_overlong_word_is_not_split() {
        let shaped = wrap_text("abcdefghij xy", 10.0, 50.0, measure);
        assert_eq!(
            shaped.lines,
            vec!["abcdefghij".to_string(), "xy".to_string()]
        );
        // The widest line defines the block width even past max_width.
        assert_eq!(shaped.width, 100.0);
    }

    #[test]
    fn test_empty_text_has_one_empty_line() {
        let shaped = wrap_text("", 10.0, 50.0, measure);
        assert_eq!(shaped.lines, vec![String::new()]);
        assert_eq!(shaped.width, 0.0);
        assert_eq!(shaped.height, 12.0);
    }

    #[test]
    fn test_width_is_widest_line() {
        let shaped = wrap_text("aa bbbb cc", 10.0, 50.0, measure);
        assert_eq!(
            shaped.lines,
            vec!["aa".to_string(), "bbbb".to_string(), "cc".to_string()]
        );
        assert_eq!(shaped.width, 40.0);
    }
}
