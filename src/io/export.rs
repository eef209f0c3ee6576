// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Flattened raster export of the selected objects.
//!
//! A pure function over the scene: computes the bounding box of the export
//! set, then composites images, strokes, captions, and floating texts in
//! z-order into a single RGBA image. Floating text rotates about its own
//! block center. The interaction engine never depends on this module.

use image::RgbaImage;
use rusttype::{Font, Scale};

use crate::error::EditorError;
use crate::models::object::{Color, FloatingText, ImageObject, ObjectId, Point, Stroke, TextStyle};
use crate::models::scene::Scene;
use crate::text::{FontCatalog, LINE_HEIGHT_FACTOR};
use crate::util::geometry::{distance, rotate_point};

/// Render the listed objects into a single flattened image.
///
/// Returns [`EditorError::EmptyExportSelection`] when no listed id exists
/// in the scene.
pub fn render_selection(
    scene: &Scene,
    image_ids: &[ObjectId],
    text_ids: &[ObjectId],
    fonts: &mut FontCatalog,
) -> Result<RgbaImage, EditorError> {
    let images: Vec<&ImageObject> = scene
        .images
        .iter()
        .filter(|i| image_ids.contains(&i.id))
        .collect();
    let texts: Vec<&FloatingText> = scene
        .texts
        .iter()
        .filter(|t| text_ids.contains(&t.id))
        .collect();
    if images.is_empty() && texts.is_empty() {
        return Err(EditorError::EmptyExportSelection);
    }

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for image in &images {
        min_x = min_x.min(image.position.x);
        min_y = min_y.min(image.position.y);
        max_x = max_x.max(image.position.x + image.width);
        max_y = max_y.max(image.position.y + image.height);
    }
    for text in &texts {
        min_x = min_x.min(text.position.x);
        min_y = min_y.min(text.position.y);
        max_x = max_x.max(text.position.x + text.width);
        max_y = max_y.max(text.position.y + text.height);
    }

    let width = (max_x - min_x).ceil().max(1.0) as u32;
    let height = (max_y - min_y).ceil().max(1.0) as u32;
    let mut canvas = RgbaImage::new(width, height);

    for image in &images {
        let origin = Point::new(image.position.x - min_x, image.position.y - min_y);
        blit_image(&mut canvas, image, origin);
        for stroke in &image.strokes {
            draw_stroke(&mut canvas, stroke, origin);
        }
        for annotation in &image.annotations {
            let lines: Vec<String> = annotation.text.split('\n').map(str::to_string).collect();
            let anchor = Point::new(
                origin.x + annotation.position.x,
                origin.y + annotation.position.y,
            );
            draw_text_block(&mut canvas, fonts, &lines, &annotation.style, anchor);
        }
    }
    for text in &texts {
        draw_floating_text(&mut canvas, fonts, text, Point::new(min_x, min_y));
    }

    Ok(canvas)
}

/// Scale an image's pixels to its display size and composite it in.
fn blit_image(canvas: &mut RgbaImage, image: &ImageObject, origin: Point) {
    let pixels = &image.pixels;
    let Some(src) = RgbaImage::from_raw(pixels.width, pixels.height, pixels.rgba.clone()) else {
        return;
    };
    let w = image.width.round().max(1.0) as u32;
    let h = image.height.round().max(1.0) as u32;
    let resized = if (w, h) == (src.width(), src.height()) {
        src
    } else {
        image::imageops::resize(&src, w, h, image::imageops::FilterType::Triangle)
    };
    image::imageops::overlay(
        canvas,
        &resized,
        origin.x.round() as i64,
        origin.y.round() as i64,
    );
}

/// Stamp a stroke as round-capped segments of discs.
fn draw_stroke(canvas: &mut RgbaImage, stroke: &Stroke, origin: Point) {
    let radius = (stroke.width / 2.0).max(0.5);
    let step = (radius * 0.5).max(0.5);
    for seg in stroke.points.windows(2) {
        let a = Point::new(seg[0].x + origin.x, seg[0].y + origin.y);
        let b = Point::new(seg[1].x + origin.x, seg[1].y + origin.y);
        let steps = (distance(a, b) / step).ceil().max(1.0) as u32;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let center = Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t);
            stamp_disc(canvas, center, radius, stroke.color);
        }
    }
}

fn stamp_disc(canvas: &mut RgbaImage, center: Point, radius: f32, color: Color) {
    let r = radius.ceil() as i64;
    let cx = center.x.round() as i64;
    let cy = center.y.round() as i64;
    for dy in -r..=r {
        for dx in -r..=r {
            if (dx * dx + dy * dy) as f32 <= radius * radius {
                blend_pixel(canvas, cx + dx, cy + dy, color, 1.0);
            }
        }
    }
}

/// Source-over blend of `color` scaled by `coverage` into one pixel.
fn blend_pixel(canvas: &mut RgbaImage, x: i64, y: i64, color: Color, coverage: f32) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }
    let alpha = (coverage * color.a as f32 / 255.0).clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }
    let px = canvas.get_pixel_mut(x as u32, y as u32);
    let src = [color.r, color.g, color.b];
    for c in 0..3 {
        px.0[c] = (src[c] as f32 * alpha + px.0[c] as f32 * (1.0 - alpha)).round() as u8;
    }
    px.0[3] = ((alpha + (px.0[3] as f32 / 255.0) * (1.0 - alpha)) * 255.0).round() as u8;
}

/// Draw wrapped lines with `anchor` at the first line's baseline start.
fn draw_text_block(
    canvas: &mut RgbaImage,
    fonts: &mut FontCatalog,
    lines: &[String],
    style: &TextStyle,
    anchor: Point,
) {
    let Some(font) = fonts.font(&style.font_family) else {
        return;
    };
    for (idx, line) in lines.iter().enumerate() {
        let baseline = anchor.y + idx as f32 * style.font_size * LINE_HEIGHT_FACTOR;
        if style.outline_width > 0.0 {
            for (ox, oy) in outline_offsets(style.outline_width) {
                draw_line_glyphs(
                    canvas,
                    &font,
                    line,
                    style.font_size,
                    Point::new(anchor.x + ox, baseline + oy),
                    style.outline,
                );
            }
        }
        draw_line_glyphs(
            canvas,
            &font,
            line,
            style.font_size,
            Point::new(anchor.x, baseline),
            style.fill,
        );
    }
}

/// Eight offset passes approximating a text outline of the given width.
fn outline_offsets(width: f32) -> [(f32, f32); 8] {
    let r = (width / 2.0).max(0.5);
    let d = r * std::f32::consts::FRAC_1_SQRT_2;
    [
        (-r, 0.0),
        (r, 0.0),
        (0.0, -r),
        (0.0, r),
        (-d, -d),
        (d, -d),
        (-d, d),
        (d, d),
    ]
}

fn draw_line_glyphs(
    canvas: &mut RgbaImage,
    font: &Font<'_>,
    line: &str,
    font_size: f32,
    baseline: Point,
    color: Color,
) {
    let scale = Scale::uniform(font_size);
    for glyph in font.layout(line, scale, rusttype::point(baseline.x, baseline.y)) {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                blend_pixel(
                    canvas,
                    bb.min.x as i64 + gx as i64,
                    bb.min.y as i64 + gy as i64,
                    color,
                    v,
                );
            });
        }
    }
}

/// Rasterize a floating text into a padded buffer, then rotate it into
/// place about its block center.
fn draw_floating_text(
    canvas: &mut RgbaImage,
    fonts: &mut FontCatalog,
    text: &FloatingText,
    export_min: Point,
) {
    let pad = (text.style.font_size * 0.5 + text.style.outline_width).ceil();
    let buf_w = (text.width + pad * 2.0).ceil().max(1.0) as u32;
    let buf_h = (text.height + pad * 2.0).ceil().max(1.0) as u32;
    let mut buf = RgbaImage::new(buf_w, buf_h);
    let anchor = Point::new(pad, pad + text.style.font_size);
    draw_text_block(&mut buf, fonts, &text.lines, &text.style, anchor);

    let dest_center = Point::new(
        text.position.x - export_min.x + text.width / 2.0,
        text.position.y - export_min.y + text.height / 2.0,
    );
    rotate_blit(canvas, &buf, dest_center, text.rotation);
}

/// Paint `src` onto `dst`, centered on `dst_center` and rotated by `angle`
/// radians, sampling nearest-neighbor through the inverse rotation.
pub fn rotate_blit(dst: &mut RgbaImage, src: &RgbaImage, dst_center: Point, angle: f32) {
    let src_center = Point::new(src.width() as f32 / 2.0, src.height() as f32 / 2.0);
    let top_left = Point::new(dst_center.x - src_center.x, dst_center.y - src_center.y);

    // The affected destination region is the rotated source bounding box.
    let corners = [
        Point::new(top_left.x, top_left.y),
        Point::new(top_left.x + src.width() as f32, top_left.y),
        Point::new(top_left.x, top_left.y + src.height() as f32),
        Point::new(
            top_left.x + src.width() as f32,
            top_left.y + src.height() as f32,
        ),
    ];
    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for corner in corners {
        let rotated = rotate_point(corner, dst_center, angle);
        min_x = min_x.min(rotated.x);
        min_y = min_y.min(rotated.y);
        max_x = max_x.max(rotated.x);
        max_y = max_y.max(rotated.y);
    }
    let x0 = (min_x.floor().max(0.0)) as u32;
    let y0 = (min_y.floor().max(0.0)) as u32;
    let x1 = (max_x.ceil().max(0.0) as u32).min(dst.width());
    let y1 = (max_y.ceil().max(0.0) as u32).min(dst.height());

    for y in y0..y1 {
        for x in x0..x1 {
            let dst_pt = Point::new(x as f32 + 0.5, y as f32 + 0.5);
            let src_pt = rotate_point(dst_pt, dst_center, -angle);
            let sx = (src_pt.x - top_left.x).floor() as i64;
            let sy = (src_pt.y - top_left.y).floor() as i64;
            if sx >= 0 && sy >= 0 && (sx as u32) < src.width() && (sy as u32) < src.height() {
                let p = src.get_pixel(sx as u32, sy as u32);
                if p.0[3] > 0 {
                    let color = Color {
                        r: p.0[0],
                        g: p.0[1],
                        b: p.0[2],
                        a: p.0[3],
                    };
                    blend_pixel(dst, x as i64, y as i64, color, 1.0);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::object::{ImagePixels, TextAnnotation};
    use std::sync::Arc;

    fn solid_image(
        id: u64,
        x: f32,
        y: f32,
        size: u32,
        color: [u8; 4],
    ) -> ImageObject {
        let mut rgba = Vec::with_capacity((size * size * 4) as usize);
        for _ in 0..size * size {
            rgba.extend_from_slice(&color);
        }
        ImageObject {
            id: ObjectId(id),
            position: Point::new(x, y),
            width: size as f32,
            height: size as f32,
            pixels: Arc::new(ImagePixels {
                source_id: id,
                width: size,
                height: size,
                rgba,
            }),
            strokes: Vec::new(),
            annotations: Vec::new(),
            selected_annotation: None,
        }
    }

    #[test]
    fn test_empty_selection_is_an_error() {
        let scene = Scene::new();
        let mut fonts = FontCatalog::new();
        let err = render_selection(&scene, &[], &[], &mut fonts).unwrap_err();
        assert!(matches!(err, EditorError::EmptyExportSelection));
    }

    #[test]
    fn test_unknown_ids_are_an_error() {
        let scene = Scene::new();
        let mut fonts = FontCatalog::new();
        let err =
            render_selection(&scene, &[ObjectId(9)], &[ObjectId(8)], &mut fonts).unwrap_err();
        assert!(matches!(err, EditorError::EmptyExportSelection));
    }

    #[test]
    fn test_bounds_cover_all_selected_images() {
        let mut scene = Scene::new();
        scene.add_image(solid_image(1, 0.0, 0.0, 2, [255, 0, 0, 255]));
        scene.add_image(solid_image(2, 10.0, 10.0, 2, [0, 255, 0, 255]));
        let mut fonts = FontCatalog::new();

        let out =
            render_selection(&scene, &[ObjectId(1), ObjectId(2)], &[], &mut fonts).unwrap();
        assert_eq!((out.width(), out.height()), (12, 12));
        assert_eq!(out.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(out.get_pixel(11, 11).0, [0, 255, 0, 255]);
        // Between the two images nothing was painted.
        assert_eq!(out.get_pixel(6, 6).0[3], 0);
    }

    #[test]
    fn test_export_is_relative_to_selection_origin() {
        let mut scene = Scene::new();
        scene.add_image(solid_image(1, 500.0, 700.0, 4, [9, 9, 9, 255]));
        let mut fonts = FontCatalog::new();

        let out = render_selection(&scene, &[ObjectId(1)], &[], &mut fonts).unwrap();
        assert_eq!((out.width(), out.height()), (4, 4));
        assert_eq!(out.get_pixel(0, 0).0, [9, 9, 9, 255]);
    }

    #[test]
    fn test_unselected_objects_are_excluded() {
        let mut scene = Scene::new();
        scene.add_image(solid_image(1, 0.0, 0.0, 2, [255, 0, 0, 255]));
        scene.add_image(solid_image(2, 2.0, 0.0, 2, [0, 255, 0, 255]));
        let mut fonts = FontCatalog::new();

        let out = render_selection(&scene, &[ObjectId(1)], &[], &mut fonts).unwrap();
        assert_eq!((out.width(), out.height()), (2, 2));
        assert_eq!(out.get_pixel(1, 1).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_strokes_are_stamped_over_the_image() {
        let mut scene = Scene::new();
        let mut image = solid_image(1, 0.0, 0.0, 16, [0, 0, 0, 255]);
        image.strokes.push(Stroke {
            points: vec![Point::new(2.0, 8.0), Point::new(13.0, 8.0)],
            color: Color::opaque(255, 255, 255),
            width: 3.0,
        });
        scene.add_image(image);
        let mut fonts = FontCatalog::new();

        let out = render_selection(&scene, &[ObjectId(1)], &[], &mut fonts).unwrap();
        assert_eq!(out.get_pixel(8, 8).0, [255, 255, 255, 255]);
        // Well off the stroke the base image shows through.
        assert_eq!(out.get_pixel(8, 2).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_rotate_blit_quarter_turn_moves_corner_pixel() {
        let mut src = RgbaImage::new(4, 2);
        src.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        let mut dst = RgbaImage::new(8, 8);
        rotate_blit(&mut dst, &src, Point::new(4.0, 4.0), std::f32::consts::FRAC_PI_2);

        // The source top-left (centered placement (2.5, 3.5)) lands at
        // (4.5, 2.5) after a quarter turn about (4, 4).
        assert_eq!(dst.get_pixel(4, 2).0, [255, 0, 0, 255]);
        assert_eq!(dst.get_pixel(2, 3).0[3], 0);
    }

    #[test]
    fn test_rotate_blit_zero_angle_is_plain_copy() {
        let mut src = RgbaImage::new(2, 2);
        src.put_pixel(0, 0, image::Rgba([1, 2, 3, 255]));
        src.put_pixel(1, 1, image::Rgba([4, 5, 6, 255]));
        let mut dst = RgbaImage::new(4, 4);
        rotate_blit(&mut dst, &src, Point::new(2.0, 2.0), 0.0);

        assert_eq!(dst.get_pixel(1, 1).0, [1, 2, 3, 255]);
        assert_eq!(dst.get_pixel(2, 2).0, [4, 5, 6, 255]);
    }

    #[test]
    fn test_rotated_text_export_spans_vertically() {
        let mut fonts = FontCatalog::new();
        // Skip quietly on systems with no fonts at all.
        if fonts.font("Arial").is_none() {
            return;
        }

        let style = TextStyle {
            font_size: 32.0,
            ..TextStyle::default()
        };
        let flat = FloatingText {
            id: ObjectId(1),
            position: Point::new(0.0, 0.0),
            width: 120.0,
            height: 38.4,
            rotation: 0.0,
            text: "HELLO".to_string(),
            style: style.clone(),
            lines: vec!["HELLO".to_string()],
        };
        let mut rotated = flat.clone();
        rotated.rotation = std::f32::consts::FRAC_PI_2;

        let mut scene = Scene::new();
        scene.add_text(flat);
        let flat_out = render_selection(&scene, &[], &[ObjectId(1)], &mut fonts).unwrap();

        let mut scene = Scene::new();
        scene.add_text(rotated);
        let rot_out = render_selection(&scene, &[], &[ObjectId(1)], &mut fonts).unwrap();

        // Rotated a quarter turn about its center, the ink runs vertically:
        // its horizontal extent shrinks to roughly the line height.
        assert!(ink_width(&rot_out) < ink_width(&flat_out));

        fn ink_width(img: &RgbaImage) -> u32 {
            let mut min_x = u32::MAX;
            let mut max_x = 0;
            for (x, _, p) in img.enumerate_pixels() {
                if p.0[3] > 0 {
                    min_x = min_x.min(x);
                    max_x = max_x.max(x);
                }
            }
            max_x.saturating_sub(min_x)
        }
    }

    #[test]
    fn test_caption_export_without_fonts_changes_nothing() {
        // Captions draw nothing when the font cannot be resolved; the
        // base image is still exported.
        let mut scene = Scene::new();
        let mut image = solid_image(1, 0.0, 0.0, 4, [7, 7, 7, 255]);
        image.annotations.push(TextAnnotation {
            id: ObjectId(2),
            text: "hi".to_string(),
            position: Point::new(1.0, 1.0),
            style: TextStyle {
                font_family: "no-such-family-anywhere".to_string(),
                ..TextStyle::default()
            },
        });
        scene.add_image(image);

        let mut fonts = FontCatalog::new();
        if fonts.font("no-such-family-anywhere").is_some() {
            // A sans-serif fallback exists on this system; nothing to assert.
            return;
        }
        let out = render_selection(&scene, &[ObjectId(1)], &[], &mut fonts).unwrap();
        assert_eq!(out.get_pixel(2, 2).0, [7, 7, 7, 255]);
    }
}
