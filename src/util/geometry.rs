// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! Pure helpers shared by hit-testing, the interaction state machine,
//! and the export compositor.

use crate::models::object::Point;

/// Rotate `p` around `center` by `angle` radians.
pub fn rotate_point(p: Point, center: Point, angle: f32) -> Point {
    let (sin, cos) = angle.sin_cos();
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    Point::new(center.x + dx * cos - dy * sin, center.y + dx * sin + dy * cos)
}

pub fn distance(a: Point, b: Point) -> f32 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// Distance from `p` to the segment between `a` and `b`.
pub fn point_segment_distance(p: Point, a: Point, b: Point) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq > 0.0 {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    distance(p, Point::new(a.x + t * dx, a.y + t * dy))
}

/// Whether the box at `(x, y)` with size `(w, h)` intersects the rectangle
/// spanned by corners `(x1, y1)` and `(x2, y2)`. Touching edges count as
/// intersecting.
pub fn box_intersects_rect(
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
) -> bool {
    !(x + w < x1 || x > x2 || y + h < y1 || y > y2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_quarter_turn() {
        let center = Point::new(1.0, 1.0);
        let p = rotate_point(Point::new(2.0, 1.0), center, std::f32::consts::FRAC_PI_2);
        assert!((p.x - 1.0).abs() < 1e-5);
        assert!((p.y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_rotate_zero_is_identity() {
        let p = Point::new(3.5, -2.0);
        let rotated = rotate_point(p, Point::new(10.0, 10.0), 0.0);
        assert_eq!(rotated, p);
    }

    #[test]
    fn test_point_segment_distance_interior() {
        let d = point_segment_distance(
            Point::new(5.0, 3.0),
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        );
        assert!((d - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_point_segment_distance_past_endpoint() {
        // Closest point is clamped to the segment end.
        let d = point_segment_distance(
            Point::new(14.0, 3.0),
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        );
        assert!((d - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_point_segment_distance_degenerate_segment() {
        let a = Point::new(2.0, 2.0);
        let d = point_segment_distance(Point::new(2.0, 6.0), a, a);
        assert!((d - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_box_intersects_rect() {
        // Overlapping.
        assert!(box_intersects_rect(0.0, 0.0, 10.0, 10.0, 5.0, 5.0, 20.0, 20.0));
        // Touching edge counts.
        assert!(box_intersects_rect(0.0, 0.0, 10.0, 10.0, 10.0, 0.0, 20.0, 10.0));
        // Disjoint.
        assert!(!box_intersects_rect(0.0, 0.0, 10.0, 10.0, 11.0, 11.0, 20.0, 20.0));
        // Containment is also intersection.
        assert!(box_intersects_rect(5.0, 5.0, 2.0, 2.0, 0.0, 0.0, 20.0, 20.0));
    }
}
