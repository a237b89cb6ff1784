//! Round-capped line segment rasterization.
//!
//! A segment of radius `r` covers every point within distance `r` of the line between
//! its endpoints, which yields round caps; consecutive segments sharing an endpoint
//! therefore also meet with round joins. Coverage is anti-aliased over one pixel.

use crate::foundation::core::{Point, Rect, Size};
use crate::foundation::math::unit_to_u8;

/// Shortest distance from `p` to the segment `a`–`b`. Degenerate segments are points.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len2 = ab.hypot2();
    if len2 <= f64::EPSILON {
        return (p - a).hypot();
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    (p - (a + ab * t)).hypot()
}

/// Pixel-aligned bounds touched by a segment, clipped to the raster.
pub fn segment_bounds(size: Size, from: Point, to: Point, radius: f64) -> Rect {
    let reach = radius + 0.5;
    Rect::from_points(from, to)
        .inflate(reach, reach)
        .expand()
        .intersect(size.bounds())
}

/// Visit every pixel the segment touches with its 0..=255 coverage.
///
/// Pixel `(x, y)` is sampled at its centre `(x + 0.5, y + 0.5)`; pixels with zero
/// coverage are skipped.
pub fn for_each_covered_pixel(
    size: Size,
    from: Point,
    to: Point,
    radius: f64,
    mut visit: impl FnMut(u32, u32, u16),
) {
    if !(radius.is_finite() && from.is_finite() && to.is_finite()) {
        return;
    }
    let bounds = segment_bounds(size, from, to, radius);
    if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
        return;
    }

    let reach = radius + 0.5;
    let (x0, y0) = (bounds.x0 as u32, bounds.y0 as u32);
    let (x1, y1) = (bounds.x1 as u32, bounds.y1 as u32);
    for y in y0..y1 {
        for x in x0..x1 {
            let centre = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            let d = distance_to_segment(centre, from, to);
            let coverage = unit_to_u8((reach - d) as f32);
            if coverage > 0 {
                visit(x, y, coverage);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stroke/segment.rs"]
mod tests;
