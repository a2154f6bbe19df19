//! Anti-aliased scan conversion onto a `Surface`.
//!
//! All coordinates are screen-space, with pixel `(x, y)` covering the unit
//! square `[x, x+1) × [y, y+1)`.
//!
//! Strokes use exact distance-to-segment coverage, which gives round caps
//! and round joins for free: consecutive segments of one path overlap on
//! their shared endpoint disk, so a path never shows gaps at its joints.
//! Fills use the non-zero winding rule with four sub-scanlines per pixel row
//! and exact horizontal span coverage.

use std::f64::consts::TAU;

use crate::color::Rgb;
use crate::types::Point;

use super::surface::Surface;

/// Sub-scanlines per pixel row for polygon fills.
const SUBSAMPLES: usize = 4;

/// Inclusive pixel bounds, clipped to the surface.
struct Bounds {
    x0: i64,
    y0: i64,
    x1: i64,
    y1: i64,
}

impl Bounds {
    fn around(surface: &Surface, min: Point, max: Point, pad: f64) -> Option<Self> {
        let x0 = ((min.x - pad).floor() as i64).max(0);
        let y0 = ((min.y - pad).floor() as i64).max(0);
        let x1 = ((max.x + pad).ceil() as i64).min(surface.width() as i64 - 1);
        let y1 = ((max.y + pad).ceil() as i64).min(surface.height() as i64 - 1);
        (x0 <= x1 && y0 <= y1).then_some(Bounds { x0, y0, x1, y1 })
    }
}

fn coverage(radius: f64, distance: f64) -> f32 {
    (radius + 0.5 - distance).clamp(0.0, 1.0) as f32
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}

/// Stroke a straight segment `width` pixels wide with round caps.
pub fn stroke_segment(surface: &mut Surface, a: Point, b: Point, color: Rgb, width: f64) {
    let radius = width.max(0.0) / 2.0;
    let min = Point::new(a.x.min(b.x), a.y.min(b.y));
    let max = Point::new(a.x.max(b.x), a.y.max(b.y));
    let Some(bounds) = Bounds::around(surface, min, max, radius + 1.0) else {
        return;
    };
    for y in bounds.y0..=bounds.y1 {
        for x in bounds.x0..=bounds.x1 {
            let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
            let cov = coverage(radius, distance_to_segment(center, a, b));
            surface.blend(x, y, color, cov);
        }
    }
}

/// Stroke a polyline; when `closed`, the last point connects to the first.
pub fn stroke_polyline(surface: &mut Surface, points: &[Point], color: Rgb, width: f64, closed: bool) {
    for pair in points.windows(2) {
        stroke_segment(surface, pair[0], pair[1], color, width);
    }
    if closed && points.len() > 2 {
        stroke_segment(surface, points[points.len() - 1], points[0], color, width);
    }
}

/// Fill a solid disk of the given diameter.
pub fn fill_disk(surface: &mut Surface, center: Point, diameter: f64, color: Rgb) {
    let radius = diameter.max(0.0) / 2.0;
    let Some(bounds) = Bounds::around(surface, center, center, radius + 1.0) else {
        return;
    };
    for y in bounds.y0..=bounds.y1 {
        for x in bounds.x0..=bounds.x1 {
            let d = Point::new(x as f64 + 0.5, y as f64 + 0.5).distance(center);
            surface.blend(x, y, color, coverage(radius, d));
        }
    }
}

/// Fill a polygon with the non-zero winding rule. The polygon is implicitly
/// closed.
pub fn fill_polygon(surface: &mut Surface, points: &[Point], color: Rgb) {
    if points.len() < 3 {
        return;
    }
    let mut min = points[0];
    let mut max = points[0];
    for p in points {
        min = Point::new(min.x.min(p.x), min.y.min(p.y));
        max = Point::new(max.x.max(p.x), max.y.max(p.y));
    }
    let Some(bounds) = Bounds::around(surface, min, max, 0.0) else {
        return;
    };

    let cols = (bounds.x1 - bounds.x0 + 1) as usize;
    let mut acc = vec![0.0f32; cols];
    let mut crossings: Vec<(f64, i32)> = Vec::new();
    let weight = 1.0 / SUBSAMPLES as f64;

    for y in bounds.y0..=bounds.y1 {
        acc.iter_mut().for_each(|c| *c = 0.0);

        for k in 0..SUBSAMPLES {
            let sy = y as f64 + (k as f64 + 0.5) * weight;
            crossings.clear();
            for (i, &p0) in points.iter().enumerate() {
                let p1 = points[(i + 1) % points.len()];
                if p0.y == p1.y {
                    continue;
                }
                // Orient every edge top-down so both windings compute
                // bit-identical crossings.
                let (top, bottom, dir) = if p0.y < p1.y { (p0, p1, 1) } else { (p1, p0, -1) };
                if sy >= top.y && sy < bottom.y {
                    let x = top.x + (sy - top.y) * (bottom.x - top.x) / (bottom.y - top.y);
                    crossings.push((x, dir));
                }
            }
            crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut winding = 0;
            for pair in crossings.windows(2) {
                winding += pair[0].1;
                if winding != 0 {
                    add_span(&mut acc, bounds.x0, pair[0].0, pair[1].0, weight);
                }
            }
        }

        for (i, &cov) in acc.iter().enumerate() {
            surface.blend(bounds.x0 + i as i64, y, color, cov);
        }
    }
}

/// Accumulate horizontal coverage of `[from, to)` into row cells starting at
/// pixel column `origin`.
fn add_span(acc: &mut [f32], origin: i64, from: f64, to: f64, weight: f64) {
    let lo = origin as f64;
    let hi = lo + acc.len() as f64;
    let from = from.clamp(lo, hi) - lo;
    let to = to.clamp(lo, hi) - lo;
    if to <= from {
        return;
    }
    let first = from.floor() as usize;
    let last = (to.ceil() as usize).saturating_sub(1).min(acc.len() - 1);
    if first == last {
        acc[first] += ((to - from) * weight) as f32;
        return;
    }
    acc[first] += ((first as f64 + 1.0 - from) * weight) as f32;
    for cell in &mut acc[first + 1..last] {
        *cell += weight as f32;
    }
    acc[last] += ((to - last as f64) * weight) as f32;
}

/// Polygon approximation of an axis-aligned ellipse.
pub fn ellipse(center: Point, rx: f64, ry: f64) -> Vec<Point> {
    let segments = ((rx.abs().max(ry.abs()) * 2.0).ceil() as usize).clamp(12, 96);
    (0..segments)
        .map(|i| {
            let t = TAU * i as f64 / segments as f64;
            Point::new(center.x + rx * t.cos(), center.y + ry * t.sin())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank() -> Surface {
        Surface::new(40, 40, Rgb::WHITE).unwrap()
    }

    fn painted(s: &Surface) -> usize {
        s.pixels().iter().filter(|p| p[..3] != [255, 255, 255]).count()
    }

    #[test]
    fn axis_aligned_square_fills_exactly() {
        let mut s = blank();
        let square = [
            Point::new(10.0, 10.0),
            Point::new(20.0, 10.0),
            Point::new(20.0, 20.0),
            Point::new(10.0, 20.0),
        ];
        fill_polygon(&mut s, &square, Rgb::BLACK);
        assert_eq!(painted(&s), 100);
        assert_eq!(s.rgb(10, 10), Some(Rgb::BLACK));
        assert_eq!(s.rgb(19, 19), Some(Rgb::BLACK));
        assert_eq!(s.rgb(20, 20), Some(Rgb::WHITE));
    }

    #[test]
    fn winding_direction_does_not_matter() {
        let mut cw = blank();
        let mut ccw = blank();
        let tri = [Point::new(5.0, 5.0), Point::new(30.0, 8.0), Point::new(12.0, 33.0)];
        let rev: Vec<Point> = tri.iter().rev().copied().collect();
        fill_polygon(&mut cw, &tri, Rgb::BLACK);
        fill_polygon(&mut ccw, &rev, Rgb::BLACK);
        assert_eq!(cw, ccw);
    }

    #[test]
    fn joined_segments_leave_no_gap() {
        let mut s = blank();
        let path = [Point::new(5.5, 20.5), Point::new(20.5, 20.5), Point::new(35.5, 20.5)];
        stroke_polyline(&mut s, &path, Rgb::BLACK, 1.0, false);
        for x in 5..=35 {
            assert_eq!(s.rgb(x, 20), Some(Rgb::BLACK), "gap at x={x}");
        }
    }

    #[test]
    fn disk_is_round() {
        let mut s = blank();
        fill_disk(&mut s, Point::new(20.0, 20.0), 10.0, Rgb::BLACK);
        assert_eq!(s.rgb(20, 20), Some(Rgb::BLACK));
        assert_eq!(s.rgb(14, 14), Some(Rgb::WHITE));
        assert_eq!(s.rgb(27, 20), Some(Rgb::WHITE));
    }
}
