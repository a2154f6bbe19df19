//! Cursor shapes and the per-turtle snapshot the display thread reads.
//!
//! Shape outlines are described in a local frame where +X points along the
//! heading, in screen units before scaling. The display rotates them by the
//! heading, scales them, fills them with the turtle's fill color and outlines
//! them in black.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::canvas::{Surface, raster};
use crate::color::Rgb;
use crate::types::Point;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    #[default]
    Arrow,
    Classic,
    Turtle,
    Circle,
    Square,
    Blank,
}

impl Shape {
    pub fn name(self) -> &'static str {
        match self {
            Shape::Arrow => "arrow",
            Shape::Classic => "classic",
            Shape::Turtle => "turtle",
            Shape::Circle => "circle",
            Shape::Square => "square",
            Shape::Blank => "blank",
        }
    }
}

impl FromStr for Shape {
    type Err = std::convert::Infallible;

    /// Unknown names fall back to the arrow.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "classic" => Shape::Classic,
            "turtle" => Shape::Turtle,
            "circle" => Shape::Circle,
            "square" => Shape::Square,
            "blank" => Shape::Blank,
            _ => Shape::Arrow,
        })
    }
}

impl From<&str> for Shape {
    fn from(name: &str) -> Self {
        let Ok(shape) = name.parse::<Shape>();
        shape
    }
}

/// Everything the display needs to draw one turtle's cursor, published as
/// a whole after every turtle mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorState {
    /// Turtle-space position.
    pub position: Point,
    pub heading: f64,
    pub shape: Shape,
    pub scale: f64,
    pub fill: Rgb,
    pub visible: bool,
}

impl Default for CursorState {
    fn default() -> Self {
        CursorState {
            position: Point::ORIGIN,
            heading: 0.0,
            shape: Shape::Arrow,
            scale: 1.0,
            fill: Rgb::BLACK,
            visible: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Outlines
// ---------------------------------------------------------------------------

struct Part {
    outline: Vec<Point>,
    stroked: bool,
}

impl Part {
    fn filled(outline: Vec<Point>) -> Self {
        Part { outline, stroked: false }
    }

    fn outlined(outline: Vec<Point>) -> Self {
        Part { outline, stroked: true }
    }
}

fn parts(shape: Shape, scale: f64) -> Vec<Part> {
    match shape {
        Shape::Arrow => arrow(10.0 * scale),
        Shape::Classic => classic(6.0 * scale),
        Shape::Turtle => turtle(10.0 * scale),
        Shape::Circle => circle(8.0 * scale),
        Shape::Square => square(8.0 * scale),
        Shape::Blank => Vec::new(),
    }
}

fn arrow(s: f64) -> Vec<Part> {
    vec![Part::outlined(vec![
        Point::new(s, 0.0),
        Point::new(-s * 0.7, -s * 0.5),
        Point::new(-s * 0.4, 0.0),
        Point::new(-s * 0.7, s * 0.5),
    ])]
}

fn classic(s: f64) -> Vec<Part> {
    vec![Part::outlined(vec![
        Point::new(s, 0.0),
        Point::new(-s, -s * 0.5),
        Point::new(-s * 0.5, 0.0),
        Point::new(-s, s * 0.5),
    ])]
}

fn turtle(s: f64) -> Vec<Part> {
    let leg = s * 0.125;
    let mut parts: Vec<Part> = [(-0.275, -0.425), (0.275, -0.425), (-0.275, 0.425), (0.275, 0.425)]
        .into_iter()
        .map(|(x, y)| Part::filled(raster::ellipse(Point::new(s * x, s * y), leg, leg)))
        .collect();
    parts.push(Part::filled(raster::ellipse(Point::new(s * 0.6, 0.0), s * 0.2, s * 0.15)));
    parts.push(Part::outlined(raster::ellipse(Point::ORIGIN, s * 0.6, s * 0.4)));
    parts
}

fn circle(s: f64) -> Vec<Part> {
    vec![Part::outlined(raster::ellipse(Point::ORIGIN, s, s))]
}

fn square(s: f64) -> Vec<Part> {
    vec![Part::outlined(vec![
        Point::new(-s, -s),
        Point::new(s, -s),
        Point::new(s, s),
        Point::new(-s, s),
    ])]
}

/// Draw `cursor` onto `target` with its local origin at the screen-space
/// point `at`.
pub fn draw(target: &mut Surface, at: Point, cursor: &CursorState) {
    let (sin, cos) = cursor.heading.to_radians().sin_cos();
    // Screen Y points down, so a counter-clockwise heading rotates the
    // local frame by -heading.
    let place = |p: &Point| Point::new(at.x + p.x * cos + p.y * sin, at.y - p.x * sin + p.y * cos);

    for part in parts(cursor.shape, cursor.scale) {
        let outline: Vec<Point> = part.outline.iter().map(place).collect();
        raster::fill_polygon(target, &outline, cursor.fill);
        if part.stroked {
            raster::stroke_polyline(target, &outline, Rgb::BLACK, 1.0, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_shape_names_become_arrows() {
        assert_eq!(Shape::from("Turtle"), Shape::Turtle);
        assert_eq!(Shape::from("hexagon"), Shape::Arrow);
        for shape in [Shape::Classic, Shape::Circle, Shape::Square, Shape::Blank] {
            assert_eq!(Shape::from(shape.name()), shape);
        }
    }

    #[test]
    fn arrow_points_along_heading() {
        let mut up = Surface::new(40, 40, Rgb::WHITE).unwrap();
        let cursor = CursorState {
            heading: 90.0,
            fill: Rgb::new(255, 0, 0),
            ..CursorState::default()
        };
        draw(&mut up, Point::new(20.0, 20.0), &cursor);
        // Tip 10px above the origin, tail below it.
        assert_ne!(up.rgb(20, 12), Some(Rgb::WHITE));
        assert_eq!(up.rgb(20, 28), Some(Rgb::WHITE));
        assert_eq!(up.rgb(31, 20), Some(Rgb::WHITE));
    }

    #[test]
    fn blank_draws_nothing() {
        let mut s = Surface::new(20, 20, Rgb::WHITE).unwrap();
        let cursor = CursorState {
            shape: Shape::Blank,
            ..CursorState::default()
        };
        draw(&mut s, Point::new(10.0, 10.0), &cursor);
        assert!(s.pixels().iter().all(|p| *p == [255, 255, 255, 255]));
    }
}
