//! Shared geometry and text primitives.
//!
//! Two coordinate systems meet at the canvas boundary:
//! - turtle-space: origin at the canvas center, +X right, +Y up
//! - screen-space: origin at the top-left pixel corner, +X right, +Y down
//!
//! `Point` is used for both; the name of the variable or parameter says
//! which space it lives in.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Linear interpolation; `t = 0` is `self`, `t = 1` is `other`.
    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

/// Horizontal anchoring of written text relative to the turtle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    /// Offset applied to the anchor x for a run of text `width` pixels wide.
    pub fn offset(self, width: f64) -> f64 {
        match self {
            Align::Left => 0.0,
            Align::Center => -width / 2.0,
            Align::Right => -width,
        }
    }
}

impl FromStr for Align {
    type Err = std::convert::Infallible;

    /// Unknown names anchor on the left.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "center" | "centre" => Align::Center,
            "right" => Align::Right,
            _ => Align::Left,
        })
    }
}

/// Font selection for `Turtle::write`.
///
/// Text is drawn with the built-in bitmap font; `size` is the nominal point
/// size and controls how many pixels each glyph cell covers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub size: f64,
}

impl Font {
    pub const fn new(size: f64) -> Self {
        Font { size }
    }

    /// Pixel edge length of one glyph cell.
    pub fn cell(&self) -> f64 {
        (self.size / 6.0).max(1.0)
    }
}

impl Default for Font {
    fn default() -> Self {
        Font { size: 12.0 }
    }
}
