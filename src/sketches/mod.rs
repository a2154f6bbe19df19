//! Demo sketches shipped with the launcher.

pub mod doodle;
pub mod polygons;
pub mod rings;
pub mod spiral;
pub mod tree;

use turtle_canvas::Rgb;

/// Color from unit-interval channels, rounded the usual way.
pub fn unit_rgb(r: f64, g: f64, b: f64) -> Rgb {
    let c = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Rgb::new(c(r), c(g), c(b))
}
