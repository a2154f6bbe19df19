//! Canvas: the double-buffered drawing surface.
//!
//! Turtles draw into the back surface. `swap` publishes the back surface to
//! the front surface, which is the only one the display ever reads. Both the
//! copy and the display read hold the front lock for their whole duration,
//! so a repaint never observes a half-copied frame.

pub mod font;
pub mod raster;
mod surface;

pub use surface::{Rgba, Surface};

use std::sync::Mutex;

use tracing::debug;

use crate::color::Rgb;
use crate::error::Result;
use crate::sync::lock;
use crate::types::{Font, Point};

pub struct Canvas {
    width: u32,
    height: u32,
    back: Mutex<Surface>,
    front: Mutex<Surface>,
    background: Mutex<Rgb>,
}

impl Canvas {
    /// Allocate both surfaces, cleared to white.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let background = Rgb::WHITE;
        let back = Surface::new(width, height, background)?;
        let front = Surface::new(width, height, background)?;
        debug!(width, height, "canvas allocated");
        Ok(Canvas {
            width,
            height,
            back: Mutex::new(back),
            front: Mutex::new(front),
            background: Mutex::new(background),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    // -----------------------------------------------------------------------
    // Coordinate mapping
    // -----------------------------------------------------------------------

    /// Turtle-space to screen-space.
    pub fn map_to_screen(&self, p: Point) -> Point {
        Point::new(
            self.width as f64 / 2.0 + p.x,
            self.height as f64 / 2.0 - p.y,
        )
    }

    /// Screen-space to turtle-space.
    pub fn map_to_turtle(&self, p: Point) -> Point {
        Point::new(
            p.x - self.width as f64 / 2.0,
            self.height as f64 / 2.0 - p.y,
        )
    }

    // -----------------------------------------------------------------------
    // Primitives (screen-space, back surface)
    // -----------------------------------------------------------------------

    pub fn draw_segment(&self, from: Point, to: Point, color: Rgb, width: f64) {
        raster::stroke_segment(&mut lock(&self.back), from, to, color, width);
    }

    /// Fill a closed polygon.
    pub fn fill_path(&self, points: &[Point], color: Rgb) {
        raster::fill_polygon(&mut lock(&self.back), points, color);
    }

    /// Stroke the outline of a closed polygon.
    pub fn stroke_path(&self, points: &[Point], color: Rgb, width: f64) {
        raster::stroke_polyline(&mut lock(&self.back), points, color, width, true);
    }

    pub fn draw_disk(&self, center: Point, diameter: f64, color: Rgb) {
        raster::fill_disk(&mut lock(&self.back), center, diameter, color);
    }

    /// Draw `text` with its left end on the baseline at `anchor`.
    pub fn draw_text(&self, anchor: Point, text: &str, color: Rgb, font: Font) {
        let cell = font.cell();
        let mut back = lock(&self.back);
        font::for_each_cell(text, |column, row| {
            let x = anchor.x + column as f64 * cell;
            let y = anchor.y - (font::GLYPH_ROWS - row) as f64 * cell;
            let quad = [
                Point::new(x, y),
                Point::new(x + cell, y),
                Point::new(x + cell, y + cell),
                Point::new(x, y + cell),
            ];
            raster::fill_polygon(&mut back, &quad, color);
        });
    }

    /// Rendered width of `text` in pixels.
    pub fn text_width(&self, text: &str, font: Font) -> f64 {
        font::text_columns(text) as f64 * font.cell()
    }

    // -----------------------------------------------------------------------
    // Buffer lifecycle
    // -----------------------------------------------------------------------

    pub fn background(&self) -> Rgb {
        *lock(&self.background)
    }

    /// Change the background and clear both surfaces to it.
    pub fn set_background(&self, color: Rgb) {
        *lock(&self.background) = color;
        lock(&self.back).fill(color);
        lock(&self.front).fill(color);
    }

    /// Clear the back surface to the background. The front surface keeps
    /// showing the last committed frame.
    pub fn clear(&self) {
        let background = self.background();
        lock(&self.back).fill(background);
    }

    /// Publish the back surface to the front surface.
    pub fn swap(&self) {
        let back = lock(&self.back);
        let mut front = lock(&self.front);
        front.copy_from(&back);
    }

    /// Run `read` against the front surface while holding the swap lock.
    pub fn read_front<R>(&self, read: impl FnOnce(&Surface) -> R) -> R {
        read(&lock(&self.front))
    }

    /// Run `read` against the in-progress back surface.
    pub fn read_back<R>(&self, read: impl FnOnce(&Surface) -> R) -> R {
        read(&lock(&self.back))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    use super::*;

    #[test]
    fn mapping_centers_origin_and_flips_y() {
        let canvas = Canvas::new(800, 600).unwrap();
        assert_eq!(canvas.map_to_screen(Point::ORIGIN), Point::new(400.0, 300.0));
        assert_eq!(canvas.map_to_screen(Point::new(10.0, 20.0)), Point::new(410.0, 280.0));
        let p = Point::new(-37.5, 12.25);
        assert_eq!(canvas.map_to_turtle(canvas.map_to_screen(p)), p);
    }

    #[test]
    fn clear_leaves_front_alone() {
        let canvas = Canvas::new(10, 10).unwrap();
        canvas.draw_disk(Point::new(5.0, 5.0), 8.0, Rgb::BLACK);
        canvas.swap();
        canvas.clear();
        assert_eq!(canvas.read_back(|s| s.rgb(5, 5)), Some(Rgb::WHITE));
        assert_eq!(canvas.read_front(|s| s.rgb(5, 5)), Some(Rgb::BLACK));
    }

    #[test]
    fn set_background_clears_both_surfaces() {
        let canvas = Canvas::new(4, 4).unwrap();
        canvas.draw_disk(Point::new(2.0, 2.0), 4.0, Rgb::BLACK);
        canvas.swap();
        let navy = Rgb::new(50, 50, 100);
        canvas.set_background(navy);
        assert_eq!(canvas.read_front(|s| s.rgb(2, 2)), Some(navy));
        assert_eq!(canvas.read_back(|s| s.rgb(2, 2)), Some(navy));
    }

    #[test]
    fn text_width_scales_with_font() {
        let canvas = Canvas::new(10, 10).unwrap();
        let small = canvas.text_width("AB", Font::new(12.0));
        let large = canvas.text_width("AB", Font::new(24.0));
        assert_eq!(small, 11.0 * 2.0);
        assert_eq!(large, 2.0 * small);
    }

    #[test]
    fn swap_is_never_observed_half_done() {
        let canvas = Arc::new(Canvas::new(256, 256).unwrap());
        let done = Arc::new(AtomicBool::new(false));

        let readers: Vec<_> = (0..3)
            .map(|_| {
                let canvas = Arc::clone(&canvas);
                let done = Arc::clone(&done);
                thread::spawn(move || {
                    while !done.load(Ordering::Relaxed) {
                        let uniform = canvas.read_front(|s| {
                            let first = s.pixels()[0];
                            s.pixels().iter().all(|p| *p == first)
                        });
                        assert!(uniform, "observed a partially copied frame");
                        thread::yield_now();
                    }
                })
            })
            .collect();

        let full = [
            Point::new(0.0, 0.0),
            Point::new(256.0, 0.0),
            Point::new(256.0, 256.0),
            Point::new(0.0, 256.0),
        ];
        let palette = [Rgb::BLACK, Rgb::WHITE, Rgb::new(255, 0, 0)];
        for i in 0..300 {
            canvas.fill_path(&full, palette[i % palette.len()]);
            canvas.swap();
            if i % 7 == 0 {
                thread::sleep(std::time::Duration::from_micros(50));
            }
        }
        done.store(true, Ordering::Relaxed);
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
