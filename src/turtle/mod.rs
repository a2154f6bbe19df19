//! Turtle: one drawing agent.
//!
//! A turtle owns its pose, pen and fill state and turns motion commands into
//! canvas primitives right away. With a non-zero speed, moves are split into
//! sub-steps; between sub-steps the turtle publishes the back surface and
//! sleeps so the display can show the motion.
//!
//! Callers must pass finite distances, angles and coordinates. Nothing is
//! validated except the speed, which is clamped to `0..=255`, and the
//! heading, which is always normalized to `[0, 360)`.

pub mod cursor;

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::color::Rgb;
use crate::session::stage::Stage;
use crate::sync::lock;
use crate::types::{Align, Font, Point};

pub use cursor::{CursorState, Shape};

pub const DEFAULT_SPEED: u8 = 50;

/// Normalize an angle in degrees to `[0, 360)`.
pub fn normalize_heading(angle: f64) -> f64 {
    let a = angle % 360.0;
    let a = if a < 0.0 { a + 360.0 } else { a };
    // A tiny negative remainder rounds up to exactly 360 when shifted.
    if a >= 360.0 { 0.0 } else { a }
}

/// Number of sub-steps used to cover `distance` at `speed`.
///
/// Speed is inverted: 0 jumps in one step, 1 takes the longest strides and
/// 255 the shortest, so a larger value means a slower, finer animation.
pub fn sub_steps(speed: u8, distance: f64) -> usize {
    if speed == 0 {
        return 1;
    }
    let stride = 1.0 + (256.0 - speed as f64) / 10.0;
    ((distance.abs() / stride).floor() as usize).max(1)
}

/// Pause between sub-steps at `speed`.
pub fn step_delay(speed: u8) -> Duration {
    Duration::from_millis((speed as u64 / 3).max(1))
}

pub struct Turtle {
    stage: Arc<Stage>,
    cursor: Arc<Mutex<CursorState>>,
    position: Point,
    heading: f64,
    pen_down: bool,
    pen_color: Rgb,
    fill_color: Rgb,
    pen_width: f64,
    visible: bool,
    shape: Shape,
    scale: f64,
    speed: u8,
    /// Screen-space vertices collected since `begin_fill`; `Some` while
    /// filling.
    fill_path: Option<Vec<Point>>,
}

impl Turtle {
    pub(crate) fn new(stage: Arc<Stage>) -> Self {
        let cursor = stage.register(CursorState::default());
        Turtle {
            stage,
            cursor,
            position: Point::ORIGIN,
            heading: 0.0,
            pen_down: true,
            pen_color: Rgb::BLACK,
            fill_color: Rgb::BLACK,
            pen_width: 1.0,
            visible: true,
            shape: Shape::Arrow,
            scale: 1.0,
            speed: DEFAULT_SPEED,
            fill_path: None,
        }
    }

    // -----------------------------------------------------------------------
    // Motion
    // -----------------------------------------------------------------------

    /// Move along the current heading. Negative distances move backward.
    pub fn forward(&mut self, distance: f64) {
        let (sin, cos) = self.heading.to_radians().sin_cos();
        let target = Point::new(
            self.position.x + distance * cos,
            self.position.y + distance * sin,
        );
        self.travel(target);
    }

    pub fn backward(&mut self, distance: f64) {
        self.forward(-distance);
    }

    /// Move to an absolute turtle-space position.
    pub fn teleport(&mut self, x: f64, y: f64) {
        self.travel(Point::new(x, y));
    }

    pub fn set_x(&mut self, x: f64) {
        self.teleport(x, self.position.y);
    }

    pub fn set_y(&mut self, y: f64) {
        self.teleport(self.position.x, y);
    }

    /// Return to the origin, then face +X.
    pub fn home(&mut self) {
        self.teleport(0.0, 0.0);
        self.set_heading(0.0);
    }

    /// Turn counter-clockwise by `angle` degrees.
    pub fn rotate(&mut self, angle: f64) {
        self.set_heading(self.heading + angle);
    }

    pub fn left(&mut self, angle: f64) {
        self.rotate(angle);
    }

    pub fn right(&mut self, angle: f64) {
        self.rotate(-angle);
    }

    pub fn set_heading(&mut self, angle: f64) {
        self.heading = normalize_heading(angle);
        self.publish();
    }

    /// Face the turtle-space point `(x, y)`.
    pub fn towards(&mut self, x: f64, y: f64) {
        let dy = y - self.position.y;
        let dx = x - self.position.x;
        self.set_heading(dy.atan2(dx).to_degrees());
    }

    /// Full circle of the given radius, approximated by 36 chords.
    pub fn circle(&mut self, radius: f64) {
        self.arc(radius, 360.0);
    }

    /// Arc spanning `extent` degrees, one chord per ten degrees.
    pub fn arc(&mut self, radius: f64, extent: f64) {
        let steps = ((extent.abs() / 10.0).round() as usize).max(1);
        self.arc_steps(radius, extent, steps);
    }

    /// Arc spanning `extent` degrees drawn as `steps` chords. The arc bends
    /// left for a positive radius and right for a negative one.
    pub fn arc_steps(&mut self, radius: f64, extent: f64, steps: usize) {
        let steps = steps.max(1);
        let mut turn = extent / steps as f64;
        let chord = 2.0 * radius.abs() * (turn.abs() / 2.0).to_radians().sin();
        if radius < 0.0 {
            turn = -turn;
        }
        for _ in 0..steps {
            self.forward(chord);
            self.rotate(turn);
        }
    }

    fn travel(&mut self, target: Point) {
        if target == self.position {
            return;
        }
        if self.speed == 0 {
            self.step_to(target);
            return;
        }
        let start = self.position;
        let steps = sub_steps(self.speed, start.distance(target));
        for i in 1..=steps {
            let next = if i == steps {
                target
            } else {
                start.lerp(target, i as f64 / steps as f64)
            };
            self.step_to(next);
            self.pause();
        }
    }

    fn step_to(&mut self, next: Point) {
        let canvas = self.stage.canvas();
        let to = canvas.map_to_screen(next);
        if self.pen_down {
            let from = canvas.map_to_screen(self.position);
            canvas.draw_segment(from, to, self.pen_color, self.pen_width);
        }
        if let Some(path) = self.fill_path.as_mut() {
            path.push(to);
        }
        self.position = next;
        self.publish();
    }

    /// Let the display catch up with an animated move. Skipped while the
    /// session is not running, so drawing before `run` or after the window
    /// closes completes at once.
    fn pause(&self) {
        if self.stage.is_running() {
            self.stage.refresh();
            thread::sleep(step_delay(self.speed));
        }
    }

    // -----------------------------------------------------------------------
    // Pen & fill
    // -----------------------------------------------------------------------

    pub fn pen_up(&mut self) {
        self.pen_down = false;
    }

    pub fn pen_down(&mut self) {
        self.pen_down = true;
    }

    pub fn set_pen_color(&mut self, color: impl Into<Rgb>) {
        self.pen_color = color.into();
    }

    pub fn set_fill_color(&mut self, color: impl Into<Rgb>) {
        self.fill_color = color.into();
        self.publish();
    }

    /// Use one color for both the pen and fills.
    pub fn set_color(&mut self, color: impl Into<Rgb>) {
        let color = color.into();
        self.set_pen_color(color);
        self.set_fill_color(color);
    }

    pub fn set_pen_size(&mut self, width: f64) {
        self.pen_width = width;
    }

    /// Start collecting a fill outline at the current position. Calling it
    /// again while filling restarts the outline.
    pub fn begin_fill(&mut self) {
        let start = self.stage.canvas().map_to_screen(self.position);
        self.fill_path = Some(vec![start]);
    }

    /// Close and fill the outline collected since `begin_fill`, stroking it
    /// too when the pen is down. Does nothing when not filling.
    pub fn end_fill(&mut self) {
        let Some(mut path) = self.fill_path.take() else {
            return;
        };
        path.push(path[0]);
        let canvas = self.stage.canvas();
        canvas.fill_path(&path, self.fill_color);
        if self.pen_down {
            canvas.stroke_path(&path, self.pen_color, self.pen_width);
        }
    }

    // -----------------------------------------------------------------------
    // Marks
    // -----------------------------------------------------------------------

    /// Filled disk in the pen color, regardless of pen state.
    pub fn dot(&mut self, diameter: f64) {
        self.dot_colored(diameter, self.pen_color);
    }

    pub fn dot_colored(&mut self, diameter: f64, color: impl Into<Rgb>) {
        let canvas = self.stage.canvas();
        canvas.draw_disk(canvas.map_to_screen(self.position), diameter, color.into());
    }

    /// Write left-aligned text in the default font.
    pub fn write(&mut self, text: &str) {
        self.write_with(text, Align::Left, Font::default());
    }

    /// Write text in the pen color with its baseline at the turtle.
    pub fn write_with(&mut self, text: &str, align: Align, font: Font) {
        let canvas = self.stage.canvas();
        let mut anchor = canvas.map_to_screen(self.position);
        anchor.x += align.offset(canvas.text_width(text, font));
        canvas.draw_text(anchor, text, self.pen_color, font);
    }

    /// Clear the back surface. Pose and pen are untouched.
    pub fn clear(&mut self) {
        self.stage.canvas().clear();
    }

    // -----------------------------------------------------------------------
    // Appearance
    // -----------------------------------------------------------------------

    pub fn show(&mut self) {
        self.visible = true;
        self.publish();
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.publish();
    }

    pub fn set_shape(&mut self, shape: impl Into<Shape>) {
        self.shape = shape.into();
        self.publish();
    }

    /// Cursor scale factor; 1.0 is the natural size.
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
        self.publish();
    }

    /// Clamp to `0..=255`. See [`sub_steps`] for what the value means.
    pub fn set_speed(&mut self, speed: i32) {
        self.speed = speed.clamp(0, 255) as u8;
    }

    /// Restore every default. Pixels already drawn stay on the canvas.
    pub fn reset(&mut self) {
        self.position = Point::ORIGIN;
        self.heading = 0.0;
        self.pen_down = true;
        self.pen_color = Rgb::BLACK;
        self.fill_color = Rgb::BLACK;
        self.pen_width = 1.0;
        self.visible = true;
        self.shape = Shape::Arrow;
        self.scale = 1.0;
        self.speed = DEFAULT_SPEED;
        self.fill_path = None;
        self.publish();
    }

    fn publish(&self) {
        *lock(&self.cursor) = CursorState {
            position: self.position,
            heading: self.heading,
            shape: self.shape,
            scale: self.scale,
            fill: self.fill_color,
            visible: self.visible,
        };
        self.stage.request_repaint();
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn x(&self) -> f64 {
        self.position.x
    }

    pub fn y(&self) -> f64 {
        self.position.y
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        self.position.distance(Point::new(x, y))
    }

    pub fn is_down(&self) -> bool {
        self.pen_down
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_filling(&self) -> bool {
        self.fill_path.is_some()
    }

    pub fn speed(&self) -> u8 {
        self.speed
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn pen_color(&self) -> Rgb {
        self.pen_color
    }

    pub fn fill_color(&self) -> Rgb {
        self.fill_color
    }

    pub fn pen_size(&self) -> f64 {
        self.pen_width
    }

    /// The snapshot the display currently sees for this turtle.
    pub fn cursor(&self) -> CursorState {
        *lock(&self.cursor)
    }
}
