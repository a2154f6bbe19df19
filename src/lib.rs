//! Turtle graphics in the terminal.
//!
//! A [`Session`] owns a double-buffered [`Canvas`] and a window. Sketches
//! create [`Turtle`]s from the session and steer them from the `setup` and
//! `draw` hooks of a [`Sketch`]; a display thread repaints the window and
//! collects keyboard and mouse input for the sketch to poll.
//!
//! ```no_run
//! use turtle_canvas::{Session, Sketch};
//!
//! struct Square;
//!
//! impl Sketch for Square {
//!     fn setup(&mut self, session: &Session) {
//!         session.disable_looping();
//!         let mut t = session.create_turtle();
//!         for _ in 0..4 {
//!             t.forward(100.0);
//!             t.left(90.0);
//!         }
//!     }
//! }
//!
//! fn main() -> turtle_canvas::Result<()> {
//!     Session::new(400, 400)?.run(&mut Square)
//! }
//! ```

pub mod canvas;
pub mod color;
pub mod error;
pub mod logging;
pub mod session;
mod sync;
pub mod turtle;
pub mod types;
pub mod window;

pub use canvas::Canvas;
pub use color::{NamedColor, Rgb};
pub use error::{Error, Result};
pub use session::{Session, SessionConfig, Sketch};
pub use turtle::{Shape, Turtle};
pub use types::{Align, Font, Point};
