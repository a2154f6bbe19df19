//! Window backends.
//!
//! A window owns the output device. The display thread opens it, feeds it
//! composed frames and drains its events; nothing else touches it.

use std::time::Duration;

use anyhow::Result;

use crate::canvas::Surface;

mod headless;
pub(crate) mod menubar;
mod terminal;

pub use headless::{HeadlessHandle, HeadlessWindow};
pub use terminal::TerminalWindow;

/// An input event, already translated out of the backend's vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowEvent {
    /// A key press, named in lowercase (`"a"`, `"space"`, `"up"`, `"f5"`).
    Key(String),
    /// A mouse click in canvas pixel coordinates (origin top-left, Y down).
    Click { x: f64, y: f64 },
    /// The output area changed size; everything must be redrawn.
    Resized,
    /// The user asked to close the window.
    Close,
}

pub trait Window: Send + 'static {
    /// Prepare the device for a `width` x `height` canvas.
    fn open(&mut self, width: u32, height: u32, title: &str) -> Result<()>;

    fn set_title(&mut self, title: &str) -> Result<()>;

    /// Wait up to `timeout` for input and return what arrived.
    fn poll(&mut self, timeout: Duration) -> Result<Vec<WindowEvent>>;

    /// Show `frame`, a full composed canvas.
    fn present(&mut self, frame: &Surface) -> Result<()>;

    /// Release the device. Called once, even after errors.
    fn close(&mut self) -> Result<()>;
}
