//! Session: the lifecycle of one drawing window.
//!
//! A session owns the canvas, the window and the set of turtles drawing on
//! it. `run` opens the window, calls the sketch's `setup` hook once and then
//! either holds the picture still or calls `draw` once per frame until the
//! window closes or the sketch calls `stop`.

pub mod config;
mod display;
mod input;
pub(crate) mod stage;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, trace, warn};

use crate::canvas::Canvas;
use crate::color::Rgb;
use crate::error::{Error, Result};
use crate::turtle::Turtle;
use crate::window::{TerminalWindow, Window};

pub use config::{KeyBindings, SessionConfig};

use display::Display;
use stage::Stage;

/// Poll interval while holding a static picture.
const HOLD_POLL: Duration = Duration::from_millis(100);

/// User code driven by a session. Both hooks default to doing nothing.
pub trait Sketch {
    /// Called once, after the window opens.
    fn setup(&mut self, _session: &Session) {}

    /// Called once per frame while looping is enabled.
    fn draw(&mut self, _session: &Session) {}
}

pub struct Session {
    stage: Arc<Stage>,
    config: SessionConfig,
    frame_rate: AtomicU32,
    looping: AtomicBool,
    /// Set once `setup` returns; the looping mode is fixed from then on.
    latched: AtomicBool,
    started: AtomicBool,
}

impl Session {
    /// Create a session with the user's config file applied.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::with_config(width, height, SessionConfig::load())
    }

    pub fn with_config(width: u32, height: u32, config: SessionConfig) -> Result<Self> {
        let canvas = Canvas::new(width, height)?;
        if config.background != Rgb::WHITE {
            canvas.set_background(config.background);
        }
        let stage = Stage::new(canvas, config.title.clone());
        let frame_rate = if config.frame_rate == 0 {
            warn!("frame_rate 0 in config, using 60");
            60
        } else {
            config.frame_rate
        };
        Ok(Session {
            stage: Arc::new(stage),
            frame_rate: AtomicU32::new(frame_rate),
            config,
            looping: AtomicBool::new(true),
            latched: AtomicBool::new(false),
            started: AtomicBool::new(false),
        })
    }

    /// Create a turtle at the origin, heading east, pen down. It is drawn
    /// after every turtle created before it.
    pub fn create_turtle(&self) -> Turtle {
        Turtle::new(Arc::clone(&self.stage))
    }

    /// Number of turtles created so far.
    pub fn turtle_count(&self) -> usize {
        self.stage.turtle_count()
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Run `sketch` in the terminal until the window closes or the sketch
    /// calls [`Session::stop`].
    pub fn run(&self, sketch: &mut impl Sketch) -> Result<()> {
        self.run_with(sketch, TerminalWindow::new(&self.config))
    }

    /// Run `sketch` on an arbitrary window backend.
    pub fn run_with(&self, sketch: &mut impl Sketch, window: impl Window) -> Result<()> {
        if self.started.swap(true, Ordering::AcqRel) {
            return Err(Error::AlreadyStarted);
        }
        info!(width = self.width(), height = self.height(), "session starting");

        self.stage.set_running(true);
        let display = match Display::spawn(Arc::clone(&self.stage), window, self.config.repaint_rate) {
            Ok(display) => display,
            Err(e) => {
                self.stage.set_running(false);
                return Err(e);
            }
        };

        sketch.setup(self);
        self.latched.store(true, Ordering::Release);

        if self.looping.load(Ordering::Acquire) {
            info!(fps = self.frame_rate.load(Ordering::Relaxed), "animated mode");
            self.animate(sketch);
        } else {
            info!("static mode");
            self.hold();
        }

        let result = display.join();
        info!("session stopped");
        result
    }

    fn hold(&self) {
        self.stage.refresh();
        while self.stage.is_running() {
            thread::sleep(HOLD_POLL);
        }
    }

    fn animate(&self, sketch: &mut impl Sketch) {
        let mut frame: u64 = 0;
        while self.stage.is_running() {
            let started = Instant::now();

            self.stage.canvas().clear();
            sketch.draw(self);
            self.stage.refresh();

            let budget = Duration::from_secs(1) / self.frame_rate.load(Ordering::Relaxed).max(1);
            let elapsed = started.elapsed();
            match budget.checked_sub(elapsed) {
                Some(rest) => thread::sleep(rest),
                None => trace!(frame, ?elapsed, ?budget, "frame overran its budget"),
            }
            frame += 1;
        }
    }

    /// Ask the session to end. The current frame or `setup` finishes first.
    pub fn stop(&self) {
        if self.stage.is_running() {
            info!("stop requested");
        }
        self.stage.set_running(false);
    }

    pub fn is_running(&self) -> bool {
        self.stage.is_running()
    }

    // -----------------------------------------------------------------------
    // Controls
    // -----------------------------------------------------------------------

    /// Fill both surfaces with `color`, erasing everything drawn so far.
    pub fn set_background(&self, color: impl Into<Rgb>) {
        self.stage.canvas().set_background(color.into());
        self.stage.request_repaint();
    }

    pub fn set_title(&self, title: &str) {
        self.stage.set_title(title);
    }

    /// Target frames per second of the animated loop. Zero is ignored.
    pub fn set_frame_rate(&self, fps: u32) {
        if fps == 0 {
            warn!("ignoring frame rate of 0");
            return;
        }
        self.frame_rate.store(fps, Ordering::Relaxed);
    }

    pub fn frame_rate(&self) -> u32 {
        self.frame_rate.load(Ordering::Relaxed)
    }

    pub fn enable_looping(&self) {
        self.set_looping(true);
    }

    /// Draw once in `setup` and hold the picture. Must be called before
    /// `setup` returns.
    pub fn disable_looping(&self) {
        self.set_looping(false);
    }

    fn set_looping(&self, looping: bool) {
        if self.latched.load(Ordering::Acquire) {
            warn!(looping, "looping mode is fixed once setup returns, ignoring");
            return;
        }
        self.looping.store(looping, Ordering::Release);
    }

    pub fn is_looping(&self) -> bool {
        self.looping.load(Ordering::Acquire)
    }

    /// Clear the back surface to the background color. The window keeps
    /// showing the last published frame until the next refresh.
    pub fn clear(&self) {
        self.stage.canvas().clear();
    }

    /// Publish the back surface and repaint.
    pub fn refresh(&self) {
        self.stage.refresh();
    }

    pub fn width(&self) -> u32 {
        self.stage.canvas().width()
    }

    pub fn height(&self) -> u32 {
        self.stage.canvas().height()
    }

    pub fn title(&self) -> String {
        self.stage.title()
    }

    pub fn canvas(&self) -> &Canvas {
        self.stage.canvas()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// The most recent key press, cleared by this call.
    pub fn last_key(&self) -> Option<String> {
        self.stage.input().take_key()
    }

    /// Whether the most recent key press is `name` (case-insensitive). Only
    /// a match clears it.
    pub fn check_key(&self, name: &str) -> bool {
        self.stage.input().check_key(name)
    }

    /// Whether a click arrived since the last call.
    pub fn is_mouse_clicked(&self) -> bool {
        self.stage.input().take_click()
    }

    /// X of the last click, centered on the canvas.
    pub fn mouse_x(&self) -> i32 {
        self.stage.input().mouse().0
    }

    /// Y of the last click, centered on the canvas, pointing up.
    pub fn mouse_y(&self) -> i32 {
        self.stage.input().mouse().1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_dimensions() {
        assert!(matches!(
            Session::with_config(0, 100, SessionConfig::default()),
            Err(Error::InvalidDimensions { width: 0, height: 100 })
        ));
    }

    #[test]
    fn zero_frame_rate_is_ignored() {
        let session = Session::with_config(10, 10, SessionConfig::default()).unwrap();
        session.set_frame_rate(24);
        session.set_frame_rate(0);
        assert_eq!(session.frame_rate(), 24);
    }

    #[test]
    fn config_background_reaches_both_surfaces() {
        let config = SessionConfig {
            background: Rgb::BLACK,
            ..SessionConfig::default()
        };
        let session = Session::with_config(4, 4, config).unwrap();
        assert_eq!(session.canvas().read_front(|s| s.rgb(2, 2)), Some(Rgb::BLACK));
        assert_eq!(session.canvas().read_back(|s| s.rgb(2, 2)), Some(Rgb::BLACK));
    }

    #[test]
    fn looping_can_only_change_before_setup_returns() {
        let session = Session::with_config(10, 10, SessionConfig::default()).unwrap();
        session.disable_looping();
        assert!(!session.is_looping());
        session.latched.store(true, Ordering::Release);
        session.enable_looping();
        assert!(!session.is_looping());
    }

    #[test]
    fn turtles_register_before_run() {
        let session = Session::with_config(10, 10, SessionConfig::default()).unwrap();
        assert!(!session.is_running());
        assert_eq!(session.turtle_count(), 0);
        let _first = session.create_turtle();
        let _second = session.create_turtle();
        assert_eq!(session.turtle_count(), 2);
    }
}
