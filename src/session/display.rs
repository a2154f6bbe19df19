//! The display thread: polls the window for input and repaints it from the
//! front surface plus the published cursor snapshots.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::Context;
use tracing::{debug, info, warn};

use crate::canvas::Surface;
use crate::error::{Error, Result};
use crate::types::Point;
use crate::window::{Window, WindowEvent};

use super::stage::Stage;

/// A running display thread. Dropping it stops the session and waits for
/// the thread, so the window is released even when a sketch panics.
pub(crate) struct Display {
    stage: Arc<Stage>,
    handle: Option<JoinHandle<anyhow::Result<()>>>,
}

impl Display {
    /// Open `window` on the calling thread, then hand it to a new display
    /// thread that repaints `repaint_rate` times per second.
    pub fn spawn<W: Window>(stage: Arc<Stage>, mut window: W, repaint_rate: u32) -> Result<Self> {
        let canvas = stage.canvas();
        if let Err(e) = window.open(canvas.width(), canvas.height(), &stage.title()) {
            let _ = window.close();
            return Err(Error::Window(e.context("failed to open window")));
        }

        let tick = Duration::from_secs(1) / repaint_rate.max(1);
        let shared = Arc::clone(&stage);
        let handle = thread::Builder::new()
            .name("turtle-display".into())
            .spawn(move || run(&shared, &mut window, tick))
            .context("failed to spawn display thread")?;
        debug!(?tick, "display thread started");

        Ok(Display {
            stage,
            handle: Some(handle),
        })
    }

    /// Stop the session and wait for the display thread to release the
    /// window.
    pub fn join(mut self) -> Result<()> {
        self.finish()
    }

    fn finish(&mut self) -> Result<()> {
        self.stage.set_running(false);
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        match handle.join() {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(Error::Window(e)),
            Err(_) => Err(Error::DisplayThread),
        }
    }
}

impl Drop for Display {
    fn drop(&mut self) {
        if let Err(e) = self.finish() {
            warn!("display thread ended with an error: {e}");
        }
    }
}

fn run<W: Window>(stage: &Stage, window: &mut W, tick: Duration) -> anyhow::Result<()> {
    let result = repaint_loop(stage, window, tick);
    if result.is_err() {
        stage.set_running(false);
    }
    // Always release the window, even if the loop failed.
    let closed = window.close();
    result.and(closed)
}

fn repaint_loop<W: Window>(stage: &Stage, window: &mut W, tick: Duration) -> anyhow::Result<()> {
    let canvas = stage.canvas();
    let mut frame = Surface::new(canvas.width(), canvas.height(), canvas.background())?;

    while stage.is_running() {
        if let Some(title) = stage.take_title() {
            window.set_title(&title)?;
        }

        for event in window.poll(tick)? {
            match event {
                WindowEvent::Key(name) => stage.input().key_pressed(&name),
                WindowEvent::Click { x, y } => {
                    let p = canvas.map_to_turtle(Point::new(x, y));
                    stage.input().mouse_clicked(p.x.round() as i32, p.y.round() as i32);
                }
                WindowEvent::Resized => stage.request_repaint(),
                WindowEvent::Close => {
                    info!("window closed");
                    stage.set_running(false);
                }
            }
        }

        if stage.take_repaint() {
            stage.compose(&mut frame);
            window.present(&frame)?;
        }
    }
    Ok(())
}
