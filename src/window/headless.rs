//! A window without a device, driven through a handle. Used by tests and
//! for rendering sketches off-screen.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::Result;

use crate::canvas::Surface;
use crate::sync::lock;

use super::{Window, WindowEvent};

#[derive(Default)]
struct Recorded {
    opened: Option<(u32, u32)>,
    title: String,
    presented: usize,
    last_frame: Option<Surface>,
    closed: bool,
}

pub struct HeadlessWindow {
    events: Receiver<WindowEvent>,
    recorded: Arc<Mutex<Recorded>>,
    /// Every handle is gone; polls only wait out their timeout.
    detached: bool,
}

/// The outside end of a [`HeadlessWindow`]: injects events and inspects
/// what the display thread did.
#[derive(Clone)]
pub struct HeadlessHandle {
    events: Sender<WindowEvent>,
    recorded: Arc<Mutex<Recorded>>,
}

impl HeadlessWindow {
    pub fn new() -> (HeadlessWindow, HeadlessHandle) {
        let (tx, rx) = mpsc::channel();
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let window = HeadlessWindow {
            events: rx,
            recorded: Arc::clone(&recorded),
            detached: false,
        };
        (window, HeadlessHandle { events: tx, recorded })
    }
}

impl Window for HeadlessWindow {
    fn open(&mut self, width: u32, height: u32, title: &str) -> Result<()> {
        let mut rec = lock(&self.recorded);
        rec.opened = Some((width, height));
        rec.title = title.to_string();
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        lock(&self.recorded).title = title.to_string();
        Ok(())
    }

    fn poll(&mut self, timeout: Duration) -> Result<Vec<WindowEvent>> {
        let mut events = Vec::new();
        if self.detached {
            thread::sleep(timeout);
            return Ok(events);
        }
        match self.events.recv_timeout(timeout) {
            Ok(ev) => events.push(ev),
            Err(RecvTimeoutError::Timeout) => return Ok(events),
            // A dropped handle means no more input, but the caller still
            // expects the poll to take its timeout.
            Err(RecvTimeoutError::Disconnected) => {
                self.detached = true;
                thread::sleep(timeout);
                return Ok(events);
            }
        }
        events.extend(self.events.try_iter());
        Ok(events)
    }

    fn present(&mut self, frame: &Surface) -> Result<()> {
        let mut rec = lock(&self.recorded);
        rec.presented += 1;
        match &mut rec.last_frame {
            Some(last) => last.copy_from(frame),
            slot => *slot = Some(frame.clone()),
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        lock(&self.recorded).closed = true;
        Ok(())
    }
}

impl HeadlessHandle {
    /// Queue an event for the display thread. Ignored once the window is
    /// gone.
    pub fn send(&self, event: WindowEvent) {
        let _ = self.events.send(event);
    }

    pub fn key(&self, name: &str) {
        self.send(WindowEvent::Key(name.to_string()));
    }

    /// Click at canvas pixel coordinates (origin top-left, Y down).
    pub fn click(&self, x: f64, y: f64) {
        self.send(WindowEvent::Click { x, y });
    }

    pub fn close(&self) {
        self.send(WindowEvent::Close);
    }

    pub fn opened(&self) -> Option<(u32, u32)> {
        lock(&self.recorded).opened
    }

    pub fn title(&self) -> String {
        lock(&self.recorded).title.clone()
    }

    pub fn presented(&self) -> usize {
        lock(&self.recorded).presented
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.recorded).closed
    }

    /// A copy of the most recently presented frame.
    pub fn last_frame(&self) -> Option<Surface> {
        lock(&self.recorded).last_frame.clone()
    }
}
