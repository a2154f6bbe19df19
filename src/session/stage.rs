//! State shared between the script thread and the display thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use crate::canvas::{Canvas, Surface};
use crate::sync::lock;
use crate::turtle::cursor::{self, CursorState};

use super::input::InputState;

pub(crate) struct Stage {
    canvas: Canvas,
    cursors: RwLock<Vec<Arc<Mutex<CursorState>>>>,
    input: InputState,
    running: AtomicBool,
    repaint: AtomicBool,
    title: Mutex<String>,
    title_changed: AtomicBool,
}

impl Stage {
    pub fn new(canvas: Canvas, title: String) -> Self {
        Stage {
            canvas,
            cursors: RwLock::new(Vec::new()),
            input: InputState::default(),
            running: AtomicBool::new(false),
            repaint: AtomicBool::new(true),
            title: Mutex::new(title),
            title_changed: AtomicBool::new(false),
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Append a cursor to the draw order and return its publishing slot.
    pub fn register(&self, initial: CursorState) -> Arc<Mutex<CursorState>> {
        let slot = Arc::new(Mutex::new(initial));
        self.cursors
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(Arc::clone(&slot));
        self.request_repaint();
        slot
    }

    pub fn turtle_count(&self) -> usize {
        self.cursors.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    // -----------------------------------------------------------------------
    // Lifecycle flags
    // -----------------------------------------------------------------------

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::Release);
    }

    pub fn request_repaint(&self) {
        self.repaint.store(true, Ordering::Release);
    }

    pub fn take_repaint(&self) -> bool {
        self.repaint.swap(false, Ordering::AcqRel)
    }

    /// Publish the back surface and ask the display for a repaint.
    pub fn refresh(&self) {
        self.canvas.swap();
        self.request_repaint();
    }

    pub fn title(&self) -> String {
        lock(&self.title).clone()
    }

    pub fn set_title(&self, title: &str) {
        *lock(&self.title) = title.to_string();
        self.title_changed.store(true, Ordering::Release);
    }

    /// The new title, if it changed since the last call.
    pub fn take_title(&self) -> Option<String> {
        self.title_changed
            .swap(false, Ordering::AcqRel)
            .then(|| self.title())
    }

    // -----------------------------------------------------------------------
    // Repaint
    // -----------------------------------------------------------------------

    /// Copy the front surface into `frame` and draw every visible cursor on
    /// top, in registration order.
    pub fn compose(&self, frame: &mut Surface) {
        self.canvas.read_front(|front| frame.copy_from(front));

        let snapshots: Vec<CursorState> = self
            .cursors
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|slot| *lock(slot))
            .collect();

        for state in snapshots.iter().filter(|s| s.visible) {
            let at = self.canvas.map_to_screen(state.position);
            cursor::draw(frame, at, state);
        }
    }
}
