//! Polled input state.
//!
//! The window backend writes events here from the display thread; sketches
//! read them from the script thread. Each slot holds only the most recent
//! event, and reads consume it, so exactly one poll observes each event.
//! Events arriving faster than the sketch polls are overwritten.

use std::sync::Mutex;

use crate::sync::lock;

#[derive(Debug, Default)]
struct Slots {
    last_key: Option<String>,
    mouse_x: i32,
    mouse_y: i32,
    clicked: bool,
}

#[derive(Debug, Default)]
pub struct InputState {
    slots: Mutex<Slots>,
}

impl InputState {
    /// Record a key press, replacing any unread one.
    pub fn key_pressed(&self, name: &str) {
        lock(&self.slots).last_key = Some(name.to_lowercase());
    }

    /// Record a click at screen-centered coordinates (Y up).
    pub fn mouse_clicked(&self, x: i32, y: i32) {
        let mut slots = lock(&self.slots);
        slots.mouse_x = x;
        slots.mouse_y = y;
        slots.clicked = true;
    }

    /// Take the last key, leaving the slot empty.
    pub fn take_key(&self) -> Option<String> {
        lock(&self.slots).last_key.take()
    }

    /// Consume the last key only if it is `name` (case-insensitive).
    pub fn check_key(&self, name: &str) -> bool {
        let mut slots = lock(&self.slots);
        let matched = slots
            .last_key
            .as_deref()
            .is_some_and(|key| key.eq_ignore_ascii_case(name));
        if matched {
            slots.last_key = None;
        }
        matched
    }

    /// Whether a click arrived since the last call.
    pub fn take_click(&self) -> bool {
        std::mem::take(&mut lock(&self.slots).clicked)
    }

    /// Position of the most recent click. Not consumed by reads.
    pub fn mouse(&self) -> (i32, i32) {
        let slots = lock(&self.slots);
        (slots.mouse_x, slots.mouse_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_latest_key_survives() {
        let input = InputState::default();
        input.key_pressed("a");
        input.key_pressed("b");
        assert_eq!(input.take_key().as_deref(), Some("b"));
        assert_eq!(input.take_key(), None);
    }

    #[test]
    fn check_key_only_consumes_a_match() {
        let input = InputState::default();
        input.key_pressed("space");
        assert!(!input.check_key("enter"));
        assert!(input.check_key("SPACE"));
        assert!(!input.check_key("space"));
    }

    #[test]
    fn clicks_are_read_once_but_position_sticks() {
        let input = InputState::default();
        assert!(!input.take_click());
        input.mouse_clicked(12, -40);
        input.mouse_clicked(-3, 7);
        assert!(input.take_click());
        assert!(!input.take_click());
        assert_eq!(input.mouse(), (-3, 7));
    }
}
