use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::color::Rgb;

/// User-level session defaults, read from
/// `$HOME/.config/turtle-canvas/session.json`. Every field is optional in
/// the file; missing ones take their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub title: String,
    /// Target frames per second of the animated loop.
    pub frame_rate: u32,
    /// How often the display thread repaints, per second.
    pub repaint_rate: u32,
    pub background: Rgb,
    /// Show the title bar row above the canvas in the terminal.
    pub show_menubar: bool,
    pub key_bindings: KeyBindings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Closes the window, ending the session.
    pub close: String,
    pub close_alt: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            title: "Turtle Graphics".into(),
            frame_rate: 60,
            repaint_rate: 60,
            background: Rgb::WHITE,
            show_menubar: true,
            key_bindings: KeyBindings::default(),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        KeyBindings {
            close: "Ctrl-c".into(),
            close_alt: "Ctrl-q".into(),
        }
    }
}

impl SessionConfig {
    /// Load the user config, falling back to defaults when the file is
    /// missing or invalid.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match std::fs::read_to_string(&config_path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => {
                    debug!(path = %config_path.display(), "loaded session config");
                    config
                }
                Err(e) => {
                    warn!(path = %config_path.display(), "invalid session config ({e}), using defaults");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    fn config_path() -> std::path::PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        let mut path = std::path::PathBuf::from(home);
        path.push(".config");
        path.push("turtle-canvas");
        path.push("session.json");
        path
    }
}

impl KeyBindings {
    pub fn is_close(&self, event: &KeyEvent) -> bool {
        matches_binding(&self.close, event) || matches_binding(&self.close_alt, event)
    }
}

/// Check whether a crossterm `KeyEvent` matches a binding string such as
/// `"Ctrl-c"`, `"Alt-x"`, `"Esc"`, `"F4"` or `"q"`.
pub fn matches_binding(binding: &str, event: &KeyEvent) -> bool {
    if let Some(rest) = binding.strip_prefix("Alt-") {
        return event.modifiers.contains(KeyModifiers::ALT) && matches_key(rest, event.code);
    }
    if let Some(rest) = binding.strip_prefix("Ctrl-") {
        return event.modifiers.contains(KeyModifiers::CONTROL) && matches_key(rest, event.code);
    }

    // Plain bindings must not fire on Ctrl or Alt chords.
    if event.modifiers.contains(KeyModifiers::CONTROL)
        || event.modifiers.contains(KeyModifiers::ALT)
    {
        return false;
    }
    matches_key(binding, event.code)
}

fn matches_key(name: &str, code: KeyCode) -> bool {
    match name {
        "" => false,
        "Right" => code == KeyCode::Right,
        "Left" => code == KeyCode::Left,
        "Up" => code == KeyCode::Up,
        "Down" => code == KeyCode::Down,
        "Enter" => code == KeyCode::Enter,
        "Esc" => code == KeyCode::Esc,
        "Space" => code == KeyCode::Char(' '),
        "Tab" => code == KeyCode::Tab,
        "Backspace" => code == KeyCode::Backspace,
        s => {
            if let Some(n) = s.strip_prefix('F').and_then(|rest| rest.parse::<u8>().ok()) {
                return code == KeyCode::F(n);
            }
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => match code {
                    KeyCode::Char(k) => k.eq_ignore_ascii_case(&c),
                    _ => false,
                },
                _ => false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r##"{ "frame_rate": 30, "background": "#000" }"##).unwrap();
        assert_eq!(config.frame_rate, 30);
        assert_eq!(config.background, Rgb::BLACK);
        assert_eq!(config.repaint_rate, 60);
        assert_eq!(config.key_bindings, KeyBindings::default());
    }

    #[test]
    fn ctrl_bindings_require_the_modifier() {
        let bindings = KeyBindings::default();
        assert!(bindings.is_close(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(bindings.is_close(&key(KeyCode::Char('q'), KeyModifiers::CONTROL)));
        assert!(!bindings.is_close(&key(KeyCode::Char('c'), KeyModifiers::NONE)));
    }

    #[test]
    fn plain_bindings_reject_chords() {
        assert!(matches_binding("Esc", &key(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(matches_binding("F4", &key(KeyCode::F(4), KeyModifiers::NONE)));
        assert!(matches_binding("q", &key(KeyCode::Char('q'), KeyModifiers::SHIFT)));
        assert!(!matches_binding("q", &key(KeyCode::Char('q'), KeyModifiers::ALT)));
        assert!(!matches_binding("qq", &key(KeyCode::Char('q'), KeyModifiers::NONE)));
    }
}
