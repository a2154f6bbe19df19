//! Colors: RGB values and the permissive name/hex parser.
//!
//! Every authoring-facing API accepts `impl Into<Rgb>`, so a sketch may pass
//! an `Rgb`, an `(r, g, b)` tuple, or a string such as `"red"`, `"#FF8800"`
//! or `"#F80"`. Strings that cannot be understood resolve to black; parsing
//! never fails.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "ColorSpec")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Build a color from hue, saturation and brightness, each in `0.0..=1.0`.
    ///
    /// The hue wraps around, so `1.25` is the same as `0.25`.
    pub fn from_hsb(hue: f64, saturation: f64, brightness: f64) -> Self {
        let s = saturation.clamp(0.0, 1.0);
        let v = brightness.clamp(0.0, 1.0);
        if s == 0.0 {
            let c = channel(v);
            return Rgb::new(c, c, c);
        }

        let h = (hue - hue.floor()) * 6.0;
        let sector = h.floor();
        let f = h - sector;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));

        let (r, g, b) = match sector as u8 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        Rgb::new(channel(r), channel(g), channel(b))
    }

    /// Parse a color name or hex string. Unrecognized input yields black.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if let Some(named) = NamedColor::lookup(trimmed) {
            return named.rgb();
        }
        trimmed
            .strip_prefix('#')
            .and_then(parse_hex)
            .unwrap_or(Rgb::BLACK)
    }
}

fn channel(v: f64) -> u8 {
    (v * 255.0 + 0.5).clamp(0.0, 255.0) as u8
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return None,
    };
    let value = u32::from_str_radix(&expanded, 16).ok()?;
    Some(Rgb::new(
        (value >> 16) as u8,
        (value >> 8) as u8,
        value as u8,
    ))
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Rgb::new(r, g, b)
    }
}

impl From<&str> for Rgb {
    fn from(text: &str) -> Self {
        Rgb::parse(text)
    }
}

impl From<&String> for Rgb {
    fn from(text: &String) -> Self {
        Rgb::parse(text)
    }
}

impl From<String> for Rgb {
    fn from(text: String) -> Self {
        Rgb::parse(&text)
    }
}

impl From<NamedColor> for Rgb {
    fn from(named: NamedColor) -> Self {
        named.rgb()
    }
}

// ---------------------------------------------------------------------------
// Named colors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamedColor {
    Red,
    Blue,
    Green,
    Black,
    White,
    Yellow,
    Orange,
    Purple,
    Pink,
    Cyan,
    Magenta,
    Brown,
    #[serde(alias = "grey")]
    Gray,
}

impl NamedColor {
    /// Case-insensitive lookup; `grey` is accepted as an alias of `gray`.
    pub fn lookup(name: &str) -> Option<Self> {
        let named = match name.to_ascii_lowercase().as_str() {
            "red" => NamedColor::Red,
            "blue" => NamedColor::Blue,
            "green" => NamedColor::Green,
            "black" => NamedColor::Black,
            "white" => NamedColor::White,
            "yellow" => NamedColor::Yellow,
            "orange" => NamedColor::Orange,
            "purple" => NamedColor::Purple,
            "pink" => NamedColor::Pink,
            "cyan" => NamedColor::Cyan,
            "magenta" => NamedColor::Magenta,
            "brown" => NamedColor::Brown,
            "gray" | "grey" => NamedColor::Gray,
            _ => return None,
        };
        Some(named)
    }

    pub fn rgb(self) -> Rgb {
        match self {
            NamedColor::Red => Rgb::new(255, 0, 0),
            NamedColor::Blue => Rgb::new(0, 0, 255),
            NamedColor::Green => Rgb::new(0, 255, 0),
            NamedColor::Black => Rgb::BLACK,
            NamedColor::White => Rgb::WHITE,
            NamedColor::Yellow => Rgb::new(255, 255, 0),
            NamedColor::Orange => Rgb::new(255, 200, 0),
            NamedColor::Purple => Rgb::new(128, 0, 128),
            NamedColor::Pink => Rgb::new(255, 175, 175),
            NamedColor::Cyan => Rgb::new(0, 255, 255),
            NamedColor::Magenta => Rgb::new(255, 0, 255),
            NamedColor::Brown => Rgb::new(139, 69, 19),
            NamedColor::Gray => Rgb::new(128, 128, 128),
        }
    }
}

// ---------------------------------------------------------------------------
// Serde: accept either `"red"` / `"#abc"` or `{ "r": .., "g": .., "b": .. }`
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorSpec {
    Text(String),
    Rgb { r: u8, g: u8, b: u8 },
}

impl From<ColorSpec> for Rgb {
    fn from(spec: ColorSpec) -> Self {
        match spec {
            ColorSpec::Text(text) => Rgb::parse(&text),
            ColorSpec::Rgb { r, g, b } => Rgb::new(r, g, b),
        }
    }
}
