use std::collections::HashMap;
use std::path::Path;

use ratatui::style::Color;

/// Parsed color theme for the TUI
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub dim: Color,
    pub accent: Color,
    pub highlight: Color,
    pub selection_bg: Color,
    pub done: Color,
    pub event: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::dracula()
    }
}

impl Theme {
    pub fn dracula() -> Self {
        Theme {
            background: Color::Rgb(0x28, 0x2A, 0x36),
            text: Color::Rgb(0xF8, 0xF8, 0xF2),
            dim: Color::Rgb(0x62, 0x72, 0xA4),
            accent: Color::Rgb(0xBD, 0x93, 0xF9),
            highlight: Color::Rgb(0xFF, 0x79, 0xC6),
            selection_bg: Color::Rgb(0x44, 0x47, 0x5A),
            done: Color::Rgb(0x50, 0xFA, 0x7B),
            event: Color::Rgb(0xF1, 0xFA, 0x8C),
            error: Color::Rgb(0xFF, 0x55, 0x55),
        }
    }

    pub fn light() -> Self {
        Theme {
            background: Color::Rgb(0xFA, 0xFA, 0xFA),
            text: Color::Rgb(0x2E, 0x34, 0x40),
            dim: Color::Rgb(0x90, 0x96, 0xA0),
            accent: Color::Rgb(0x5E, 0x35, 0xB1),
            highlight: Color::Rgb(0xC2, 0x18, 0x5B),
            selection_bg: Color::Rgb(0xE0, 0xE0, 0xE8),
            done: Color::Rgb(0x2E, 0x7D, 0x32),
            event: Color::Rgb(0xA0, 0x6A, 0x00),
            error: Color::Rgb(0xC6, 0x28, 0x28),
        }
    }

    /// Resolve a theme by name: a built-in palette, or a user palette at
    /// themes/<name>.json under the config directory. Unknown names and
    /// unreadable files fall back to the default.
    pub fn load(name: &str, config_dir: &Path) -> Self {
        match name {
            "dracula" => Theme::dracula(),
            "light" => Theme::light(),
            _ => {
                let path = config_dir.join("themes").join(format!("{name}.json"));
                match std::fs::read_to_string(&path) {
                    Ok(data) => Theme::from_json(&data),
                    Err(_) => Theme::default(),
                }
            }
        }
    }

    /// A theme from a JSON color map, starting from the default palette so
    /// partial files work.
    fn from_json(data: &str) -> Self {
        let mut theme = Theme::default();
        let Ok(colors) = serde_json::from_str::<HashMap<String, String>>(data) else {
            return theme;
        };
        for (key, value) in &colors {
            if let Some(color) = parse_hex_color(value) {
                match key.as_str() {
                    "background" => theme.background = color,
                    "text" => theme.text = color,
                    "dim" => theme.dim = color,
                    "accent" => theme.accent = color,
                    "highlight" => theme.highlight = color,
                    "selection_bg" => theme.selection_bg = color,
                    "done" => theme.done = color,
                    "event" => theme.event = color,
                    "error" => theme.error = color,
                    _ => {}
                }
            }
        }
        theme
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}
