use std::{env, fs, path::{Path, PathBuf}};

use anyhow::{Context, Result};
use log::warn;

pub const SESSION_ENV: &str = "IMAGEPEEK_SESSION";

/// RGBA color stored the way the session file spells it (`#rrggbbaa`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Fallback for unparsable color strings.
pub const BAD_COLOR: Color = Color::rgba(0xff, 0x00, 0xff, 0xff);

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Accepts `#rrggbb` and `#rrggbbaa`; anything else yields [`BAD_COLOR`].
    pub fn parse(value: &str) -> Self {
        let Some(hex) = value.strip_prefix('#') else {
            return BAD_COLOR;
        };
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
            return BAD_COLOR;
        }
        let (Some(r), Some(g), Some(b)) = (byte(0), byte(2), byte(4)) else {
            return BAD_COLOR;
        };
        let a = if hex.len() == 8 {
            match byte(6) {
                Some(a) => a,
                None => return BAD_COLOR,
            }
        } else {
            0xff
        };
        Self { r, g, b, a }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

/// The persisted viewer state, one field per session key.
#[derive(Clone, Debug, PartialEq)]
pub struct Options {
    pub zoom_animation: u32,
    pub scroll_animation: u32,
    pub zoom: f64,
    pub sharpen: f64,
    pub current: usize,
    pub rows: usize,
    pub columns: usize,
    pub items: Vec<String>,
    pub fullscreen: bool,
    pub background_color: Color,
    pub text_color: Color,
    pub text_shadow_color: Color,
    pub error_color: Color,
    pub item_font: String,
    pub item_spacing: u32,
    pub zoom_increment: f64,
    pub zoom_quality: u8,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            zoom_animation: 100,
            scroll_animation: 100,
            zoom: 1.0,
            sharpen: 0.0,
            current: 0,
            rows: 1,
            columns: 1,
            items: Vec::new(),
            fullscreen: false,
            background_color: Color::rgba(0x00, 0x00, 0x00, 0xff),
            text_color: Color::rgba(0xff, 0xff, 0xff, 0xff),
            text_shadow_color: Color::rgba(0x00, 0x00, 0x00, 0xa0),
            error_color: Color::rgba(0xff, 0x90, 0x00, 0xff),
            item_font: "sans bold 16px".into(),
            item_spacing: 4,
            zoom_increment: 0.125,
            zoom_quality: 1,
        }
    }
}

/// Session file path from the environment, if configured.
pub fn session_path() -> Option<PathBuf> {
    match env::var(SESSION_ENV) {
        Ok(value) if !value.is_empty() => Some(PathBuf::from(value)),
        _ => None,
    }
}

/// Reads a session file; a missing file or unreadable key falls back to
/// defaults without failing startup.
pub fn load(path: &Path) -> Options {
    match fs::read_to_string(path) {
        Ok(data) => parse(&data),
        Err(_) => Options::default(),
    }
}

/// Parses the INI-style `key=value` body. Section headers and comment lines
/// are skipped; every malformed value keeps its default and logs a warning.
pub fn parse(data: &str) -> Options {
    let mut options = Options::default();
    for line in data.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('[') || line.starts_with('#') || line.starts_with(';')
        {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        apply(&mut options, key.trim(), value.trim());
    }
    options
}

fn apply(options: &mut Options, key: &str, value: &str) {
    match key {
        "zoom_animation" => set_number(&mut options.zoom_animation, key, value),
        "scroll_animation" => set_number(&mut options.scroll_animation, key, value),
        "zoom" => set_number(&mut options.zoom, key, value),
        "sharpen" => set_number(&mut options.sharpen, key, value),
        "zoom_increment" => set_number(&mut options.zoom_increment, key, value),
        "item_spacing" => set_number(&mut options.item_spacing, key, value),
        "current" => match value.parse::<i64>() {
            Ok(offset) => options.current = offset.max(0) as usize,
            Err(_) => bad_value(key, value),
        },
        "rows" => set_dimension(&mut options.rows, key, value),
        "columns" => set_dimension(&mut options.columns, key, value),
        "items" => options.items = split_items(value),
        "fullscreen" => match value {
            "true" | "1" => options.fullscreen = true,
            "false" | "0" => options.fullscreen = false,
            _ => bad_value(key, value),
        },
        "background_color" => options.background_color = Color::parse(value),
        "text_color" => options.text_color = Color::parse(value),
        "text_shadow_color" => options.text_shadow_color = Color::parse(value),
        "error_color" => options.error_color = Color::parse(value),
        "item_font" => options.item_font = value.to_string(),
        "zoom_quality" => match value.parse::<i64>() {
            Ok(quality) => options.zoom_quality = quality.clamp(0, 2) as u8,
            Err(_) => bad_value(key, value),
        },
        _ => {}
    }
}

fn set_number<T: std::str::FromStr>(slot: &mut T, key: &str, value: &str) {
    match value.parse() {
        Ok(parsed) => *slot = parsed,
        Err(_) => bad_value(key, value),
    }
}

/// Rows and columns survive zero or negative values by clamping to 1.
fn set_dimension(slot: &mut usize, key: &str, value: &str) {
    match value.parse::<i64>() {
        Ok(parsed) => *slot = parsed.max(1) as usize,
        Err(_) => bad_value(key, value),
    }
}

/// Splits a `;`-separated list, honoring the `\;` escape GKeyFile uses for
/// separators inside values.
fn split_items(value: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(';') => current.push(';'),
                Some(other) => {
                    current.push('\\');
                    current.push(other);
                }
                None => current.push('\\'),
            },
            ';' => {
                if !current.is_empty() {
                    items.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        items.push(current);
    }
    items
}

fn bad_value(key: &str, value: &str) {
    warn!("ignoring unreadable session value {key}={value}");
}

pub fn save(path: &Path, options: &Options) -> Result<()> {
    fs::write(path, serialize(options))
        .with_context(|| format!("unable to write session file {}", path.display()))
}

pub fn serialize(options: &Options) -> String {
    let mut items = String::new();
    for item in &options.items {
        items.push_str(&item.replace(';', "\\;"));
        items.push(';');
    }
    let mut out = String::from("[general]\n");
    let mut line = |key: &str, value: String| {
        out.push_str(key);
        out.push('=');
        out.push_str(&value);
        out.push('\n');
    };
    line("zoom_animation", options.zoom_animation.to_string());
    line("scroll_animation", options.scroll_animation.to_string());
    line("zoom", options.zoom.to_string());
    line("sharpen", options.sharpen.to_string());
    line("current", options.current.to_string());
    line("rows", options.rows.to_string());
    line("columns", options.columns.to_string());
    line("items", items);
    line("fullscreen", options.fullscreen.to_string());
    line("background_color", options.background_color.to_hex());
    line("text_color", options.text_color.to_hex());
    line("text_shadow_color", options.text_shadow_color.to_hex());
    line("error_color", options.error_color.to_hex());
    line("item_font", options.item_font.clone());
    line("item_spacing", options.item_spacing.to_string());
    line("zoom_increment", options.zoom_increment.to_string());
    line("zoom_quality", options.zoom_quality.to_string());
    out
}
