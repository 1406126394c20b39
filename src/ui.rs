use std::path::Path;

use eframe::egui::{self, Color32, TextureOptions};

use crate::session::Color;

/// Label shadow offset in screen pixels.
pub const LABEL_SHADOW_OFFSET: f32 = 2.0;

/// Cell size reserved for an item whose image failed to load; the slot only
/// carries its filename label.
pub const ERROR_ITEM_SIZE: egui::Vec2 = egui::vec2(400.0, 80.0);

pub fn to_color32(color: Color) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

/// Pulls the pixel size out of a Pango-style font string like
/// "sans bold 16px". Anything unparsable keeps the default of 16.
pub fn font_size(font_spec: &str) -> f32 {
    font_spec
        .split_whitespace()
        .rev()
        .find_map(|token| token.strip_suffix("px")?.parse::<f32>().ok())
        .filter(|size| *size > 0.0)
        .unwrap_or(16.0)
}

/// Texture filtering per the zoom_quality option; egui only distinguishes
/// nearest from linear.
pub fn texture_options(zoom_quality: u8) -> TextureOptions {
    if zoom_quality == 0 {
        TextureOptions::NEAREST
    } else {
        TextureOptions::LINEAR
    }
}

pub fn window_title(offset: usize, count: usize, path: &Path) -> String {
    format!("[{}/{}] {} - imagepeek", offset + 1, count, path.display())
}

/// One frame's worth of keyboard input, captured once per update.
#[derive(Default)]
pub struct KeyboardState {
    pub zoom_in: bool,
    pub zoom_out: bool,
    /// Direct zoom level from a digit key (1-9).
    pub zoom_digit: Option<u32>,
    /// Ctrl was held with the digit: zoom to its reciprocal.
    pub reciprocal: bool,
    pub fit_width: bool,
    pub fit_height: bool,
    pub fit_both: bool,
    pub sharpen_up: bool,
    pub sharpen_down: bool,
    pub fullscreen: bool,
    pub next_page: bool,
    pub prev_page: bool,
    pub first_page: bool,
    pub last_page: bool,
    pub shift_delta: i64,
    pub rows_delta: i64,
    pub columns_delta: i64,
    pub scroll_up: bool,
    pub scroll_down: bool,
    pub scroll_left: bool,
    pub scroll_right: bool,
    pub page_up: bool,
    pub page_down: bool,
    pub scroll_home: bool,
    pub scroll_end: bool,
    pub skip_forward: bool,
    pub skip_backward: bool,
    pub reload: bool,
    pub quit: bool,
}
