// Each test binary compiles this module separately and uses a subset of it.
#![allow(dead_code)]

use std::sync::Mutex;

use image::{DynamicImage, Rgba, RgbaImage};
use once_cell::sync::Lazy;

/// Serializes tests that touch process-wide environment variables.
pub static ENV_GUARD: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

pub fn solid_image(width: u32, height: u32, color: [u8; 4]) -> DynamicImage {
    let buffer = RgbaImage::from_pixel(width, height, Rgba(color));
    DynamicImage::ImageRgba8(buffer)
}

/// Vertical two-tone image: left half dark, right half bright.
pub fn two_tone_image(width: u32, height: u32) -> DynamicImage {
    let buffer = RgbaImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgba([32, 32, 32, 255])
        } else {
            Rgba([224, 224, 224, 255])
        }
    });
    DynamicImage::ImageRgba8(buffer)
}
