use eframe::egui;
use fast_image_resize::images::Image;
use fast_image_resize::{PixelType, ResizeOptions, Resizer};
use image::{DynamicImage, RgbaImage};

/// Strength change per sharpen keypress.
pub const SHARPEN_STEP: f64 = 0.05;

/// Decoded images larger than this are downscaled before texture upload.
pub const MAX_TEXTURE_WIDTH: u32 = 3840;
pub const MAX_TEXTURE_HEIGHT: u32 = 2160;

/// Sharpen as a single 3x3 convolution. The blend
/// `strength * (9*center - neighbors) + (1 - strength) * center` folds into a
/// kernel with `1 + 8s` at the center and `-s` everywhere else, which leaves
/// flat regions untouched at any strength.
pub fn sharpen(image: &DynamicImage, strength: f32) -> DynamicImage {
    if strength <= 0.0 {
        return image.clone();
    }
    let s = strength;
    let kernel = [-s, -s, -s, -s, 1.0 + 8.0 * s, -s, -s, -s, -s];
    image.filter3x3(&kernel)
}

pub fn to_color_image(img: &DynamicImage) -> egui::ColorImage {
    let rgba = img.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    let pixels = rgba.into_raw();
    egui::ColorImage::from_rgba_unmultiplied(size, &pixels)
}

/// Downscales oversized images, preserving aspect ratio. Falls back to the
/// unscaled image when the resizer cannot handle it.
pub fn downscale_to_fit(image: DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
    let (width, height) = (image.width(), image.height());
    if width <= max_width && height <= max_height {
        return image;
    }

    let ratio = f64::from(width) / f64::from(height);
    let (new_width, new_height) = if ratio > f64::from(max_width) / f64::from(max_height) {
        (max_width, (f64::from(max_width) / ratio).round() as u32)
    } else {
        ((f64::from(max_height) * ratio).round() as u32, max_height)
    };
    let (new_width, new_height) = (new_width.max(1), new_height.max(1));

    let rgba = image.to_rgba8();
    let src = match Image::from_vec_u8(width, height, rgba.into_raw(), PixelType::U8x4) {
        Ok(src) => src,
        Err(_) => return image,
    };
    let mut dst = Image::new(new_width, new_height, PixelType::U8x4);
    let mut resizer = Resizer::new();
    if resizer
        .resize(&src, &mut dst, &ResizeOptions::default())
        .is_err()
    {
        return image;
    }
    match RgbaImage::from_raw(new_width, new_height, dst.into_vec()) {
        Some(buffer) => DynamicImage::ImageRgba8(buffer),
        None => image,
    }
}
