//! # Image Processing
//!
//! Turns decoded images into printable 1-bit bitmaps:
//!
//! ```text
//! decode → flatten alpha on white → grayscale → Lanczos3 resize → dither
//! ```
//!
//! Avatars are squashed to a fixed square so every receipt gets the same
//! thumbnail. Attachments keep their aspect ratio and are only ever scaled
//! down to fit the paper.

use image::{DynamicImage, GrayImage, Luma, imageops::FilterType};

use super::dither::{self, DitheringAlgorithm};

/// A packed 1-bit image, MSB-first rows, set bit = black dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Bitmap {
    /// Bytes per packed row.
    pub fn width_bytes(&self) -> usize {
        (self.width as usize).div_ceil(8)
    }

    /// Whether the dot at `(x, y)` is printed.
    pub fn is_black(&self, x: u32, y: u32) -> bool {
        let idx = y as usize * self.width_bytes() + x as usize / 8;
        (self.data[idx] >> (7 - (x % 8))) & 1 == 1
    }
}

/// Target size for an attachment: never wider than `max_width`, never
/// upscaled, height rounded to the nearest row.
///
/// ```
/// use pingslip::render::bitmap::attachment_dimensions;
///
/// assert_eq!(attachment_dimensions(800, 600, 384), (384, 288));
/// assert_eq!(attachment_dimensions(200, 100, 384), (200, 100));
/// ```
pub fn attachment_dimensions(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    let width = width.max(1);
    let new_width = width.min(max_width.max(1));
    // round(new_width * height / width) in integers
    let num = 2 * new_width as u64 * height as u64 + width as u64;
    let new_height = (num / (2 * width as u64)).max(1);
    (new_width, new_height.min(u32::MAX as u64) as u32)
}

/// Grayscale copy with transparent areas treated as white paper.
fn flatten_to_gray(image: &DynamicImage) -> GrayImage {
    let rgba = image.to_rgba8();
    let mut gray = GrayImage::new(rgba.width(), rgba.height());

    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as f32 / 255.0;
        // ITU-R 601 luma, same weights as image's own conversion
        let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        let blended = luma * alpha + 255.0 * (1.0 - alpha);
        gray.put_pixel(x, y, Luma([blended.round().clamp(0.0, 255.0) as u8]));
    }

    gray
}

/// Resize to exactly `width` x `height` and dither.
pub fn to_bitmap(
    image: &DynamicImage,
    width: u32,
    height: u32,
    algorithm: DitheringAlgorithm,
) -> Bitmap {
    let width = width.max(1);
    let height = height.max(1);

    let gray = flatten_to_gray(image);
    let resized = image::imageops::resize(&gray, width, height, FilterType::Lanczos3);

    let intensity: Vec<f32> = resized
        .pixels()
        .map(|p| 1.0 - p[0] as f32 / 255.0)
        .collect();

    Bitmap {
        width,
        height,
        data: dither::dither(&intensity, width as usize, height as usize, algorithm),
    }
}

/// Square `size` x `size` thumbnail; aspect ratio is not preserved.
pub fn process_avatar(image: &DynamicImage, size: u32, algorithm: DitheringAlgorithm) -> Bitmap {
    to_bitmap(image, size, size, algorithm)
}

/// Scale down to `max_width` (keeping aspect ratio) and dither.
pub fn process_attachment(
    image: &DynamicImage,
    max_width: u32,
    algorithm: DitheringAlgorithm,
) -> Bitmap {
    let (width, height) = attachment_dimensions(image.width(), image.height(), max_width);
    to_bitmap(image, width, height, algorithm)
}
