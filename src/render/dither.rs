//! # Dithering
//!
//! Converts grayscale intensity buffers to 1-bit rasters for the printhead.
//! A thermal printer can only burn a dot or leave it white, so every output
//! pixel is strictly one of two levels.
//!
//! ## Conventions
//!
//! - Intensity is `0.0` for white paper and `1.0` for a fully burned dot.
//! - Rows are packed MSB-first: bit 7 of byte 0 is the leftmost pixel.
//! - A set bit prints a black dot.
//!
//! ## Algorithms
//!
//! | Algorithm | Speed | Look | Notes |
//! |-----------|-------|------|-------|
//! | Floyd–Steinberg | Slower | Fine grain | Error diffusion, best for photos and avatars |
//! | Bayer 8x8 | Fast | Regular cross-hatch | Ordered, deterministic per pixel |
//!
//! ## Usage Example
//!
//! ```
//! use pingslip::render::dither::{self, DitheringAlgorithm};
//!
//! // A 16x2 gradient from white to black
//! let intensity: Vec<f32> = (0..32).map(|i| (i % 16) as f32 / 15.0).collect();
//! let packed = dither::dither(&intensity, 16, 2, DitheringAlgorithm::FloydSteinberg);
//! assert_eq!(packed.len(), 2 * 2);
//! ```

use serde::{Deserialize, Serialize};

/// Which 1-bit conversion to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DitheringAlgorithm {
    /// Error diffusion (7/16, 3/16, 5/16, 1/16).
    #[default]
    FloydSteinberg,
    /// Ordered 8x8 Bayer threshold matrix.
    Bayer,
}

/// Bayer 8x8 dithering matrix
///
/// Values range from 0-63. Low values activate first at low intensities,
/// high values last.
pub const BAYER8: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Get the Bayer threshold for a pixel position.
///
/// Returns a value in `(0, 1)`, never exactly 0 or 1, so pure white never
/// prints and pure black always does.
#[inline]
pub fn threshold(x: usize, y: usize) -> f32 {
    let matrix_value = BAYER8[y & 7][x & 7];
    (matrix_value as f32 + 0.5) / 64.0
}

/// Pack a row of boolean pixel values into bytes.
///
/// If the row length is not a multiple of 8, the last byte is padded
/// with zeros (white) on the right.
///
/// ```
/// use pingslip::render::dither::pack_row;
///
/// let row = vec![true, true, true, true, false, false, false, false];
/// assert_eq!(pack_row(&row), vec![0xF0]);
///
/// let row = vec![true; 12];
/// assert_eq!(pack_row(&row), vec![0xFF, 0xF0]);
/// ```
pub fn pack_row(pixels: &[bool]) -> Vec<u8> {
    let mut bytes = vec![0u8; pixels.len().div_ceil(8)];

    for (i, &pixel) in pixels.iter().enumerate() {
        if pixel {
            bytes[i / 8] |= 1 << (7 - (i % 8));
        }
    }

    bytes
}

/// Dither a row-major intensity buffer into packed 1-bit rows.
///
/// `intensity.len()` must be `width * height`. Output length is
/// `ceil(width / 8) * height`.
pub fn dither(
    intensity: &[f32],
    width: usize,
    height: usize,
    algorithm: DitheringAlgorithm,
) -> Vec<u8> {
    debug_assert_eq!(intensity.len(), width * height);

    match algorithm {
        DitheringAlgorithm::Bayer => bayer(intensity, width, height),
        DitheringAlgorithm::FloydSteinberg => floyd_steinberg(intensity, width, height),
    }
}

fn bayer(intensity: &[f32], width: usize, height: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width.div_ceil(8) * height);
    let mut row = Vec::with_capacity(width);

    for y in 0..height {
        row.clear();
        for x in 0..width {
            row.push(intensity[y * width + x] > threshold(x, y));
        }
        data.extend(pack_row(&row));
    }

    data
}

fn floyd_steinberg(intensity: &[f32], width: usize, height: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width.div_ceil(8) * height);
    let mut row = Vec::with_capacity(width);

    // Error carried into the current and next row.
    let mut current: Vec<f32> = vec![0.0; width + 2];
    let mut next: Vec<f32> = vec![0.0; width + 2];

    for y in 0..height {
        row.clear();
        for x in 0..width {
            let value = intensity[y * width + x] + current[x + 1];
            let black = value >= 0.5;
            let error = value - if black { 1.0 } else { 0.0 };
            row.push(black);

            current[x + 2] += error * 7.0 / 16.0;
            next[x] += error * 3.0 / 16.0;
            next[x + 1] += error * 5.0 / 16.0;
            next[x + 2] += error * 1.0 / 16.0;
        }
        data.extend(pack_row(&row));

        std::mem::swap(&mut current, &mut next);
        next.iter_mut().for_each(|e| *e = 0.0);
    }

    data
}

// ============================================================================
// TESTS
// ============================================================================
