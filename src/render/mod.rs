//! # Rendering Module
//!
//! Everything needed to get a picture from a URL onto thermal paper.
//!
//! ## Modules
//!
//! - [`dither`]: 1-bit conversion (Floyd–Steinberg, Bayer 8x8)
//! - [`bitmap`]: grayscale, resize and dither into a packed [`Bitmap`]
//! - [`fetch`]: HTTP download behind the [`ImageFetcher`] trait
//!
//! ## Usage Example
//!
//! ```
//! use image::{DynamicImage, RgbImage};
//! use pingslip::render::{bitmap, dither::DitheringAlgorithm};
//!
//! let photo = DynamicImage::ImageRgb8(RgbImage::new(800, 600));
//! let bmp = bitmap::process_attachment(&photo, 384, DitheringAlgorithm::FloydSteinberg);
//! assert_eq!((bmp.width, bmp.height), (384, 288));
//! ```

pub mod bitmap;
pub mod dither;
pub mod fetch;

pub use bitmap::Bitmap;
pub use fetch::{HttpImageFetcher, ImageFetcher};
