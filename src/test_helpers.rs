//! Shared test utilities: synthetic images and on-disk fixtures.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_test_png(&tmp.path().join("base.png"), &solid(200, 200, [10, 20, 30, 255]));
//! ```

use image::{ExtendedColorType, ImageEncoder, Rgba, RgbImage, RgbaImage};
use std::path::Path;

// =========================================================================
// In-memory images
// =========================================================================

/// A `width`×`height` image filled with one color.
pub fn solid(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(color))
}

/// A deterministic, non-uniform image: every pixel differs from its neighbors
/// and alpha varies, so channel-level bugs show up.
pub fn gradient_rgba(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x * 37 % 256) as u8,
            (y * 53 % 256) as u8,
            ((x + y) * 11 % 256) as u8,
            (255 - (x * y) % 200) as u8,
        ])
    })
}

/// Count pixels in `img` that differ from `color`.
pub fn count_not(img: &RgbaImage, color: [u8; 4]) -> usize {
    img.pixels().filter(|p| p.0 != color).count()
}

// =========================================================================
// Fixture files
// =========================================================================

/// Write a small valid JPEG file with the given dimensions.
pub fn write_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
}

/// Write `img` as a PNG file.
pub fn write_test_png(path: &Path, img: &RgbaImage) {
    img.save_with_format(path, image::ImageFormat::Png).unwrap();
}
