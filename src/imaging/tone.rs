//! Whole-image tone adjustments.
//!
//! Each adjustment remaps the R, G and B channels of every pixel
//! independently of its neighbors. Alpha is never touched, and the buffer's
//! dimensions are preserved: the image is taken by value and handed back.

use super::params::ToneAdjustment;
use image::RgbaImage;

/// Rec. 709 luma weights, matching what most editors use for "greyscale".
const LUMA_R: f32 = 0.2126;
const LUMA_G: f32 = 0.7152;
const LUMA_B: f32 = 0.0722;

/// Midpoint of the 8-bit channel range, the pivot for contrast.
const MIDPOINT: f32 = 127.5;

/// Apply `adjustment` to every pixel of `image`.
pub fn apply_tone(mut image: RgbaImage, adjustment: ToneAdjustment) -> RgbaImage {
    match adjustment {
        ToneAdjustment::Brighten(intensity) => {
            let shift = (intensity.value() * 255.0).round() as i32;
            map_rgb(&mut image, |v| (i32::from(v) + shift).clamp(0, 255) as u8);
        }
        ToneAdjustment::Contrast(intensity) => {
            let factor = 1.0 + intensity.value();
            map_rgb(&mut image, |v| {
                ((f32::from(v) - MIDPOINT) * factor + MIDPOINT)
                    .round()
                    .clamp(0.0, 255.0) as u8
            });
        }
        ToneAdjustment::Greyscale => {
            for pixel in image.pixels_mut() {
                let [r, g, b, _] = pixel.0;
                let luma = (LUMA_R * f32::from(r) + LUMA_G * f32::from(g) + LUMA_B * f32::from(b))
                    .round()
                    .clamp(0.0, 255.0) as u8;
                pixel.0[..3].fill(luma);
            }
        }
        ToneAdjustment::Invert => map_rgb(&mut image, |v| 255 - v),
    }
    image
}

/// Run `f` over the colour channels of every pixel, leaving alpha alone.
fn map_rgb(image: &mut RgbaImage, f: impl Fn(u8) -> u8) {
    for pixel in image.pixels_mut() {
        for channel in pixel.0.iter_mut().take(3) {
            *channel = f(*channel);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::params::Intensity;
    use crate::test_helpers::{gradient_rgba, solid};
    use image::Rgba;

    fn brighten(i: f32) -> ToneAdjustment {
        ToneAdjustment::Brighten(Intensity::new(i))
    }

    fn contrast(i: f32) -> ToneAdjustment {
        ToneAdjustment::Contrast(Intensity::new(i))
    }

    /// One pixel per possible channel value, with a fixed alpha.
    fn every_value() -> RgbaImage {
        RgbaImage::from_fn(256, 1, |x, _| {
            let v = x as u8;
            Rgba([v, 255 - v, v / 2, 77])
        })
    }

    #[test]
    fn invert_is_an_involution() {
        let img = every_value();
        let once = apply_tone(img.clone(), ToneAdjustment::Invert);
        let twice = apply_tone(once, ToneAdjustment::Invert);
        assert_eq!(twice, img);
    }

    #[test]
    fn invert_flips_colour_and_keeps_alpha() {
        let img = solid(1, 1, [10, 200, 255, 64]);
        let out = apply_tone(img, ToneAdjustment::Invert);
        assert_eq!(out.get_pixel(0, 0).0, [245, 55, 0, 64]);
    }

    #[test]
    fn greyscale_equalises_channels_and_keeps_alpha() {
        let img = gradient_rgba(32, 32);
        let out = apply_tone(img.clone(), ToneAdjustment::Greyscale);

        for (before, after) in img.pixels().zip(out.pixels()) {
            let [r, g, b, a] = after.0;
            assert_eq!(r, g);
            assert_eq!(g, b);
            assert_eq!(a, before[3]);
        }
    }

    #[test]
    fn greyscale_uses_luma_weights() {
        let out = apply_tone(solid(1, 1, [0, 255, 0, 255]), ToneAdjustment::Greyscale);
        // 0.7152 * 255 = 182.376
        assert_eq!(out.get_pixel(0, 0).0, [182, 182, 182, 255]);

        let white = apply_tone(solid(1, 1, [255, 255, 255, 255]), ToneAdjustment::Greyscale);
        assert_eq!(white.get_pixel(0, 0).0, [255, 255, 255, 255]);
    }

    #[test]
    fn brighten_shifts_by_scaled_intensity() {
        let out = apply_tone(solid(1, 1, [100, 100, 100, 9]), brighten(0.2));
        // 0.2 * 255 = 51
        assert_eq!(out.get_pixel(0, 0).0, [151, 151, 151, 9]);
    }

    #[test]
    fn brighten_clamps_without_wraparound() {
        let up = apply_tone(solid(1, 1, [250, 10, 128, 255]), brighten(1.0));
        assert_eq!(up.get_pixel(0, 0).0, [255, 255, 255, 255]);

        let down = apply_tone(solid(1, 1, [250, 10, 128, 255]), brighten(-0.5));
        assert_eq!(down.get_pixel(0, 0).0, [122, 0, 0, 255]);
    }

    #[test]
    fn brighten_zero_is_identity() {
        let img = every_value();
        assert_eq!(apply_tone(img.clone(), brighten(0.0)), img);
    }

    #[test]
    fn contrast_scales_deviation_from_midpoint() {
        let out = apply_tone(solid(1, 1, [27, 227, 128, 255]), contrast(0.5));
        // (27 - 127.5) * 1.5 + 127.5 = -23.25 → 0
        // (227 - 127.5) * 1.5 + 127.5 = 276.75 → 255
        // (128 - 127.5) * 1.5 + 127.5 = 128.25 → 128
        assert_eq!(out.get_pixel(0, 0).0, [0, 255, 128, 255]);

        let soft = apply_tone(solid(1, 1, [27, 227, 128, 255]), contrast(-0.5));
        // (27 - 127.5) * 0.5 + 127.5 = 77.25 → 77
        // (227 - 127.5) * 0.5 + 127.5 = 177.25 → 177
        assert_eq!(soft.get_pixel(0, 0).0, [77, 177, 128, 255]);
    }

    #[test]
    fn contrast_minus_one_flattens_to_midpoint() {
        let out = apply_tone(every_value(), contrast(-1.0));
        // 127.5 rounds away from zero
        assert!(out.pixels().all(|p| p.0 == [128, 128, 128, 77]));
    }

    #[test]
    fn adjustments_preserve_dimensions() {
        let adjustments = [
            brighten(0.3),
            contrast(0.3),
            ToneAdjustment::Greyscale,
            ToneAdjustment::Invert,
        ];
        for adj in adjustments {
            let out = apply_tone(gradient_rgba(13, 7), adj);
            assert_eq!(out.dimensions(), (13, 7));
        }
    }

    #[test]
    fn adjustments_are_deterministic() {
        let img = gradient_rgba(20, 20);
        for adj in [brighten(-0.7), contrast(0.9), ToneAdjustment::Greyscale] {
            assert_eq!(apply_tone(img.clone(), adj), apply_tone(img.clone(), adj));
        }
    }
}
