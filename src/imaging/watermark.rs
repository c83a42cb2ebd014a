//! Watermark compositing: rendered text or a second image, centered.
//!
//! | Overlay | How it is drawn |
//! |---|---|
//! | Text | `font8x8` bitmap glyphs, nearest-neighbor upscaled, written opaquely |
//! | Image | source-over blend with the watermark's alpha scaled by [`Opacity`] |
//!
//! Neither operation resizes the base image. Overlay pixels that fall outside
//! the base are clipped.

use super::calculations::{
    GLYPH_SIZE, centered_offset, line_pitch, text_block_dimensions, wrap_text,
};
use super::params::{Opacity, TextStyle, Watermark, WatermarkSettings};
use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use image::{Rgba, RgbaImage};

/// Apply whichever overlay `watermark` carries.
pub fn apply_watermark(
    image: RgbaImage,
    watermark: Watermark,
    settings: &WatermarkSettings,
) -> RgbaImage {
    match watermark {
        Watermark::Text(text) => apply_text(image, &text, &settings.text),
        Watermark::Image(overlay) => apply_image(image, &overlay, settings.opacity),
    }
}

/// Render `text` centered on `image`.
///
/// Lines are wrapped to the image width, each line is centered horizontally,
/// and the block of lines is centered vertically. Empty or whitespace-only
/// text leaves the image unchanged.
pub fn apply_text(mut image: RgbaImage, text: &str, style: &TextStyle) -> RgbaImage {
    let scale = style.scale.max(1);
    let dims = image.dimensions();

    let lines = wrap_text(text, scale, dims.0);
    let (_, block_height) = text_block_dimensions(&lines, scale);

    for (row, line) in lines.iter().enumerate() {
        let line_width = line.chars().count() as u32 * GLYPH_SIZE * scale;
        let (left, top) = centered_offset(dims, (line_width, block_height));
        let y = top + i64::from(row as u32 * line_pitch(scale));

        for (col, ch) in line.chars().enumerate() {
            let x = left + i64::from(col as u32 * GLYPH_SIZE * scale);
            draw_glyph(&mut image, glyph_for(ch), x, y, scale, Rgba(style.color));
        }
    }

    image
}

/// Composite `overlay` centered on `image` with a source-over blend.
///
/// Each overlay pixel contributes with weight `a = opacity * alpha / 255`.
/// Over an opaque base that is `out = base * (1 - a) + overlay * a`; over a
/// translucent base the colour is also weighted by the base alpha. An overlay
/// larger than the base is clipped to the base's extent.
pub fn apply_image(mut image: RgbaImage, overlay: &RgbaImage, opacity: Opacity) -> RgbaImage {
    let (base_w, base_h) = image.dimensions();
    let (off_x, off_y) = centered_offset((base_w, base_h), overlay.dimensions());

    for (x, y, src) in overlay.enumerate_pixels() {
        let tx = off_x + i64::from(x);
        let ty = off_y + i64::from(y);
        if tx < 0 || ty < 0 || tx >= i64::from(base_w) || ty >= i64::from(base_h) {
            continue;
        }
        blend_over(image.get_pixel_mut(tx as u32, ty as u32), *src, opacity.value());
    }

    image
}

/// Look up the 8×8 bitmap for `ch`, falling back to `?` for anything the font
/// does not cover.
fn glyph_for(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

/// Draw one glyph with its top-left corner at (`x`, `y`), each font pixel
/// becoming a `scale`×`scale` block.
fn draw_glyph(image: &mut RgbaImage, glyph: [u8; 8], x: i64, y: i64, scale: u32, color: Rgba<u8>) {
    let (w, h) = image.dimensions();
    let scale = i64::from(scale);

    for (row, bits) in glyph.iter().enumerate() {
        for col in 0..8 {
            // Bit 0 is the leftmost pixel
            if (bits >> col) & 1 == 0 {
                continue;
            }
            let px = x + col as i64 * scale;
            let py = y + row as i64 * scale;
            for dy in 0..scale {
                for dx in 0..scale {
                    let (tx, ty) = (px + dx, py + dy);
                    if tx < 0 || ty < 0 || tx >= i64::from(w) || ty >= i64::from(h) {
                        continue;
                    }
                    image.put_pixel(tx as u32, ty as u32, color);
                }
            }
        }
    }
}

/// Source-over blend of `src` onto `dst` with `src`'s alpha scaled by `opacity`.
///
/// Colour is weighted by both alphas, so a transparent base takes the
/// overlay's colour instead of darkening toward its own.
fn blend_over(dst: &mut Rgba<u8>, src: Rgba<u8>, opacity: f32) {
    let a = opacity * f32::from(src[3]) / 255.0;
    if a <= 0.0 {
        return;
    }
    let base_a = f32::from(dst[3]) / 255.0 * (1.0 - a);
    let out_a = a + base_a;
    let mix = |d: u8, s: u8| -> u8 {
        ((f32::from(s) * a + f32::from(d) * base_a) / out_a)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    *dst = Rgba([
        mix(dst[0], src[0]),
        mix(dst[1], src[1]),
        mix(dst[2], src[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{count_not, gradient_rgba, solid};

    const BLACK: [u8; 4] = [0, 0, 0, 255];
    const WHITE: [u8; 4] = [255, 255, 255, 255];

    /// Bounding box (min_x, min_y, max_x, max_y) of pixels not equal to `bg`.
    fn ink_bounds(img: &RgbaImage, bg: [u8; 4]) -> Option<(u32, u32, u32, u32)> {
        img.enumerate_pixels()
            .filter(|(_, _, p)| p.0 != bg)
            .fold(None, |acc, (x, y, _)| match acc {
                None => Some((x, y, x, y)),
                Some((x0, y0, x1, y1)) => Some((x0.min(x), y0.min(y), x1.max(x), y1.max(y))),
            })
    }

    // =========================================================================
    // Image watermark
    // =========================================================================

    #[test]
    fn image_overlay_top_left_lands_at_centered_offset() {
        let base = solid(200, 200, BLACK);
        let overlay = solid(100, 100, WHITE);

        let out = apply_image(base, &overlay, Opacity::default());

        assert_eq!(out.get_pixel(49, 49).0, BLACK);
        assert_eq!(out.get_pixel(50, 50).0, [128, 128, 128, 255]);
        assert_eq!(out.get_pixel(149, 149).0, [128, 128, 128, 255]);
        assert_eq!(out.get_pixel(150, 150).0, BLACK);
        assert_eq!(count_not(&out, BLACK), 100 * 100);
    }

    #[test]
    fn image_overlay_larger_than_base_is_clipped() {
        let base = solid(200, 200, BLACK);
        let overlay = solid(300, 300, WHITE);

        let out = apply_image(base, &overlay, Opacity::default());

        assert_eq!(out.dimensions(), (200, 200));
        assert!(out.pixels().all(|p| p.0 == [128, 128, 128, 255]));
    }

    #[test]
    fn image_overlay_wider_but_shorter_clips_one_axis() {
        let base = solid(100, 100, BLACK);
        let overlay = solid(150, 10, WHITE);

        let out = apply_image(base, &overlay, Opacity::new(1.0));

        assert_eq!(count_not(&out, BLACK), 100 * 10);
        assert_eq!(out.get_pixel(0, 45).0, WHITE);
        assert_eq!(out.get_pixel(99, 54).0, WHITE);
        assert_eq!(out.get_pixel(0, 44).0, BLACK);
    }

    #[test]
    fn image_overlay_blend_follows_half_alpha_formula() {
        let base = solid(1, 1, [200, 100, 0, 255]);
        let overlay = solid(1, 1, [0, 100, 200, 255]);

        let out = apply_image(base, &overlay, Opacity::default());
        // base * 0.5 + wm * 0.5
        assert_eq!(out.get_pixel(0, 0).0, [100, 100, 100, 255]);
    }

    #[test]
    fn image_overlay_partial_alpha_scales_weight() {
        let base = solid(1, 1, [0, 0, 0, 255]);
        // alpha 102 → 0.4, times opacity 0.5 → weight 0.2
        let overlay = solid(1, 1, [250, 250, 250, 102]);

        let out = apply_image(base, &overlay, Opacity::default());
        assert_eq!(out.get_pixel(0, 0).0, [50, 50, 50, 255]);
    }

    #[test]
    fn image_overlay_transparent_pixels_leave_base_alone() {
        let base = gradient_rgba(10, 10);
        let overlay = solid(4, 4, [255, 0, 0, 0]);

        let out = apply_image(base.clone(), &overlay, Opacity::new(1.0));
        assert_eq!(out, base);
    }

    #[test]
    fn image_overlay_onto_transparent_base_keeps_overlay_colour() {
        let base = solid(1, 1, [0, 0, 0, 0]);
        let overlay = solid(1, 1, [200, 200, 200, 255]);

        let out = apply_image(base, &overlay, Opacity::default());
        assert_eq!(out.get_pixel(0, 0).0, [200, 200, 200, 128]);
    }

    #[test]
    fn image_overlay_onto_translucent_base_weights_by_both_alphas() {
        // base alpha 0.2, overlay weight 0.5 → out alpha 0.5 + 0.2 * 0.5 = 0.6
        let base = solid(1, 1, [50, 50, 50, 51]);
        let overlay = solid(1, 1, [200, 200, 200, 255]);

        let out = apply_image(base, &overlay, Opacity::default());
        // (200 * 0.5 + 50 * 0.1) / 0.6 = 175
        assert_eq!(out.get_pixel(0, 0).0, [175, 175, 175, 153]);
    }

    // =========================================================================
    // Text watermark
    // =========================================================================

    #[test]
    fn text_is_drawn_inside_centered_cell_box() {
        let base = solid(100, 50, WHITE);
        let style = TextStyle {
            scale: 2,
            color: BLACK,
        };

        let out = apply_text(base, "AB", &style);

        // 2 glyphs * 16px = 32 wide, 16 tall → box at (34, 17)..(66, 33)
        let (x0, y0, x1, y1) = ink_bounds(&out, WHITE).expect("text should be visible");
        assert!(x0 >= 34 && x1 < 66, "x range {x0}..={x1}");
        assert!(y0 >= 17 && y1 < 33, "y range {y0}..={y1}");
    }

    #[test]
    fn text_glyph_pixels_are_opaque_color() {
        let base = gradient_rgba(64, 64);
        let style = TextStyle {
            scale: 1,
            color: [255, 0, 0, 255],
        };

        let out = apply_text(base.clone(), "X", &style);

        let changed: Vec<_> = out
            .pixels()
            .zip(base.pixels())
            .filter(|(a, b)| a != b)
            .map(|(a, _)| a.0)
            .collect();
        assert!(!changed.is_empty());
        assert!(changed.iter().all(|p| *p == [255, 0, 0, 255]));
    }

    #[test]
    fn empty_and_whitespace_text_is_a_no_op() {
        let base = gradient_rgba(40, 40);
        for text in ["", "   ", "\n\t"] {
            let out = apply_text(base.clone(), text, &TextStyle::default());
            assert_eq!(out, base, "text {text:?} changed the image");
        }
    }

    #[test]
    fn long_text_wraps_into_multiple_centered_lines() {
        let base = solid(64, 64, WHITE);
        let style = TextStyle {
            scale: 1,
            color: BLACK,
        };

        // 8px glyphs, 64px wide → 8 chars per line → two lines
        let out = apply_text(base, "abcd efgh", &style);

        // 2 lines: 8 + 1 + 8 = 17 tall → top at 23
        let (_, y0, _, y1) = ink_bounds(&out, WHITE).unwrap();
        assert!(y0 >= 23 && y1 < 40, "y range {y0}..={y1}");
        assert!(y1 - y0 >= 8, "expected ink on both lines");
    }

    #[test]
    fn text_larger_than_image_is_clipped_without_panic() {
        let base = solid(5, 5, WHITE);
        let style = TextStyle {
            scale: 10,
            color: BLACK,
        };

        let out = apply_text(base, "W", &style);
        assert_eq!(out.dimensions(), (5, 5));
    }

    #[test]
    fn unknown_characters_render_as_question_mark() {
        let base = solid(32, 32, WHITE);
        let style = TextStyle {
            scale: 1,
            color: BLACK,
        };

        let unknown = apply_text(base.clone(), "\u{20AC}", &style);
        let question = apply_text(base, "?", &style);
        assert_eq!(unknown, question);
    }

    #[test]
    fn latin1_characters_use_latin_glyphs() {
        assert_ne!(glyph_for('\u{e9}'), glyph_for('?'));
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    #[test]
    fn apply_watermark_dispatches_on_variant() {
        let settings = WatermarkSettings::default();

        let text = apply_watermark(solid(50, 50, WHITE), Watermark::Text("hi".into()), &settings);
        assert!(count_not(&text, WHITE) > 0);

        let image = apply_watermark(
            solid(50, 50, BLACK),
            Watermark::Image(solid(10, 10, WHITE)),
            &settings,
        );
        assert_eq!(count_not(&image, BLACK), 100);
    }
}
