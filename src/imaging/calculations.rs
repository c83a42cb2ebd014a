//! Pure calculation functions for overlay placement and text layout.
//!
//! All functions here are pure and testable without any I/O or images.

/// Side length of one glyph in the unscaled bitmap font.
pub const GLYPH_SIZE: u32 = 8;

/// Offset that centers an overlay of size `overlay` on a base of size `base`.
///
/// `x = floor((base_w - overlay_w) / 2)`, likewise for `y`. Negative when the
/// overlay is larger than the base; the caller clips.
///
/// # Examples
/// ```
/// # use watermark_manager::imaging::centered_offset;
/// assert_eq!(centered_offset((200, 200), (100, 100)), (50, 50));
/// assert_eq!(centered_offset((200, 200), (300, 300)), (-50, -50));
/// ```
pub fn centered_offset(base: (u32, u32), overlay: (u32, u32)) -> (i64, i64) {
    let dx = i64::from(base.0) - i64::from(overlay.0);
    let dy = i64::from(base.1) - i64::from(overlay.1);
    (dx.div_euclid(2), dy.div_euclid(2))
}

/// Break `text` into lines that fit `max_width` pixels at the given glyph scale.
///
/// Explicit `\n` always starts a new line. Within a line, words are packed
/// greedily; a single word wider than `max_width` is hard-broken by character.
/// Returns no lines for empty or whitespace-only text.
pub fn wrap_text(text: &str, scale: u32, max_width: u32) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let advance = GLYPH_SIZE * scale.max(1);
    let max_chars = (max_width / advance).max(1) as usize;
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            // Hard-break words that cannot fit on any line
            while word.len() > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }

            let current_len = current.chars().count();
            let needed = if current.is_empty() {
                word.len()
            } else {
                current_len + 1 + word.len()
            };
            if needed > max_chars {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.extend(word);
        }
        lines.push(current);
    }

    lines
}

/// Pixel dimensions of a block of `lines` rendered at `scale`.
///
/// Lines are stacked with one scaled pixel of leading between them.
pub fn text_block_dimensions(lines: &[String], scale: u32) -> (u32, u32) {
    if lines.is_empty() {
        return (0, 0);
    }
    let scale = scale.max(1);
    let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u32;
    let count = lines.len() as u32;
    let width = widest * GLYPH_SIZE * scale;
    let height = count * GLYPH_SIZE * scale + (count - 1) * scale;
    (width, height)
}

/// Vertical distance between the tops of consecutive lines.
pub fn line_pitch(scale: u32) -> u32 {
    let scale = scale.max(1);
    GLYPH_SIZE * scale + scale
}
