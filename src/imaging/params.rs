//! Parameter types for image operations.
//!
//! These types describe *what* to do to a buffer, not *how*. They are the
//! interface between the [`pipeline`](crate::pipeline) (which decides what to
//! apply) and the pixel code in [`tone`](super::tone) and
//! [`watermark`](super::watermark).
//!
//! ## Types
//!
//! - [`Intensity`]: Brighten/contrast strength (-1.0–1.0). Clamped on construction.
//! - [`Opacity`]: Image watermark opacity (0.0–1.0, default 0.5). Clamped on construction.
//! - [`ToneAdjustment`]: One whole-image remapping applied before watermarking.
//! - [`Watermark`]: The overlay itself: text, or an already-decoded image.
//! - [`TextStyle`] / [`WatermarkSettings`]: How overlays are drawn.

use image::RgbaImage;
use std::fmt;
use std::str::FromStr;

/// Strength of a brighten or contrast adjustment (-1.0 to 1.0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intensity(f32);

impl Intensity {
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(-1.0, 1.0))
    }

    pub fn value(self) -> f32 {
        self.0
    }
}

impl Default for Intensity {
    fn default() -> Self {
        Self(0.5)
    }
}

/// Opacity multiplier applied to an image watermark's own alpha (0.0 to 1.0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Opacity(f32);

impl Opacity {
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f32 {
        self.0
    }
}

impl Default for Opacity {
    fn default() -> Self {
        Self(0.5)
    }
}

/// A whole-image pixel remapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToneAdjustment {
    Brighten(Intensity),
    Contrast(Intensity),
    Greyscale,
    Invert,
}

/// The adjustment kinds, without their intensity. Parsed from user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ToneKind {
    #[value(alias = "brightness")]
    Brighten,
    Contrast,
    #[value(alias = "grayscale", alias = "grey", alias = "gray")]
    Greyscale,
    Invert,
}

impl ToneKind {
    /// Whether this kind takes an [`Intensity`].
    pub fn takes_intensity(self) -> bool {
        matches!(self, Self::Brighten | Self::Contrast)
    }

    /// Build the adjustment. `intensity` is ignored for greyscale and invert.
    pub fn with_intensity(self, intensity: Intensity) -> ToneAdjustment {
        match self {
            Self::Brighten => ToneAdjustment::Brighten(intensity),
            Self::Contrast => ToneAdjustment::Contrast(intensity),
            Self::Greyscale => ToneAdjustment::Greyscale,
            Self::Invert => ToneAdjustment::Invert,
        }
    }
}

impl FromStr for ToneKind {
    type Err = String;

    /// Same spellings as `--adjust`, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        <Self as clap::ValueEnum>::from_str(s, true)
            .map_err(|_| format!("unknown adjustment: {}", s.to_ascii_lowercase()))
    }
}

impl fmt::Display for ToneAdjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Brighten(i) => write!(f, "brighten {:+.2}", i.value()),
            Self::Contrast(i) => write!(f, "contrast {:+.2}", i.value()),
            Self::Greyscale => f.write_str("greyscale"),
            Self::Invert => f.write_str("invert"),
        }
    }
}

/// The overlay applied to the base image. Exactly one per run.
#[derive(Debug, Clone, PartialEq)]
pub enum Watermark {
    Text(String),
    Image(RgbaImage),
}

/// Text rendering parameters.
///
/// - `scale`: integer upscale of the 8×8 bitmap font (4 → 32px glyphs)
/// - `color`: RGBA written verbatim for every lit glyph pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub scale: u32,
    pub color: [u8; 4],
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            scale: 4,
            color: [0, 0, 0, 255],
        }
    }
}

/// Everything the compositor needs besides the buffers themselves.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WatermarkSettings {
    pub text: TextStyle,
    pub opacity: Opacity,
}
