//! Image processing in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Load / save** | `image` codecs, atomic writes via `tempfile` |
//! | **Tone** | per-channel remapping over `RgbaImage` |
//! | **Text watermark** | `font8x8` bitmap glyphs |
//! | **Image watermark** | source-over alpha blend |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for placement and text layout (unit testable)
//! - **Parameters**: Data structures describing adjustments and overlays
//! - **Backend**: [`ImageStore`] trait + [`FsStore`]
//! - **Tone / Watermark**: The pixel transforms themselves

pub mod backend;
mod calculations;
pub mod fs_store;
mod params;
pub mod tone;
pub mod watermark;

pub use backend::{ImageStore, StoreError};
pub use calculations::centered_offset;
pub use fs_store::FsStore;
pub use params::{
    Intensity, Opacity, TextStyle, ToneAdjustment, ToneKind, Watermark, WatermarkSettings,
};
pub use tone::apply_tone;
pub use watermark::{apply_image, apply_text, apply_watermark};
