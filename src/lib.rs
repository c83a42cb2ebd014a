//! # Watermark Manager
//!
//! An interactive command-line tool that stamps a text or image watermark onto
//! a photo, optionally adjusting the whole image first. Results are written
//! next to the original and never overwrite earlier output.
//!
//! # Architecture: One Linear Pipeline
//!
//! Every run is the same four steps, driven by [`pipeline::run`]:
//!
//! ```text
//! 1. Load       photo.jpg          →  RGBA buffer
//! 2. Adjust     brighten | contrast | greyscale | invert   (optional)
//! 3. Mark       centered text or source-over image overlay
//! 4. Save       photo-with-watermark-N.jpg   (first free N, atomic write)
//! ```
//!
//! The interactive front end ([`prompt`]) only gathers a [`pipeline::RunRequest`];
//! it never touches pixels. Progress flows back to the caller as
//! [`pipeline::PipelineEvent`]s over an `mpsc` channel, and is rendered by
//! [`output`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`prompt`] | Question-and-answer session producing a run request |
//! | [`pipeline`] | Load, adjust, mark, name and save; progress events |
//! | [`imaging`] | Pixel code: tone adjustments, watermark compositing, file I/O |
//! | [`naming`] | `name-with-watermark-N.ext` collision-free output names |
//! | [`config`] | `watermark.toml` loading, merging over defaults, validation |
//! | [`output`] | CLI output formatting for progress, success and errors |
//!
//! # Design Decisions
//!
//! ## Storage Behind a Trait
//!
//! All disk access goes through [`imaging::ImageStore`]. The real
//! [`imaging::FsStore`] decodes with the `image` crate and writes atomically
//! through a temporary file in the destination folder; tests substitute a
//! recording in-memory store and exercise the whole pipeline without a disk.
//!
//! ## Bitmap Text
//!
//! Text watermarks use the public-domain 8x8 glyphs from `font8x8`, scaled by
//! an integer factor. No font files are loaded at runtime, so the binary is
//! self-contained and output is byte-for-byte reproducible.
//!
//! ## Restart Instead of Recursion
//!
//! When a run fails the error is reported and the session starts over. The
//! binary drives this with a plain `loop`; nothing recurses, so a long
//! session cannot grow the stack.

pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod prompt;

#[cfg(test)]
pub(crate) mod test_helpers;
