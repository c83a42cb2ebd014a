//! Output filename resolution for watermarked images.
//!
//! Results are written next to the input as
//! `{name}-with-watermark-{n}.{ext}`, where `n` is the smallest positive
//! integer whose name is not already taken in the directory. Earlier outputs
//! are therefore never overwritten:
//!
//! - `photo.jpg` in an empty folder → `photo-with-watermark-1.jpg`
//! - run again → `photo-with-watermark-2.jpg`
//! - `archive.tar.gz` → `archive.tar-with-watermark-1.gz`

use std::collections::HashSet;
use thiserror::Error;

/// Marker inserted between the input stem and the counter.
pub const OUTPUT_MARKER: &str = "with-watermark";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NamingError {
    #[error("Invalid filename '{0}': expected name.extension")]
    InvalidFilename(String),
}

/// Split `filename` into stem and extension at the last `.`.
///
/// - `"photo.jpg"` → `("photo", "jpg")`
/// - `"my.holiday.png"` → `("my.holiday", "png")`
/// - `"noext"`, `".png"`, `"photo."` → [`NamingError::InvalidFilename`]
pub fn split_filename(filename: &str) -> Result<(&str, &str), NamingError> {
    match filename.rsplit_once('.') {
        Some((name, ext)) if !name.is_empty() && !ext.is_empty() => Ok((name, ext)),
        _ => Err(NamingError::InvalidFilename(filename.to_string())),
    }
}

/// Format the `n`th output candidate for a stem and extension.
fn candidate(name: &str, ext: &str, n: u64) -> String {
    format!("{name}-{OUTPUT_MARKER}-{n}.{ext}")
}

/// Pick the first output name for `input` that is not in `existing`.
pub fn resolve_output_name(
    input: &str,
    existing: &HashSet<String>,
) -> Result<String, NamingError> {
    let (name, ext) = split_filename(input)?;
    // `existing` is finite, so this terminates
    let mut n = 1;
    loop {
        let name = candidate(name, ext, n);
        if !existing.contains(&name) {
            return Ok(name);
        }
        n += 1;
    }
}
