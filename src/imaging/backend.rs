//! Image storage trait and shared error type.
//!
//! The [`ImageStore`] trait defines the three operations the pipeline needs
//! from the outside world: load, save, and list a directory.
//!
//! The production implementation is [`FsStore`](super::fs_store::FsStore),
//! backed by the local filesystem and the `image` crate's codecs. Tests use a
//! recording mock so the orchestrator can be exercised without touching disk.

use image::RgbaImage;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to decode {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to encode {}: {message}", path.display())]
    Encode { path: PathBuf, message: String },
}

/// Loads and saves decoded images.
///
/// Every buffer crossing this boundary is 8-bit RGBA, whatever the file's
/// native channel layout.
pub trait ImageStore {
    /// Decode the image at `path`.
    fn load(&self, path: &Path) -> Result<RgbaImage, StoreError>;

    /// Encode `image` at maximum quality and write it to `path`.
    ///
    /// Implementations must not leave a partially written file behind.
    fn save(&self, image: &RgbaImage, path: &Path) -> Result<(), StoreError>;

    /// Names of the entries directly inside `dir`. A missing directory is empty.
    fn list_names(&self, dir: &Path) -> Result<HashSet<String>, StoreError>;
}
