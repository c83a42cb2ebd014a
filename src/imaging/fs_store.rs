//! Filesystem image store built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::ImageReader` with content sniffing |
//! | Encode JPEG | `image::codecs::jpeg::JpegEncoder` at quality 100 |
//! | Encode PNG, TIFF, WebP | `image::RgbaImage::write_to` (lossless) |
//! | Atomic write | `tempfile::NamedTempFile::persist` in the destination directory |

use super::backend::{ImageStore, StoreError};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, ImageReader, RgbaImage};
use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::path::Path;

/// JPEG quality used for every save. There is no lossy quality reduction.
const JPEG_QUALITY: u8 = 100;

/// Mode given to saved files. Temp files start out owner-only.
#[cfg(unix)]
const OUTPUT_MODE: u32 = 0o644;

/// Image store backed by the local filesystem.
pub struct FsStore;

impl FsStore {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FsStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode `image` into memory using the format implied by `path`'s extension.
fn encode(image: &RgbaImage, path: &Path) -> Result<Vec<u8>, StoreError> {
    let format = ImageFormat::from_path(path).map_err(|e| StoreError::Encode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut bytes = Vec::new();
    let result = match format {
        ImageFormat::Jpeg => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgba8(image.clone()).into_rgb8();
            rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY))
        }
        other => image.write_to(&mut Cursor::new(&mut bytes), other),
    };

    result.map_err(|e| StoreError::Encode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(bytes)
}

/// Write `bytes` to a temp file next to `path`, then rename it into place.
fn write_atomically(bytes: &[u8], path: &Path) -> Result<(), StoreError> {
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.flush().map_err(write_err)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(OUTPUT_MODE))
            .map_err(write_err)?;
    }
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

impl ImageStore for FsStore {
    fn load(&self, path: &Path) -> Result<RgbaImage, StoreError> {
        let reader = ImageReader::open(path)
            .and_then(|r| r.with_guessed_format())
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => StoreError::NotFound(path.to_path_buf()),
                _ => StoreError::Read {
                    path: path.to_path_buf(),
                    source: e,
                },
            })?;

        let decoded = reader.decode().map_err(|e| StoreError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(decoded.into_rgba8())
    }

    fn save(&self, image: &RgbaImage, path: &Path) -> Result<(), StoreError> {
        let bytes = encode(image, path)?;
        write_atomically(&bytes, path)
    }

    fn list_names(&self, dir: &Path) -> Result<HashSet<String>, StoreError> {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashSet::new()),
            Err(e) => {
                return Err(StoreError::Read {
                    path: dir.to_path_buf(),
                    source: e,
                });
            }
        };

        let mut names = HashSet::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::Read {
                path: dir.to_path_buf(),
                source: e,
            })?;
            names.insert(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }
}
