//! Photo loading and the session image handle
//!
//! Handles decoding of the uploaded background photo. Exactly one
//! `PhotoAsset` is active at a time; re-uploading replaces it wholesale.

use anyhow::{Context, Result};
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The decoded background photo held for the current session.
///
/// The pixel data is shared behind an `Arc` so workers can rasterize from it
/// without copying; dropping the last handle releases the old photo on
/// replacement. The `generation` stamp identifies which upload produced this
/// asset so a superseded decode can be discarded (see `AppState`).
#[derive(Debug, Clone)]
pub struct PhotoAsset {
    pub pixels: Arc<DynamicImage>,
    pub source: Option<PathBuf>,
    pub generation: u64,
}

impl PhotoAsset {
    pub fn new(image: DynamicImage, source: Option<PathBuf>, generation: u64) -> Self {
        Self {
            pixels: Arc::new(image),
            source,
            generation,
        }
    }

    /// Wrap an already shared image, avoiding a second allocation when the
    /// decode happened on a worker thread.
    pub fn from_arc(pixels: Arc<DynamicImage>, source: Option<PathBuf>, generation: u64) -> Self {
        Self {
            pixels,
            source,
            generation,
        }
    }

    /// Intrinsic pixel dimensions of the decoded photo.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.pixels.width(), self.pixels.height())
    }

    pub fn file_name(&self) -> Option<String> {
        self.source
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
    }
}

/// Decode a photo from a file path
///
/// Supports PNG, JPEG, GIF, and WebP formats.
pub fn load_photo(path: &Path) -> Result<DynamicImage> {
    let img = image::open(path).with_context(|| format!("Failed to load photo: {:?}", path))?;
    Ok(img)
}

/// Decode a photo from in-memory bytes
pub fn load_photo_from_bytes(bytes: &[u8]) -> Result<DynamicImage> {
    let img = image::load_from_memory(bytes).context("Failed to decode photo from memory")?;
    Ok(img)
}

/// Get supported photo format extensions
pub fn supported_extensions() -> &'static [&'static str] {
    &["png", "jpg", "jpeg", "gif", "webp"]
}

/// Check if a file extension is a supported photo format
pub fn is_supported_format(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext_lower = ext.to_lowercase();
            supported_extensions().iter().any(|&e| e == ext_lower)
        })
        .unwrap_or(false)
}
