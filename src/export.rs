//! Poster export
//!
//! Rasterizes the current poster plan, encodes it as PNG fully in memory,
//! and only then hands the complete byte blob to the download sink. A failed
//! rasterization or encode therefore never leaves a partial file behind.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::composition::PosterPlan;
use crate::fonts::FontCatalog;
use crate::render::raster::{rasterize, RenderError};

/// Fixed download name for the composed poster.
pub const DEFAULT_EXPORT_FILENAME: &str = "poster.png";

/// Rasterize and PNG-encode a poster plan at the given pixel-density scale.
pub fn encode_poster(
    plan: &PosterPlan,
    fonts: &FontCatalog,
    scale: f32,
) -> Result<Vec<u8>, RenderError> {
    let raster = rasterize(plan, fonts, scale)?;

    let mut bytes = Vec::new();
    raster.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
    Ok(bytes)
}

/// Hand a finished byte blob to the user as a named file.
///
/// One single write of the complete buffer; there is no retry, a failed save
/// is retried by the user re-triggering the export.
pub fn deliver(bytes: &[u8], path: &Path) -> std::io::Result<()> {
    std::fs::write(path, bytes)
}

/// Full export pipeline: plan -> PNG bytes -> file.
///
/// Returns the absolute path of the written file for the status bar.
pub fn export_poster(
    plan: &PosterPlan,
    fonts: &FontCatalog,
    scale: f32,
    path: &Path,
) -> Result<PathBuf> {
    let bytes = encode_poster(plan, fonts, scale)
        .with_context(|| format!("Failed to render poster for {:?}", path))?;
    deliver(&bytes, path).with_context(|| format!("Failed to write {:?}", path))?;

    Ok(path
        .canonicalize()
        .unwrap_or_else(|_| path.to_path_buf()))
}
