//! PNG export of the composited canvas.

use std::path::{Path, PathBuf};

use crate::error::RenderResult;
use crate::raster::Raster;

/// File name used when the canvas is downloaded.
pub const DOWNLOAD_FILE_NAME: &str = "photobooth.png";

/// Encode `raster` as PNG bytes.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn encode_png(raster: &Raster) -> RenderResult<Vec<u8>> {
    raster.encode_png()
}

/// Save `raster` as [`DOWNLOAD_FILE_NAME`] inside `dir`.
///
/// Returns the path written.
///
/// # Errors
///
/// Returns an error if encoding fails or the file cannot be written.
pub fn save_png(raster: &Raster, dir: &Path) -> RenderResult<PathBuf> {
    let png = encode_png(raster)?;
    let path = dir.join(DOWNLOAD_FILE_NAME);
    std::fs::write(&path, &png)?;
    tracing::info!(
        "Saved {}x{} canvas to {} ({} bytes)",
        raster.width(),
        raster.height(),
        path.display(),
        png.len()
    );
    Ok(path)
}
