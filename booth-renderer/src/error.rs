//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while loading, rendering or exporting.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Image resolution or decoding failed.
    #[error("Failed to load resource: {0}")]
    Resource(String),

    /// Rasterization failed.
    #[error("Rasterization failed: {0}")]
    Raster(String),

    /// Encoding the raster failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// Filesystem error while reading an image or saving an export.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
