//! Session error types.

use booth_core::CanvasError;
use booth_renderer::RenderError;
use thiserror::Error;

/// Result type for session operations.
pub type BoothResult<T> = Result<T, BoothError>;

/// Errors surfaced by the photo booth session.
#[derive(Debug, Error)]
pub enum BoothError {
    /// Rendering, image loading or export failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// State snapshot failed.
    #[error(transparent)]
    Canvas(#[from] CanvasError),

    /// Configuration could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
