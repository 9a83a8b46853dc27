//! Error types for annotation operations.

use thiserror::Error;

/// Result type for annotation operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur while building or inspecting annotation state.
///
/// Compositor operations themselves never return these; invalid transitions
/// are absorbed as no-ops. The errors surface from the validating
/// constructors and from snapshot (de)serialization.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// A brush colour was not a `#rgb` or `#rrggbb` hex string.
    #[error("Invalid colour: {0}")]
    InvalidColor(String),

    /// A value was outside the range the operation accepts.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// State snapshot serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
