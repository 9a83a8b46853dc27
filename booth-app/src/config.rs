//! Session configuration.

use booth_renderer::{RendererConfig, Viewport};
use serde::{Deserialize, Serialize};

use crate::error::BoothResult;

/// Configuration for a [`PhotoBooth`](crate::PhotoBooth) session.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// let config = booth_app::BoothConfig::from_json(r#"{"renderer":{"fit":"cover"}}"#).unwrap();
/// assert_eq!(config.renderer.fit, booth_renderer::FitPolicy::Cover);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoothConfig {
    /// Render pipeline settings.
    pub renderer: RendererConfig,
    /// Initial space available for the canvas.
    pub viewport: Viewport,
}

impl BoothConfig {
    /// Parse a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or has wrongly typed fields.
    pub fn from_json(json: &str) -> BoothResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use booth_renderer::FitPolicy;

    #[test]
    fn empty_document_gives_defaults() {
        assert_eq!(BoothConfig::from_json("{}").unwrap(), BoothConfig::default());
    }

    #[test]
    fn partial_renderer_section_keeps_other_defaults() {
        let config =
            BoothConfig::from_json(r#"{"renderer":{"fit":"contain","max_width":640}}"#).unwrap();
        assert_eq!(config.renderer.fit, FitPolicy::Contain);
        assert_eq!(config.renderer.max_width, 640);
        assert_eq!(config.renderer.max_height, 600);
        assert!((config.renderer.stamp_font.size - 40.0).abs() < f32::EPSILON);
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(BoothConfig::from_json(r#"{"renderer":{"fit":"stretch"}}"#).is_err());
        assert!(BoothConfig::from_json("not json").is_err());
    }
}
