//! Canvas state - the value owned by the compositor.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Brush, CanvasResult, Point, Stamp, Stroke, TextLabel};

/// Handle naming the base image (an upload URL, `data:` URI or file path).
///
/// The handle is only referenced; decoding happens outside the core.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageSource(String);

impl ImageSource {
    /// Wrap a URL or path.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// The underlying URL or path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // data: URIs can be megabytes long
        const MAX: usize = 64;
        match self.0.char_indices().nth(MAX) {
            Some((idx, _)) => write!(f, "{}...", &self.0[..idx]),
            None => f.write_str(&self.0),
        }
    }
}

/// Interaction mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Pointer events do nothing.
    #[default]
    Idle,
    /// A freehand draw gesture is active.
    Drawing,
    /// A glyph is armed; each pointer-down places a stamp.
    PlacingStamp,
    /// Text is armed; the next pointer-down places it.
    PlacingText,
}

/// The complete annotation state.
///
/// Fields are read-only from outside the crate; every mutation goes through
/// [`Compositor`](crate::Compositor).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasState {
    pub(crate) base_image: Option<ImageSource>,
    pub(crate) strokes: Vec<Stroke>,
    pub(crate) stamps: Vec<Stamp>,
    pub(crate) texts: Vec<TextLabel>,
    pub(crate) mode: Mode,
    pub(crate) pending_glyph: Option<String>,
    pub(crate) pending_text: Option<String>,
    pub(crate) brush: Brush,
    /// Start of the next stroke segment while a drag is in progress.
    pub(crate) anchor: Option<Point>,
}

impl CanvasState {
    /// Create an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The base image handle, if one has been set.
    #[must_use]
    pub fn base_image(&self) -> Option<&ImageSource> {
        self.base_image.as_ref()
    }

    /// Recorded stroke segments in render order.
    #[must_use]
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Placed stamps in render order.
    #[must_use]
    pub fn stamps(&self) -> &[Stamp] {
        &self.stamps
    }

    /// Placed text labels in render order.
    #[must_use]
    pub fn texts(&self) -> &[TextLabel] {
        &self.texts
    }

    /// Current interaction mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Glyph armed for stamping.
    #[must_use]
    pub fn pending_glyph(&self) -> Option<&str> {
        self.pending_glyph.as_deref()
    }

    /// Text armed for placement.
    #[must_use]
    pub fn pending_text(&self) -> Option<&str> {
        self.pending_text.as_deref()
    }

    /// Brush applied to strokes recorded from now on.
    #[must_use]
    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    /// Anchor of the in-progress drag, if any.
    #[must_use]
    pub fn anchor(&self) -> Option<Point> {
        self.anchor
    }

    /// Whether nothing has been committed: no image and empty logs.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.base_image.is_none()
            && self.strokes.is_empty()
            && self.stamps.is_empty()
            && self.texts.is_empty()
    }

    /// Serialize a snapshot of the state as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> CanvasResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restore a snapshot produced by [`CanvasState::to_json`].
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or holds invalid values.
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_blank_and_idle() {
        let state = CanvasState::new();
        assert!(state.is_blank());
        assert_eq!(state.mode(), Mode::Idle);
        assert_eq!(state.brush(), &Brush::default());
        assert!(state.anchor().is_none());
    }

    #[test]
    fn snapshot_survives_json() {
        let mut state = CanvasState::new();
        state.base_image = Some(ImageSource::new("file:///tmp/photo.png"));
        state.stamps.push(Stamp {
            glyph: "\u{2b50}".to_string(),
            position: Point::new(10.0, 10.0),
        });
        state.mode = Mode::PlacingStamp;

        let json = state.to_json().unwrap();
        assert!(json.contains("placing_stamp"));
        assert_eq!(CanvasState::from_json(&json).unwrap(), state);
    }

    #[test]
    fn snapshot_rejects_bad_colour() {
        let json = CanvasState::new()
            .to_json()
            .unwrap()
            .replace("#ff0000", "crimson");
        assert!(CanvasState::from_json(&json).is_err());
    }

    #[test]
    fn long_sources_are_truncated_for_display() {
        let source = ImageSource::new(format!("data:image/png;base64,{}", "A".repeat(500)));
        let shown = source.to_string();
        assert!(shown.ends_with("..."));
        assert!(shown.len() < 80);
        assert_eq!(ImageSource::new("a.png").to_string(), "a.png");
    }
}
