//! Pointer input and the mapping from client to canvas coordinates.
//!
//! Mouse and touch payloads are normalized here into a single [`Point`]
//! before they reach the compositor.

use serde::{Deserialize, Serialize};

use crate::Point;

/// Phase of a pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Button pressed or finger down.
    Down,
    /// Pointer moved.
    Move,
    /// Button released or finger lifted.
    Up,
    /// Touch cancelled by the platform.
    Cancel,
    /// Mouse left the canvas.
    Leave,
}

impl PointerPhase {
    /// Whether this phase ends an in-progress gesture.
    #[must_use]
    pub fn ends_gesture(self) -> bool {
        matches!(self, Self::Up | Self::Cancel | Self::Leave)
    }
}

/// A single touch point in client (viewport) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    /// Touch identifier (for multi-touch).
    pub id: u32,
    /// X position relative to the viewport.
    pub client_x: f32,
    /// Y position relative to the viewport.
    pub client_y: f32,
}

/// Where a pointer event came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PointerSource {
    /// Mouse cursor.
    Mouse {
        /// X position relative to the viewport.
        client_x: f32,
        /// Y position relative to the viewport.
        client_y: f32,
    },
    /// All currently active touch points.
    Touch(Vec<TouchPoint>),
}

/// The on-screen bounding rectangle of the canvas.
///
/// The rectangle changes across resizes and scrolls, so it is supplied with
/// every event rather than cached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientRect {
    /// Left edge relative to the viewport.
    pub left: f32,
    /// Top edge relative to the viewport.
    pub top: f32,
    /// Width in CSS pixels.
    pub width: f32,
    /// Height in CSS pixels.
    pub height: f32,
}

impl ClientRect {
    /// Create a rectangle.
    #[must_use]
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Map client coordinates into canvas-local coordinates.
    #[must_use]
    pub fn to_canvas(&self, client_x: f32, client_y: f32) -> Point {
        Point::new(client_x - self.left, client_y - self.top)
    }
}

/// A raw pointer event as delivered by the input device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Phase of this event.
    pub phase: PointerPhase,
    /// Device payload.
    pub source: PointerSource,
    /// Timestamp in milliseconds since session start.
    pub timestamp_ms: u64,
}

impl PointerEvent {
    /// Create a mouse event.
    #[must_use]
    pub fn mouse(phase: PointerPhase, client_x: f32, client_y: f32) -> Self {
        Self {
            phase,
            source: PointerSource::Mouse { client_x, client_y },
            timestamp_ms: 0,
        }
    }

    /// Create a touch event.
    #[must_use]
    pub fn touch(phase: PointerPhase, touches: Vec<TouchPoint>) -> Self {
        Self {
            phase,
            source: PointerSource::Touch(touches),
            timestamp_ms: 0,
        }
    }

    /// Set the timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }

    /// Get the primary (first) touch point, if this is a touch event.
    #[must_use]
    pub fn primary_touch(&self) -> Option<&TouchPoint> {
        match &self.source {
            PointerSource::Touch(touches) => touches.first(),
            PointerSource::Mouse { .. } => None,
        }
    }

    /// Position of this event in canvas-local coordinates.
    ///
    /// Touch events use the first active touch; a touch event without any
    /// active touches has no position.
    #[must_use]
    pub fn canvas_point(&self, rect: &ClientRect) -> Option<Point> {
        match &self.source {
            PointerSource::Mouse { client_x, client_y } => {
                Some(rect.to_canvas(*client_x, *client_y))
            }
            PointerSource::Touch(_) => self
                .primary_touch()
                .map(|touch| rect.to_canvas(touch.client_x, touch.client_y)),
        }
    }
}
