//! # Photo Booth Core
//!
//! Annotation model for the photo booth: freehand strokes, emoji stamps and
//! text labels recorded over a base photo.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 booth-core                  │
//! ├─────────────────────────────────────────────┤
//! │  Annotations     │  Input                   │
//! │  - Strokes       │  - Mouse / touch events  │
//! │  - Stamps        │  - Client → canvas map   │
//! │  - Text labels   │                          │
//! ├─────────────────────────────────────────────┤
//! │  Compositor                                 │
//! │  - Mode state machine                       │
//! │  - Append-only logs, Repaint instructions   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! The core has no raster dependencies; `booth-renderer` replays a
//! [`CanvasState`] onto pixels.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod annotation;
pub mod compositor;
pub mod error;
pub mod event;
pub mod state;

pub use annotation::{
    Brush, BrushColor, Point, Stamp, StampPreset, Stroke, TextLabel, DEFAULT_BRUSH_COLOR,
    DEFAULT_BRUSH_SIZE, MAX_BRUSH_SIZE, MIN_BRUSH_SIZE, STAMP_PALETTE,
};
pub use compositor::{Compositor, Repaint};
pub use error::{CanvasError, CanvasResult};
pub use event::{ClientRect, PointerEvent, PointerPhase, PointerSource, TouchPoint};
pub use state::{CanvasState, ImageSource, Mode};

/// Booth core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
