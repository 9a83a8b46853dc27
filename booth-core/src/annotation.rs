//! Annotation entities - the records the compositor appends to its logs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CanvasError, CanvasResult};

/// Smallest brush width in pixels.
pub const MIN_BRUSH_SIZE: f32 = 1.0;

/// Largest brush width in pixels.
pub const MAX_BRUSH_SIZE: f32 = 20.0;

/// Brush width used at session start.
pub const DEFAULT_BRUSH_SIZE: f32 = 5.0;

/// Brush colour used at session start.
pub const DEFAULT_BRUSH_COLOR: &str = "#ff0000";

/// A point in canvas-local pixel coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X position (pixels from left).
    pub x: f32,
    /// Y position (pixels from top).
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates are finite numbers.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A validated hex colour, stored as lowercase `#rrggbb`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BrushColor(String);

impl BrushColor {
    /// Parse a `#rgb` or `#rrggbb` hex colour (case insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidColor`] if the input is not a hex colour.
    pub fn parse(input: &str) -> CanvasResult<Self> {
        let invalid = || CanvasError::InvalidColor(input.to_string());
        let hex = input.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let normalized = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect::<String>(),
            6 => hex.to_string(),
            _ => return Err(invalid()),
        };

        Ok(Self(format!("#{}", normalized.to_ascii_lowercase())))
    }

    /// The normalized `#rrggbb` form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The colour as red, green and blue channels.
    #[must_use]
    pub fn rgb(&self) -> [u8; 3] {
        let channel = |i: usize| u8::from_str_radix(&self.0[i..i + 2], 16).unwrap_or(0);
        [channel(1), channel(3), channel(5)]
    }
}

impl Default for BrushColor {
    fn default() -> Self {
        Self(DEFAULT_BRUSH_COLOR.to_string())
    }
}

impl FromStr for BrushColor {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for BrushColor {
    type Error = CanvasError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BrushColor> for String {
    fn from(color: BrushColor) -> Self {
        color.0
    }
}

impl fmt::Display for BrushColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Brush parameters applied to strokes recorded from now on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brush {
    /// Stroke colour.
    pub color: BrushColor,
    /// Stroke width in pixels, within `[MIN_BRUSH_SIZE, MAX_BRUSH_SIZE]`.
    pub size: f32,
}

impl Brush {
    /// Create a brush, clamping `size` into the allowed range.
    ///
    /// # Errors
    ///
    /// Returns an error if the colour does not parse or the size is not finite.
    pub fn new(color: &str, size: f32) -> CanvasResult<Self> {
        if !size.is_finite() {
            return Err(CanvasError::InvalidValue(format!("brush size {size}")));
        }
        Ok(Self {
            color: BrushColor::parse(color)?,
            size: size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE),
        })
    }
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color: BrushColor::default(),
            size: DEFAULT_BRUSH_SIZE,
        }
    }
}

/// One recorded segment of a freehand path.
///
/// A drag gesture produces many strokes, each carrying the brush that was
/// active when it was recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Segment start.
    pub from: Point,
    /// Segment end.
    pub to: Point,
    /// Colour at record time.
    pub color: BrushColor,
    /// Width at record time.
    pub size: f32,
}

/// A placed emoji or glyph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stamp {
    /// The glyph (usually a single emoji grapheme).
    pub glyph: String,
    /// Baseline-left position of the glyph.
    pub position: Point,
}

/// A placed text label, drawn with fixed styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLabel {
    /// Non-empty, trimmed content.
    pub content: String,
    /// Baseline-left position of the text.
    pub position: Point,
}

/// A quick-pick stamp offered next to the full emoji picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StampPreset {
    /// The glyph placed on the canvas.
    pub glyph: &'static str,
    /// Human-readable label.
    pub label: &'static str,
}

/// Built-in stamp palette.
pub const STAMP_PALETTE: [StampPreset; 5] = [
    StampPreset {
        glyph: "\u{2b50}",
        label: "Star",
    },
    StampPreset {
        glyph: "\u{2764}\u{fe0f}",
        label: "Heart",
    },
    StampPreset {
        glyph: "\u{1f60a}",
        label: "Smile",
    },
    StampPreset {
        glyph: "\u{1f525}",
        label: "Fire",
    },
    StampPreset {
        glyph: "\u{1f389}",
        label: "Party",
    },
];
