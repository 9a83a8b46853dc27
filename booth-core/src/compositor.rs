//! The annotation compositor - owner of [`CanvasState`] and the only way to
//! mutate it.
//!
//! Every operation returns a [`Repaint`] telling the caller how the visible
//! surface must catch up. Invalid transitions (pointer events while idle, a
//! move without a preceding down, blank text) are absorbed as no-ops.

use crate::{
    Brush, CanvasState, ClientRect, ImageSource, Mode, Point, PointerEvent, PointerPhase, Stamp,
    Stroke, TextLabel,
};

/// How the visible surface must be updated after an operation.
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub enum Repaint {
    /// Nothing visible changed.
    None,
    /// Draw this freshly recorded segment on top of the current surface.
    Segment(Stroke),
    /// Draw this freshly placed stamp on top of the current surface.
    Stamp(Stamp),
    /// Rebuild the surface from the full state.
    Full,
    /// The state was reset; show a blank surface.
    Clear,
}

impl Repaint {
    /// Whether anything needs to be redrawn.
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Owner of the annotation state.
#[derive(Debug, Clone, Default)]
pub struct Compositor {
    state: CanvasState,
}

impl Compositor {
    /// Create a compositor with an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from a saved state.
    ///
    /// Any drag in progress when the state was saved is dropped.
    #[must_use]
    pub fn from_state(mut state: CanvasState) -> Self {
        state.anchor = None;
        Self { state }
    }

    /// Read-only view of the current state.
    #[must_use]
    pub fn state(&self) -> &CanvasState {
        &self.state
    }

    /// Current interaction mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    /// Replace the base image.
    ///
    /// Text labels are cleared along with it; strokes and stamps are kept.
    pub fn set_base_image(&mut self, source: ImageSource) -> Repaint {
        tracing::debug!(
            "Base image set to {source}, dropping {} text labels",
            self.state.texts.len()
        );
        self.state.base_image = Some(source);
        self.state.texts.clear();
        self.disarm();
        Repaint::Full
    }

    /// Select freehand drawing.
    pub fn begin_draw(&mut self) -> Repaint {
        self.disarm();
        self.state.mode = Mode::Drawing;
        Repaint::None
    }

    /// Handle a pointer press at `point`.
    pub fn pointer_down(&mut self, point: Point) -> Repaint {
        if !point.is_finite() {
            tracing::trace!("Ignoring pointer down at non-finite point");
            return Repaint::None;
        }

        match self.state.mode {
            Mode::Drawing => {
                self.state.anchor = Some(point);
                Repaint::None
            }
            Mode::PlacingStamp => {
                let Some(glyph) = self.state.pending_glyph.clone() else {
                    tracing::trace!("Stamp mode without a glyph; ignoring pointer down");
                    return Repaint::None;
                };
                let stamp = Stamp {
                    glyph,
                    position: point,
                };
                tracing::debug!("Stamp {} placed at ({}, {})", stamp.glyph, point.x, point.y);
                self.state.stamps.push(stamp.clone());
                Repaint::Stamp(stamp)
            }
            Mode::PlacingText => {
                let Some(content) = self.state.pending_text.take() else {
                    tracing::trace!("Text mode without text; ignoring pointer down");
                    self.state.mode = Mode::Idle;
                    return Repaint::None;
                };
                tracing::debug!("Text label placed at ({}, {})", point.x, point.y);
                self.state.texts.push(TextLabel {
                    content,
                    position: point,
                });
                self.state.mode = Mode::Idle;
                Repaint::Full
            }
            Mode::Idle => Repaint::None,
        }
    }

    /// Handle pointer motion to `point`.
    ///
    /// Records one stroke segment from the anchor while a draw gesture is in
    /// progress.
    pub fn pointer_move(&mut self, point: Point) -> Repaint {
        if self.state.mode != Mode::Drawing || !point.is_finite() {
            return Repaint::None;
        }
        let Some(anchor) = self.state.anchor else {
            tracing::trace!("Pointer move without a preceding down");
            return Repaint::None;
        };

        let stroke = Stroke {
            from: anchor,
            to: point,
            color: self.state.brush.color.clone(),
            size: self.state.brush.size,
        };
        self.state.strokes.push(stroke.clone());
        self.state.anchor = Some(point);
        Repaint::Segment(stroke)
    }

    /// Handle pointer release. Ends the current path.
    pub fn pointer_up(&mut self) -> Repaint {
        if self.state.mode == Mode::Drawing {
            if self.state.anchor.is_some() {
                tracing::debug!("Path ended, {} segments recorded", self.state.strokes.len());
            }
            self.state.mode = Mode::Idle;
        }
        self.state.anchor = None;
        Repaint::None
    }

    /// Arm `glyph` for stamping. Stays armed across placements.
    pub fn arm_stamp(&mut self, glyph: &str) -> Repaint {
        if glyph.trim().is_empty() {
            tracing::trace!("Rejecting empty glyph");
            return Repaint::None;
        }
        self.disarm();
        self.state.pending_glyph = Some(glyph.to_string());
        self.state.mode = Mode::PlacingStamp;
        Repaint::None
    }

    /// Arm `text` for placement at the next pointer down.
    ///
    /// The text is trimmed; empty or whitespace-only input is ignored.
    pub fn arm_text(&mut self, text: &str) -> Repaint {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            tracing::trace!("Rejecting blank text");
            return Repaint::None;
        }
        self.disarm();
        self.state.pending_text = Some(trimmed.to_string());
        self.state.mode = Mode::PlacingText;
        Repaint::None
    }

    /// Set the brush for subsequent strokes.
    ///
    /// The size is clamped to the brush range. An unparseable colour or a
    /// non-finite size leaves the brush unchanged.
    pub fn set_brush(&mut self, color: &str, size: f32) -> Repaint {
        match Brush::new(color, size) {
            Ok(brush) => self.state.brush = brush,
            Err(e) => tracing::trace!("Keeping current brush: {e}"),
        }
        Repaint::None
    }

    /// Clear the image and every log, and return to idle.
    pub fn reset(&mut self) -> Repaint {
        tracing::debug!("Resetting canvas state");
        self.state = CanvasState::new();
        Repaint::Clear
    }

    /// Dispatch a raw pointer event, mapping it through `rect` first.
    pub fn handle_event(&mut self, event: &PointerEvent, rect: &ClientRect) -> Repaint {
        if event.phase.ends_gesture() {
            return self.pointer_up();
        }
        let Some(point) = event.canvas_point(rect) else {
            return Repaint::None;
        };
        if event.phase == PointerPhase::Down {
            self.pointer_down(point)
        } else {
            self.pointer_move(point)
        }
    }

    fn disarm(&mut self) {
        self.state.pending_glyph = None;
        self.state.pending_text = None;
        self.state.anchor = None;
        self.state.mode = Mode::Idle;
    }
}
