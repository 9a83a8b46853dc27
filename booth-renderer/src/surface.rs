//! The visible raster surface.
//!
//! Full replays come from the [`RenderPipeline`]; between them the surface
//! takes incremental draws so drag feedback does not wait on a replay.

use booth_core::{CanvasState, Repaint, Stroke};
use tiny_skia::{LineCap, Paint, PathBuilder, Stroke as SkStroke, Transform};

use crate::error::RenderResult;
use crate::image::BaseImage;
use crate::layout::Viewport;
use crate::pipeline::{Frame, RenderPipeline};
use crate::raster::Raster;

/// The raster currently shown to the user.
#[derive(Debug, Clone)]
pub struct Surface {
    raster: Raster,
}

impl Surface {
    /// A blank surface at the pipeline's default canvas size.
    ///
    /// # Errors
    ///
    /// Returns an error if the raster cannot be allocated.
    pub fn new(pipeline: &RenderPipeline) -> RenderResult<Self> {
        Ok(Self {
            raster: pipeline.render_blank()?,
        })
    }

    /// The current pixels.
    #[must_use]
    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// Bring the surface up to date after an operation.
    ///
    /// # Errors
    ///
    /// Returns an error if a replay or stamp draw fails.
    pub fn apply(
        &mut self,
        repaint: &Repaint,
        pipeline: &RenderPipeline,
        state: &CanvasState,
        image: Option<&BaseImage>,
        viewport: Viewport,
    ) -> RenderResult<()> {
        match repaint {
            Repaint::None => Ok(()),
            Repaint::Segment(stroke) => {
                self.draw_segment(stroke);
                Ok(())
            }
            Repaint::Stamp(stamp) => pipeline.draw_stamp(&mut self.raster, stamp),
            Repaint::Full => self.redraw(pipeline, state, image, viewport).map(|_| ()),
            Repaint::Clear => {
                self.raster = pipeline.render_blank()?;
                Ok(())
            }
        }
    }

    /// Replace the surface with a full replay of `state`.
    ///
    /// Returns `false` and leaves the surface untouched when the render is
    /// deferred on a base image that is not decoded yet.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn redraw(
        &mut self,
        pipeline: &RenderPipeline,
        state: &CanvasState,
        image: Option<&BaseImage>,
        viewport: Viewport,
    ) -> RenderResult<bool> {
        match pipeline.render(state, image, viewport)? {
            Frame::Ready(raster) => {
                self.raster = raster;
                Ok(true)
            }
            Frame::Deferred => Ok(false),
        }
    }

    /// Draw a single segment straight onto the pixels.
    pub fn draw_segment(&mut self, stroke: &Stroke) {
        let mut pb = PathBuilder::new();
        pb.move_to(stroke.from.x, stroke.from.y);
        pb.line_to(stroke.to.x, stroke.to.y);
        let Some(path) = pb.finish() else {
            return;
        };

        let [r, g, b] = stroke.color.rgb();
        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, 255);
        paint.anti_alias = true;

        let sk_stroke = SkStroke {
            width: stroke.size,
            line_cap: LineCap::Round,
            ..SkStroke::default()
        };
        self.raster.pixmap_mut().stroke_path(
            &path,
            &paint,
            &sk_stroke,
            Transform::identity(),
            None,
        );
    }
}
