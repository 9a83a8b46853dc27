//! The photo booth session.
//!
//! [`PhotoBooth`] owns the compositor, the render pipeline and the visible
//! surface, and routes every user action through them. Annotation calls are
//! fail-silent: whatever the compositor rejects is simply not drawn.

use std::path::{Path, PathBuf};

use booth_core::{
    CanvasState, ClientRect, Compositor, ImageSource, Mode, Point, PointerEvent, PointerPhase,
    Repaint, STAMP_PALETTE,
};
use booth_renderer::{
    encode_png, save_png, BaseImage, Frame, Raster, RenderPipeline, Surface, Viewport,
};

use crate::config::BoothConfig;
use crate::error::BoothResult;
use crate::loader::{LoadedImage, PendingImage};

/// Horizontal offset of text added with [`PhotoBooth::add_text`], left of centre.
const ADD_TEXT_OFFSET_X: f32 = 50.0;

/// A single photo booth session.
#[derive(Debug)]
pub struct PhotoBooth {
    compositor: Compositor,
    pipeline: RenderPipeline,
    surface: Surface,
    image: Option<BaseImage>,
    viewport: Viewport,
    draw_tool: bool,
}

impl PhotoBooth {
    /// Start a session with a blank canvas.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial surface cannot be allocated.
    pub fn new(config: BoothConfig) -> BoothResult<Self> {
        let pipeline = RenderPipeline::new(config.renderer);
        let surface = Surface::new(&pipeline)?;
        tracing::info!(
            "Photo booth session started ({}x{} blank canvas)",
            surface.raster().width(),
            surface.raster().height()
        );
        Ok(Self {
            compositor: Compositor::new(),
            pipeline,
            surface,
            image: None,
            viewport: config.viewport,
            draw_tool: false,
        })
    }

    /// The annotation state.
    #[must_use]
    pub fn state(&self) -> &CanvasState {
        self.compositor.state()
    }

    /// Current input mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.compositor.mode()
    }

    /// The pixels currently on screen.
    #[must_use]
    pub fn raster(&self) -> &Raster {
        self.surface.raster()
    }

    /// The decoded base image, once a load has finished.
    #[must_use]
    pub fn base_image(&self) -> Option<&BaseImage> {
        self.image.as_ref()
    }

    /// Whether the draw tool is selected.
    #[must_use]
    pub fn draw_tool_selected(&self) -> bool {
        self.draw_tool
    }

    // ------------------------------------------------------------------
    // Base image
    // ------------------------------------------------------------------

    /// An upload finished; `url` becomes the base image.
    ///
    /// The returned [`PendingImage`] must be resolved and handed back to
    /// [`PhotoBooth::finish_load`]. Until then the surface keeps its pixels
    /// and annotations are recorded for the next full render.
    pub fn on_upload_complete(&mut self, url: &str) -> PendingImage {
        let source = ImageSource::new(url);
        tracing::info!(source = %source, "Upload complete");
        if self.image.as_ref().is_some_and(|img| img.source() != &source) {
            self.image = None;
        }
        self.draw_tool = false;
        let repaint = self.compositor.set_base_image(source.clone());
        self.repaint(&repaint);
        PendingImage::new(source)
    }

    /// Install a finished load and re-render everything.
    ///
    /// Returns `false` when the load is discarded: it failed, or the base
    /// image changed (new upload or reset) while it was in flight.
    pub fn finish_load(&mut self, loaded: LoadedImage) -> bool {
        let (source, result) = loaded.into_parts();
        if self.compositor.state().base_image() != Some(&source) {
            tracing::debug!(source = %source, "Discarding stale image load");
            return false;
        }
        match result {
            Ok(image) => {
                tracing::info!(
                    source = %source,
                    "Base image ready ({}x{}, {:?})",
                    image.width(),
                    image.height(),
                    image.format()
                );
                self.image = Some(image);
                self.redraw()
            }
            Err(e) => {
                tracing::warn!(source = %source, error = %e, "Base image unavailable; canvas stays deferred");
                self.image = None;
                false
            }
        }
    }

    /// Upload `url` and wait for it to load.
    pub async fn load_image(&mut self, url: &str) -> bool {
        let loaded = self.on_upload_complete(url).resolve().await;
        self.finish_load(loaded)
    }

    // ------------------------------------------------------------------
    // Tools
    // ------------------------------------------------------------------

    /// A glyph was picked from the palette; the next click stamps it.
    pub fn on_glyph_select(&mut self, glyph: &str) {
        self.draw_tool = false;
        let repaint = self.compositor.arm_stamp(glyph);
        self.repaint(&repaint);
    }

    /// Arm the palette entry at `index`. Returns `false` if there is none.
    pub fn select_stamp(&mut self, index: usize) -> bool {
        let Some(preset) = STAMP_PALETTE.get(index) else {
            tracing::trace!("No stamp at palette index {index}");
            return false;
        };
        tracing::debug!("Selected stamp {}", preset.label);
        self.on_glyph_select(preset.glyph);
        true
    }

    /// Select the brush. It stays selected across drags until another tool
    /// is picked.
    pub fn select_draw_tool(&mut self) {
        self.draw_tool = true;
        let repaint = self.compositor.begin_draw();
        self.repaint(&repaint);
    }

    /// Arm `text` for placement at the next click.
    pub fn arm_text(&mut self, text: &str) {
        self.draw_tool = false;
        let repaint = self.compositor.arm_text(text);
        self.repaint(&repaint);
    }

    /// Place `text` just left of the canvas centre.
    ///
    /// Blank text is ignored and leaves the current tool armed.
    pub fn add_text(&mut self, text: &str) {
        if text.trim().is_empty() {
            tracing::trace!("Ignoring blank text");
            return;
        }
        self.arm_text(text);
        #[allow(clippy::cast_precision_loss)]
        let (w, h) = (
            self.surface.raster().width() as f32,
            self.surface.raster().height() as f32,
        );
        let repaint = self
            .compositor
            .pointer_down(Point::new(w / 2.0 - ADD_TEXT_OFFSET_X, h / 2.0));
        self.repaint(&repaint);
    }

    /// Change the brush for future strokes. Invalid values are ignored.
    pub fn set_brush(&mut self, color: &str, size: f32) {
        let repaint = self.compositor.set_brush(color, size);
        self.repaint(&repaint);
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Route a pointer event. `rect` is the canvas's on-screen box.
    pub fn pointer(&mut self, event: &PointerEvent, rect: &ClientRect) {
        if event.phase == PointerPhase::Down && self.draw_tool && self.mode() == Mode::Idle {
            let _ = self.compositor.begin_draw();
        }
        let repaint = self.compositor.handle_event(event, rect);
        self.repaint(&repaint);
    }

    /// Client rect for a canvas shown unscaled at the page origin.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn unscaled_rect(&self) -> ClientRect {
        ClientRect::new(
            0.0,
            0.0,
            self.surface.raster().width() as f32,
            self.surface.raster().height() as f32,
        )
    }

    /// Clear every annotation and the base image.
    pub fn reset(&mut self) {
        self.image = None;
        self.draw_tool = false;
        let repaint = self.compositor.reset();
        self.repaint(&repaint);
        tracing::info!("Canvas reset");
    }

    /// The space available for the canvas changed.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        let viewport = Viewport::new(width, height);
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        tracing::debug!("Viewport now {width}x{height}");
        self.redraw();
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// Replay the whole state for export.
    ///
    /// While the base image is still loading, or after it failed to load,
    /// the annotations are replayed on a blank canvas without it. Pixels of
    /// an earlier photo are never exported.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn export_raster(&self) -> BoothResult<Raster> {
        let state = self.compositor.state();
        match self.pipeline.render(state, self.image.as_ref(), self.viewport)? {
            Frame::Ready(raster) => Ok(raster),
            Frame::Deferred => {
                tracing::warn!("Base image not ready; exporting annotations only");
                Ok(self.pipeline.render_annotations(state)?)
            }
        }
    }

    /// The composited canvas as PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or encoding fails.
    pub fn export_png(&self) -> BoothResult<Vec<u8>> {
        Ok(encode_png(&self.export_raster()?)?)
    }

    /// Save the composited canvas as `photobooth.png` in `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering, encoding or writing fails.
    pub fn download_image(&self, dir: &Path) -> BoothResult<PathBuf> {
        Ok(save_png(&self.export_raster()?, dir)?)
    }

    /// Snapshot of the annotation state as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn state_json(&self) -> BoothResult<String> {
        Ok(self.compositor.state().to_json()?)
    }

    /// Resume from a snapshot produced by [`PhotoBooth::state_json`].
    ///
    /// Returns a loader for the snapshot's base image when it still has to
    /// be decoded. Until then the canvas stays blank.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot is not valid JSON state. The session
    /// is left unchanged in that case.
    pub fn restore(&mut self, json: &str) -> BoothResult<Option<PendingImage>> {
        let state = CanvasState::from_json(json)?;
        if self
            .image
            .as_ref()
            .is_some_and(|img| Some(img.source()) != state.base_image())
        {
            self.image = None;
        }
        let pending = match (state.base_image(), &self.image) {
            (Some(source), None) => Some(PendingImage::new(source.clone())),
            _ => None,
        };

        tracing::info!(
            "Restored session: {} strokes, {} stamps, {} texts",
            state.strokes().len(),
            state.stamps().len(),
            state.texts().len()
        );
        self.compositor = Compositor::from_state(state);
        self.draw_tool = self.compositor.mode() == Mode::Drawing;
        self.repaint(&Repaint::Clear);
        self.repaint(&Repaint::Full);
        Ok(pending)
    }

    fn repaint(&mut self, repaint: &Repaint) {
        if repaint.is_none() {
            return;
        }
        if let Err(e) = self.surface.apply(
            repaint,
            &self.pipeline,
            self.compositor.state(),
            self.image.as_ref(),
            self.viewport,
        ) {
            tracing::warn!(error = %e, "Repaint failed");
        }
    }

    fn redraw(&mut self) -> bool {
        match self.surface.redraw(
            &self.pipeline,
            self.compositor.state(),
            self.image.as_ref(),
            self.viewport,
        ) {
            Ok(ready) => ready,
            Err(e) => {
                tracing::warn!(error = %e, "Redraw failed");
                false
            }
        }
    }
}
