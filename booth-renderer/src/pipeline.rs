//! The render pipeline: rebuilds the canvas from a [`CanvasState`].
//!
//! The state is lowered to an SVG document (base image, then strokes, stamps
//! and text in log order) and rasterized with resvg into a fresh tiny-skia
//! pixmap. Nothing is carried over between renders, so rendering the same
//! state twice yields identical pixels.

use std::fmt::Write;
use std::sync::Arc;

use booth_core::{CanvasState, Stamp, Stroke, TextLabel};

use crate::error::{RenderError, RenderResult};
use crate::fonts;
use crate::image::BaseImage;
use crate::layout::{CanvasLayout, Viewport};
use crate::raster::Raster;
use crate::RendererConfig;

/// Result of a render.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// The fully replayed canvas.
    Ready(Raster),
    /// The state references a base image that has not been decoded yet.
    Deferred,
}

impl Frame {
    /// The raster, if the frame is ready.
    #[must_use]
    pub fn into_raster(self) -> Option<Raster> {
        match self {
            Self::Ready(raster) => Some(raster),
            Self::Deferred => None,
        }
    }
}

/// Replays annotation state onto a raster.
pub struct RenderPipeline {
    config: RendererConfig,
    options: usvg::Options<'static>,
}

impl std::fmt::Debug for RenderPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderPipeline")
            .field("config", &self.config)
            .field("fonts", &self.options.fontdb.len())
            .finish()
    }
}

impl RenderPipeline {
    /// Create a pipeline with the bundled font plus whatever system and
    /// extra fonts the config asks for.
    #[must_use]
    pub fn new(config: RendererConfig) -> Self {
        let mut options = usvg::Options::default();
        options.fontdb = Arc::new(fonts::build_database(&config));
        Self { config, options }
    }

    /// Create a pipeline with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(RendererConfig::default())
    }

    /// The pipeline configuration.
    #[must_use]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Layout of an empty canvas.
    #[must_use]
    pub fn blank_layout(&self) -> CanvasLayout {
        CanvasLayout::blank(self.config.blank_width, self.config.blank_height)
    }

    /// Compute the canvas layout for `state`.
    ///
    /// Returns `None` when the state's base image is not available in
    /// `image` (still decoding, failed, or a stale image for another source).
    #[must_use]
    pub fn layout(
        &self,
        state: &CanvasState,
        image: Option<&BaseImage>,
        viewport: Viewport,
    ) -> Option<CanvasLayout> {
        let Some(source) = state.base_image() else {
            return Some(self.blank_layout());
        };
        let image = image.filter(|img| img.source() == source)?;
        let bounds = viewport.bounded(self.config.max_width, self.config.max_height);
        Some(CanvasLayout::fit(
            self.config.fit,
            bounds,
            (image.width(), image.height()),
        ))
    }

    /// Render `state` from scratch.
    ///
    /// # Errors
    ///
    /// Returns an error if the intermediate SVG cannot be parsed or the
    /// pixmap cannot be allocated.
    pub fn render(
        &self,
        state: &CanvasState,
        image: Option<&BaseImage>,
        viewport: Viewport,
    ) -> RenderResult<Frame> {
        let Some(svg) = self.render_to_svg(state, image, viewport) else {
            tracing::debug!("Base image not decoded yet; render deferred");
            return Ok(Frame::Deferred);
        };
        let pixmap = self.rasterize(&svg)?;
        Ok(Frame::Ready(Raster::from_pixmap(pixmap)))
    }

    /// A transparent raster of the blank canvas size.
    ///
    /// # Errors
    ///
    /// Returns an error if the pixmap cannot be allocated.
    pub fn render_blank(&self) -> RenderResult<Raster> {
        let layout = self.blank_layout();
        Raster::blank(layout.width, layout.height)
    }

    /// Lower `state` to the SVG document that [`RenderPipeline::render`]
    /// rasterizes, or `None` if the render would be deferred.
    #[must_use]
    pub fn render_to_svg(
        &self,
        state: &CanvasState,
        image: Option<&BaseImage>,
        viewport: Viewport,
    ) -> Option<String> {
        let layout = self.layout(state, image, viewport)?;
        Some(self.lower(state, &layout, image))
    }

    /// Replay only the annotation logs onto a blank default-size canvas,
    /// leaving the base image out.
    ///
    /// # Errors
    ///
    /// Returns an error if the intermediate SVG cannot be parsed or the
    /// pixmap cannot be allocated.
    pub fn render_annotations(&self, state: &CanvasState) -> RenderResult<Raster> {
        let svg = self.lower(state, &self.blank_layout(), None);
        Ok(Raster::from_pixmap(self.rasterize(&svg)?))
    }

    fn lower(
        &self,
        state: &CanvasState,
        layout: &CanvasLayout,
        image: Option<&BaseImage>,
    ) -> String {
        let mut svg = String::with_capacity(4096);
        open_svg(&mut svg, layout.width, layout.height);

        if let (Some(rect), Some(image)) = (layout.image, image) {
            let _ = write!(
                svg,
                "<image x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" preserveAspectRatio=\"none\" href=\"{}\"/>",
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                image.data_uri(),
            );
        }

        for stroke in state.strokes() {
            stroke_svg(&mut svg, stroke);
        }
        for stamp in state.stamps() {
            self.stamp_svg(&mut svg, stamp);
        }
        for text in state.texts() {
            self.text_svg(&mut svg, text);
        }

        svg.push_str("</svg>");
        svg
    }

    /// Draw one stamp on top of an existing raster.
    ///
    /// # Errors
    ///
    /// Returns an error if the glyph document cannot be parsed.
    pub fn draw_stamp(&self, raster: &mut Raster, stamp: &Stamp) -> RenderResult<()> {
        let mut svg = String::with_capacity(256);
        open_svg(&mut svg, raster.width(), raster.height());
        self.stamp_svg(&mut svg, stamp);
        svg.push_str("</svg>");
        let tree = self.parse(&svg)?;
        resvg::render(
            &tree,
            tiny_skia::Transform::default(),
            &mut raster.pixmap_mut().as_mut(),
        );
        Ok(())
    }

    fn stamp_svg(&self, svg: &mut String, stamp: &Stamp) {
        let font = &self.config.stamp_font;
        let _ = write!(
            svg,
            "<text x=\"{}\" y=\"{}\" font-size=\"{}\" font-family=\"{}\">{}</text>",
            stamp.position.x,
            stamp.position.y,
            font.size,
            escape_xml(&font.family),
            escape_xml(&stamp.glyph),
        );
    }

    fn text_svg(&self, svg: &mut String, text: &TextLabel) {
        let font = &self.config.text_font;
        // Outline first, fill on top.
        let _ = write!(
            svg,
            "<text x=\"{}\" y=\"{}\" font-size=\"{}\" font-family=\"{}\" fill=\"white\" stroke=\"black\" stroke-width=\"{}\" paint-order=\"stroke\" xml:space=\"preserve\">{}</text>",
            text.position.x,
            text.position.y,
            font.size,
            escape_xml(&font.family),
            self.config.text_outline_width,
            escape_xml(&text.content),
        );
    }

    fn parse(&self, svg: &str) -> RenderResult<usvg::Tree> {
        usvg::Tree::from_str(svg, &self.options)
            .map_err(|e| RenderError::Raster(format!("SVG parsing failed: {e}")))
    }

    /// Rasterize `svg` into a new pixmap of the document's size.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn rasterize(&self, svg: &str) -> RenderResult<tiny_skia::Pixmap> {
        let tree = self.parse(svg)?;

        let px_w = tree.size().width().round() as u32;
        let px_h = tree.size().height().round() as u32;
        let mut pixmap = tiny_skia::Pixmap::new(px_w.max(1), px_h.max(1))
            .ok_or_else(|| RenderError::Raster("Failed to create pixmap".to_string()))?;

        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
        Ok(pixmap)
    }
}

fn open_svg(svg: &mut String, width: u32, height: u32) {
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    );
}

/// A recorded segment as a round-capped line in its own colour and width.
fn stroke_svg(svg: &mut String, stroke: &Stroke) {
    let _ = write!(
        svg,
        "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\" stroke-linecap=\"round\"/>",
        stroke.from.x,
        stroke.from.y,
        stroke.to.x,
        stroke.to.y,
        stroke.color.as_str(),
        stroke.size,
    );
}

/// Escape special XML characters.
fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
