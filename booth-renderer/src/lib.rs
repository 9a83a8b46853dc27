//! # Photo Booth Renderer
//!
//! Replays the annotation logs of a [`booth_core::CanvasState`] over the base
//! photo and exports the composite as PNG.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌─────────┐
//! │ CanvasState  │ → │ SVG document │ → │ resvg raster │ → │   PNG   │
//! │ + BaseImage  │   │ image/lines/ │   │ (tiny-skia)  │   │         │
//! │              │   │ stamps/text  │   │              │   │         │
//! └──────────────┘   └──────────────┘   └──────────────┘   └─────────┘
//! ```
//!
//! The [`Surface`] holds the visible raster and takes live stroke segments
//! between full replays.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod export;
pub mod fonts;
pub mod image;
pub mod layout;
pub mod pipeline;
pub mod raster;
pub mod surface;

pub use error::{RenderError, RenderResult};
pub use export::{encode_png, save_png, DOWNLOAD_FILE_NAME};
pub use fonts::BUNDLED_FAMILY;
pub use image::{BaseImage, ImageFormat};
pub use layout::{CanvasLayout, FitPolicy, FitRect, Viewport};
pub use pipeline::{Frame, RenderPipeline};
pub use raster::Raster;
pub use surface::Surface;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Font used for stamps or text labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    /// CSS-style family list.
    pub family: String,
    /// Size in pixels.
    pub size: f32,
}

/// Configuration for the render pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// How the base image is fitted into the canvas.
    pub fit: FitPolicy,
    /// Upper bound on canvas width, applied on top of the viewport.
    pub max_width: u32,
    /// Upper bound on canvas height, applied on top of the viewport.
    pub max_height: u32,
    /// Canvas width when there is no base image.
    pub blank_width: u32,
    /// Canvas height when there is no base image.
    pub blank_height: u32,
    /// Font for stamps.
    pub stamp_font: FontSpec,
    /// Font for text labels.
    pub text_font: FontSpec,
    /// Width of the black outline around text labels.
    pub text_outline_width: f32,
    /// Load the system font database on top of the bundled font.
    pub load_system_fonts: bool,
    /// Extra font files to load.
    pub font_files: Vec<PathBuf>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            fit: FitPolicy::ScaleDown,
            max_width: 800,
            max_height: 600,
            blank_width: 300,
            blank_height: 150,
            stamp_font: FontSpec {
                family: "serif".to_string(),
                size: 40.0,
            },
            text_font: FontSpec {
                family: "Arial, sans-serif".to_string(),
                size: 24.0,
            },
            text_outline_width: 2.0,
            load_system_fonts: true,
            font_files: Vec::new(),
        }
    }
}
