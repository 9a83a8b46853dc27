//! Canvas sizing and base image fit.

use serde::{Deserialize, Serialize};

/// How the base image is fitted into the viewport-derived box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitPolicy {
    /// The canvas takes the image's size, scaled down (never up) to fit the
    /// bounds. The image covers the whole canvas.
    #[default]
    ScaleDown,
    /// The canvas fills the bounds; the whole image is shown, centred, with
    /// transparent padding on two sides.
    Contain,
    /// The canvas fills the bounds; the image is scaled to cover it, centred,
    /// and the overflow is cropped.
    Cover,
}

/// Space available for the canvas, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Available width.
    pub width: f32,
    /// Available height.
    pub height: f32,
}

impl Viewport {
    /// Create a viewport.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// The box the canvas must fit in: the viewport capped at `max`.
    #[must_use]
    pub fn bounded(&self, max_width: u32, max_height: u32) -> (f32, f32) {
        #[allow(clippy::cast_precision_loss)]
        let (max_w, max_h) = (max_width as f32, max_height as f32);
        let clamp = |avail: f32, max: f32| {
            if avail.is_finite() {
                avail.min(max).max(1.0)
            } else {
                max.max(1.0)
            }
        };
        (clamp(self.width, max_w), clamp(self.height, max_h))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Where the base image is drawn, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitRect {
    /// Left edge (negative when cropped).
    pub x: f32,
    /// Top edge (negative when cropped).
    pub y: f32,
    /// Drawn width.
    pub width: f32,
    /// Drawn height.
    pub height: f32,
}

/// Pixel size of the canvas and placement of the base image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasLayout {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Base image placement, if there is a base image.
    pub image: Option<FitRect>,
}

impl CanvasLayout {
    /// Layout of a canvas with no base image.
    #[must_use]
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            image: None,
        }
    }

    /// Fit an image of `image_size` into `bounds` according to `policy`.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn fit(policy: FitPolicy, bounds: (f32, f32), image_size: (u32, u32)) -> Self {
        let (bw, bh) = bounds;
        let (iw, ih) = (image_size.0.max(1) as f32, image_size.1.max(1) as f32);
        let to_px = |v: f32| (v.floor() as u32).max(1);

        match policy {
            FitPolicy::ScaleDown => {
                let ratio = if iw > bw || ih > bh {
                    (bw / iw).min(bh / ih)
                } else {
                    1.0
                };
                let (width, height) = (to_px(iw * ratio), to_px(ih * ratio));
                Self {
                    width,
                    height,
                    image: Some(FitRect {
                        x: 0.0,
                        y: 0.0,
                        width: width as f32,
                        height: height as f32,
                    }),
                }
            }
            FitPolicy::Contain | FitPolicy::Cover => {
                let (width, height) = (to_px(bw), to_px(bh));
                let (cw, ch) = (width as f32, height as f32);
                let scale = if policy == FitPolicy::Contain {
                    (cw / iw).min(ch / ih)
                } else {
                    (cw / iw).max(ch / ih)
                };
                let (dw, dh) = (iw * scale, ih * scale);
                Self {
                    width,
                    height,
                    image: Some(FitRect {
                        x: (cw - dw) / 2.0,
                        y: (ch - dh) / 2.0,
                        width: dw,
                        height: dh,
                    }),
                }
            }
        }
    }
}
