//! Owned RGBA raster backed by a tiny-skia pixmap.

use tiny_skia::Pixmap;

use crate::error::{RenderError, RenderResult};

/// A rendered canvas.
#[derive(Clone)]
pub struct Raster {
    pixmap: Pixmap,
}

impl Raster {
    /// A fully transparent raster.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero.
    pub fn blank(width: u32, height: u32) -> RenderResult<Self> {
        let pixmap = Pixmap::new(width, height).ok_or_else(|| {
            RenderError::Raster(format!("Failed to create {width}x{height} pixmap"))
        })?;
        Ok(Self { pixmap })
    }

    pub(crate) fn from_pixmap(pixmap: Pixmap) -> Self {
        Self { pixmap }
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Unpremultiplied RGBA at `(x, y)`, or `None` outside the raster.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// Premultiplied RGBA bytes, row-major.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Whether every pixel is fully transparent.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.pixmap.data().chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Encode as PNG.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn encode_png(&self) -> RenderResult<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }
}

impl PartialEq for Raster {
    fn eq(&self, other: &Self) -> bool {
        self.width() == other.width()
            && self.height() == other.height()
            && self.data() == other.data()
    }
}

impl Eq for Raster {}

impl std::fmt::Debug for Raster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_is_transparent() {
        let raster = Raster::blank(4, 3).expect("raster");
        assert_eq!((raster.width(), raster.height()), (4, 3));
        assert!(raster.is_blank());
        assert_eq!(raster.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(raster.pixel(4, 0), None);
    }

    #[test]
    fn zero_size_is_an_error() {
        assert!(matches!(Raster::blank(0, 10), Err(RenderError::Raster(_))));
    }

    #[test]
    fn encodes_png_signature() {
        let png = Raster::blank(2, 2).unwrap().encode_png().unwrap();
        assert_eq!(&png[0..4], &[137, 80, 78, 71]);
    }
}
