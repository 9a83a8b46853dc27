//! Base image loading.
//!
//! Resolves an [`ImageSource`] from a `data:` URI, a `file://` URL or a plain
//! filesystem path, decodes it, and normalizes it to PNG for embedding in the
//! render pipeline.

use std::io::Cursor;
use std::path::PathBuf;

use base64::Engine;
use booth_core::ImageSource;
use percent_encoding::percent_decode_str;
use url::Url;

use crate::error::{RenderError, RenderResult};

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// PNG with alpha support.
    Png,
    /// JPEG (no alpha).
    Jpeg,
    /// GIF (first frame).
    Gif,
    /// WebP (alpha support).
    WebP,
    /// Unknown/other format.
    Unknown,
}

impl ImageFormat {
    /// Detect format from magic bytes.
    #[must_use]
    pub fn from_magic_bytes(data: &[u8]) -> Self {
        if data.len() < 4 {
            return Self::Unknown;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Self::Png;
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Self::Jpeg;
        }

        // GIF: GIF8
        if data.starts_with(b"GIF8") {
            return Self::Gif;
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Self::WebP;
        }

        Self::Unknown
    }

    fn decoder_format(self) -> Option<image::ImageFormat> {
        match self {
            Self::Png => Some(image::ImageFormat::Png),
            Self::Jpeg => Some(image::ImageFormat::Jpeg),
            Self::Gif => Some(image::ImageFormat::Gif),
            Self::WebP => Some(image::ImageFormat::WebP),
            Self::Unknown => None,
        }
    }
}

/// A decoded base image, ready to be drawn by the pipeline.
#[derive(Clone, PartialEq, Eq)]
pub struct BaseImage {
    source: ImageSource,
    width: u32,
    height: u32,
    format: ImageFormat,
    data_uri: String,
}

impl std::fmt::Debug for BaseImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseImage")
            .field("source", &self.source.to_string())
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

impl BaseImage {
    /// Resolve and decode `source`.
    ///
    /// Reads from disk for file sources, so call it off the UI thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be resolved or decoded.
    pub fn load(source: &ImageSource) -> RenderResult<Self> {
        let bytes = load_source_bytes(source)?;
        Self::decode(source.clone(), &bytes)
    }

    /// Decode raw encoded image bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a supported image or the image
    /// has no pixels.
    pub fn decode(source: ImageSource, bytes: &[u8]) -> RenderResult<Self> {
        let format = ImageFormat::from_magic_bytes(bytes);
        let decoder_format = format.decoder_format().ok_or_else(|| {
            RenderError::Resource(format!("Unsupported image format from {source}"))
        })?;

        let img = image::load_from_memory_with_format(bytes, decoder_format)
            .map_err(|e| RenderError::Resource(format!("Failed to decode image: {e}")))?;

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(RenderError::Resource("Image has no pixels".to_string()));
        }

        let mut png = Cursor::new(Vec::new());
        rgba.write_to(&mut png, image::ImageFormat::Png)
            .map_err(|e| RenderError::Resource(format!("Failed to re-encode image: {e}")))?;

        let encoded = base64::engine::general_purpose::STANDARD.encode(png.into_inner());
        tracing::debug!("Decoded {format:?} base image {width}x{height} from {source}");

        Ok(Self {
            source,
            width,
            height,
            format,
            data_uri: format!("data:image/png;base64,{encoded}"),
        })
    }

    /// The handle this image was loaded from.
    #[must_use]
    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Format the image was delivered in.
    #[must_use]
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// The image as a `data:image/png;base64,` URI.
    #[must_use]
    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }
}

/// Read the encoded bytes behind an image source.
///
/// # Errors
///
/// Returns an error for malformed `data:` URIs, unreadable files, and
/// network URLs, which are not fetched.
pub fn load_source_bytes(source: &ImageSource) -> RenderResult<Vec<u8>> {
    let raw = source.as_str().trim();

    if raw.starts_with("data:") {
        return decode_data_uri(raw);
    }
    if raw.is_empty() {
        return Err(RenderError::Resource("Empty image source".to_string()));
    }

    let path = match Url::parse(raw) {
        Ok(url) if url.scheme() == "file" => url.to_file_path().map_err(|()| {
            RenderError::Resource(format!("Not a local file URL: {source}"))
        })?,
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            return Err(RenderError::Resource(format!(
                "Remote images are not fetched: {source}"
            )));
        }
        // Bare paths (and Windows drive letters, which parse as a scheme).
        _ => PathBuf::from(raw),
    };
    tracing::trace!("Reading image from {}", path.display());
    Ok(std::fs::read(&path)?)
}

/// Decode the payload of a data URI.
///
/// Supports formats like: `data:image/png;base64,iVBORw0KGgo...`
///
/// # Errors
///
/// Returns an error if the data URI is malformed.
pub fn decode_data_uri(uri: &str) -> RenderResult<Vec<u8>> {
    let uri_data = uri
        .strip_prefix("data:")
        .ok_or_else(|| RenderError::Resource("Not a data URI".to_string()))?;

    // Find the comma separating metadata from data
    let comma_pos = uri_data
        .find(',')
        .ok_or_else(|| RenderError::Resource("Invalid data URI: missing comma".to_string()))?;

    let metadata = &uri_data[..comma_pos];
    let encoded_data = &uri_data[comma_pos + 1..];

    if metadata.contains(";base64") {
        base64::engine::general_purpose::STANDARD
            .decode(encoded_data.trim())
            .map_err(|e| RenderError::Resource(format!("Failed to decode base64: {e}")))
    } else {
        Ok(percent_decode_str(encoded_data).collect())
    }
}
