//! Asynchronous base image loading.
//!
//! Decoding a photo is the one slow step in a session. An upload hands back a
//! [`PendingImage`] that owns everything it needs, so the session stays free
//! to take annotations while the decode runs on a blocking task.

use booth_core::ImageSource;
use booth_renderer::{BaseImage, RenderError, RenderResult};

/// A base image whose decode has not started yet.
#[derive(Debug, Clone)]
#[must_use = "a pending image does nothing until resolved"]
pub struct PendingImage {
    source: ImageSource,
}

impl PendingImage {
    pub(crate) fn new(source: ImageSource) -> Self {
        Self { source }
    }

    /// The source being loaded.
    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    /// Fetch and decode the image on the blocking pool.
    pub async fn resolve(self) -> LoadedImage {
        let source = self.source.clone();
        let result = tokio::task::spawn_blocking(move || BaseImage::load(&source))
            .await
            .map_err(|e| RenderError::Resource(format!("Image decode task failed: {e}")))
            .and_then(std::convert::identity);

        if let Err(e) = &result {
            tracing::warn!(source = %self.source, error = %e, "Base image load failed");
        }
        LoadedImage {
            source: self.source,
            result,
        }
    }

    /// Decode on the current thread.
    pub fn resolve_blocking(self) -> LoadedImage {
        let result = BaseImage::load(&self.source);
        LoadedImage {
            source: self.source,
            result,
        }
    }
}

/// Outcome of a [`PendingImage`], ready for
/// [`PhotoBooth::finish_load`](crate::PhotoBooth::finish_load).
#[derive(Debug)]
pub struct LoadedImage {
    source: ImageSource,
    result: RenderResult<BaseImage>,
}

impl LoadedImage {
    /// The source this load was started for.
    #[must_use]
    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    /// Whether the decode succeeded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    pub(crate) fn into_parts(self) -> (ImageSource, RenderResult<BaseImage>) {
        (self.source, self.result)
    }
}
