//! # Photo Booth
//!
//! A photo booth session: upload a photo, draw on it, drop emoji stamps and
//! captions, then download the composite as `photobooth.png`.
//!
//! ## Usage
//!
//! ```no_run
//! use booth_app::{BoothConfig, PhotoBooth};
//!
//! # async fn demo() -> booth_app::BoothResult<()> {
//! booth_app::logging::init();
//! let mut booth = PhotoBooth::new(BoothConfig::default())?;
//!
//! let pending = booth.on_upload_complete("file:///tmp/selfie.jpg");
//! booth.on_glyph_select("\u{2b50}");
//! booth.add_text("Hi");
//! booth.finish_load(pending.resolve().await);
//!
//! booth.download_image(std::path::Path::new("."))?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod loader;
pub mod logging;
pub mod session;

pub use config::BoothConfig;
pub use error::{BoothError, BoothResult};
pub use loader::{LoadedImage, PendingImage};
pub use session::PhotoBooth;
