//! Client-side state layer for a remote image-editing gallery.
//!
//! The crate fetches the gallery list from an image service, asks the service
//! to apply algorithms to an image, and keeps a linear undo/redo history of the
//! produced variants for the selected image.
//!
//! - [`client`]: the [`ImageService`](client::ImageService) seam and its HTTP
//!   implementation.
//! - [`history`]: the per-selection [`EditHistory`](history::EditHistory).
//! - [`gallery`]: the [`GalleryController`](gallery::GalleryController) tying
//!   both together and issuing display requests to a
//!   [`Renderer`](render::Renderer).
//!
//! ```no_run
//! use image_gallery::{
//!     client::{AlgorithmParams, HttpImageService},
//!     gallery::GalleryController,
//!     render::RecordingRenderer,
//!     types::ImageId,
//! };
//!
//! # async fn run() -> Result<(), image_gallery::error::GalleryError> {
//! let service = HttpImageService::new("http://localhost:8089")?;
//! let mut gallery = GalleryController::new(service, RecordingRenderer::new());
//! gallery.refresh_list().await;
//! gallery.select_image(ImageId(0)).await;
//! gallery
//!     .apply_algorithm(AlgorithmParams::new("negative"), false)
//!     .await;
//! gallery.undo();
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod error_log;
pub mod gallery;
pub mod history;
pub mod render;
pub mod types;

pub use client::{AlgorithmParams, GalleryClientBuilder, HttpImageService, ImageService};
pub use error::{ErrorCategory, GalleryError};
pub use gallery::{ApplyOutcome, GalleryController, GalleryEvent};
pub use history::{EditHistory, Step};
pub use types::{ImageId, ImageRef, ImageVariant};
