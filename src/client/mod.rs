//! Remote image service client.
//!
//! [`ImageService`] is the seam the gallery controller talks through;
//! [`HttpImageService`] implements it against the REST backend.

mod builder;
mod http;
mod params;
mod service;

pub use builder::GalleryClientBuilder;
pub use http::HttpImageService;
pub use params::AlgorithmParams;
pub use service::{ImageService, Upload, VariantSource};
