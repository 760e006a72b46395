mod image_ref;
mod mime;
mod variant;

pub use image_ref::{ImageId, ImageRef, ImageSize};
pub use mime::ImageMime;
pub use variant::ImageVariant;
