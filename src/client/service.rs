use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::GalleryError,
    types::{ImageId, ImageRef, ImageVariant},
};

use super::params::AlgorithmParams;

/// Which pixels an algorithm is applied to.
#[derive(Debug, Clone, Copy)]
pub enum VariantSource<'a> {
    /// The image stored on the server under the requested id.
    Stored,
    /// A variant held by the client, uploaded alongside the parameters.
    Chained(&'a ImageVariant),
}

impl VariantSource<'_> {
    pub fn is_chained(&self) -> bool {
        matches!(self, VariantSource::Chained(_))
    }
}

/// A file to add to the gallery.
#[derive(Debug, Clone)]
pub struct Upload {
    pub variant: ImageVariant,
    /// Name the server should store the image under; the server falls back to
    /// `part_name` when absent.
    pub file_name: Option<String>,
    /// File name of the multipart part.
    pub part_name: String,
}

impl Upload {
    pub fn new(variant: ImageVariant, file_name: Option<String>) -> Self {
        let part_name = format!("variant.{}", variant.extension());
        Self {
            variant,
            file_name,
            part_name,
        }
    }

    /// Reads a local image file.
    pub async fn from_path(
        path: impl AsRef<Path>,
        file_name: Option<String>,
    ) -> Result<Self, GalleryError> {
        let path = path.as_ref();
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| GalleryError::InvalidRequest(format!("{}: {e}", path.display())))?;
        let variant = ImageVariant::from_bytes(data);
        let part_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| format!("upload.{}", variant.extension()));
        Ok(Self {
            variant,
            file_name,
            part_name,
        })
    }
}

/// Operations the gallery needs from the image backend.
#[async_trait]
pub trait ImageService: Send + Sync {
    /// Fetches the gallery list.
    async fn list_images(&self) -> Result<Vec<ImageRef>, GalleryError>;

    /// Fetches an image, optionally processed by an algorithm.
    ///
    /// With [`VariantSource::Chained`] the given variant is processed instead
    /// of the stored image identified by `id`.
    async fn get_image(
        &self,
        id: ImageId,
        params: Option<&AlgorithmParams>,
        source: VariantSource<'_>,
    ) -> Result<ImageVariant, GalleryError>;

    async fn delete_image(&self, id: ImageId) -> Result<(), GalleryError>;

    async fn upload_image(&self, upload: Upload) -> Result<(), GalleryError>;
}

#[async_trait]
impl<T: ImageService + ?Sized> ImageService for Arc<T> {
    async fn list_images(&self) -> Result<Vec<ImageRef>, GalleryError> {
        (**self).list_images().await
    }

    async fn get_image(
        &self,
        id: ImageId,
        params: Option<&AlgorithmParams>,
        source: VariantSource<'_>,
    ) -> Result<ImageVariant, GalleryError> {
        (**self).get_image(id, params, source).await
    }

    async fn delete_image(&self, id: ImageId) -> Result<(), GalleryError> {
        (**self).delete_image(id).await
    }

    async fn upload_image(&self, upload: Upload) -> Result<(), GalleryError> {
        (**self).upload_image(upload).await
    }
}
