use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    header::CONTENT_TYPE,
    multipart::{Form, Part},
    Client, RequestBuilder, Response, Url,
};

use crate::{
    error::GalleryError,
    types::{ImageId, ImageMime, ImageRef, ImageVariant},
};

use super::{
    params::AlgorithmParams,
    service::{ImageService, Upload, VariantSource},
};

const IMAGES_PATH: &str = "images";

/// REST client for the image backend.
///
/// Cloning is cheap; the underlying `reqwest::Client` is reference counted.
#[derive(Debug, Clone)]
pub struct HttpImageService {
    pub(super) base_url: Url,
    pub(super) client: Client,
    pub(super) timeout_seconds: Option<u64>,
}

impl HttpImageService {
    /// Creates a client for the server at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, GalleryError> {
        super::GalleryClientBuilder::new().base_url(base_url).build()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }

    fn endpoint(&self, path: &str) -> Result<Url, GalleryError> {
        self.base_url
            .join(path)
            .map_err(|e| GalleryError::HttpError(e.to_string()))
    }

    fn image_endpoint(&self, id: ImageId) -> Result<Url, GalleryError> {
        self.endpoint(&format!("{IMAGES_PATH}/{id}"))
    }

    async fn send(
        &self,
        mut request: RequestBuilder,
        context: &str,
    ) -> Result<Response, GalleryError> {
        if let Some(timeout) = self.timeout_seconds {
            request = request.timeout(Duration::from_secs(timeout));
        }
        let response = request.send().await?;
        ensure_success(response, context)
    }
}

fn ensure_success(response: Response, context: &str) -> Result<Response, GalleryError> {
    log::debug!("{context} HTTP status: {}", response.status());
    if response.status().is_success() {
        return Ok(response);
    }
    Err(GalleryError::transport(response.status().as_u16()))
}

async fn read_variant(response: Response) -> Result<ImageVariant, GalleryError> {
    let mime = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(ImageMime::from_mime_type);
    let data = response.bytes().await?;
    Ok(ImageVariant::from_bytes(data).with_mime(mime))
}

fn variant_part(variant: &ImageVariant, part_name: String) -> Result<Part, GalleryError> {
    let part = Part::bytes(variant.as_bytes().to_vec()).file_name(part_name);
    match variant.mime() {
        Some(mime) => Ok(part.mime_str(mime.mime_type())?),
        None => Ok(part),
    }
}

#[async_trait]
impl ImageService for HttpImageService {
    async fn list_images(&self) -> Result<Vec<ImageRef>, GalleryError> {
        let request = self.client.get(self.endpoint(IMAGES_PATH)?);
        let response = self.send(request, "Image list").await?;
        let body = response.text().await?;
        let mut images: Vec<ImageRef> =
            serde_json::from_str(&body).map_err(|e| GalleryError::ResponseFormatError {
                message: format!("Failed to decode image list: {e}"),
                raw_response: body.clone(),
            })?;
        for (position, image) in images.iter_mut().enumerate() {
            image.position = position;
        }
        log::debug!("Fetched {} image references", images.len());
        Ok(images)
    }

    async fn get_image(
        &self,
        id: ImageId,
        params: Option<&AlgorithmParams>,
        source: VariantSource<'_>,
    ) -> Result<ImageVariant, GalleryError> {
        if log::log_enabled!(log::Level::Trace) {
            log::trace!(
                "Image {id} request params: {:?} (chained: {})",
                params.map(AlgorithmParams::pairs),
                source.is_chained()
            );
        }

        let request = match source {
            VariantSource::Stored => {
                let mut request = self.client.get(self.image_endpoint(id)?);
                if let Some(params) = params {
                    request = request.query(params.pairs());
                }
                request
            }
            VariantSource::Chained(variant) => {
                let part_name = format!("variant.{}", variant.extension());
                let mut form = Form::new().part("file", variant_part(variant, part_name)?);
                for (key, value) in params.map(AlgorithmParams::pairs).unwrap_or_default() {
                    form = form.text(key.clone(), value.clone());
                }
                self.client.post(self.endpoint(IMAGES_PATH)?).multipart(form)
            }
        };

        let response = self.send(request, &format!("Image {id}")).await?;
        read_variant(response).await
    }

    async fn delete_image(&self, id: ImageId) -> Result<(), GalleryError> {
        let request = self.client.delete(self.image_endpoint(id)?);
        self.send(request, &format!("Delete image {id}")).await?;
        Ok(())
    }

    async fn upload_image(&self, upload: Upload) -> Result<(), GalleryError> {
        let Upload {
            variant,
            file_name,
            part_name,
        } = upload;
        let mut form = Form::new().part("file", variant_part(&variant, part_name)?);
        if let Some(name) = file_name {
            form = form.text("fileName", name);
        }
        let request = self.client.post(self.endpoint(IMAGES_PATH)?).multipart(form);
        self.send(request, "Upload image").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server};

    use super::*;

    const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, b'p', b'i', b'x'];

    fn service(server: &Server) -> HttpImageService {
        HttpImageService::new(&server.url()).expect("client")
    }

    #[tokio::test]
    async fn lists_images_with_positions() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/images")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"id": 3, "name": "a.png", "type": "image/png", "size": "4*4*3"},
                    {"id": 7, "name": "b.jpg", "type": "image/jpeg", "size": "8*2*3"}]"#,
            )
            .create_async()
            .await;

        let images = service(&server).list_images().await.expect("list");
        mock.assert_async().await;

        assert_eq!(images.len(), 2);
        assert_eq!(images[1].id, ImageId(7));
        assert_eq!(images[1].position, 1);
    }

    #[tokio::test]
    async fn malformed_list_is_a_format_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/images")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let result = service(&server).list_images().await;
        assert!(matches!(
            result,
            Err(GalleryError::ResponseFormatError { ref raw_response, .. }) if raw_response == "not json"
        ));
    }

    #[tokio::test]
    async fn stored_image_is_fetched_with_query_params() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/images/5")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("algorithm".into(), "addLuminosityRGB".into()),
                Matcher::UrlEncoded("gain".into(), "20".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "image/png")
            .with_body(PNG)
            .create_async()
            .await;

        let params = AlgorithmParams::new("addLuminosityRGB").param("gain", 20);
        let variant = service(&server)
            .get_image(ImageId(5), Some(&params), VariantSource::Stored)
            .await
            .expect("variant");
        mock.assert_async().await;

        assert_eq!(variant.as_bytes(), PNG);
        assert_eq!(variant.mime(), Some(ImageMime::Png));
    }

    #[tokio::test]
    async fn chained_image_is_posted_as_multipart() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/images")
            .match_header("content-type", Matcher::Regex("multipart/form-data".into()))
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="file"; filename="variant.png""#.into()),
                Matcher::Regex(r#"(?s)name="file".*name="algorithm".*name="gain""#.into()),
                Matcher::Regex(r#"name="algorithm"\r\n\r\nnegative"#.into()),
            ]))
            .with_status(200)
            .with_header("content-type", "image/png")
            .with_body(PNG)
            .create_async()
            .await;

        let current = ImageVariant::from_bytes(PNG.to_vec());
        let params = AlgorithmParams::new("negative").param("gain", 1);
        let variant = service(&server)
            .get_image(ImageId(5), Some(&params), VariantSource::Chained(&current))
            .await
            .expect("variant");
        mock.assert_async().await;
        assert_eq!(variant.len(), PNG.len());
    }

    #[tokio::test]
    async fn error_statuses_map_to_categories() {
        let mut server = Server::new_async().await;
        for (id, status) in [(1, 400), (2, 404), (3, 415), (4, 500), (5, 418)] {
            server
                .mock("GET", format!("/images/{id}").as_str())
                .with_status(status)
                .create_async()
                .await;
        }

        let client = service(&server);
        for (id, status) in [(1u64, 400u16), (2, 404), (3, 415), (4, 500), (5, 418)] {
            let err = client
                .get_image(ImageId(id), None, VariantSource::Stored)
                .await
                .expect_err("failure status");
            assert_eq!(err.status(), Some(status));
            assert_eq!(
                err.category(),
                Some(crate::error::ErrorCategory::from_status(status))
            );
        }
    }

    #[tokio::test]
    async fn delete_hits_image_endpoint() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/images/9")
            .with_status(200)
            .create_async()
            .await;

        service(&server).delete_image(ImageId(9)).await.expect("delete");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn upload_sends_file_and_optional_name() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/images")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="file"; filename="variant.png""#.into()),
                Matcher::Regex(r#"name="fileName"\r\n\r\nedited.png"#.into()),
            ]))
            .with_status(201)
            .create_async()
            .await;

        let upload = Upload::new(
            ImageVariant::from_bytes(PNG.to_vec()),
            Some("edited.png".to_string()),
        );
        service(&server).upload_image(upload).await.expect("upload");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unreachable_server_is_http_error() {
        let client = HttpImageService::new("http://127.0.0.1:1").expect("client");
        let err = client.list_images().await.expect_err("no server");
        assert!(matches!(err, GalleryError::HttpError(_)));
        assert_eq!(err.status(), None);
    }
}
