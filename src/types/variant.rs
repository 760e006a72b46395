use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use image::ImageReader;

use super::ImageMime;

const FALLBACK_MIME: &str = "application/octet-stream";

/// One rendering of an image. The payload is opaque to this crate and never
/// mutated once produced; clones share the same buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageVariant {
    data: Bytes,
    mime: Option<ImageMime>,
}

impl ImageVariant {
    /// Wraps a payload, detecting its format from the magic bytes.
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        let data = data.into();
        let mime = ImageMime::sniff(&data);
        Self { data, mime }
    }

    /// Overrides the detected format.
    pub fn with_mime(mut self, mime: Option<ImageMime>) -> Self {
        if mime.is_some() {
            self.mime = mime;
        }
        self
    }

    pub fn mime(&self) -> Option<ImageMime> {
        self.mime
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn bytes(&self) -> Bytes {
        self.data.clone()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// File extension matching the format, `bin` when unknown.
    pub fn extension(&self) -> &'static str {
        self.mime.map(|m| m.extension()).unwrap_or("bin")
    }

    /// Width and height in pixels, read from the image header without
    /// decoding the pixels. `None` for payloads that are not a readable image.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        let cursor = Cursor::new(self.as_bytes());
        let reader = match self.mime {
            Some(mime) => ImageReader::with_format(cursor, mime.image_format()),
            None => ImageReader::new(cursor).with_guessed_format().ok()?,
        };
        reader.into_dimensions().ok()
    }

    /// Encodes the payload as a `data:` URL, ready to use as an `src` attribute.
    pub fn to_data_url(&self) -> String {
        let mime = self.mime.map(|m| m.mime_type()).unwrap_or(FALLBACK_MIME);
        format!("data:{mime};base64,{}", STANDARD.encode(&self.data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    fn encoded(width: u32, height: u32, format: image::ImageFormat) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        image::RgbImage::new(width, height)
            .write_to(&mut out, format)
            .expect("encode");
        out.into_inner()
    }

    #[test]
    fn dimensions_are_read_from_the_header() {
        let png = ImageVariant::from_bytes(encoded(7, 3, image::ImageFormat::Png));
        assert_eq!(png.mime(), Some(ImageMime::Png));
        assert_eq!(png.dimensions(), Some((7, 3)));
    }

    #[test]
    fn unreadable_payload_has_no_dimensions() {
        assert_eq!(ImageVariant::from_bytes(b"plain text".to_vec()).dimensions(), None);
        assert_eq!(ImageVariant::from_bytes(PNG_HEADER.to_vec()).dimensions(), None);
    }

    #[test]
    fn from_bytes_sniffs_format() {
        let variant = ImageVariant::from_bytes(PNG_HEADER.to_vec());
        assert_eq!(variant.mime(), Some(ImageMime::Png));
        assert_eq!(variant.extension(), "png");
        assert_eq!(variant.len(), PNG_HEADER.len());
    }

    #[test]
    fn explicit_mime_wins_but_none_keeps_sniffed() {
        let variant = ImageVariant::from_bytes(PNG_HEADER.to_vec()).with_mime(None);
        assert_eq!(variant.mime(), Some(ImageMime::Png));

        let variant = variant.with_mime(Some(ImageMime::Gif));
        assert_eq!(variant.mime(), Some(ImageMime::Gif));
    }

    #[test]
    fn data_url_uses_mime_and_base64() {
        let variant = ImageVariant::from_bytes(b"abc".to_vec());
        assert_eq!(variant.to_data_url(), "data:application/octet-stream;base64,YWJj");

        let variant = variant.with_mime(Some(ImageMime::Jpeg));
        assert!(variant.to_data_url().starts_with("data:image/jpeg;base64,"));
    }
}
