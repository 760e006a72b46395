use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GalleryError;

/// Server-side identifier of a stored image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(pub u64);

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ImageId {
    type Err = GalleryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(ImageId)
            .map_err(|e| GalleryError::InvalidRequest(format!("invalid image id '{s}': {e}")))
    }
}

/// Dimensions as reported by the service: `width*height*channels`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
    pub channels: u32,
}

impl FromStr for ImageSize {
    type Err = GalleryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GalleryError::JsonError(format!("invalid image size '{s}'"));
        let mut parts = s.split('*').map(|p| p.trim().parse::<u32>());
        let (Some(Ok(width)), Some(Ok(height)), Some(Ok(channels)), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        Ok(Self {
            width,
            height,
            channels,
        })
    }
}

impl TryFrom<String> for ImageSize {
    type Error = GalleryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ImageSize> for String {
    fn from(size: ImageSize) -> Self {
        size.to_string()
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}*{}*{}", self.width, self.height, self.channels)
    }
}

/// An entry of the gallery list returned by `GET /images`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub id: ImageId,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    pub size: ImageSize,
    /// Index in the list the reference was fetched with.
    #[serde(skip)]
    pub position: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_list_records_and_ignores_unknown_fields() {
        let raw = r#"[
            {"id": 0, "name": "cat.jpg", "type": "image/jpeg", "size": "640*480*3", "extra": true},
            {"id": 5, "size": "10*20*4"}
        ]"#;
        let images: Vec<ImageRef> = serde_json::from_str(raw).expect("valid list");

        assert_eq!(images.len(), 2);
        assert_eq!(images[0].id, ImageId(0));
        assert_eq!(images[0].media_type.as_deref(), Some("image/jpeg"));
        assert_eq!(
            images[0].size,
            ImageSize {
                width: 640,
                height: 480,
                channels: 3
            }
        );
        assert_eq!(images[1].name, "");
        assert_eq!(images[1].size.to_string(), "10*20*4");
    }

    #[test]
    fn malformed_size_is_rejected() {
        let raw = r#"{"id": 1, "size": "640x480"}"#;
        assert!(serde_json::from_str::<ImageRef>(raw).is_err());
        assert!("1*2".parse::<ImageSize>().is_err());
        assert!("1*2*3*4".parse::<ImageSize>().is_err());
    }

    #[test]
    fn image_id_parses_from_cli_text() {
        assert_eq!(" 42 ".parse::<ImageId>().expect("id"), ImageId(42));
        assert!("abc".parse::<ImageId>().is_err());
    }
}
