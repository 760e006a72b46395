use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types that can occur when talking to the image service or driving the gallery.
#[derive(Debug, Error)]
pub enum GalleryError {
    /// Request could not be sent or the response could not be read
    #[error("HTTP error: {0}")]
    HttpError(String),
    /// The service answered with a non-success status
    #[error("Transport error: status {status} ({category})")]
    Transport { status: u16, category: ErrorCategory },
    /// History was queried or pushed to before being initialized
    #[error("Edit history used before initialization")]
    UninitializedHistory,
    /// Invalid request parameters or configuration
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// Response body did not have the expected shape
    #[error("Response format error: {message}. Raw response: {raw_response}")]
    ResponseFormatError {
        message: String,
        raw_response: String,
    },
    /// JSON serialization/deserialization errors
    #[error("JSON parse error: {0}")]
    JsonError(String),
    /// Generic error
    #[error("Generic error: {0}")]
    Generic(String),
}

impl GalleryError {
    /// Builds a transport error for a non-success HTTP status.
    pub fn transport(status: u16) -> Self {
        GalleryError::Transport {
            status,
            category: ErrorCategory::from_status(status),
        }
    }

    /// HTTP status carried by the error, if the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            GalleryError::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// User-facing category, for errors that came from the service.
    pub fn category(&self) -> Option<ErrorCategory> {
        match self {
            GalleryError::Transport { category, .. } => Some(*category),
            _ => None,
        }
    }

    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            GalleryError::Transport { status, category } => category.user_message(*status),
            GalleryError::HttpError(_) => "Error : Could not reach the image server".to_string(),
            GalleryError::ResponseFormatError { .. } | GalleryError::JsonError(_) => {
                "Error : The image server sent an unreadable response".to_string()
            }
            other => format!("Error : {other}"),
        }
    }
}

/// User-facing classification of HTTP failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// 400
    InvalidParameters,
    /// 404
    NotFound,
    /// 415
    UnsupportedMediaType,
    /// 500
    ServerError,
    /// Any other non-success status
    Unknown,
}

impl ErrorCategory {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => ErrorCategory::InvalidParameters,
            404 => ErrorCategory::NotFound,
            415 => ErrorCategory::UnsupportedMediaType,
            500 => ErrorCategory::ServerError,
            _ => ErrorCategory::Unknown,
        }
    }

    pub fn user_message(&self, status: u16) -> String {
        match self {
            ErrorCategory::InvalidParameters => "Error : Invalid parameters".to_string(),
            ErrorCategory::NotFound => {
                "Error : The image you are trying to get doesn't exist (maybe try reloading the page)"
                    .to_string()
            }
            ErrorCategory::UnsupportedMediaType => "Error : Unsupported media type".to_string(),
            ErrorCategory::ServerError => {
                "Error : Something went wrong server side, please contact the administrator"
                    .to_string()
            }
            ErrorCategory::Unknown => {
                format!("Error : Unexpected response from the server (status {status})")
            }
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorCategory::InvalidParameters => "invalid parameters",
            ErrorCategory::NotFound => "not found",
            ErrorCategory::UnsupportedMediaType => "unsupported media type",
            ErrorCategory::ServerError => "server error",
            ErrorCategory::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Converts reqwest HTTP errors into GalleryErrors
impl From<reqwest::Error> for GalleryError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => GalleryError::transport(status.as_u16()),
            None => GalleryError::HttpError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for GalleryError {
    fn from(err: serde_json::Error) -> Self {
        GalleryError::JsonError(format!(
            "{} at line {} column {}",
            err,
            err.line(),
            err.column()
        ))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(400, ErrorCategory::InvalidParameters)]
    #[case(404, ErrorCategory::NotFound)]
    #[case(415, ErrorCategory::UnsupportedMediaType)]
    #[case(500, ErrorCategory::ServerError)]
    #[case(401, ErrorCategory::Unknown)]
    #[case(503, ErrorCategory::Unknown)]
    fn status_maps_to_category(#[case] status: u16, #[case] expected: ErrorCategory) {
        assert_eq!(ErrorCategory::from_status(status), expected);
    }

    #[test]
    fn transport_error_carries_user_message() {
        let err = GalleryError::transport(415);
        assert_eq!(err.status(), Some(415));
        assert_eq!(err.user_message(), "Error : Unsupported media type");
    }

    #[test]
    fn unknown_status_is_mentioned_in_message() {
        let err = GalleryError::transport(502);
        assert!(err.user_message().contains("502"));
        assert_eq!(err.category(), Some(ErrorCategory::Unknown));
    }

    #[test]
    fn non_transport_errors_have_no_status() {
        let err = GalleryError::HttpError("connection refused".to_string());
        assert_eq!(err.status(), None);
        assert_eq!(err.user_message(), "Error : Could not reach the image server");
    }
}
