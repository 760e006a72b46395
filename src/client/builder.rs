use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::GalleryError;

use super::http::HttpImageService;

/// Builder for configuring and instantiating [`HttpImageService`].
#[derive(Debug, Default)]
pub struct GalleryClientBuilder {
    base_url: Option<String>,
    timeout_seconds: Option<u64>,
    user_agent: Option<String>,
    client: Option<Client>,
}

impl GalleryClientBuilder {
    /// Creates a new empty builder instance with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the server root; `/images` is resolved against it.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the per-request timeout in seconds.
    pub fn timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = Some(timeout_seconds);
        self
    }

    /// Sets the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Uses a preconfigured `reqwest::Client`; `user_agent` is then ignored.
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> Result<HttpImageService, GalleryError> {
        let raw = self
            .base_url
            .ok_or_else(|| GalleryError::InvalidRequest("No base URL provided".to_string()))?;
        let base_url = parse_base_url(&raw)?;

        let client = match self.client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(sec) = self.timeout_seconds {
                    builder = builder.timeout(Duration::from_secs(sec));
                }
                if let Some(agent) = self.user_agent {
                    builder = builder.user_agent(agent);
                }
                builder.build()?
            }
        };

        Ok(HttpImageService {
            base_url,
            client,
            timeout_seconds: self.timeout_seconds,
        })
    }
}

/// Parses the server root, making sure relative joins keep its path.
fn parse_base_url(raw: &str) -> Result<Url, GalleryError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash)
        .map_err(|e| GalleryError::InvalidRequest(format!("Invalid base URL '{raw}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(GalleryError::InvalidRequest(format!(
            "Unsupported URL scheme '{other}'"
        ))),
    }
}
