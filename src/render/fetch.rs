//! # Image Download
//!
//! Fetches avatars and attachments over HTTP and hands them to
//! [`super::bitmap`] for conversion. Every failure (timeout, non-200,
//! undecodable bytes) is logged and reported as `None`; the renderer then
//! leaves the image out or prints a "failed to load" caption.

use std::time::Duration;

use async_trait::async_trait;
use image::DynamicImage;
use reqwest::StatusCode;
use tracing::{debug, warn};

use super::bitmap::{self, Bitmap};
use super::dither::DitheringAlgorithm;
use crate::config::Config;
use crate::error::{FetchError, PingslipError};

/// Source of printable images, keyed by URL.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Square `size` x `size` avatar bitmap.
    async fn fetch_avatar(&self, url: &str, size: u32) -> Option<Bitmap>;

    /// Attachment bitmap no wider than `max_width`.
    async fn fetch_attachment(&self, url: &str, max_width: u32) -> Option<Bitmap>;
}

/// [`ImageFetcher`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
    avatar_timeout: Duration,
    attachment_timeout: Duration,
    dither: DitheringAlgorithm,
}

impl HttpImageFetcher {
    pub fn new(config: &Config) -> Result<Self, PingslipError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("pingslip/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PingslipError::Config(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            client,
            avatar_timeout: config.avatar_timeout,
            attachment_timeout: config.attachment_timeout,
            dither: config.dither,
        })
    }

    /// GET `url` and decode the body. Only HTTP 200 counts as success.
    pub async fn download(&self, url: &str, timeout: Duration) -> Result<DynamicImage, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| FetchError::Request {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        if response.status() != StatusCode::OK {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| FetchError::Request {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        image::load_from_memory(&bytes).map_err(|e| FetchError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    async fn fetch_with<F>(&self, url: &str, timeout: Duration, process: F) -> Option<Bitmap>
    where
        F: FnOnce(&DynamicImage) -> Bitmap + Send + 'static,
    {
        let source = match self.download(url, timeout).await {
            Ok(source) => source,
            Err(e) => {
                warn!(error = %e, "could not fetch image");
                return None;
            }
        };

        // Resampling and dithering are CPU-bound.
        match tokio::task::spawn_blocking(move || process(&source)).await {
            Ok(bitmap) => {
                debug!(url, width = bitmap.width, height = bitmap.height, "image ready");
                Some(bitmap)
            }
            Err(e) => {
                warn!(url, error = %e, "image processing task failed");
                None
            }
        }
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch_avatar(&self, url: &str, size: u32) -> Option<Bitmap> {
        let dither = self.dither;
        self.fetch_with(url, self.avatar_timeout, move |img| {
            bitmap::process_avatar(img, size, dither)
        })
        .await
    }

    async fn fetch_attachment(&self, url: &str, max_width: u32) -> Option<Bitmap> {
        let dither = self.dither;
        self.fetch_with(url, self.attachment_timeout, move |img| {
            bitmap::process_attachment(img, max_width, dither)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_host_is_none() {
        let config = Config {
            avatar_timeout: Duration::from_millis(500),
            ..Config::default()
        };
        let fetcher = HttpImageFetcher::new(&config).unwrap();
        // Port 9 (discard) on localhost is closed on test machines.
        let bitmap = fetcher.fetch_avatar("http://127.0.0.1:9/a.png", 64).await;
        assert!(bitmap.is_none());
    }

    #[tokio::test]
    async fn test_invalid_url_is_none() {
        let fetcher = HttpImageFetcher::new(&Config::default()).unwrap();
        assert!(fetcher.fetch_attachment("not a url", 384).await.is_none());
    }
}
