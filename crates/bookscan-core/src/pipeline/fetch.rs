//! Fetching image bytes behind a non-inline locator.
//!
//! Locators are `http(s)://` URLs, `file://` URLs, or plain filesystem paths
//! (with `~` expansion). Downloads are size-capped while streaming.

use async_trait::async_trait;
use futures_util::StreamExt;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::LimitsConfig;
use crate::error::PipelineError;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Raw bytes from a locator, plus the declared content type if any.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Source of image bytes for non-inline references.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, locator: &str) -> Result<FetchedImage, PipelineError>;
}

/// Default fetcher: reqwest for remote URLs, `tokio::fs` for local files.
pub struct LocatorFetcher {
    client: reqwest::Client,
    timeout: Duration,
    max_size_mb: u64,
}

impl LocatorFetcher {
    pub fn new(limits: &LimitsConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: Duration::from_millis(limits.fetch_timeout_ms),
            max_size_mb: limits.max_image_size_mb,
        }
    }

    fn max_bytes(&self) -> u64 {
        self.max_size_mb.saturating_mul(BYTES_PER_MB)
    }

    fn too_large(&self, locator: &str, size: u64) -> PipelineError {
        PipelineError::FileTooLarge {
            locator: locator.to_string(),
            size_mb: size / BYTES_PER_MB,
            max_mb: self.max_size_mb,
        }
    }

    async fn fetch_remote(&self, url: &str) -> Result<FetchedImage, PipelineError> {
        let resp = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PipelineError::Timeout {
                        stage: "image fetch".to_string(),
                        timeout_ms: self.timeout.as_millis() as u64,
                    }
                } else {
                    fetch_error(url, e.to_string(), None)
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(fetch_error(
                url,
                format!("HTTP {status}"),
                Some(status.as_u16()),
            ));
        }

        if let Some(len) = resp.content_length() {
            if len > self.max_bytes() {
                return Err(self.too_large(url, len));
            }
        }

        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let mut bytes = Vec::new();
        let mut stream = resp.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| fetch_error(url, e.to_string(), None))?;
            let total = (bytes.len() + chunk.len()) as u64;
            if total > self.max_bytes() {
                return Err(self.too_large(url, total));
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(FetchedImage {
            bytes,
            content_type,
        })
    }

    async fn read_local(&self, locator: &str) -> Result<FetchedImage, PipelineError> {
        let path = local_path(locator)?;

        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| fetch_error(locator, e.to_string(), None))?;
        if !metadata.is_file() {
            return Err(fetch_error(locator, "not a file".to_string(), None));
        }
        if metadata.len() > self.max_bytes() {
            return Err(self.too_large(locator, metadata.len()));
        }

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| fetch_error(locator, e.to_string(), None))?;

        Ok(FetchedImage {
            bytes,
            content_type: None,
        })
    }
}

#[async_trait]
impl ImageFetcher for LocatorFetcher {
    async fn fetch(&self, locator: &str) -> Result<FetchedImage, PipelineError> {
        if is_remote(locator) {
            self.fetch_remote(locator).await
        } else {
            self.read_local(locator).await
        }
    }
}

fn is_remote(locator: &str) -> bool {
    let lower = locator.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Resolve a `file:` URL or plain path to a filesystem path.
///
/// URLs are percent-decoded and may name `localhost` as their host. Plain
/// paths get `~` expansion and are otherwise taken literally.
fn local_path(locator: &str) -> Result<PathBuf, PipelineError> {
    let is_file_url = locator
        .get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("file:"));
    if !is_file_url {
        return Ok(PathBuf::from(shellexpand::tilde(locator).into_owned()));
    }

    let url = reqwest::Url::parse(locator)
        .map_err(|e| fetch_error(locator, format!("invalid file URL: {e}"), None))?;
    url.to_file_path().map_err(|()| {
        fetch_error(
            locator,
            "file URL does not name a local path".to_string(),
            None,
        )
    })
}

fn fetch_error(locator: &str, message: String, status_code: Option<u16>) -> PipelineError {
    PipelineError::Fetch {
        locator: locator.to_string(),
        message,
        status_code,
    }
}
