//! Image normalization: every `ImageRef` becomes one `EncodedImage`.

use std::sync::Arc;

use crate::error::PipelineError;
use crate::types::ImageRef;

use super::encoded::EncodedImage;
use super::fetch::{FetchedImage, ImageFetcher};

/// Converts inline payloads and locators into the canonical encoded form.
pub struct ImageNormalizer {
    fetcher: Arc<dyn ImageFetcher>,
}

impl ImageNormalizer {
    pub fn new(fetcher: Arc<dyn ImageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Inline payloads pass through unchanged; locators are fetched and encoded.
    pub async fn normalize(&self, image: ImageRef) -> Result<EncodedImage, PipelineError> {
        match image {
            ImageRef::Inline(url) => EncodedImage::from_data_url(&url),
            ImageRef::Locator(locator) => {
                let fetched = self.fetcher.fetch(&locator).await?;
                if fetched.bytes.is_empty() {
                    return Err(PipelineError::InvalidImage {
                        message: format!("{locator} returned no data"),
                    });
                }
                let media_type =
                    detect_media_type(&fetched).ok_or_else(|| PipelineError::InvalidImage {
                        message: format!("{locator} is not a recognized image format"),
                    })?;
                tracing::debug!(
                    "Fetched {} bytes ({media_type}) from {locator}",
                    fetched.bytes.len()
                );
                Ok(EncodedImage::from_bytes(&fetched.bytes, &media_type))
            }
        }
    }
}

/// Sniff the format from magic bytes, falling back to an `image/*` content type.
fn detect_media_type(fetched: &FetchedImage) -> Option<String> {
    if let Ok(format) = image::guess_format(&fetched.bytes) {
        return Some(format.to_mime_type().to_string());
    }
    fetched
        .content_type
        .as_deref()
        .and_then(|ct| ct.split(';').next())
        .map(str::trim)
        .filter(|ct| ct.starts_with("image/"))
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    const PNG_HEADER: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    /// Fetcher returning a fixed result and counting calls.
    struct StaticFetcher {
        result: Box<dyn Fn() -> Result<FetchedImage, PipelineError> + Send + Sync>,
        calls: Arc<AtomicU32>,
    }

    impl StaticFetcher {
        fn bytes(bytes: Vec<u8>, content_type: Option<&str>) -> Self {
            let content_type = content_type.map(String::from);
            Self {
                result: Box::new(move || {
                    Ok(FetchedImage {
                        bytes: bytes.clone(),
                        content_type: content_type.clone(),
                    })
                }),
                calls: Arc::new(AtomicU32::new(0)),
            }
        }

        fn failing() -> Self {
            Self {
                result: Box::new(|| {
                    Err(PipelineError::Fetch {
                        locator: "https://example.com/cover.jpg".to_string(),
                        message: "connection refused".to_string(),
                        status_code: None,
                    })
                }),
                calls: Arc::new(AtomicU32::new(0)),
            }
        }
    }

    #[async_trait]
    impl ImageFetcher for StaticFetcher {
        async fn fetch(&self, _locator: &str) -> Result<FetchedImage, PipelineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.result)()
        }
    }

    #[tokio::test]
    async fn test_inline_payload_returned_unchanged() {
        let fetcher = StaticFetcher::failing();
        let calls = fetcher.calls.clone();
        let normalizer = ImageNormalizer::new(Arc::new(fetcher));

        let url = "data:image/jpeg;base64,/9j/4AAQSkZJRg==";
        let encoded = normalizer
            .normalize(ImageRef::Inline(url.to_string()))
            .await
            .unwrap();

        assert_eq!(encoded.data_url(), url);
        assert_eq!(calls.load(Ordering::SeqCst), 0, "inline must not fetch");
    }

    #[tokio::test]
    async fn test_locator_is_fetched_and_encoded() {
        let mut bytes = PNG_HEADER.to_vec();
        bytes.extend_from_slice(&[0, 0, 0, 13]);
        let normalizer = ImageNormalizer::new(Arc::new(StaticFetcher::bytes(bytes.clone(), None)));

        let encoded = normalizer
            .normalize(ImageRef::Locator("/photos/cover.png".to_string()))
            .await
            .unwrap();

        assert_eq!(encoded.media_type(), "image/png");
        assert_eq!(encoded.decode().unwrap(), bytes);
    }

    #[tokio::test]
    async fn test_content_type_fallback() {
        let normalizer = ImageNormalizer::new(Arc::new(StaticFetcher::bytes(
            vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
            Some("image/heic; charset=binary"),
        )));

        let encoded = normalizer
            .normalize(ImageRef::Locator("https://example.com/cover".to_string()))
            .await
            .unwrap();
        assert_eq!(encoded.media_type(), "image/heic");
    }

    #[tokio::test]
    async fn test_unrecognized_bytes_rejected() {
        let normalizer = ImageNormalizer::new(Arc::new(StaticFetcher::bytes(
            b"<html>not an image</html>".to_vec(),
            Some("text/html"),
        )));

        let err = normalizer
            .normalize(ImageRef::Locator("https://example.com/page".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidImage { .. }));
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let normalizer = ImageNormalizer::new(Arc::new(StaticFetcher::failing()));
        let err = normalizer
            .normalize(ImageRef::Locator("https://example.com/cover.jpg".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Fetch { .. }));
    }

    #[tokio::test]
    async fn test_empty_body_rejected() {
        let normalizer = ImageNormalizer::new(Arc::new(StaticFetcher::bytes(Vec::new(), None)));
        let err = normalizer
            .normalize(ImageRef::Locator("https://example.com/empty".to_string()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no data"));
    }
}
