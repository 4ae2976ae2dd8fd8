//! Google Books volumes search.
//!
//! Anonymous access works for low volumes; an API key is appended when configured.

use async_trait::async_trait;
use std::time::Duration;

use super::source::{CatalogSource, Volume, VolumesResponse};
use crate::config::CatalogConfig;
use crate::error::PipelineError;
use crate::llm::resolve_env_var;

/// Catalog backed by the public Google Books API.
pub struct GoogleBooksCatalog {
    endpoint: String,
    api_key: Option<String>,
    timeout: Duration,
    client: reqwest::Client,
}

impl GoogleBooksCatalog {
    pub fn new(config: &CatalogConfig, timeout: Duration) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            api_key: resolve_env_var(&config.api_key),
            timeout,
            client: reqwest::Client::new(),
        }
    }

    fn query_params(&self, query: &str, max_results: u32) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("q", query.to_string()),
            ("maxResults", max_results.to_string()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("key", key.clone()));
        }
        params
    }
}

#[async_trait]
impl CatalogSource for GoogleBooksCatalog {
    fn name(&self) -> &str {
        "google-books"
    }

    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<Volume>, PipelineError> {
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&self.query_params(query, max_results))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PipelineError::Timeout {
                        stage: "catalog search".to_string(),
                        timeout_ms: self.timeout.as_millis() as u64,
                    }
                } else {
                    PipelineError::Catalog {
                        message: format!("Google Books request failed: {e}"),
                        status_code: None,
                    }
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(PipelineError::Catalog {
                message: format!("Google Books HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        let body: VolumesResponse = resp.json().await.map_err(|e| PipelineError::Catalog {
            message: format!("Failed to parse Google Books response: {e}"),
            status_code: None,
        })?;

        tracing::debug!(
            "Google Books reported {} total item(s) for {query:?}",
            body.total_items
        );
        Ok(body.items.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUNE_RESPONSE: &str = r#"{
        "kind": "books#volumes",
        "totalItems": 1,
        "items": [{
            "kind": "books#volume",
            "id": "B1hSG45JCX4C",
            "volumeInfo": {
                "title": "Dune",
                "authors": ["Frank Herbert"],
                "publisher": "Penguin",
                "description": "Set on the desert planet Arrakis.",
                "imageLinks": {
                    "smallThumbnail": "http://books.google.com/books/content?id=B1h&zoom=5",
                    "thumbnail": "http://books.google.com/books/content?id=B1h&zoom=1"
                }
            }
        }]
    }"#;

    #[test]
    fn test_parse_full_response() {
        let body: VolumesResponse = serde_json::from_str(DUNE_RESPONSE).unwrap();
        let items = body.items.unwrap();
        assert_eq!(items.len(), 1);

        let info = &items[0].volume_info;
        assert_eq!(info.title.as_deref(), Some("Dune"));
        assert_eq!(info.authors, vec!["Frank Herbert".to_string()]);
        assert_eq!(
            info.image_links.as_ref().and_then(|l| l.best()),
            Some("http://books.google.com/books/content?id=B1h&zoom=1")
        );
    }

    #[test]
    fn test_parse_response_without_items() {
        let body: VolumesResponse =
            serde_json::from_str(r#"{"kind": "books#volumes", "totalItems": 0}"#).unwrap();
        assert!(body.items.is_none());
        assert_eq!(body.total_items, 0);
    }

    #[test]
    fn test_parse_sparse_volume() {
        let body: VolumesResponse =
            serde_json::from_str(r#"{"items": [{"volumeInfo": {}}, {}]}"#).unwrap();
        let items = body.items.unwrap();
        assert!(items[0].volume_info.title.is_none());
        assert!(items[1].volume_info.authors.is_empty());
    }

    #[test]
    fn test_query_params() {
        let catalog = GoogleBooksCatalog::new(&CatalogConfig::default(), Duration::from_secs(5));
        let params = catalog.query_params("Dune Frank Herbert", 1);
        assert_eq!(
            params,
            vec![
                ("q", "Dune Frank Herbert".to_string()),
                ("maxResults", "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_params_include_key() {
        let config = CatalogConfig {
            api_key: "AIza-test".to_string(),
            ..CatalogConfig::default()
        };
        let catalog = GoogleBooksCatalog::new(&config, Duration::from_secs(5));
        let params = catalog.query_params("Dune", 1);
        assert!(params.contains(&("key", "AIza-test".to_string())));
    }
}
