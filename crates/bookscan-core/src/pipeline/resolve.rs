//! Catalog resolution: extracted identity -> canonical metadata.
//!
//! This stage never fails. Lookup errors and empty results fall back to the
//! extracted title and author with no cover or description.

use std::sync::Arc;

use crate::catalog::{CatalogSource, VolumeInfo};
use crate::types::{BookMetadata, ExtractedIdentity};

pub struct CatalogResolver {
    catalog: Arc<dyn CatalogSource>,
    max_results: u32,
}

impl CatalogResolver {
    pub fn new(catalog: Arc<dyn CatalogSource>, max_results: u32) -> Self {
        Self {
            catalog,
            max_results,
        }
    }

    pub async fn resolve(&self, identity: &ExtractedIdentity) -> BookMetadata {
        let query = format!("{} {}", identity.title, identity.author);

        match self.catalog.search(&query, self.max_results).await {
            Ok(volumes) => match volumes.into_iter().next() {
                Some(volume) => metadata_from_volume(volume.volume_info, identity),
                None => {
                    tracing::info!("No {} match for {query:?}", self.catalog.name());
                    BookMetadata::from_identity(identity)
                }
            },
            Err(e) => {
                tracing::warn!("{} lookup failed, using extracted values: {e}", self.catalog.name());
                BookMetadata::from_identity(identity)
            }
        }
    }
}

/// Map a catalog hit, filling absent or empty title/author from the extraction.
pub fn metadata_from_volume(info: VolumeInfo, fallback: &ExtractedIdentity) -> BookMetadata {
    let cover_url = info
        .image_links
        .as_ref()
        .and_then(|links| links.best())
        .map(String::from);

    BookMetadata {
        title: info
            .title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| fallback.title.clone()),
        author: info
            .authors
            .into_iter()
            .next()
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| fallback.author.clone()),
        cover_url,
        description: info.description.filter(|d| !d.is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ImageLinks, Volume};
    use crate::error::PipelineError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Catalog returning a canned result and recording queries.
    struct MockCatalog {
        result: Box<dyn Fn() -> Result<Vec<Volume>, PipelineError> + Send + Sync>,
        queries: Mutex<Vec<(String, u32)>>,
    }

    impl MockCatalog {
        fn volumes(volumes: Vec<VolumeInfo>) -> Self {
            Self {
                result: Box::new(move || {
                    Ok(volumes
                        .iter()
                        .cloned()
                        .map(|volume_info| Volume { volume_info })
                        .collect())
                }),
                queries: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                result: Box::new(|| {
                    Err(PipelineError::Catalog {
                        message: "dns error".to_string(),
                        status_code: None,
                    })
                }),
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CatalogSource for MockCatalog {
        fn name(&self) -> &str {
            "mock-catalog"
        }

        async fn search(
            &self,
            query: &str,
            max_results: u32,
        ) -> Result<Vec<Volume>, PipelineError> {
            self.queries
                .lock()
                .unwrap()
                .push((query.to_string(), max_results));
            (self.result)()
        }
    }

    fn dune_info() -> VolumeInfo {
        VolumeInfo {
            title: Some("Dune (40th Anniversary Edition)".to_string()),
            authors: vec!["Frank Herbert".to_string(), "Brian Herbert".to_string()],
            image_links: Some(ImageLinks {
                thumbnail: Some("http://books.google.com/thumb".to_string()),
                small_thumbnail: Some("http://books.google.com/small".to_string()),
            }),
            description: Some("Set on the desert planet Arrakis.".to_string()),
        }
    }

    fn identity() -> ExtractedIdentity {
        ExtractedIdentity::new("Dune", "F. Herbert")
    }

    #[tokio::test]
    async fn test_query_concatenates_title_and_author() {
        let catalog = Arc::new(MockCatalog::volumes(vec![]));
        let resolver = CatalogResolver::new(catalog.clone(), 1);
        resolver.resolve(&identity()).await;

        let queries = catalog.queries.lock().unwrap();
        assert_eq!(queries.as_slice(), &[("Dune F. Herbert".to_string(), 1)]);
    }

    #[tokio::test]
    async fn test_match_uses_catalog_values() {
        let resolver = CatalogResolver::new(Arc::new(MockCatalog::volumes(vec![dune_info()])), 1);
        let metadata = resolver.resolve(&identity()).await;

        assert_eq!(metadata.title, "Dune (40th Anniversary Edition)");
        assert_eq!(metadata.author, "Frank Herbert");
        assert_eq!(
            metadata.cover_url.as_deref(),
            Some("http://books.google.com/thumb")
        );
        assert_eq!(
            metadata.description.as_deref(),
            Some("Set on the desert planet Arrakis.")
        );
    }

    #[tokio::test]
    async fn test_only_first_result_is_used() {
        let mut second = dune_info();
        second.title = Some("Dune Messiah".to_string());
        let resolver = CatalogResolver::new(
            Arc::new(MockCatalog::volumes(vec![dune_info(), second])),
            1,
        );
        let metadata = resolver.resolve(&identity()).await;
        assert_eq!(metadata.title, "Dune (40th Anniversary Edition)");
    }

    #[tokio::test]
    async fn test_no_results_falls_back() {
        let resolver = CatalogResolver::new(Arc::new(MockCatalog::volumes(vec![])), 1);
        let metadata = resolver.resolve(&identity()).await;
        assert_eq!(metadata, BookMetadata::from_identity(&identity()));
    }

    #[tokio::test]
    async fn test_lookup_error_falls_back() {
        let resolver = CatalogResolver::new(Arc::new(MockCatalog::failing()), 1);
        let metadata = resolver.resolve(&identity()).await;

        assert_eq!(metadata.title, "Dune");
        assert_eq!(metadata.author, "F. Herbert");
        assert!(metadata.cover_url.is_none());
        assert!(metadata.description.is_none());
    }

    #[test]
    fn test_sparse_hit_fills_from_extraction() {
        let info = VolumeInfo {
            title: Some(String::new()),
            authors: vec![],
            image_links: None,
            description: Some(String::new()),
        };
        let metadata = metadata_from_volume(info, &identity());
        assert_eq!(metadata.title, "Dune");
        assert_eq!(metadata.author, "F. Herbert");
        assert!(metadata.cover_url.is_none());
        assert!(metadata.description.is_none());
    }

    #[test]
    fn test_hit_without_description_keeps_cover() {
        let mut info = dune_info();
        info.description = None;
        info.image_links = Some(ImageLinks {
            thumbnail: None,
            small_thumbnail: Some("http://books.google.com/small".to_string()),
        });
        let metadata = metadata_from_volume(info, &identity());
        assert_eq!(
            metadata.cover_url.as_deref(),
            Some("http://books.google.com/small")
        );
        assert!(metadata.description.is_none());
    }
}
