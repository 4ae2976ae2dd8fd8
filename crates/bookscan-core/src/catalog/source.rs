//! Catalog source trait and the volume search response shape.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::PipelineError;

/// Volumes search response. Missing `items` means no match, not an error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumesResponse {
    #[serde(default)]
    pub total_items: u32,
    pub items: Option<Vec<Volume>>,
}

/// One search hit.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    #[serde(default)]
    pub volume_info: VolumeInfo,
}

/// Bibliographic fields of a hit. Every field may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    pub image_links: Option<ImageLinks>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    pub thumbnail: Option<String>,
    pub small_thumbnail: Option<String>,
}

impl ImageLinks {
    /// Larger thumbnail when present, otherwise the small one.
    pub fn best(&self) -> Option<&str> {
        self.thumbnail
            .as_deref()
            .filter(|url| !url.is_empty())
            .or_else(|| self.small_thumbnail.as_deref().filter(|url| !url.is_empty()))
    }
}

/// Trait that book catalog backends implement.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Catalog name for logging.
    fn name(&self) -> &str;

    /// Free-text search returning at most `max_results` hits, best first.
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<Volume>, PipelineError>;
}
