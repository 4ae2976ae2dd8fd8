//! Core data types for the BookScan pipeline.
//!
//! Each stage produces a new value from the previous one:
//! `ImageRef -> EncodedImage -> ExtractedIdentity -> BookMetadata -> BookSummary`.
//! No stage mutates a value it received.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Caller-supplied handle to cover image bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// Self-describing `data:<media-type>;base64,<payload>` URL
    Inline(String),
    /// `http(s)://` URL, `file://` URL, or local path
    Locator(String),
}

impl ImageRef {
    /// Classify raw caller input. Anything starting with `data:` is inline.
    pub fn parse(input: &str) -> Self {
        if input.starts_with("data:") {
            Self::Inline(input.to_string())
        } else {
            Self::Locator(input.to_string())
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, Self::Inline(_))
    }
}

/// Title and author as read off the cover by the vision model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedIdentity {
    pub title: String,
    pub author: String,
}

impl ExtractedIdentity {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
        }
    }
}

/// Canonical book metadata after the catalog lookup.
///
/// `cover_url` and `description` are `None` when the catalog had no match,
/// the lookup failed, or the match simply lacked that field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookMetadata {
    pub title: String,
    pub author: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl BookMetadata {
    /// Metadata carrying only the extracted identity (no catalog data).
    pub fn from_identity(identity: &ExtractedIdentity) -> Self {
        Self {
            title: identity.title.clone(),
            author: identity.author.clone(),
            cover_url: None,
            description: None,
        }
    }

    /// Attach a generated summary, producing the terminal artifact.
    pub fn with_summary(self, summary: String) -> BookSummary {
        BookSummary {
            metadata: self,
            summary,
        }
    }
}

/// The complete output of one analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSummary {
    #[serde(flatten)]
    pub metadata: BookMetadata,

    /// Model-generated prose, returned as-is
    pub summary: String,
}

impl BookSummary {
    pub fn title(&self) -> &str {
        &self.metadata.title
    }

    pub fn author(&self) -> &str {
        &self.metadata.author
    }

    pub fn cover_url(&self) -> Option<&str> {
        self.metadata.cover_url.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.metadata.description.as_deref()
    }
}

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ImagePreparation,
    Extraction,
    CatalogSearch,
    SummaryGeneration,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::ImagePreparation => write!(f, "image preparation"),
            Stage::Extraction => write!(f, "extraction"),
            Stage::CatalogSearch => write!(f, "catalog search"),
            Stage::SummaryGeneration => write!(f, "summary generation"),
        }
    }
}

/// Observable status of the most recently initiated analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    #[default]
    Idle,
    Pending,
    Settled,
    Failed,
}

impl AnalysisStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Settled | Self::Failed)
    }
}

/// Snapshot of the analyzer's public state.
///
/// `summary` is only set when settled and `error` only when failed.
/// While pending, `stage` names the running stage and nothing else is exposed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisState {
    pub status: AnalysisStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<BookSummary>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisState {
    pub(crate) fn pending() -> Self {
        Self {
            status: AnalysisStatus::Pending,
            stage: None,
            summary: None,
            error: None,
        }
    }

    pub(crate) fn settled(summary: BookSummary) -> Self {
        Self {
            status: AnalysisStatus::Settled,
            stage: None,
            summary: Some(summary),
            error: None,
        }
    }

    pub(crate) fn failed(error: String) -> Self {
        Self {
            status: AnalysisStatus::Failed,
            stage: None,
            summary: None,
            error: Some(error),
        }
    }
}
