//! Error types for the BookScan pipeline.
//!
//! Errors are organized by stage so a failed analysis can say where it broke
//! (image preparation, extraction, catalog search, summary generation).

use crate::config::Language;
use crate::types::Stage;
use thiserror::Error;

/// Top-level error type for BookScan operations.
#[derive(Error, Debug)]
pub enum BookScanError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Pipeline processing errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Inline payload is malformed or fetched bytes are not an image
    #[error("Invalid image: {message}")]
    InvalidImage { message: String },

    /// Fetching image bytes from a locator failed
    #[error("Fetch failed for {locator}: {message}")]
    Fetch {
        locator: String,
        message: String,
        status_code: Option<u16>,
    },

    /// Fetched image exceeds the size limit
    #[error("Image too large: {locator} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        locator: String,
        size_mb: u64,
        max_mb: u64,
    },

    /// LLM call failed (transport, HTTP status, or undecodable body)
    #[error("LLM error: {message}")]
    Llm {
        message: String,
        status_code: Option<u16>,
    },

    /// Catalog lookup failed
    #[error("Catalog error: {message}")]
    Catalog {
        message: String,
        status_code: Option<u16>,
    },

    /// Operation timed out
    #[error("Timeout in {stage} stage after {timeout_ms}ms")]
    Timeout { stage: String, timeout_ms: u64 },
}

/// A pipeline-level failure: the stage that broke and why.
///
/// Only image preparation, extraction and summary generation can produce one.
/// Catalog search failures are absorbed by the resolver.
#[derive(Error, Debug)]
#[error("{stage} failed: {source}")]
pub struct AnalysisError {
    pub stage: Stage,
    #[source]
    pub source: PipelineError,
}

impl AnalysisError {
    pub fn new(stage: Stage, source: PipelineError) -> Self {
        Self { stage, source }
    }

    /// Generic message for end users. Never includes partial results.
    pub fn user_message(&self, language: Language) -> &'static str {
        match language {
            Language::En => {
                "Could not analyze the cover. Please try again with a clearer image."
            }
            Language::Fr => {
                "Impossible d'analyser la couverture. Veuillez réessayer avec une image plus claire."
            }
        }
    }
}

/// Convenience type alias for BookScan results.
pub type Result<T> = std::result::Result<T, BookScanError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_error_display_names_stage() {
        let err = AnalysisError::new(
            Stage::ImagePreparation,
            PipelineError::Fetch {
                locator: "https://example.com/cover.jpg".to_string(),
                message: "connection refused".to_string(),
                status_code: None,
            },
        );
        let text = err.to_string();
        assert!(text.starts_with("image preparation failed"));
        assert!(text.contains("connection refused"));
    }

    #[test]
    fn test_user_message_is_generic() {
        let err = AnalysisError::new(
            Stage::Extraction,
            PipelineError::Llm {
                message: "HTTP 500: secret internals".to_string(),
                status_code: Some(500),
            },
        );
        assert!(!err.user_message(Language::En).contains("secret"));
        assert!(err.user_message(Language::En).contains("clearer image"));
        assert!(err.user_message(Language::Fr).contains("image plus claire"));
    }
}
