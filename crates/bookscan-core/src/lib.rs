//! BookScan Core - book cover identification and summarization.
//!
//! BookScan takes a photo of a book cover and returns the book's canonical
//! title, author, cover image link, and a short generated summary.
//!
//! # Architecture
//!
//! One analysis is a strictly sequential pipeline with no persistence:
//!
//! ```text
//! ImageRef → Normalize → Extract (vision LLM) → Resolve (catalog) → Summarize (LLM) → BookSummary
//! ```
//!
//! Catalog lookup never fails the pipeline; the other stages do.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bookscan_core::{Analyzer, Config, ImageRef, LlmProviderFactory};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let timeout = std::time::Duration::from_millis(config.limits.llm_timeout_ms);
//!     let provider = LlmProviderFactory::create(&config.llm.provider, &config.llm, None, timeout)?;
//!     let analyzer = Analyzer::from_config(&config, provider);
//!
//!     let summary = analyzer.analyze(ImageRef::parse("./cover.jpg")).await?;
//!     println!("{} by {}", summary.title(), summary.author());
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod catalog;
pub mod config;
pub mod error;
pub mod llm;
pub mod output;
pub mod pipeline;
pub mod types;

// Re-exports for convenient access
pub use catalog::{CatalogSource, GoogleBooksCatalog};
pub use config::{Config, Language};
pub use error::{AnalysisError, BookScanError, ConfigError, PipelineError, PipelineResult, Result};
pub use llm::{LlmProvider, LlmProviderFactory};
pub use output::{OutputFormat, OutputWriter};
pub use pipeline::{Analyzer, EncodedImage, ImageFetcher, LocatorFetcher};
pub use types::{
    AnalysisState, AnalysisStatus, BookMetadata, BookSummary, ExtractedIdentity, ImageRef, Stage,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
