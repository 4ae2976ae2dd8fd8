//! Cover analysis pipeline components.
//!
//! This module contains the stages of one analysis, in execution order:
//! - **normalize**: Turn an inline payload or locator into an encoded image
//! - **extract**: Read title and author off the cover with a vision model
//! - **resolve**: Look the identity up in a book catalog
//! - **summarize**: Generate a short summary from the resolved metadata
//! - **analyzer**: Orchestrates the stages and publishes progress

pub mod analyzer;
pub mod encoded;
pub mod extract;
pub mod fetch;
pub mod normalize;
pub mod prompts;
pub mod resolve;
pub mod summarize;

// Re-exports for convenient access
pub use analyzer::Analyzer;
pub use encoded::EncodedImage;
pub use extract::{parse_identity, VisionExtractor};
pub use fetch::{FetchedImage, ImageFetcher, LocatorFetcher};
pub use normalize::ImageNormalizer;
pub use prompts::{extraction_prompt, placeholder_identity, summary_prompt};
pub use resolve::{metadata_from_volume, CatalogResolver};
pub use summarize::SummaryGenerator;
