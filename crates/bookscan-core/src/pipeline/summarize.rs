//! Summary generation from resolved metadata.

use std::sync::Arc;

use crate::config::{Language, PromptConfig};
use crate::error::PipelineError;
use crate::llm::{LlmProvider, LlmRequest};
use crate::types::{BookMetadata, BookSummary};

use super::prompts::summary_prompt;

/// Asks the model for a ~10 line summary and attaches it to the metadata.
///
/// The response text is used as-is. Any provider failure propagates.
pub struct SummaryGenerator {
    provider: Arc<dyn LlmProvider>,
    language: Language,
    max_tokens: u32,
    temperature: f32,
}

impl SummaryGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>, prompts: &PromptConfig) -> Self {
        Self {
            provider,
            language: prompts.language,
            max_tokens: prompts.summary_max_tokens,
            temperature: prompts.temperature,
        }
    }

    pub async fn generate(&self, metadata: BookMetadata) -> Result<BookSummary, PipelineError> {
        let request = LlmRequest::text(summary_prompt(&metadata, self.language))
            .max_tokens(self.max_tokens)
            .temperature(self.temperature);

        let response = self.provider.generate(&request).await?;
        tracing::debug!(
            "Summary from {} in {}ms ({} tokens)",
            response.model,
            response.latency_ms,
            response
                .tokens_used
                .map_or_else(|| "?".to_string(), |t| t.to_string())
        );

        Ok(metadata.with_summary(response.text))
    }
}
