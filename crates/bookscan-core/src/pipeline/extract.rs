//! Vision extraction: read title and author off the cover image.

use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::config::{Language, PromptConfig};
use crate::error::PipelineError;
use crate::llm::{LlmProvider, LlmRequest};
use crate::types::ExtractedIdentity;

use super::encoded::EncodedImage;
use super::prompts::{extraction_prompt, placeholder_identity};

/// Sends the cover to a vision model and parses its JSON answer.
///
/// Unreadable answers degrade to placeholder values so the catalog stage
/// always has something to search for. Transport failures propagate.
pub struct VisionExtractor {
    provider: Arc<dyn LlmProvider>,
    language: Language,
    max_tokens: u32,
    temperature: f32,
}

/// Field types of the model's answer, read from a JSON object only.
/// Missing fields are filled later.
#[derive(Deserialize)]
struct RawIdentity {
    title: Option<String>,
    author: Option<String>,
}

impl VisionExtractor {
    pub fn new(provider: Arc<dyn LlmProvider>, prompts: &PromptConfig) -> Self {
        Self {
            provider,
            language: prompts.language,
            max_tokens: prompts.extraction_max_tokens,
            temperature: prompts.temperature,
        }
    }

    pub async fn extract(&self, image: EncodedImage) -> Result<ExtractedIdentity, PipelineError> {
        let request = LlmRequest::with_image(image, extraction_prompt(self.language))
            .max_tokens(self.max_tokens)
            .temperature(self.temperature);

        let response = self.provider.generate(&request).await?;
        tracing::debug!(
            "Extraction response from {} ({}ms): {}",
            response.model,
            response.latency_ms,
            response.text
        );

        if response.text.trim().is_empty() {
            tracing::warn!(
                "{} returned no text for the cover, using placeholders",
                self.provider.name()
            );
            return Ok(placeholder_identity(self.language));
        }
        Ok(parse_identity(response.text.trim(), self.language))
    }
}

/// Parse the raw model answer into an identity.
///
/// Anything other than a JSON object (malformed JSON, extra prose, arrays,
/// scalars) or a non-string field yields the placeholder pair. A missing,
/// null or blank field is replaced by its placeholder alone.
pub fn parse_identity(raw: &str, language: Language) -> ExtractedIdentity {
    let placeholder = placeholder_identity(language);

    let object = match serde_json::from_str::<Value>(raw) {
        Ok(value @ Value::Object(_)) => value,
        Ok(other) => {
            tracing::warn!("Extraction response is not a JSON object ({other}), using placeholders");
            return placeholder;
        }
        Err(e) => {
            tracing::warn!("Could not parse extraction response as JSON ({e}), using placeholders");
            return placeholder;
        }
    };

    match serde_json::from_value::<RawIdentity>(object) {
        Ok(parsed) => ExtractedIdentity {
            title: non_blank(parsed.title).unwrap_or(placeholder.title),
            author: non_blank(parsed.author).unwrap_or(placeholder.author),
        },
        Err(e) => {
            tracing::warn!("Extraction response has unexpected field types ({e}), using placeholders");
            placeholder
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
