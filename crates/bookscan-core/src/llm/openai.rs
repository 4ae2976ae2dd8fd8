//! OpenAI LLM provider using the Chat Completions API.
//!
//! Sends the image (when present) as a data URL in the user message content array.

use super::provider::{send_error, LlmProvider, LlmRequest, LlmResponse};
use crate::error::PipelineError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// OpenAI provider using Chat Completions API.
pub struct OpenAiProvider {
    api_key: String,
    model: String,
    timeout: Duration,
    client: reqwest::Client,
    endpoint: String,
}

impl OpenAiProvider {
    pub fn new(api_key: &str, model: &str, timeout: Duration) -> Self {
        Self::with_endpoint(
            api_key,
            model,
            "https://api.openai.com/v1/chat/completions",
            timeout,
        )
    }

    /// Create with a custom endpoint (used by Hyperbolic provider).
    pub fn with_endpoint(api_key: &str, model: &str, endpoint: &str, timeout: Duration) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            timeout,
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
        }
    }

    fn build_body(&self, request: &LlmRequest) -> ChatRequest {
        let mut content = Vec::with_capacity(2);
        if let Some(image) = &request.image {
            content.push(ChatContent::ImageUrl {
                image_url: ImageUrl {
                    url: image.data_url(),
                },
            });
        }
        content.push(ChatContent::Text {
            text: request.prompt.clone(),
        });

        ChatRequest {
            model: self.model.clone(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content,
            }],
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ChatContent>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ChatContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    model: String,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

impl ChatResponse {
    /// First choice's content, verbatim. No content yields an empty string.
    fn into_response(self, latency_ms: u64) -> LlmResponse {
        let text = self
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        LlmResponse {
            text,
            model: self.model,
            tokens_used: self.usage.map(|u| u.total_tokens),
            latency_ms,
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, PipelineError> {
        let start = Instant::now();
        let body = self.build_body(request);

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| send_error("OpenAI", self.timeout, e))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(PipelineError::Llm {
                message: format!("OpenAI HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        let chat_resp: ChatResponse = resp.json().await.map_err(|e| PipelineError::Llm {
            message: format!("Failed to parse OpenAI response: {e}"),
            status_code: None,
        })?;

        Ok(chat_resp.into_response(start.elapsed().as_millis() as u64))
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::EncodedImage;

    #[test]
    fn test_vision_body_uses_data_url() {
        let provider = OpenAiProvider::new("sk-test", "gpt-4o-mini", Duration::from_secs(60));
        let image = EncodedImage::from_bytes(&[1, 2, 3], "image/jpeg");
        let request = LlmRequest::with_image(image, "Read the cover");
        let json = serde_json::to_value(provider.build_body(&request)).unwrap();

        let content = &json["messages"][0]["content"];
        assert_eq!(content[0]["type"], "image_url");
        assert!(content[0]["image_url"]["url"]
            .as_str()
            .unwrap()
            .starts_with("data:image/jpeg;base64,"));
        assert_eq!(content[1]["text"], "Read the cover");
    }

    #[test]
    fn test_text_body_omits_image() {
        let provider = OpenAiProvider::with_endpoint(
            "sk-test",
            "some-model",
            "http://localhost:9/v1/chat/completions",
            Duration::from_secs(60),
        );
        let request = LlmRequest::text("Summarize Dune");
        let json = serde_json::to_value(provider.build_body(&request)).unwrap();

        let content = json["messages"][0]["content"].as_array().unwrap();
        assert_eq!(content.len(), 1);
        assert_eq!(content[0]["type"], "text");
    }

    #[test]
    fn test_response_text_is_verbatim() {
        let body = r#"{
            "model": "gpt-4o-mini",
            "choices": [{"message": {"role": "assistant", "content": "  Paul arrives.\n"}}],
            "usage": {"total_tokens": 42}
        }"#;
        let chat: ChatResponse = serde_json::from_str(body).unwrap();
        let response = chat.into_response(7);

        assert_eq!(response.text, "  Paul arrives.\n");
        assert_eq!(response.tokens_used, Some(42));
        assert_eq!(response.latency_ms, 7);
    }

    #[test]
    fn test_missing_content_is_empty_text() {
        let chat: ChatResponse =
            serde_json::from_str(r#"{"model": "m", "choices": []}"#).unwrap();
        assert_eq!(chat.into_response(0).text, "");

        let chat: ChatResponse = serde_json::from_str(
            r#"{"model": "m", "choices": [{"message": {"content": null}}]}"#,
        )
        .unwrap();
        assert_eq!(chat.into_response(0).text, "");
    }
}
