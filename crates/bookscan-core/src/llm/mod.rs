//! LLM integration for cover reading and summary generation.
//!
//! Provides a provider abstraction over multiple LLM backends (Ollama, Anthropic,
//! OpenAI, Hyperbolic). The same provider serves both the vision extraction call
//! and the text-only summary call.

pub(crate) mod anthropic;
pub(crate) mod hyperbolic;
pub(crate) mod ollama;
pub(crate) mod openai;
pub(crate) mod provider;

pub use provider::{
    resolve_env_var, LlmProvider, LlmProviderFactory, LlmRequest, LlmResponse, KNOWN_PROVIDERS,
};
