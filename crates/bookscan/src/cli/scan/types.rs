//! CLI enum types for the scan command: output format, LLM provider, language.

use clap::ValueEnum;

/// Supported output formats.
#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text block
    Text,
    /// Single JSON object
    Json,
}

impl From<OutputFormat> for bookscan_core::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => Self::Text,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// Supported LLM providers.
#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum LlmProvider {
    /// Local Ollama instance
    Ollama,
    /// Hyperbolic API
    Hyperbolic,
    /// Anthropic API
    Anthropic,
    /// OpenAI API
    Openai,
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmProvider::Ollama => write!(f, "ollama"),
            LlmProvider::Hyperbolic => write!(f, "hyperbolic"),
            LlmProvider::Anthropic => write!(f, "anthropic"),
            LlmProvider::Openai => write!(f, "openai"),
        }
    }
}

/// Prompt and message language.
#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum Language {
    En,
    Fr,
}

impl From<Language> for bookscan_core::Language {
    fn from(language: Language) -> Self {
        match language {
            Language::En => Self::En,
            Language::Fr => Self::Fr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_names_are_known_to_core() {
        for provider in LlmProvider::value_variants() {
            assert!(
                bookscan_core::llm::KNOWN_PROVIDERS.contains(&provider.to_string().as_str()),
                "{provider} missing from KNOWN_PROVIDERS"
            );
        }
    }
}
