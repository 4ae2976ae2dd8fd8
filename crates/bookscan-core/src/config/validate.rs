//! Configuration validation with range checks.

use crate::error::ConfigError;
use crate::llm::KNOWN_PROVIDERS;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_image_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_size_mb must be > 0".into(),
            ));
        }
        if self.limits.fetch_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.fetch_timeout_ms must be > 0".into(),
            ));
        }
        if self.limits.llm_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.llm_timeout_ms must be > 0".into(),
            ));
        }
        if self.limits.catalog_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.catalog_timeout_ms must be > 0".into(),
            ));
        }
        if self.catalog.endpoint.is_empty() {
            return Err(ConfigError::ValidationError(
                "catalog.endpoint must not be empty".into(),
            ));
        }
        if self.catalog.max_results != 1 {
            return Err(ConfigError::ValidationError(
                "catalog.max_results must be 1 (only the first match is used)".into(),
            ));
        }
        if self.prompts.extraction_max_tokens == 0 || self.prompts.summary_max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "prompts.extraction_max_tokens and prompts.summary_max_tokens must be > 0".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.prompts.temperature) {
            return Err(ConfigError::ValidationError(
                "prompts.temperature must be between 0.0 and 2.0".into(),
            ));
        }
        if !KNOWN_PROVIDERS.contains(&self.llm.provider.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "llm.provider must be one of: {}",
                KNOWN_PROVIDERS.join(", ")
            )));
        }
        Ok(())
    }
}
