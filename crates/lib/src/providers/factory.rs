//! # AI Provider Factory
//!
//! Centralizes the logic for creating AI provider instances from
//! configuration, so every consumer (server, tests, jobs) builds providers
//! the same way.

use crate::{
    errors::LlmError,
    providers::ai::{gemini::GeminiProvider, openai::OpenAiProvider, AiProvider},
    types::ProviderConfig,
};
use tracing::info;

/// Creates an AI provider instance from a named provider configuration.
///
/// Gemini providers derive their URL from the model name when none is
/// configured; OpenAI-compatible providers always require an explicit URL.
pub fn create_provider(config: &ProviderConfig) -> Result<Box<dyn AiProvider>, LlmError> {
    match config.provider.as_str() {
        "gemini" => {
            let api_key = config
                .api_key
                .clone()
                .ok_or(LlmError::MissingApiKey)?;
            let api_url = config.api_url.clone().unwrap_or_else(|| {
                format!(
                    "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
                    config.model_name
                )
            });
            info!(model = %config.model_name, "Configuring Gemini provider");
            Ok(Box::new(GeminiProvider::new(api_url, api_key)?))
        }
        "openai" => {
            let api_url = config.api_url.clone().ok_or_else(|| {
                LlmError::MissingProvider(
                    "api_url is required for an openai-compatible provider".to_string(),
                )
            })?;
            info!(model = %config.model_name, "Configuring OpenAI-compatible provider");
            Ok(Box::new(OpenAiProvider::new(
                api_url,
                config.api_key.clone(),
                Some(config.model_name.clone()),
            )?))
        }
        other => Err(LlmError::MissingProvider(format!(
            "unsupported AI provider type '{other}'"
        ))),
    }
}
