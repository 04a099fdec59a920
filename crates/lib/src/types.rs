use serde::Deserialize;

/// A reusable configuration for a specific AI provider instance.
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// The type of provider (e.g., "gemini", "openai").
    pub provider: String,
    /// The API URL. Optional for providers like Gemini where it can be derived.
    pub api_url: Option<String>,
    /// The API key, which can be null for unauthenticated endpoints.
    pub api_key: Option<String>,
    pub model_name: String,
}
