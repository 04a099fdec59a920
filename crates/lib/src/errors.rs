use thiserror::Error;

/// Errors raised while talking to an AI provider.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to AI provider: {0}")]
    Request(reqwest::Error),
    #[error("Failed to deserialize AI provider response: {0}")]
    Deserialization(reqwest::Error),
    #[error("Failed to read AI provider stream: {0}")]
    Stream(reqwest::Error),
    #[error("AI provider returned an error: {0}")]
    Api(String),
    #[error("API key is missing")]
    MissingApiKey,
    #[error("AI provider is not configured: {0}")]
    MissingProvider(String),
}
