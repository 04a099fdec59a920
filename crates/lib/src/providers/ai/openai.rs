use crate::{errors::LlmError, providers::ai::AiProvider};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

// --- OpenAI-compatible request and response structures ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    temperature: f32,
    stream: bool,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize, Debug)]
struct StreamChunk {
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize, Debug)]
struct StreamChoice {
    delta: StreamDelta,
}

#[derive(Deserialize, Debug, Default)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}

// --- OpenAI-compatible Provider implementation ---

/// A provider for any OpenAI-compatible chat-completions API.
///
/// Requests streamed, JSON-shaped output and concatenates the SSE deltas
/// into the full response text before returning.
#[derive(Clone, Debug)]
pub struct OpenAiProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: Option<String>,
    model: Option<String>,
}

impl OpenAiProvider {
    /// Creates a new `OpenAiProvider`.
    pub fn new(
        api_url: String,
        api_key: Option<String>,
        model: Option<String>,
    ) -> Result<Self, LlmError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(LlmError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl AiProvider for OpenAiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, LlmError> {
        let messages = vec![
            ChatMessage {
                role: "system".to_string(),
                content: system_prompt.to_string(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: user_prompt.to_string(),
            },
        ];

        let request_body = ChatRequest {
            messages,
            model: self.model.as_deref(),
            temperature: 0.0,
            stream: true,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        let mut request_builder = self.client.post(&self.api_url);
        if let Some(key) = &self.api_key {
            request_builder = request_builder.bearer_auth(key);
        }

        let response = request_builder
            .json(&request_body)
            .send()
            .await
            .map_err(LlmError::Request)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::Api(error_text));
        }

        // SSE frames arrive as `data: {json}` lines; the stream is consumed
        // to completion before the caller sees anything.
        let mut stream = response.bytes_stream();
        let mut buffer = String::new();
        let mut content = String::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(LlmError::Stream)?;
            buffer.push_str(&String::from_utf8_lossy(&chunk));

            while let Some(newline) = buffer.find('\n') {
                let line: String = buffer.drain(..=newline).collect();
                let line = line.trim();
                let Some(data) = line.strip_prefix("data:") else {
                    continue;
                };
                let data = data.trim();
                if data.is_empty() || data == "[DONE]" {
                    continue;
                }
                let delta: StreamChunk = serde_json::from_str(data)
                    .map_err(|e| LlmError::Api(format!("malformed stream frame: {e}")))?;
                if let Some(text) = delta
                    .choices
                    .first()
                    .and_then(|choice| choice.delta.content.as_deref())
                {
                    content.push_str(text);
                }
            }
        }

        Ok(content)
    }
}
