//! # Generation Stage Client
//!
//! The explicit context object for the content-generation pipeline: the AI
//! provider, the prompt library, and the style bank travel together and
//! are injected at construction instead of living in process-wide state.
//!
//! Each stage formats its prompt pair from the request's fields (optional
//! fields default to null so formatting never fails on a missing key),
//! issues one provider call, counts tokens, and hands the raw text to the
//! response parser. No retries happen at this layer: a malformed response
//! is fatal to the stage and the caller decides whether to re-invoke it.

use super::parser;
use super::style::StyleBank;
use super::types::{
    EditContentRequest, EditContentResponse, EditType, GenerateDraftRequest,
    GenerateDraftResponse, GenerateFullContentRequest, GenerateFullContentResponse,
    GenerateHeadlinesRequest, GenerateHeadlinesResponse, GenerateResearchQuestionsRequest,
    GenerateResearchQuestionsResponse, GenerateTopicSentencesRequest,
    GenerateTopicSentencesResponse, Stage,
};
use crate::constants::STYLE_EXAMPLES_PER_CATEGORY;
use crate::errors::LlmError;
use crate::prompts::PromptLibrary;
use crate::providers::ai::AiProvider;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info};

/// Custom error types for the generation stages.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("AI provider call failed: {0}")]
    Llm(#[from] LlmError),
    #[error(transparent)]
    Data(#[from] parser::DataError),
    #[error("Failed to encode stage request: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("No prompt template is configured for stage `{0}`")]
    MissingPrompt(&'static str),
    #[error("Flair edits require a configured style bank")]
    MissingStyles,
}

/// Optional keys every stage template may reference. Each is present in
/// the parameter map, defaulting to null, before formatting.
const OPTIONAL_PROMPT_KEYS: &[&str] = &[
    "data",
    "publication",
    "country",
    "personas",
    "desired_length",
    "scratchpad",
    "include_token_count",
    "limit",
    "target_audience",
    "context",
];

/// Drives the six content-generation stages against one AI provider.
#[derive(Clone)]
pub struct StageClient {
    provider: Box<dyn AiProvider>,
    prompts: PromptLibrary,
    styles: Option<StyleBank>,
}

impl StageClient {
    pub fn new(provider: Box<dyn AiProvider>, prompts: PromptLibrary) -> Self {
        Self {
            provider,
            prompts,
            styles: None,
        }
    }

    /// Attaches the style bank used to augment flair edits.
    pub fn with_styles(mut self, styles: StyleBank) -> Self {
        self.styles = Some(styles);
        self
    }

    pub async fn generate_research_questions(
        &self,
        request: &GenerateResearchQuestionsRequest,
    ) -> Result<GenerateResearchQuestionsResponse, GenerationError> {
        let (raw, token_count) = self
            .call_stage(Stage::ResearchQuestions, request, None)
            .await?;
        let mut response = parser::parse_research_questions(&raw)?;
        response.token_count.get_or_insert(token_count);
        Ok(response)
    }

    pub async fn generate_headlines(
        &self,
        request: &GenerateHeadlinesRequest,
    ) -> Result<GenerateHeadlinesResponse, GenerationError> {
        let (raw, token_count) = self.call_stage(Stage::Headlines, request, None).await?;
        let mut response = parser::parse_headlines(&raw)?;
        response.token_count.get_or_insert(token_count);
        Ok(response)
    }

    pub async fn generate_draft(
        &self,
        request: &GenerateDraftRequest,
    ) -> Result<GenerateDraftResponse, GenerationError> {
        let (raw, token_count) = self.call_stage(Stage::Draft, request, None).await?;
        let mut response = parser::parse_draft(&raw, request)?;
        response.token_count.get_or_insert(token_count);
        Ok(response)
    }

    pub async fn generate_topic_sentences(
        &self,
        request: &GenerateTopicSentencesRequest,
    ) -> Result<GenerateTopicSentencesResponse, GenerationError> {
        let (raw, token_count) = self
            .call_stage(Stage::TopicSentences, request, None)
            .await?;
        let mut response = parser::parse_topic_sentences(&raw, &request.draft)?;
        response.token_count.get_or_insert(token_count);
        Ok(response)
    }

    pub async fn generate_full_content(
        &self,
        request: &GenerateFullContentRequest,
    ) -> Result<GenerateFullContentResponse, GenerationError> {
        let (raw, token_count) = self.call_stage(Stage::FullContent, request, None).await?;
        let mut response = parser::parse_full_content(&raw, &request.draft_outlines)?;
        response.token_count.get_or_insert(token_count);
        Ok(response)
    }

    /// Runs the edit/polish stage. Under `flair`, the message prompt is
    /// augmented with sampled style examples; under `structure` it is not.
    pub async fn edit_content(
        &self,
        request: &EditContentRequest,
    ) -> Result<EditContentResponse, GenerationError> {
        let style_block = match request.edit_type {
            EditType::Flair => {
                let styles = self.styles.as_ref().ok_or(GenerationError::MissingStyles)?;
                Some(styles.sample_instructions(STYLE_EXAMPLES_PER_CATEGORY))
            }
            EditType::Structure => None,
        };

        let (raw, token_count) = self
            .call_stage(Stage::EditContent, request, style_block.as_deref())
            .await?;
        let mut response = parser::parse_edited_content(&raw)?;
        response.token_count.get_or_insert(token_count);
        Ok(response)
    }

    async fn call_stage<T: Serialize>(
        &self,
        stage: Stage,
        request: &T,
        extra_instructions: Option<&str>,
    ) -> Result<(String, usize), GenerationError> {
        let templates = self
            .prompts
            .get(stage)
            .ok_or(GenerationError::MissingPrompt(stage.name()))?;

        let params = prompt_params(serde_json::to_value(request)?);
        let system_prompt = render_template(&templates.system, &params);
        let mut message_prompt = render_template(&templates.message, &params);
        if let Some(extra) = extra_instructions {
            message_prompt.push_str("\n\n");
            message_prompt.push_str(extra);
        }

        debug!(
            stage = stage.name(),
            system_prompt = %system_prompt,
            message_prompt = %message_prompt,
            "--> Sending stage prompts to AI provider"
        );

        let raw = self
            .provider
            .generate(&system_prompt, &message_prompt)
            .await
            .map_err(GenerationError::Llm)?;

        let token_count = estimate_tokens(&raw);
        info!(
            stage = stage.name(),
            token_count, "<-- Stage response received"
        );
        debug!(stage = stage.name(), response = %raw, "Full stage response");

        Ok((raw, token_count))
    }
}

impl std::fmt::Debug for StageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageClient").finish_non_exhaustive()
    }
}

/// Flattens a serialized request into template parameters: the request's
/// own fields, the contents of `optional_params`, and a null default for
/// every known optional key, so formatting never fails on a missing one.
fn prompt_params(request_value: Value) -> Map<String, Value> {
    let mut params = match request_value {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("request".to_string(), other);
            map
        }
    };

    if let Some(Value::Object(optional)) = params.remove("optional_params") {
        for (key, value) in optional {
            params.entry(key).or_insert(value);
        }
    }
    for key in OPTIONAL_PROMPT_KEYS {
        params.entry(key.to_string()).or_insert(Value::Null);
    }
    params
}

/// Substitutes `{key}` placeholders. Strings are inserted verbatim, null
/// becomes the literal `null`, everything else is serialized as JSON.
fn render_template(template: &str, params: &Map<String, Value>) -> String {
    let mut rendered = template.to_string();
    for (key, value) in params {
        let placeholder = format!("{{{key}}}");
        if !rendered.contains(&placeholder) {
            continue;
        }
        let replacement = match value {
            Value::String(text) => text.clone(),
            Value::Null => "null".to_string(),
            other => other.to_string(),
        };
        rendered = rendered.replace(&placeholder, &replacement);
    }
    rendered
}

/// Approximate token count for logging and budget checks, at roughly four
/// characters per token.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prompt_params_default_missing_optional_keys_to_null() {
        let params = prompt_params(json!({
            "topics": ["rust"],
            "optional_params": {"country": "sg"}
        }));

        assert_eq!(params["topics"], json!(["rust"]));
        assert_eq!(params["country"], json!("sg"));
        assert_eq!(params["personas"], Value::Null);
        assert_eq!(params["desired_length"], Value::Null);
    }

    #[test]
    fn render_template_substitutes_strings_and_serializes_the_rest() {
        let params = prompt_params(json!({
            "headline": "H",
            "topics": ["a", "b"]
        }));
        let rendered = render_template(
            "Write about {headline} covering {topics}; personas: {personas}.",
            &params,
        );
        assert_eq!(rendered, r#"Write about H covering ["a","b"]; personas: null."#);
    }
}
