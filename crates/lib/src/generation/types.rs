//! Typed request and response schemas for the content-generation stages.
//!
//! Each stage's response must validate against the next stage's expected
//! input shape before the pipeline proceeds, so these types double as the
//! contract between stages.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One step of the content-generation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    ResearchQuestions,
    Headlines,
    Draft,
    TopicSentences,
    FullContent,
    EditContent,
}

impl Stage {
    /// The stage's name, used for prompt lookup and error reporting.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::ResearchQuestions => "generate_research_questions",
            Stage::Headlines => "generate_headlines",
            Stage::Draft => "generate_draft",
            Stage::TopicSentences => "generate_topic_sentences",
            Stage::FullContent => "generate_full_content",
            Stage::EditContent => "edit_content",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "generate_research_questions" => Some(Stage::ResearchQuestions),
            "generate_headlines" => Some(Stage::Headlines),
            "generate_draft" => Some(Stage::Draft),
            "generate_topic_sentences" => Some(Stage::TopicSentences),
            "generate_full_content" => Some(Stage::FullContent),
            "edit_content" => Some(Stage::EditContent),
            _ => None,
        }
    }

    pub fn all() -> [Stage; 6] {
        [
            Stage::ResearchQuestions,
            Stage::Headlines,
            Stage::Draft,
            Stage::TopicSentences,
            Stage::FullContent,
            Stage::EditContent,
        ]
    }
}

/// The upstream API accepts either a single persona or a list of them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Personas {
    One(String),
    Many(Vec<String>),
}

/// Optional tuning knobs shared by every stage request. Missing values
/// default to null when formatted into prompt templates.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OptionalParams {
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub publication: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub personas: Option<Personas>,
    #[serde(default)]
    pub desired_length: Option<u32>,
    #[serde(default)]
    pub scratchpad: Option<String>,
    #[serde(default)]
    pub include_token_count: Option<bool>,
    #[serde(default)]
    pub limit: Option<u32>,
}

// --- Research questions ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResearchQuestionsRequest {
    pub topics: Vec<String>,
    pub article_types: Vec<String>,
    pub platforms: Vec<String>,
    #[serde(default)]
    pub personas: Option<Personas>,
    #[serde(default)]
    pub target_audience: Option<String>,
    #[serde(default)]
    pub optional_params: Option<OptionalParams>,
}

/// Keywords to research on one platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResearchQuestion {
    pub platform: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResearchQuestionsResponse {
    pub research_questions: Vec<ResearchQuestion>,
    #[serde(default)]
    pub token_count: Option<usize>,
}

// --- Headlines ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateHeadlinesRequest {
    pub article_types: String,
    pub topics: Vec<String>,
    #[serde(default)]
    pub context: Option<Value>,
    #[serde(default)]
    pub optional_params: Option<OptionalParams>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Headline {
    pub headline: String,
    pub article_type: String,
    pub hook: String,
    pub thesis: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateHeadlinesResponse {
    pub headlines: Vec<Headline>,
    #[serde(default)]
    pub token_count: Option<usize>,
}

// --- Draft outline ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateDraftRequest {
    pub headline: String,
    pub hook: String,
    pub thesis: String,
    pub article_type: String,
    #[serde(default)]
    pub optional_params: Option<OptionalParams>,
}

/// A named section of an article outline with its generation details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentBlock {
    pub content_block: String,
    pub details: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Draft {
    pub headline: String,
    pub hook: String,
    pub thesis: String,
    pub article_type: String,
    pub structure: Vec<ContentBlock>,
    #[serde(default)]
    pub optional_params: Option<OptionalParams>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateDraftResponse {
    pub drafts: Vec<Draft>,
    #[serde(default)]
    pub token_count: Option<usize>,
}

// --- Topic sentences ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateTopicSentencesRequest {
    pub draft: Draft,
    #[serde(default)]
    pub optional_params: Option<OptionalParams>,
}

/// An outline block enriched with its topic sentences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopicSentenceBlock {
    pub content_block: String,
    pub details: String,
    pub topic_sentences: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateTopicSentencesResponse {
    pub draft_outlines: Vec<TopicSentenceBlock>,
    #[serde(default)]
    pub token_count: Option<usize>,
}

// --- Full content ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateFullContentRequest {
    pub draft_outlines: Vec<TopicSentenceBlock>,
    #[serde(default)]
    pub optional_params: Option<OptionalParams>,
}

/// A topic-sentence block expanded into full paragraphs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FullContentBlock {
    pub content_block: String,
    #[serde(default)]
    pub details: String,
    pub topic_sentences: Vec<String>,
    pub paragraphs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateFullContentResponse {
    pub full_content: Vec<FullContentBlock>,
    #[serde(default)]
    pub token_count: Option<usize>,
}

// --- Edit / polish ---

/// The two editing passes: `structure` reworks organization, `flair`
/// rewrites for voice and is augmented with sampled style examples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditType {
    Structure,
    Flair,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditContentRequest {
    pub draft: Draft,
    pub full_content_response: GenerateFullContentResponse,
    pub edit_type: EditType,
    #[serde(default)]
    pub optional_params: Option<OptionalParams>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EditedContentBlock {
    pub content_block: String,
    pub paragraphs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditContentResponse {
    pub edited_content: Vec<EditedContentBlock>,
    #[serde(default)]
    pub token_count: Option<usize>,
}

// --- Shape normalization ---

/// The model returns an outline block's `details` as a string, a list, or
/// an object. Decoding into this sum type keeps the normalization in one
/// exhaustive match instead of duck-typing at call sites.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DetailsValue {
    Text(String),
    Items(Vec<Value>),
    Map(serde_json::Map<String, Value>),
}

impl DetailsValue {
    /// Normalizes to plain text: lists join with spaces, objects serialize
    /// to a JSON string.
    pub fn into_text(self) -> String {
        match self {
            DetailsValue::Text(text) => text,
            DetailsValue::Items(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(" "),
            DetailsValue::Map(map) => Value::Object(map).to_string(),
        }
    }
}
