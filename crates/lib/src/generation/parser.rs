//! # LLM Response Parser
//!
//! Validates and coerces free-form LLM text into the strict schema the
//! next stage expects. The upstream models are not schema-reliable, so the
//! parser tolerates a fixed set of shape variations — an array wrapping a
//! JSON string plus token count, a single-element list wrapping the
//! payload object, and non-string outline details — and rejects everything
//! else as a data error.

use super::types::{
    ContentBlock, DetailsValue, Draft, GenerateDraftRequest, GenerateDraftResponse,
    GenerateFullContentResponse, GenerateHeadlinesResponse, GenerateResearchQuestionsResponse,
    GenerateTopicSentencesResponse, EditContentResponse, TopicSentenceBlock,
};
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::debug;

/// Custom error types for stage-response validation.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Stage `{stage}` returned invalid JSON: {source}")]
    Json {
        stage: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Stage `{stage}` response failed validation on `{field}`: {detail}")]
    Schema {
        stage: &'static str,
        field: &'static str,
        detail: String,
    },
    #[error(
        "Stage `{stage}` response disagrees with its request on `{field}` \
         (expected `{expected}`, got `{got}`)"
    )]
    Mismatch {
        stage: &'static str,
        field: &'static str,
        expected: String,
        got: String,
    },
}

fn schema(stage: &'static str, field: &'static str, detail: impl ToString) -> DataError {
    DataError::Schema {
        stage,
        field,
        detail: detail.to_string(),
    }
}

/// Strips the markdown code fences the model sometimes wraps around JSON.
fn clean_response(response: &str) -> &str {
    response
        .trim()
        .strip_prefix("```json")
        .unwrap_or(response)
        .strip_suffix("```")
        .unwrap_or(response)
        .trim()
}

/// Decodes raw stage output and unwraps the known envelope variations:
/// a bare object, an array wrapping a JSON string (optionally followed by
/// a token count), or a single-element array wrapping the object itself.
///
/// A JSON syntax failure is fatal here; it is never retried.
fn decode_envelope(raw: &str, stage: &'static str) -> Result<(Value, Option<usize>), DataError> {
    let cleaned = clean_response(raw);
    let value: Value =
        serde_json::from_str(cleaned).map_err(|source| DataError::Json { stage, source })?;

    match value {
        Value::Array(items) => {
            let mut items = items.into_iter();
            let first = items
                .next()
                .ok_or_else(|| schema(stage, "payload", "response is an empty array"))?;
            let token_count = items.next().and_then(|v| v.as_u64()).map(|n| n as usize);
            match first {
                Value::String(inner) => {
                    debug!(stage, "Unwrapping string-in-array response envelope");
                    let payload = serde_json::from_str(&inner)
                        .map_err(|source| DataError::Json { stage, source })?;
                    Ok((payload, token_count))
                }
                other => {
                    debug!(stage, "Unwrapping single-element array response envelope");
                    Ok((other, token_count))
                }
            }
        }
        other => Ok((other, None)),
    }
}

pub fn parse_research_questions(
    raw: &str,
) -> Result<GenerateResearchQuestionsResponse, DataError> {
    const STAGE: &str = "generate_research_questions";
    let (value, token_count) = decode_envelope(raw, STAGE)?;
    let mut response: GenerateResearchQuestionsResponse = serde_json::from_value(value)
        .map_err(|e| schema(STAGE, "research_questions", e))?;
    response.token_count = response.token_count.or(token_count);
    Ok(response)
}

pub fn parse_headlines(raw: &str) -> Result<GenerateHeadlinesResponse, DataError> {
    const STAGE: &str = "generate_headlines";
    let (value, token_count) = decode_envelope(raw, STAGE)?;
    let mut response: GenerateHeadlinesResponse =
        serde_json::from_value(value).map_err(|e| schema(STAGE, "headlines", e))?;
    response.token_count = response.token_count.or(token_count);
    Ok(response)
}

/// Parses a draft-stage response.
///
/// When the payload lacks the top-level `drafts` wrapper, one is
/// synthesized from the request context plus the parsed `structure`. Every
/// block's `details` is coerced to a string through [`DetailsValue`]
/// regardless of the shape the model returned. A wrapper whose headline or
/// thesis disagrees with the request is a data error, not silently fixed.
pub fn parse_draft(
    raw: &str,
    request: &GenerateDraftRequest,
) -> Result<GenerateDraftResponse, DataError> {
    const STAGE: &str = "generate_draft";
    let (value, token_count) = decode_envelope(raw, STAGE)?;
    let mut payload = match value {
        Value::Object(map) => map,
        other => {
            return Err(schema(
                STAGE,
                "drafts",
                format!("expected an object, got: {other}"),
            ))
        }
    };

    if !payload.contains_key("drafts") {
        debug!(
            headline = %request.headline,
            "Draft response lacks the `drafts` wrapper, synthesizing it from the request"
        );
        let structure = payload
            .remove("structure")
            .unwrap_or_else(|| Value::Array(Vec::new()));
        let draft = json!({
            "headline": request.headline,
            "hook": request.hook,
            "thesis": request.thesis,
            "article_type": request.article_type,
            "structure": structure,
            "optional_params": request.optional_params,
        });
        let mut wrapper = Map::new();
        wrapper.insert("drafts".to_string(), Value::Array(vec![draft]));
        payload = wrapper;
    }

    if let Some(Value::Array(drafts)) = payload.get_mut("drafts") {
        for draft in drafts {
            let Some(Value::Array(blocks)) = draft.get_mut("structure") else {
                continue;
            };
            for block in blocks {
                let Some(object) = block.as_object_mut() else {
                    continue;
                };
                let Some(details) = object.get("details").cloned() else {
                    continue;
                };
                let details: DetailsValue = serde_json::from_value(details)
                    .map_err(|e| schema(STAGE, "details", e))?;
                object.insert("details".to_string(), Value::String(details.into_text()));
            }
        }
    }

    let mut response: GenerateDraftResponse =
        serde_json::from_value(Value::Object(payload)).map_err(|e| schema(STAGE, "drafts", e))?;

    for draft in &response.drafts {
        if draft.headline != request.headline {
            return Err(DataError::Mismatch {
                stage: STAGE,
                field: "headline",
                expected: request.headline.clone(),
                got: draft.headline.clone(),
            });
        }
        if draft.thesis != request.thesis {
            return Err(DataError::Mismatch {
                stage: STAGE,
                field: "thesis",
                expected: request.thesis.clone(),
                got: draft.thesis.clone(),
            });
        }
    }

    response.token_count = response.token_count.or(token_count);
    Ok(response)
}

/// Parses a topic-sentences response and checks it block-for-block against
/// the draft outline that produced it: same count, same order, and a
/// non-empty sentence list per block.
pub fn parse_topic_sentences(
    raw: &str,
    draft: &Draft,
) -> Result<GenerateTopicSentencesResponse, DataError> {
    const STAGE: &str = "generate_topic_sentences";
    let (value, token_count) = decode_envelope(raw, STAGE)?;
    let mut response: GenerateTopicSentencesResponse =
        serde_json::from_value(value).map_err(|e| schema(STAGE, "draft_outlines", e))?;

    validate_block_alignment(
        STAGE,
        &response
            .draft_outlines
            .iter()
            .map(|b| b.content_block.as_str())
            .collect::<Vec<_>>(),
        &draft
            .structure
            .iter()
            .map(|b: &ContentBlock| b.content_block.as_str())
            .collect::<Vec<_>>(),
    )?;
    for block in &response.draft_outlines {
        if block.topic_sentences.is_empty() {
            return Err(schema(
                STAGE,
                "topic_sentences",
                format!("block `{}` has no topic sentences", block.content_block),
            ));
        }
    }

    response.token_count = response.token_count.or(token_count);
    Ok(response)
}

/// Parses a full-content response and checks it block-for-block against
/// the topic-sentence outline that produced it.
pub fn parse_full_content(
    raw: &str,
    outlines: &[TopicSentenceBlock],
) -> Result<GenerateFullContentResponse, DataError> {
    const STAGE: &str = "generate_full_content";
    let (value, token_count) = decode_envelope(raw, STAGE)?;
    let mut response: GenerateFullContentResponse =
        serde_json::from_value(value).map_err(|e| schema(STAGE, "full_content", e))?;

    validate_block_alignment(
        STAGE,
        &response
            .full_content
            .iter()
            .map(|b| b.content_block.as_str())
            .collect::<Vec<_>>(),
        &outlines
            .iter()
            .map(|b| b.content_block.as_str())
            .collect::<Vec<_>>(),
    )?;
    for block in &response.full_content {
        if block.paragraphs.is_empty() {
            return Err(schema(
                STAGE,
                "paragraphs",
                format!("block `{}` has no paragraphs", block.content_block),
            ));
        }
    }

    response.token_count = response.token_count.or(token_count);
    Ok(response)
}

pub fn parse_edited_content(raw: &str) -> Result<EditContentResponse, DataError> {
    const STAGE: &str = "edit_content";
    let (value, token_count) = decode_envelope(raw, STAGE)?;
    let mut response: EditContentResponse =
        serde_json::from_value(value).map_err(|e| schema(STAGE, "edited_content", e))?;
    response.token_count = response.token_count.or(token_count);
    Ok(response)
}

fn validate_block_alignment(
    stage: &'static str,
    got: &[&str],
    expected: &[&str],
) -> Result<(), DataError> {
    if got.len() != expected.len() {
        return Err(schema(
            stage,
            "content_block",
            format!(
                "expected {} blocks matching the input outline, got {}",
                expected.len(),
                got.len()
            ),
        ));
    }
    for (got_name, expected_name) in got.iter().zip(expected) {
        if got_name != expected_name {
            return Err(DataError::Mismatch {
                stage,
                field: "content_block",
                expected: (*expected_name).to_string(),
                got: (*got_name).to_string(),
            });
        }
    }
    Ok(())
}
