//! # Generation Route Handlers
//!
//! One handler per content-generation stage. Each accepts the stage's
//! strictly-typed request, drives the stage through the shared
//! `StageClient`, and returns the stage's typed response. Malformed
//! payloads are rejected by the JSON extractor as client errors; provider
//! and parse failures surface as opaque server errors.

use super::{wrap_response, ApiResponse, AppError, AppState, DebugParams};
use axum::{
    extract::{Query, State},
    Json,
};
use ragwright::generation::types::{
    EditContentRequest, EditContentResponse, GenerateDraftRequest, GenerateDraftResponse,
    GenerateFullContentRequest, GenerateFullContentResponse, GenerateHeadlinesRequest,
    GenerateHeadlinesResponse, GenerateResearchQuestionsRequest,
    GenerateResearchQuestionsResponse, GenerateTopicSentencesRequest,
    GenerateTopicSentencesResponse,
};
use serde_json::json;
use tracing::info;

/// Handler for `POST /gen/research_questions`.
pub async fn research_questions_handler(
    State(app_state): State<AppState>,
    debug_params: Query<DebugParams>,
    Json(payload): Json<GenerateResearchQuestionsRequest>,
) -> Result<Json<ApiResponse<GenerateResearchQuestionsResponse>>, AppError> {
    info!(topics = ?payload.topics, "Received research questions request");
    let response = app_state
        .stage_client
        .generate_research_questions(&payload)
        .await?;

    let debug_info = json!({ "token_count": response.token_count });
    Ok(wrap_response(response, debug_params, Some(debug_info)))
}

/// Handler for `POST /gen/headlines`.
pub async fn headlines_handler(
    State(app_state): State<AppState>,
    debug_params: Query<DebugParams>,
    Json(payload): Json<GenerateHeadlinesRequest>,
) -> Result<Json<ApiResponse<GenerateHeadlinesResponse>>, AppError> {
    info!(topics = ?payload.topics, "Received headlines request");
    let response = app_state.stage_client.generate_headlines(&payload).await?;

    let debug_info = json!({ "token_count": response.token_count });
    Ok(wrap_response(response, debug_params, Some(debug_info)))
}

/// Handler for `POST /gen/draft`.
pub async fn draft_handler(
    State(app_state): State<AppState>,
    debug_params: Query<DebugParams>,
    Json(payload): Json<GenerateDraftRequest>,
) -> Result<Json<ApiResponse<GenerateDraftResponse>>, AppError> {
    info!(headline = %payload.headline, "Received draft request");
    let response = app_state.stage_client.generate_draft(&payload).await?;

    let debug_info = json!({ "token_count": response.token_count });
    Ok(wrap_response(response, debug_params, Some(debug_info)))
}

/// Handler for `POST /gen/topic_sentences`.
pub async fn topic_sentences_handler(
    State(app_state): State<AppState>,
    debug_params: Query<DebugParams>,
    Json(payload): Json<GenerateTopicSentencesRequest>,
) -> Result<Json<ApiResponse<GenerateTopicSentencesResponse>>, AppError> {
    info!(headline = %payload.draft.headline, "Received topic sentences request");
    let response = app_state
        .stage_client
        .generate_topic_sentences(&payload)
        .await?;

    let debug_info = json!({ "token_count": response.token_count });
    Ok(wrap_response(response, debug_params, Some(debug_info)))
}

/// Handler for `POST /gen/full_content`.
pub async fn full_content_handler(
    State(app_state): State<AppState>,
    debug_params: Query<DebugParams>,
    Json(payload): Json<GenerateFullContentRequest>,
) -> Result<Json<ApiResponse<GenerateFullContentResponse>>, AppError> {
    info!(
        blocks = payload.draft_outlines.len(),
        "Received full content request"
    );
    let response = app_state
        .stage_client
        .generate_full_content(&payload)
        .await?;

    let debug_info = json!({ "token_count": response.token_count });
    Ok(wrap_response(response, debug_params, Some(debug_info)))
}

/// Handler for `POST /gen/edit`.
pub async fn edit_content_handler(
    State(app_state): State<AppState>,
    debug_params: Query<DebugParams>,
    Json(payload): Json<EditContentRequest>,
) -> Result<Json<ApiResponse<EditContentResponse>>, AppError> {
    info!(
        headline = %payload.draft.headline,
        edit_type = ?payload.edit_type,
        "Received edit request"
    );
    let response = app_state.stage_client.edit_content(&payload).await?;

    let debug_info = json!({ "token_count": response.token_count });
    Ok(wrap_response(response, debug_params, Some(debug_info)))
}
