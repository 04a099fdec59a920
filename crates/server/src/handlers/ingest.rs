//! # Ingestion Route Handlers
//!
//! Handlers for the batched news-ingestion endpoints: kicking off a run
//! and retrying whatever the ledger says is incomplete.

use super::{wrap_response, ApiResponse, AppError, AppState, DebugParams};
use axum::{
    extract::{Query, State},
    Json,
};
use ragwright::IngestionReport;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

// --- API Payloads for Ingestion Handlers ---

#[derive(Deserialize, Debug)]
pub struct IngestRequest {
    pub source: String,
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Serialize, Deserialize)]
pub struct IngestResponse {
    pub message: String,
    pub batches: usize,
    pub pages_done: usize,
    pub pages_empty: usize,
    pub pages_failed: usize,
}

impl IngestResponse {
    fn from_report(message: &str, report: IngestionReport) -> Self {
        Self {
            message: message.to_string(),
            batches: report.batches,
            pages_done: report.pages_done,
            pages_empty: report.pages_empty,
            pages_failed: report.pages_failed,
        }
    }
}

// --- Ingestion Handlers ---

/// Handler for `POST /ingest`.
///
/// Runs a full batched ingestion for the named source. Per-page failures
/// are recorded in the status ledger and reported in the summary counts,
/// never surfaced as request failures.
pub async fn ingest_handler(
    State(app_state): State<AppState>,
    debug_params: Query<DebugParams>,
    Json(payload): Json<IngestRequest>,
) -> Result<Json<ApiResponse<IngestResponse>>, AppError> {
    info!(source = %payload.source, limit = ?payload.limit, "Received ingest request");

    let report = app_state
        .ingestor
        .ingest(&payload.source, payload.limit)
        .await?;

    let debug_info = json!({
        "source": payload.source,
        "limit": payload.limit,
        "report": {
            "batches": report.batches,
            "pages_done": report.pages_done,
            "pages_empty": report.pages_empty,
            "pages_failed": report.pages_failed,
        },
    });
    Ok(wrap_response(
        IngestResponse::from_report("Ingestion finished", report),
        debug_params,
        Some(debug_info),
    ))
}

/// Handler for `POST /ingest/retry`.
///
/// Re-derives the set of incomplete pages from the status ledger and
/// reprocesses exactly those, with the same per-page isolation as a fresh
/// run.
pub async fn retry_incomplete_handler(
    State(app_state): State<AppState>,
    debug_params: Query<DebugParams>,
) -> Result<Json<ApiResponse<IngestResponse>>, AppError> {
    info!("Received retry request for incomplete pages");

    let report = app_state.ingestor.retry_incomplete().await?;

    Ok(wrap_response(
        IngestResponse::from_report("Retry finished", report),
        debug_params,
        None,
    ))
}
