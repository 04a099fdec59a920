use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ragwright::{DataError, GenerationError, IngestError, LlmError};
use serde_json::json;
use tracing::error;

/// A custom error type for the server application.
///
/// This enum encapsulates different kinds of errors that can occur within
/// the server, allowing them to be converted into appropriate HTTP
/// responses. Full diagnostic detail is logged server-side; response bodies
/// stay opaque for internal failures.
pub enum AppError {
    /// Errors from the content-generation stage pipeline.
    Generation(GenerationError),
    /// Errors from the ingestion orchestrator.
    Ingest(IngestError),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        AppError::Generation(err)
    }
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        AppError::Ingest(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AppError::Generation(err) => {
                error!("GenerationError: {err:?}");
                match err {
                    GenerationError::Llm(LlmError::Api(_))
                    | GenerationError::Llm(LlmError::Request(_))
                    | GenerationError::Llm(LlmError::Stream(_))
                    | GenerationError::Llm(LlmError::Deserialization(_)) => (
                        StatusCode::BAD_GATEWAY,
                        "Request to AI provider failed.".to_string(),
                    ),
                    GenerationError::Data(DataError::Json { stage, .. })
                    | GenerationError::Data(DataError::Schema { stage, .. })
                    | GenerationError::Data(DataError::Mismatch { stage, .. }) => (
                        StatusCode::BAD_GATEWAY,
                        format!("Stage '{stage}' produced a malformed response."),
                    ),
                    _ => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Server is not configured correctly.".to_string(),
                    ),
                }
            }
            AppError::Ingest(err) => {
                error!("IngestError: {err:?}");
                match err {
                    IngestError::UnsupportedSource(source) => (
                        StatusCode::BAD_REQUEST,
                        format!("Unsupported ingestion source: {source}"),
                    ),
                    IngestError::Metadata(_) => (
                        StatusCode::BAD_GATEWAY,
                        "Failed to reach the ingestion source.".to_string(),
                    ),
                    IngestError::Ledger(_) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "An internal server error occurred.".to_string(),
                    ),
                }
            }
            AppError::Internal(err) => {
                error!("Internal server error: {err:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}
