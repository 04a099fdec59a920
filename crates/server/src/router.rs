use super::{handlers, state::AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/ingest", post(handlers::ingest_handler))
        .route("/ingest/retry", post(handlers::retry_incomplete_handler))
        .route(
            "/gen/research_questions",
            post(handlers::research_questions_handler),
        )
        .route("/gen/headlines", post(handlers::headlines_handler))
        .route("/gen/draft", post(handlers::draft_handler))
        .route(
            "/gen/topic_sentences",
            post(handlers::topic_sentences_handler),
        )
        .route("/gen/full_content", post(handlers::full_content_handler))
        .route("/gen/edit", post(handlers::edit_content_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}
