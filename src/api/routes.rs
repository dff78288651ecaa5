use axum::{
    routing::post,
    Router,
    extract::{Json, State},
    response::IntoResponse,
};
use tower_http::cors::{CorsLayer, Any};
use chrono::Utc;

use crate::api::models::{SummarizeRequest, SummarizeResponse};
use crate::api::response;
use crate::summarizer::summarize_url;
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/summarize", post(summarize_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

/// The catch-all boundary: whatever the orchestrator returns, the caller
/// gets an envelope carrying either the payload or the error's message.
async fn summarize_handler(
    State(state): State<AppState>,
    Json(req): Json<SummarizeRequest>,
) -> impl IntoResponse {
    tracing::info!("Processing request for URL: {}", req.url);
    let start_time = std::time::Instant::now();

    let result = summarize_url(&req.url, &state.config).await;
    tracing::info!("Request processing took: {:?}", start_time.elapsed());

    match result {
        Ok(outcome) => {
            tracing::info!("Successfully summarized URL: {}", req.url);
            response::success(SummarizeResponse {
                url: req.url,
                summary: outcome.summary,
                video_title: outcome.video_title,
                warning: outcome.warning,
                summarized_at: Utc::now(),
                word_count: outcome.word_count,
                status: "success".to_string(),
            })
        }
        Err(err) => {
            tracing::error!("Request for {} failed: {}", req.url, err);
            response::error(&err)
        }
    }
}
