use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::handlers::{
    answer_handler, ask_handler, create_quiz_handler, evaluate_handler, health_handler,
    hint_handler, key_points_handler, monitoring_frame_handler, monitoring_status_handler,
    next_question_handler, resolve_transcript_handler, start_monitoring_handler,
    stop_monitoring_handler, summary_handler, upload_video_handler,
};
use crate::state::AppState;

/// Upper bound for uploaded media bodies (256 MiB).
const UPLOAD_BODY_LIMIT: usize = 256 * 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/transcripts/resolve", post(resolve_transcript_handler))
        .route(
            "/api/v1/transcripts/upload",
            post(upload_video_handler).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/api/v1/quiz", post(create_quiz_handler))
        .route("/api/v1/quiz/{session_id}/answer", post(answer_handler))
        .route("/api/v1/quiz/{session_id}/next", post(next_question_handler))
        .route("/api/v1/hints", post(hint_handler))
        .route("/api/v1/evaluate", post(evaluate_handler))
        .route("/api/v1/summary", get(summary_handler))
        .route("/api/v1/key-points", get(key_points_handler))
        .route("/api/v1/ask", post(ask_handler))
        .route("/api/v1/monitoring/start", post(start_monitoring_handler))
        .route("/api/v1/monitoring/stop", post(stop_monitoring_handler))
        .route("/api/v1/monitoring/status", get(monitoring_status_handler))
        .route("/api/v1/monitoring/frames", post(monitoring_frame_handler))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
