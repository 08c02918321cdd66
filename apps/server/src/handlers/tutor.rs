use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use smartlearn_core::{Evaluation, ResolveRequest, VideoSource};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct HintBody {
    pub question: String,
    #[serde(default)]
    pub options: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct HintResponse {
    pub hint: String,
}

#[derive(Deserialize)]
pub struct EvaluateBody {
    pub question: String,
    pub user_answer: String,
    pub correct_answer: String,
}

#[derive(Deserialize)]
pub struct VideoQuery {
    pub url: String,
}

#[derive(Deserialize)]
pub struct AskBody {
    pub url: String,
    pub question: String,
}

#[derive(Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Serialize)]
pub struct KeyPointsResponse {
    pub key_points: String,
}

#[derive(Serialize)]
pub struct AskResponse {
    pub answer: String,
}

async fn resolve(state: &AppState, url: &str) -> Result<String, ApiError> {
    let source = VideoSource::parse(url)?;
    Ok(state.resolver.resolve(&ResolveRequest::new(source)).await?)
}

#[tracing::instrument(skip(state, body))]
pub async fn hint_handler(
    State(state): State<AppState>,
    Json(body): Json<HintBody>,
) -> Result<Json<HintResponse>, ApiError> {
    let hint = state
        .tutor
        .generate_hint(&body.question, body.options.as_deref())
        .await?;
    Ok(Json(HintResponse { hint }))
}

#[tracing::instrument(skip(state, body))]
pub async fn evaluate_handler(
    State(state): State<AppState>,
    Json(body): Json<EvaluateBody>,
) -> Result<Json<Evaluation>, ApiError> {
    let evaluation = state
        .tutor
        .evaluate_answer(&body.question, &body.user_answer, &body.correct_answer)
        .await?;
    Ok(Json(evaluation))
}

#[tracing::instrument(skip(state, query), fields(url = %query.url))]
pub async fn summary_handler(
    State(state): State<AppState>,
    Query(query): Query<VideoQuery>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let transcript = resolve(&state, &query.url).await?;
    let summary = state.tutor.summarize(&transcript).await?;
    Ok(Json(SummaryResponse { summary }))
}

#[tracing::instrument(skip(state, query), fields(url = %query.url))]
pub async fn key_points_handler(
    State(state): State<AppState>,
    Query(query): Query<VideoQuery>,
) -> Result<Json<KeyPointsResponse>, ApiError> {
    let transcript = resolve(&state, &query.url).await?;
    let key_points = state.tutor.key_points(&transcript).await?;
    Ok(Json(KeyPointsResponse { key_points }))
}

#[tracing::instrument(skip(state, body), fields(url = %body.url))]
pub async fn ask_handler(
    State(state): State<AppState>,
    Json(body): Json<AskBody>,
) -> Result<Json<AskResponse>, ApiError> {
    let transcript = resolve(&state, &body.url).await?;
    let answer = state
        .tutor
        .answer_question(&transcript, &body.question)
        .await?;
    Ok(Json(AskResponse { answer }))
}
