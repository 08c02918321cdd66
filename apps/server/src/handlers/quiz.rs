use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use smartlearn_core::{Advance, AnswerOutcome, QuestionView, ResolveRequest, VideoSource};

use crate::error::ApiError;
use crate::state::AppState;

fn default_learner_state() -> String {
    "engaged".to_string()
}

fn default_difficulty() -> String {
    "medium".to_string()
}

#[derive(Deserialize)]
pub struct CreateQuizBody {
    pub url: String,
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default = "default_learner_state")]
    pub learner_state: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
}

#[derive(Serialize)]
pub struct QuizCreatedResponse {
    pub session_id: String,
    pub total_questions: usize,
    pub question: String,
    pub options: Vec<String>,
    pub question_number: usize,
}

#[derive(Deserialize)]
pub struct AnswerBody {
    pub answer: String,
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum NextResponse {
    Question(QuestionView),
    Completed { completed: bool },
}

#[tracing::instrument(skip(state, body), fields(url = %body.url))]
pub async fn create_quiz_handler(
    State(state): State<AppState>,
    Json(body): Json<CreateQuizBody>,
) -> Result<Json<QuizCreatedResponse>, ApiError> {
    let source = VideoSource::parse(&body.url)?;
    let request = ResolveRequest::new(source).with_transcript(body.transcript);
    let transcript = state.resolver.resolve(&request).await?;

    let questions = state
        .tutor
        .generate_quiz(&transcript, &body.learner_state, &body.difficulty)
        .await?;

    let (session_id, view) = state.sessions.create(questions)?;
    tracing::info!(
        session_id = %session_id,
        total = view.total_questions,
        "quiz session created"
    );

    Ok(Json(QuizCreatedResponse {
        session_id,
        total_questions: view.total_questions,
        question: view.question,
        options: view.options,
        question_number: view.question_number,
    }))
}

#[tracing::instrument(skip(state, body))]
pub async fn answer_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(body): Json<AnswerBody>,
) -> Result<Json<AnswerOutcome>, ApiError> {
    let outcome = state.sessions.check_answer(&session_id, &body.answer)?;
    Ok(Json(outcome))
}

#[tracing::instrument(skip(state))]
pub async fn next_question_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<NextResponse>, ApiError> {
    let response = match state.sessions.advance(&session_id)? {
        Advance::Next(view) => NextResponse::Question(view),
        Advance::Completed => NextResponse::Completed { completed: true },
    };
    Ok(Json(response))
}
