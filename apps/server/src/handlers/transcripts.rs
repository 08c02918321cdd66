use axum::Json;
use axum::extract::{Multipart, State};
use serde::{Deserialize, Serialize};
use tokio::fs;
use uuid::Uuid;

use smartlearn_core::cache::get_scratch_root;
use smartlearn_core::{ResolveRequest, SmartlearnError, VideoSource};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ResolveBody {
    pub url: String,
    /// Transcript the caller already has; skips resolution.
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Serialize)]
pub struct TranscriptResponse {
    pub transcript: String,
}

#[tracing::instrument(skip(state, body), fields(url = %body.url))]
pub async fn resolve_transcript_handler(
    State(state): State<AppState>,
    Json(body): Json<ResolveBody>,
) -> Result<Json<TranscriptResponse>, ApiError> {
    let source = VideoSource::parse(&body.url)?;
    let request = ResolveRequest::new(source)
        .with_transcript(body.transcript)
        .with_refresh(body.refresh);

    let transcript = state.resolver.resolve(&request).await?;
    tracing::info!(chars = transcript.len(), "transcript resolved");
    Ok(Json(TranscriptResponse { transcript }))
}

/// Multipart upload: a `video` file field plus an optional
/// `transcript` text field that short-circuits transcription. The
/// saved file takes the validate, extract, transcribe path and is
/// removed afterwards either way.
#[tracing::instrument(skip(state, multipart))]
pub async fn upload_video_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<TranscriptResponse>, ApiError> {
    let mut video_bytes = None;
    let mut provided_transcript = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?
    {
        match field.name() {
            Some("video") => {
                video_bytes = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::bad_request(e.to_string()))?,
                );
            }
            Some("transcript") => {
                provided_transcript = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::bad_request(e.to_string()))?,
                );
            }
            _ => {}
        }
    }

    let Some(bytes) = video_bytes else {
        return Err(ApiError::bad_request("missing video field"));
    };
    if bytes.is_empty() {
        return Err(ApiError::bad_request("uploaded video is empty"));
    }

    let upload_dir = get_scratch_root().join(format!("upload-{}", Uuid::new_v4()));
    fs::create_dir_all(&upload_dir)
        .await
        .map_err(SmartlearnError::from)?;
    let video_path = upload_dir.join("upload.mp4");
    fs::write(&video_path, &bytes)
        .await
        .map_err(SmartlearnError::from)?;

    let source = VideoSource::local(video_path.to_string_lossy());
    let request = ResolveRequest::new(source).with_transcript(provided_transcript);
    let outcome = state.resolver.resolve(&request).await;

    let _ = fs::remove_file(&video_path).await;
    let _ = fs::remove_dir(&upload_dir).await;

    let transcript = outcome?;
    tracing::info!(chars = transcript.len(), "upload transcribed");
    Ok(Json(TranscriptResponse { transcript }))
}
