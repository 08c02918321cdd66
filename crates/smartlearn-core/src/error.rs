use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SmartlearnError {
    #[error("Could not extract a video id from {url}")]
    InvalidVideoUrl { url: String },

    #[error("Download failed for {url}: {reason}")]
    DownloadFailed { url: String, reason: String },

    #[error("Audio extraction failed for {video_path}: {reason}")]
    AudioExtractionFailed { video_path: PathBuf, reason: String },

    #[error("Media probe failed for {path}: {reason}")]
    ProbeFailed { path: PathBuf, reason: String },

    #[error("Invalid media file {path}: {reason}")]
    InvalidMediaFile { path: PathBuf, reason: String },

    #[error("No usable caption track: {reason}")]
    CaptionsUnavailable { reason: String },

    #[error("Caption payload contained no text")]
    EmptyCaptions,

    #[error("Transcription failed: {reason}")]
    TranscriptionFailed { reason: String },

    #[error("All transcript strategies failed: {causes}{hint}")]
    ResolutionExhausted { causes: String, hint: String },

    #[error("Model request failed: {reason}")]
    ModelRequestFailed { reason: String },

    #[error("Model response contained no JSON object or array")]
    MissingJson,

    #[error("{field} cannot be empty")]
    EmptyField { field: &'static str },

    #[error("Unknown or expired session: {session_id}")]
    UnknownSession { session_id: String },

    #[error("Quiz already completed for session {session_id}")]
    SessionCompleted { session_id: String },

    #[error("Missing API key: {env_var} environment variable is not set")]
    MissingApiKey { env_var: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, SmartlearnError>;
