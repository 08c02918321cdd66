//! Smartlearn Core Library
//!
//! Core functionality for the adaptive learning backend: multi-strategy
//! transcript resolution for videos, AI-generated quizzes, hints and
//! answer evaluation, quiz session tracking, and the webcam engagement
//! heuristic.

pub mod cache;
pub mod captions;
pub mod engagement;
pub mod error;
pub mod format;
pub mod llm;
pub mod media;
pub mod monitor;
pub mod provider;
pub mod resolver;
pub mod session;
pub mod speech;
pub mod types;

// Re-export commonly used items at crate root
pub use cache::{TranscriptCache, get_cache_dir, get_model_dir, get_transcript_path};
pub use engagement::{FaceLandmarks, LearnerState, MajorityWindow, classify};
pub use error::{Result, SmartlearnError};
pub use format::format_quiz_readable;
pub use llm::TutorClient;
pub use monitor::{Monitor, REPORT_INTERVAL, StatusEntry};
pub use provider::{Provider, ProviderConfig};
pub use resolver::{ResolveRequest, TranscriptResolver};
pub use session::{Advance, AnswerOutcome, QuestionView, SessionStore};
pub use speech::{SpeechRecognizer, WhisperRecognizer};
pub use types::{Evaluation, QuizQuestion, VideoSource};
