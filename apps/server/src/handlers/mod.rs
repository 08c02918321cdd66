mod health;
mod monitoring;
mod quiz;
mod transcripts;
mod tutor;

pub use health::health_handler;
pub use monitoring::{
    monitoring_frame_handler, monitoring_status_handler, start_monitoring_handler,
    stop_monitoring_handler,
};
pub use quiz::{answer_handler, create_quiz_handler, next_question_handler};
pub use transcripts::{resolve_transcript_handler, upload_video_handler};
pub use tutor::{
    ask_handler, evaluate_handler, hint_handler, key_points_handler, summary_handler,
};
