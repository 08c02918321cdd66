use std::sync::Arc;

use tokio::sync::Mutex;

use smartlearn_core::{Monitor, SessionStore, TranscriptResolver, TutorClient};

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<TranscriptResolver>,
    pub tutor: Arc<TutorClient>,
    pub sessions: Arc<SessionStore>,
    /// At most one live monitoring session per process.
    pub monitor: Arc<Mutex<Option<Monitor>>>,
}

impl AppState {
    pub fn new(resolver: TranscriptResolver, tutor: TutorClient, sessions: SessionStore) -> Self {
        Self {
            resolver: Arc::new(resolver),
            tutor: Arc::new(tutor),
            sessions: Arc::new(sessions),
            monitor: Arc::new(Mutex::new(None)),
        }
    }
}
