use axum::Json;
use axum::extract::State;
use serde::Serialize;
use serde_json::{Value, json};

use smartlearn_core::{FaceLandmarks, LearnerState, Monitor, REPORT_INTERVAL, StatusEntry};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct FrameResponse {
    pub state: LearnerState,
}

#[derive(Serialize)]
pub struct MonitoringStatus {
    pub monitoring: bool,
    pub recent_logs: Vec<StatusEntry>,
}

#[tracing::instrument(skip(state))]
pub async fn start_monitoring_handler(State(state): State<AppState>) -> Json<Value> {
    let mut monitor = state.monitor.lock().await;
    if monitor.as_ref().is_some_and(Monitor::is_running) {
        return Json(json!({ "status": "already running" }));
    }
    *monitor = Some(Monitor::start(REPORT_INTERVAL));
    tracing::info!("monitoring started");
    Json(json!({ "status": "started" }))
}

#[tracing::instrument(skip(state))]
pub async fn stop_monitoring_handler(State(state): State<AppState>) -> Json<Value> {
    let taken = state.monitor.lock().await.take();
    let log = match taken {
        Some(monitor) => monitor.stop().await,
        None => Vec::new(),
    };
    tracing::info!(entries = log.len(), "monitoring stopped");
    Json(json!({ "status": "stopped", "log": log }))
}

#[tracing::instrument(skip(state))]
pub async fn monitoring_status_handler(State(state): State<AppState>) -> Json<MonitoringStatus> {
    let monitor = state.monitor.lock().await;
    let (monitoring, recent_logs) = match monitor.as_ref() {
        Some(m) => m.status(10),
        None => (false, Vec::new()),
    };
    Json(MonitoringStatus {
        monitoring,
        recent_logs,
    })
}

#[tracing::instrument(skip(state, face))]
pub async fn monitoring_frame_handler(
    State(state): State<AppState>,
    Json(face): Json<FaceLandmarks>,
) -> Result<Json<FrameResponse>, ApiError> {
    let guard = state.monitor.lock().await;
    let Some(monitor) = guard.as_ref().filter(|m| m.is_running()) else {
        return Err(ApiError::bad_request("monitoring is not running"));
    };
    let learner_state = monitor.observe(&face);
    Ok(Json(FrameResponse {
        state: learner_state,
    }))
}
