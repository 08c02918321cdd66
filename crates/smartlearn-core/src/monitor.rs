//! Webcam engagement monitoring session.
//!
//! Landmark frames arrive from the client (the camera runs in the
//! browser); each frame is classified immediately and fed into a
//! rolling window. A background worker wakes at a fixed cadence,
//! majority-votes the window and appends a timestamped status entry to
//! the session log. Stopping is cooperative through an atomic flag and
//! may lag by one poll interval.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;

use chrono::Local;
use serde::Serialize;
use tokio::task::JoinHandle;

use crate::engagement::{FaceLandmarks, LearnerState, MajorityWindow, classify};

/// Cadence at which the worker reports a status entry.
pub const REPORT_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Serialize)]
pub struct StatusEntry {
    pub time: String,
    pub status: LearnerState,
}

struct MonitorState {
    running: AtomicBool,
    window: Mutex<MajorityWindow>,
    log: Mutex<Vec<StatusEntry>>,
}

impl MonitorState {
    fn report_tick(&self) {
        let majority = self.window.lock().unwrap().majority();
        let Some(status) = majority else {
            return;
        };
        let entry = StatusEntry {
            time: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            status,
        };
        tracing::info!(time = %entry.time, status = ?entry.status, "engagement status");
        self.log.lock().unwrap().push(entry);
    }
}

pub struct Monitor {
    state: Arc<MonitorState>,
    worker: Option<JoinHandle<()>>,
}

impl Monitor {
    /// Start a monitoring session with a background reporting worker.
    pub fn start(interval: Duration) -> Self {
        let state = Arc::new(MonitorState {
            running: AtomicBool::new(true),
            window: Mutex::new(MajorityWindow::default()),
            log: Mutex::new(Vec::new()),
        });

        let worker_state = Arc::clone(&state);
        let worker = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await; // first tick is immediate
            while worker_state.running.load(Ordering::Relaxed) {
                ticker.tick().await;
                if !worker_state.running.load(Ordering::Relaxed) {
                    break;
                }
                worker_state.report_tick();
            }
        });

        Self {
            state,
            worker: Some(worker),
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.running.load(Ordering::Relaxed)
    }

    /// Classify one landmark frame and feed the rolling window.
    pub fn observe(&self, face: &FaceLandmarks) -> LearnerState {
        let state = classify(face);
        self.state.window.lock().unwrap().push(state);
        state
    }

    /// Running flag plus the most recent status entries.
    pub fn status(&self, recent: usize) -> (bool, Vec<StatusEntry>) {
        let log = self.state.log.lock().unwrap();
        let start = log.len().saturating_sub(recent);
        (self.is_running(), log[start..].to_vec())
    }

    /// Signal the worker to stop, wait for it, and return the full
    /// session log.
    pub async fn stop(mut self) -> Vec<StatusEntry> {
        self.state.running.store(false, Ordering::Relaxed);
        if let Some(worker) = self.worker.take() {
            worker.abort();
            let _ = worker.await;
        }
        std::mem::take(&mut *self.state.log.lock().unwrap())
    }
}
