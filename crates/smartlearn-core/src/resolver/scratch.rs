use std::path::{Path, PathBuf};

use tokio::fs;

/// Ledger of temporary files created during one resolution run.
/// Every strategy registers its downloads here; the driver removes
/// them all once resolution finishes, whichever way it went.
pub struct Scratch {
    dir: PathBuf,
    files: Vec<PathBuf>,
}

impl Scratch {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            files: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir).await
    }

    /// Reserve a path under the scratch directory and register it for
    /// cleanup.
    pub fn claim(&mut self, file_name: &str) -> PathBuf {
        let path = self.dir.join(file_name);
        self.files.push(path.clone());
        path
    }

    /// Register an externally produced path (e.g. the file yt-dlp
    /// reports after download) for cleanup.
    pub fn register(&mut self, path: PathBuf) -> PathBuf {
        self.files.push(path.clone());
        path
    }

    /// Best-effort removal of every registered file and the scratch
    /// directory itself.
    pub async fn cleanup(&mut self) {
        for path in self.files.drain(..) {
            if let Err(e) = fs::remove_file(&path).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %path.display(), error = %e, "scratch cleanup failed");
                }
            } else {
                tracing::debug!(path = %path.display(), "cleaned up");
            }
        }
        let _ = fs::remove_dir(&self.dir).await;
    }
}
