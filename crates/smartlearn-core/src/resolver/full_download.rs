use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::media::{download_video, extract_audio, fetch_remote_file, validate_media_file};
use crate::resolver::{Scratch, TranscriptStrategy};
use crate::speech::{SpeechRecognizer, transcribe_wav};
use crate::types::VideoSource;

/// Last resort: obtain the full media file (format ladder with
/// validation for YouTube, raw fetch for other URLs, as-is for local
/// uploads), extract the audio track and run chunked speech-to-text.
pub struct FullDownloadStrategy {
    recognizer: Arc<dyn SpeechRecognizer>,
}

impl FullDownloadStrategy {
    pub fn new(recognizer: Arc<dyn SpeechRecognizer>) -> Self {
        Self { recognizer }
    }
}

#[async_trait]
impl TranscriptStrategy for FullDownloadStrategy {
    fn name(&self) -> &'static str {
        "full-download"
    }

    async fn fetch(&self, source: &VideoSource, scratch: &mut Scratch) -> Result<String> {
        let video_path = match source {
            VideoSource::YouTube { url, .. } => {
                let downloaded = download_video(url, scratch.dir()).await?;
                scratch.register(downloaded)
            }
            VideoSource::Remote { url } => {
                let dest = scratch.claim("video.mp4");
                fetch_remote_file(url, &dest).await?;
                validate_media_file(&dest).await?;
                dest
            }
            // The caller owns the file, so it is not registered for
            // scratch cleanup.
            VideoSource::Local { path } => {
                let path = PathBuf::from(path);
                validate_media_file(&path).await?;
                path
            }
        };

        let audio_path = scratch.claim("full_audio.wav");
        extract_audio(&video_path, &audio_path).await?;
        transcribe_wav(self.recognizer.as_ref(), &audio_path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SmartlearnError;

    struct NeverCalledRecognizer;

    #[async_trait]
    impl SpeechRecognizer for NeverCalledRecognizer {
        async fn recognize(&self, _samples: &[f32]) -> Result<String> {
            panic!("recognizer should not run when validation fails");
        }
    }

    #[tokio::test]
    async fn missing_local_file_fails_validation_before_any_tooling() {
        let strategy = FullDownloadStrategy::new(Arc::new(NeverCalledRecognizer));
        let source = VideoSource::local("/nonexistent/upload.mp4");
        let mut scratch = Scratch::new(std::env::temp_dir().join("smartlearn-fd-test"));

        let err = strategy.fetch(&source, &mut scratch).await.unwrap_err();
        assert!(matches!(err, SmartlearnError::InvalidMediaFile { .. }));
    }
}
