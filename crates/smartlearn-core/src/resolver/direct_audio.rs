use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Result, SmartlearnError};
use crate::media::extract_audio_only;
use crate::resolver::{Scratch, TranscriptStrategy};
use crate::speech::{SpeechRecognizer, transcribe_wav};
use crate::types::VideoSource;

/// Direct audio-only extraction from the remote source followed by
/// chunked speech-to-text. Skips the full video download.
pub struct DirectAudioStrategy {
    recognizer: Arc<dyn SpeechRecognizer>,
}

impl DirectAudioStrategy {
    pub fn new(recognizer: Arc<dyn SpeechRecognizer>) -> Self {
        Self { recognizer }
    }
}

#[async_trait]
impl TranscriptStrategy for DirectAudioStrategy {
    fn name(&self) -> &'static str {
        "direct-audio"
    }

    async fn fetch(&self, source: &VideoSource, scratch: &mut Scratch) -> Result<String> {
        if let VideoSource::Local { .. } = source {
            return Err(SmartlearnError::DownloadFailed {
                url: source.url().to_string(),
                reason: "audio-only extraction needs a remote URL".to_string(),
            });
        }

        let audio_path = scratch.claim("audio.wav");
        extract_audio_only(source.url(), &audio_path).await?;
        transcribe_wav(self.recognizer.as_ref(), &audio_path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NeverCalledRecognizer;

    #[async_trait]
    impl SpeechRecognizer for NeverCalledRecognizer {
        async fn recognize(&self, _samples: &[f32]) -> Result<String> {
            panic!("recognizer should not run for local sources");
        }
    }

    #[tokio::test]
    async fn local_sources_are_rejected_without_tooling() {
        let strategy = DirectAudioStrategy::new(Arc::new(NeverCalledRecognizer));
        let source = VideoSource::local("/tmp/upload.mp4");
        let mut scratch = Scratch::new(std::env::temp_dir().join("smartlearn-da-test"));

        let err = strategy.fetch(&source, &mut scratch).await.unwrap_err();
        assert!(matches!(err, SmartlearnError::DownloadFailed { .. }));
    }
}
