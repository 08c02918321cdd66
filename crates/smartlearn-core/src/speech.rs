//! Chunked speech-to-text over extracted audio.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::error::{Result, SmartlearnError};

/// Audio sample rate the extraction pipeline produces.
pub const SAMPLE_RATE: usize = 16_000;

/// Fixed transcription window, in seconds.
pub const CHUNK_SECONDS: usize = 30;

/// Recognizes a single window of 16 kHz mono samples.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn recognize(&self, samples: &[f32]) -> Result<String>;
}

/// Whisper-backed recognizer. The model is loaded per call; a failed
/// load surfaces as a per-chunk transcription failure rather than a
/// constructor error.
pub struct WhisperRecognizer {
    model_path: PathBuf,
}

impl WhisperRecognizer {
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
        }
    }
}

#[async_trait]
impl SpeechRecognizer for WhisperRecognizer {
    async fn recognize(&self, samples: &[f32]) -> Result<String> {
        let model_path =
            self.model_path
                .to_str()
                .ok_or_else(|| SmartlearnError::TranscriptionFailed {
                    reason: "non-utf8 model path".to_string(),
                })?;

        let ctx = WhisperContext::new_with_params(model_path, WhisperContextParameters::default())
            .map_err(|e| SmartlearnError::TranscriptionFailed {
                reason: format!("failed to load model: {e}"),
            })?;

        let params = FullParams::new(SamplingStrategy::Greedy { best_of: 5 });
        let mut state = ctx
            .create_state()
            .map_err(|e| SmartlearnError::TranscriptionFailed {
                reason: format!("failed to create state: {e}"),
            })?;
        state
            .full(params, samples)
            .map_err(|e| SmartlearnError::TranscriptionFailed {
                reason: format!("failed to run model: {e}"),
            })?;

        let mut text = String::new();
        for segment in state.as_iter() {
            let Ok(seg_text) = segment.to_str() else {
                continue;
            };
            if !text.is_empty() && !seg_text.starts_with(' ') {
                text.push(' ');
            }
            text.push_str(seg_text);
        }
        Ok(text.trim().to_string())
    }
}

/// Decode a 16-bit WAV file into normalized f32 samples.
pub fn read_wav_samples(path: &Path) -> Result<Vec<f32>> {
    let mut reader = hound::WavReader::open(path).map_err(|e| {
        SmartlearnError::TranscriptionFailed {
            reason: format!("failed to open {}: {e}", path.display()),
        }
    })?;

    let samples: std::result::Result<Vec<f32>, hound::Error> = reader
        .samples::<i16>()
        .map(|s| s.map(|v| v as f32 / i16::MAX as f32))
        .collect();

    samples.map_err(|e| SmartlearnError::TranscriptionFailed {
        reason: format!("failed to decode samples: {e}"),
    })
}

/// Transcribe samples in fixed 30-second windows. Windows the
/// recognizer cannot interpret are skipped; successful windows are
/// concatenated with single spaces in original time order.
pub async fn transcribe_chunks(recognizer: &dyn SpeechRecognizer, samples: &[f32]) -> String {
    let chunk_len = CHUNK_SECONDS * SAMPLE_RATE;
    let mut transcripts: Vec<String> = Vec::new();

    for (index, chunk) in samples.chunks(chunk_len).enumerate() {
        match recognizer.recognize(chunk).await {
            Ok(text) if !text.trim().is_empty() => transcripts.push(text.trim().to_string()),
            Ok(_) => tracing::debug!(chunk = index, "empty transcription window"),
            Err(e) => tracing::debug!(chunk = index, error = %e, "skipping unrecognized window"),
        }
    }

    transcripts.join(" ")
}

/// Full file path: decode, chunk, transcribe. An entirely empty result
/// is a failure so the resolver falls through to its next strategy.
pub async fn transcribe_wav(recognizer: &dyn SpeechRecognizer, path: &Path) -> Result<String> {
    let samples = read_wav_samples(path)?;
    let transcript = transcribe_chunks(recognizer, &samples).await;
    if transcript.trim().is_empty() {
        return Err(SmartlearnError::TranscriptionFailed {
            reason: "no window produced text".to_string(),
        });
    }
    Ok(transcript)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted recognizer: one entry per expected window.
    struct ScriptedRecognizer {
        script: Vec<Option<&'static str>>,
        calls: AtomicUsize,
    }

    impl ScriptedRecognizer {
        fn new(script: Vec<Option<&'static str>>) -> Self {
            Self {
                script,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SpeechRecognizer for ScriptedRecognizer {
        async fn recognize(&self, _samples: &[f32]) -> Result<String> {
            let index = self.calls.fetch_add(1, Ordering::SeqCst);
            match self.script.get(index).copied().flatten() {
                Some(text) => Ok(text.to_string()),
                None => Err(SmartlearnError::TranscriptionFailed {
                    reason: "unintelligible".to_string(),
                }),
            }
        }
    }

    fn seconds_of_audio(seconds: usize) -> Vec<f32> {
        vec![0.0; seconds * SAMPLE_RATE]
    }

    #[tokio::test]
    async fn splits_audio_into_thirty_second_windows() {
        let recognizer = ScriptedRecognizer::new(vec![Some("a"), Some("b"), Some("c")]);
        // 75 seconds -> windows of 30, 30 and 15 seconds.
        let out = transcribe_chunks(&recognizer, &seconds_of_audio(75)).await;
        assert_eq!(out, "a b c");
        assert_eq!(recognizer.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn unrecognized_windows_are_skipped_in_order() {
        let recognizer = ScriptedRecognizer::new(vec![
            Some("the quick"),
            None,
            Some("brown fox"),
            None,
            Some("jumps"),
        ]);
        let out = transcribe_chunks(&recognizer, &seconds_of_audio(150)).await;
        assert_eq!(out, "the quick brown fox jumps");
    }

    #[tokio::test]
    async fn all_windows_failing_is_empty() {
        let recognizer = ScriptedRecognizer::new(vec![None, None]);
        let out = transcribe_chunks(&recognizer, &seconds_of_audio(60)).await;
        assert_eq!(out, "");
    }
}
