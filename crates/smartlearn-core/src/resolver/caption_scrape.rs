use async_trait::async_trait;

use crate::captions::{LANG_PREFS, srt_to_text, vtt_to_text};
use crate::error::{Result, SmartlearnError};
use crate::media::{FETCH_TIMEOUT, fetch_metadata};
use crate::resolver::{Scratch, TranscriptStrategy};
use crate::types::VideoSource;

/// Caption scrape through yt-dlp metadata: enumerate subtitle tracks
/// without downloading media, fetch the chosen track payload over
/// HTTP and strip the cue markup.
pub struct CaptionScrapeStrategy {
    http: reqwest::Client,
}

impl CaptionScrapeStrategy {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(FETCH_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }
}

impl Default for CaptionScrapeStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranscriptStrategy for CaptionScrapeStrategy {
    fn name(&self) -> &'static str {
        "caption-scrape"
    }

    async fn fetch(&self, source: &VideoSource, _scratch: &mut Scratch) -> Result<String> {
        if let VideoSource::Local { .. } = source {
            return Err(SmartlearnError::CaptionsUnavailable {
                reason: "local files carry no caption tracks".to_string(),
            });
        }

        let metadata = fetch_metadata(source.url()).await?;
        let track =
            metadata
                .select_track(&LANG_PREFS)
                .ok_or(SmartlearnError::CaptionsUnavailable {
                    reason: "no subtitle tracks available".to_string(),
                })?;

        let payload = self
            .http
            .get(&track.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let text = match track.ext.as_deref() {
            Some("vtt") => vtt_to_text(&payload),
            Some("srt") => srt_to_text(&payload),
            _ if payload.starts_with("WEBVTT") => vtt_to_text(&payload),
            _ => payload,
        };

        if text.trim().is_empty() {
            return Err(SmartlearnError::EmptyCaptions);
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn local_sources_are_rejected_without_tooling() {
        let strategy = CaptionScrapeStrategy::new();
        let source = VideoSource::local("/tmp/upload.mp4");
        let mut scratch = Scratch::new(std::env::temp_dir().join("smartlearn-cs-test"));

        let err = strategy.fetch(&source, &mut scratch).await.unwrap_err();
        assert!(matches!(err, SmartlearnError::CaptionsUnavailable { .. }));
    }
}
