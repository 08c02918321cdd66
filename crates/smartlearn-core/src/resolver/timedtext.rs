use async_trait::async_trait;

use crate::captions::{LANG_PREFS, timedtext_to_text};
use crate::error::{Result, SmartlearnError};
use crate::media::FETCH_TIMEOUT;
use crate::resolver::{Scratch, TranscriptStrategy};
use crate::types::VideoSource;

/// Hosted captions endpoint: YouTube's timedtext API in `json3`
/// format, tried per preferred language.
pub struct TimedTextStrategy {
    http: reqwest::Client,
}

impl TimedTextStrategy {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(FETCH_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }
}

impl Default for TimedTextStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranscriptStrategy for TimedTextStrategy {
    fn name(&self) -> &'static str {
        "timedtext"
    }

    async fn fetch(&self, source: &VideoSource, _scratch: &mut Scratch) -> Result<String> {
        let VideoSource::YouTube { id, .. } = source else {
            return Err(SmartlearnError::CaptionsUnavailable {
                reason: "not a YouTube source".to_string(),
            });
        };

        let mut last_error: Option<SmartlearnError> = None;
        for lang in LANG_PREFS {
            let url = format!("https://www.youtube.com/api/timedtext?v={id}&lang={lang}&fmt=json3");
            let body = match self.http.get(&url).send().await {
                Ok(response) => match response.error_for_status() {
                    Ok(ok) => ok.text().await?,
                    Err(e) => {
                        last_error = Some(e.into());
                        continue;
                    }
                },
                Err(e) => {
                    last_error = Some(e.into());
                    continue;
                }
            };

            match timedtext_to_text(&body) {
                Ok(text) => return Ok(text),
                Err(e) => last_error = Some(e),
            }
        }

        Err(last_error.unwrap_or(SmartlearnError::CaptionsUnavailable {
            reason: "no hosted captions for any preferred language".to_string(),
        }))
    }
}
