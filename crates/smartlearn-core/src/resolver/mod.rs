//! Multi-strategy transcript resolution.
//!
//! Strategies run strictly in order; the first non-empty transcript
//! wins. Per-strategy failures are logged and recorded, and only when
//! every strategy has failed does the resolver surface a terminal
//! error aggregating the causes. Temporary files are removed on both
//! the success and failure paths.

mod caption_scrape;
mod direct_audio;
mod full_download;
mod scratch;
mod timedtext;

pub use caption_scrape::CaptionScrapeStrategy;
pub use direct_audio::DirectAudioStrategy;
pub use full_download::FullDownloadStrategy;
pub use scratch::Scratch;
pub use timedtext::TimedTextStrategy;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use crate::cache::{TranscriptCache, get_scratch_root};
use crate::error::{Result, SmartlearnError};
use crate::media::cookies_file;
use crate::speech::SpeechRecognizer;
use crate::types::VideoSource;

pub const DEFAULT_CACHE_CAPACITY: usize = 64;

/// One ordered fallback in the resolution chain.
#[async_trait]
pub trait TranscriptStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    async fn fetch(&self, source: &VideoSource, scratch: &mut Scratch) -> Result<String>;
}

pub struct ResolveRequest {
    pub source: VideoSource,
    /// A transcript the caller already has; short-circuits resolution.
    pub provided_transcript: Option<String>,
    /// Skip the cache lookup (the result is still cached).
    pub refresh: bool,
}

impl ResolveRequest {
    pub fn new(source: VideoSource) -> Self {
        Self {
            source,
            provided_transcript: None,
            refresh: false,
        }
    }

    pub fn with_transcript(mut self, transcript: Option<String>) -> Self {
        self.provided_transcript = transcript;
        self
    }

    pub fn with_refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }
}

pub struct TranscriptResolver {
    cache: Mutex<TranscriptCache>,
    strategies: Vec<Box<dyn TranscriptStrategy>>,
    scratch_root: PathBuf,
}

impl TranscriptResolver {
    pub fn new(
        cache_capacity: usize,
        strategies: Vec<Box<dyn TranscriptStrategy>>,
        scratch_root: PathBuf,
    ) -> Self {
        Self {
            cache: Mutex::new(TranscriptCache::new(cache_capacity)),
            strategies,
            scratch_root,
        }
    }

    /// Resolver with the production strategy chain: hosted captions,
    /// caption scrape, direct audio extraction, full download.
    pub fn with_default_strategies(recognizer: Arc<dyn SpeechRecognizer>) -> Self {
        Self::new(
            DEFAULT_CACHE_CAPACITY,
            vec![
                Box::new(TimedTextStrategy::new()),
                Box::new(CaptionScrapeStrategy::new()),
                Box::new(DirectAudioStrategy::new(Arc::clone(&recognizer))),
                Box::new(FullDownloadStrategy::new(recognizer)),
            ],
            get_scratch_root(),
        )
    }

    /// Resolve a transcript, or fail after exhausting every strategy.
    pub async fn resolve(&self, request: &ResolveRequest) -> Result<String> {
        let key = request.source.cache_key().to_string();

        if let Some(provided) = &request.provided_transcript
            && !provided.trim().is_empty()
        {
            let transcript = provided.trim().to_string();
            self.cache_insert(&key, &transcript);
            return Ok(transcript);
        }

        if !request.refresh
            && let Some(cached) = self.cache.lock().unwrap().get(&key)
        {
            tracing::debug!(key, "transcript cache hit");
            return Ok(cached);
        }

        let mut scratch = Scratch::new(self.scratch_root.join(Uuid::new_v4().to_string()));
        scratch.ensure_dir().await?;

        let outcome = self.run_strategies(&request.source, &mut scratch).await;
        scratch.cleanup().await;

        let transcript = outcome?;
        self.cache_insert(&key, &transcript);
        Ok(transcript)
    }

    async fn run_strategies(&self, source: &VideoSource, scratch: &mut Scratch) -> Result<String> {
        let mut causes: Vec<String> = Vec::new();

        for strategy in &self.strategies {
            tracing::info!(strategy = strategy.name(), "attempting transcript strategy");
            match strategy.fetch(source, scratch).await {
                Ok(text) if !text.trim().is_empty() => {
                    tracing::info!(
                        strategy = strategy.name(),
                        chars = text.len(),
                        "transcript resolved"
                    );
                    return Ok(text.trim().to_string());
                }
                Ok(_) => {
                    tracing::warn!(strategy = strategy.name(), "strategy returned empty text");
                    causes.push(format!("{}: empty transcript", strategy.name()));
                }
                Err(e) => {
                    tracing::warn!(strategy = strategy.name(), error = %e, "strategy failed");
                    causes.push(format!("{}: {e}", strategy.name()));
                }
            }
        }

        let hint = if cookies_file().is_none() {
            " Hint: provide a cookies file via YTDLP_COOKIES to bypass 403/age/region blocks."
        } else {
            ""
        };
        Err(SmartlearnError::ResolutionExhausted {
            causes: causes.join("; "),
            hint: hint.to_string(),
        })
    }

    fn cache_insert(&self, key: &str, transcript: &str) {
        self.cache
            .lock()
            .unwrap()
            .insert(key, transcript.to_string());
    }
}
