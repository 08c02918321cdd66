//! End-to-end resolver behavior through the public API, with the
//! network- and tool-backed strategies replaced by scripted stand-ins.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use smartlearn_core::resolver::{ResolveRequest, Scratch, TranscriptResolver, TranscriptStrategy};
use smartlearn_core::{SmartlearnError, VideoSource};

struct FailingStrategy {
    name: &'static str,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl TranscriptStrategy for FailingStrategy {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch(
        &self,
        _source: &VideoSource,
        _scratch: &mut Scratch,
    ) -> smartlearn_core::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(SmartlearnError::CaptionsUnavailable {
            reason: "unavailable".to_string(),
        })
    }
}

struct CaptionStrategy {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl TranscriptStrategy for CaptionStrategy {
    fn name(&self) -> &'static str {
        "caption-scrape"
    }

    async fn fetch(
        &self,
        _source: &VideoSource,
        _scratch: &mut Scratch,
    ) -> smartlearn_core::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok("captions say hello".to_string())
    }
}

fn scratch_root() -> PathBuf {
    std::env::temp_dir()
        .join("smartlearn-flow-tests")
        .join(uuid::Uuid::new_v4().to_string())
}

#[tokio::test]
async fn caption_only_source_falls_through_to_the_scrape_strategy() {
    let timedtext_calls = Arc::new(AtomicUsize::new(0));
    let audio_calls = Arc::new(AtomicUsize::new(0));
    let caption_calls = Arc::new(AtomicUsize::new(0));

    let resolver = TranscriptResolver::new(
        8,
        vec![
            Box::new(FailingStrategy {
                name: "timedtext",
                calls: Arc::clone(&timedtext_calls),
            }),
            Box::new(CaptionStrategy {
                calls: Arc::clone(&caption_calls),
            }),
            Box::new(FailingStrategy {
                name: "direct-audio",
                calls: Arc::clone(&audio_calls),
            }),
        ],
        scratch_root(),
    );

    let source = VideoSource::parse("https://youtu.be/dQw4w9WgXcQ").unwrap();
    let transcript = resolver
        .resolve(&ResolveRequest::new(source.clone()))
        .await
        .unwrap();

    assert_eq!(transcript, "captions say hello");
    assert_eq!(timedtext_calls.load(Ordering::SeqCst), 1);
    assert_eq!(caption_calls.load(Ordering::SeqCst), 1);
    assert_eq!(audio_calls.load(Ordering::SeqCst), 0);

    // A repeat request is served from cache without touching strategies.
    resolver
        .resolve(&ResolveRequest::new(source))
        .await
        .unwrap();
    assert_eq!(timedtext_calls.load(Ordering::SeqCst), 1);
    assert_eq!(caption_calls.load(Ordering::SeqCst), 1);
}
