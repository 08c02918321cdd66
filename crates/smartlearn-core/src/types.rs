use serde::{Deserialize, Serialize};

use crate::error::{Result, SmartlearnError};

/// A single multiple-choice question as produced by the tutor model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub explanation: String,
    pub follow_up: String,
    pub is_correct: bool,
}

/// A video reference accepted by the transcript resolver: a bare
/// 11-character YouTube id, a YouTube watch/share URL, any other
/// direct media URL, or a media file already on local disk (uploads).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSource {
    YouTube { id: String, url: String },
    Remote { url: String },
    Local { path: String },
}

impl VideoSource {
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(SmartlearnError::EmptyField { field: "url" });
        }

        if is_video_id(input) {
            return Ok(VideoSource::YouTube {
                id: input.to_string(),
                url: format!("https://www.youtube.com/watch?v={input}"),
            });
        }

        if input.contains("youtube.com") || input.contains("youtu.be") {
            let id = extract_youtube_id(input)
                .ok_or_else(|| SmartlearnError::InvalidVideoUrl {
                    url: input.to_string(),
                })?;
            return Ok(VideoSource::YouTube {
                id,
                url: input.to_string(),
            });
        }

        Ok(VideoSource::Remote {
            url: input.to_string(),
        })
    }

    /// A file already on disk, e.g. saved from an upload. Never
    /// produced by `parse`.
    pub fn local(path: impl Into<String>) -> Self {
        VideoSource::Local { path: path.into() }
    }

    /// The URL for remote sources, the filesystem path for local ones.
    pub fn url(&self) -> &str {
        match self {
            VideoSource::YouTube { url, .. } => url,
            VideoSource::Remote { url } => url,
            VideoSource::Local { path } => path,
        }
    }

    /// Key used for transcript caching: the video id for YouTube
    /// sources, the URL or path otherwise.
    pub fn cache_key(&self) -> &str {
        match self {
            VideoSource::YouTube { id, .. } => id,
            VideoSource::Remote { url } => url,
            VideoSource::Local { path } => path,
        }
    }
}

fn is_video_id(s: &str) -> bool {
    s.len() == 11
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn extract_youtube_id(url: &str) -> Option<String> {
    // Matches v=<id>, /embed/<id>, /v/<id> and youtu.be/<id> forms.
    for marker in ["v=", "embed/", "/v/", "youtu.be/", "shorts/"] {
        if let Some(pos) = url.find(marker) {
            let tail = &url[pos + marker.len()..];
            let candidate: String = tail
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
                .collect();
            if candidate.len() == 11 {
                return Some(candidate);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_video_id() {
        let source = VideoSource::parse("dQw4w9WgXcQ").unwrap();
        assert_eq!(
            source,
            VideoSource::YouTube {
                id: "dQw4w9WgXcQ".to_string(),
                url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
            }
        );
    }

    #[test]
    fn parses_watch_and_share_urls() {
        for url in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?t=42",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
        ] {
            let source = VideoSource::parse(url).unwrap();
            assert_eq!(source.cache_key(), "dQw4w9WgXcQ", "failed for {url}");
        }
    }

    #[test]
    fn youtube_url_without_id_is_rejected() {
        let err = VideoSource::parse("https://www.youtube.com/feed/library").unwrap_err();
        assert!(matches!(err, SmartlearnError::InvalidVideoUrl { .. }));
    }

    #[test]
    fn other_urls_are_remote_sources() {
        let source = VideoSource::parse("https://example.com/lecture.mp4").unwrap();
        assert_eq!(source.cache_key(), "https://example.com/lecture.mp4");
    }

    #[test]
    fn local_files_are_referenced_by_path() {
        let source = VideoSource::local("/tmp/upload-abc/upload.mp4");
        assert_eq!(source.url(), "/tmp/upload-abc/upload.mp4");
        assert_eq!(source.cache_key(), "/tmp/upload-abc/upload.mp4");
    }
}
