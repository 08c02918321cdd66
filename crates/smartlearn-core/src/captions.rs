//! Caption track selection and cue-markup stripping.
//!
//! Covers the three caption formats the resolver meets in the wild:
//! WebVTT and SRT payloads referenced from yt-dlp metadata, and the
//! `json3` event stream served by YouTube's hosted captions endpoint.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{Result, SmartlearnError};

/// Language preference order for caption tracks.
pub const LANG_PREFS: [&str; 3] = ["en", "en-US", "en-GB"];

/// Subset of yt-dlp's `--dump-json` output the caption scrape needs.
#[derive(Debug, Default, Deserialize)]
pub struct VideoMetadata {
    #[serde(default)]
    pub subtitles: BTreeMap<String, Vec<CaptionTrack>>,
    #[serde(default)]
    pub automatic_captions: BTreeMap<String, Vec<CaptionTrack>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptionTrack {
    pub url: String,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl VideoMetadata {
    /// Pick a caption track: manually authored subtitles before
    /// automatic captions, first matching preferred language, and vtt
    /// preferred among same-language tracks. Falls back to any
    /// language when no preference matches.
    pub fn select_track(&self, prefs: &[&str]) -> Option<&CaptionTrack> {
        pick_track(&self.subtitles, prefs).or_else(|| pick_track(&self.automatic_captions, prefs))
    }
}

fn pick_track<'a>(
    tracks_by_lang: &'a BTreeMap<String, Vec<CaptionTrack>>,
    prefs: &[&str],
) -> Option<&'a CaptionTrack> {
    for lang in prefs {
        if let Some(tracks) = tracks_by_lang.get(*lang)
            && let Some(track) = prefer_vtt(tracks)
        {
            return Some(track);
        }
    }
    for tracks in tracks_by_lang.values() {
        if let Some(track) = prefer_vtt(tracks) {
            return Some(track);
        }
    }
    None
}

fn prefer_vtt(tracks: &[CaptionTrack]) -> Option<&CaptionTrack> {
    tracks
        .iter()
        .find(|t| t.ext.as_deref() == Some("vtt"))
        .or_else(|| tracks.first())
}

/// Strip WebVTT cue markup down to plain text: drops the WEBVTT
/// header block, cue indices, timestamp lines and inline tags.
pub fn vtt_to_text(content: &str) -> String {
    strip_cues(content)
}

/// SRT uses the same cue shape with comma-separated millisecond
/// timestamps; the same filter applies.
pub fn srt_to_text(content: &str) -> String {
    strip_cues(content)
}

fn strip_cues(content: &str) -> String {
    let mut lines = Vec::new();
    for raw_line in content.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        if line.to_uppercase().starts_with("WEBVTT") {
            continue;
        }
        if line.starts_with("Kind:") || line.starts_with("Language:") {
            continue;
        }
        if line.contains("-->") {
            continue;
        }
        if line.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        let text = strip_tags(line);
        if !text.trim().is_empty() {
            lines.push(text.trim().to_string());
        }
    }
    lines.join(" ")
}

fn strip_tags(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut in_tag = false;
    for c in line.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

#[derive(Debug, Deserialize)]
struct TimedTextDoc {
    #[serde(default)]
    events: Vec<TimedTextEvent>,
}

#[derive(Debug, Deserialize)]
struct TimedTextEvent {
    #[serde(default, rename = "tStartMs")]
    t_start_ms: u64,
    #[serde(default)]
    segs: Vec<TimedTextSeg>,
}

#[derive(Debug, Deserialize)]
struct TimedTextSeg {
    #[serde(default, rename = "utf8")]
    text: String,
}

/// Parse a timedtext `json3` payload into plain text, fragments
/// joined with single spaces in timeline order.
pub fn timedtext_to_text(json: &str) -> Result<String> {
    let doc: TimedTextDoc = serde_json::from_str(json)?;
    let mut events = doc.events;
    events.sort_by_key(|e| e.t_start_ms);

    let fragments: Vec<String> = events
        .iter()
        .flat_map(|e| e.segs.iter())
        .map(|s| s.text.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    if fragments.is_empty() {
        return Err(SmartlearnError::EmptyCaptions);
    }
    Ok(fragments.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VTT: &str = "WEBVTT\nKind: captions\nLanguage: en\n\n1\n00:00:00.000 --> 00:00:02.000\nHello <b>there</b>\n\n2\n00:00:02.000 --> 00:00:04.000\ngeneral Kenobi\n";

    #[test]
    fn vtt_cues_reduce_to_plain_text() {
        assert_eq!(vtt_to_text(VTT), "Hello there general Kenobi");
    }

    #[test]
    fn srt_cues_reduce_to_plain_text() {
        let srt = "1\n00:00:00,000 --> 00:00:02,000\nfirst line\n\n2\n00:00:02,000 --> 00:00:04,000\nsecond line\n";
        assert_eq!(srt_to_text(srt), "first line second line");
    }

    #[test]
    fn whitespace_only_payload_yields_empty_text() {
        assert_eq!(vtt_to_text("WEBVTT\n\n   \n"), "");
    }

    #[test]
    fn timedtext_fragments_join_in_timeline_order() {
        let json = r#"{"events":[
            {"tStartMs":2000,"segs":[{"utf8":"world"}]},
            {"tStartMs":0,"segs":[{"utf8":"hello"},{"utf8":"\n"}]}
        ]}"#;
        assert_eq!(timedtext_to_text(json).unwrap(), "hello world");
    }

    #[test]
    fn timedtext_without_text_is_an_error() {
        let json = r#"{"events":[{"tStartMs":0,"segs":[{"utf8":"  "}]}]}"#;
        assert!(matches!(
            timedtext_to_text(json),
            Err(SmartlearnError::EmptyCaptions)
        ));
    }

    fn track(ext: &str) -> CaptionTrack {
        CaptionTrack {
            url: format!("https://captions.test/{ext}"),
            ext: Some(ext.to_string()),
            name: None,
        }
    }

    #[test]
    fn manual_subtitles_beat_automatic_captions() {
        let mut meta = VideoMetadata::default();
        meta.automatic_captions
            .insert("en".to_string(), vec![track("vtt")]);
        meta.subtitles.insert("en".to_string(), vec![track("srv3")]);

        let chosen = meta.select_track(&LANG_PREFS).unwrap();
        assert_eq!(chosen.ext.as_deref(), Some("srv3"));
    }

    #[test]
    fn vtt_wins_among_same_language_tracks() {
        let mut meta = VideoMetadata::default();
        meta.subtitles
            .insert("en".to_string(), vec![track("srv3"), track("vtt")]);

        let chosen = meta.select_track(&LANG_PREFS).unwrap();
        assert_eq!(chosen.ext.as_deref(), Some("vtt"));
    }

    #[test]
    fn falls_back_to_any_language() {
        let mut meta = VideoMetadata::default();
        meta.subtitles.insert("de".to_string(), vec![track("vtt")]);

        assert!(meta.select_track(&LANG_PREFS).is_some());
    }

    #[test]
    fn preferred_language_beats_map_order() {
        let mut meta = VideoMetadata::default();
        let mut german = track("vtt");
        german.url = "https://captions.test/de".to_string();
        let mut english = track("vtt");
        english.url = "https://captions.test/en-GB".to_string();
        meta.subtitles.insert("de".to_string(), vec![german]);
        meta.subtitles.insert("en-GB".to_string(), vec![english]);

        let chosen = meta.select_track(&LANG_PREFS).unwrap();
        assert_eq!(chosen.url, "https://captions.test/en-GB");
    }
}
