//! External media tooling: yt-dlp, ffmpeg and ffprobe invocations plus
//! raw HTTP media fetch.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::{fs, process::Command};

use crate::captions::VideoMetadata;
use crate::error::{Result, SmartlearnError};

/// Descending quality/format ladder for full video downloads. Each
/// entry is tried until one yields a file that passes validation.
pub const FORMAT_LADDER: [&str; 4] = [
    "best[height<=480][ext=mp4]/best[ext=mp4]",
    "worst[height<=360][ext=mp4]/worst[ext=mp4]",
    "best[height<=720]/best",
    "worst",
];

/// Minimum plausible size for a downloaded media file.
pub const MIN_MEDIA_BYTES: u64 = 1024;

/// Timeout for raw HTTP caption/media fetches. Tool invocations are
/// not wrapped; they run to completion or failure.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Cookies file for yt-dlp, from the YTDLP_COOKIES environment
/// variable. Helps past 403/age/region blocks.
pub fn cookies_file() -> Option<PathBuf> {
    let path = PathBuf::from(std::env::var("YTDLP_COOKIES").ok()?.trim().to_string());
    path.exists().then_some(path)
}

fn ytdlp_base_args() -> Vec<String> {
    let mut args: Vec<String> = [
        "--quiet",
        "--no-warnings",
        "--no-playlist",
        "--geo-bypass",
        "--retries",
        "3",
        "--fragment-retries",
        "3",
        "--extractor-args",
        "youtube:player_client=android,web",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    if let Some(cookies) = cookies_file() {
        args.push("--cookies".to_string());
        args.push(cookies.to_string_lossy().to_string());
    }
    args
}

/// Fetch subtitle/format metadata for a URL without downloading media.
pub async fn fetch_metadata(url: &str) -> Result<VideoMetadata> {
    let output = Command::new("yt-dlp")
        .args(ytdlp_base_args())
        .arg("--skip-download")
        .arg("-J")
        .arg(url)
        .output()
        .await?;

    if !output.status.success() {
        return Err(SmartlearnError::CaptionsUnavailable {
            reason: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    let metadata: VideoMetadata = serde_json::from_slice(&output.stdout)?;
    Ok(metadata)
}

/// Probe media duration in seconds using ffprobe.
pub async fn probe_duration(path: &Path) -> Result<f64> {
    let output = Command::new("ffprobe")
        .arg("-v")
        .arg("error")
        .arg("-show_entries")
        .arg("format=duration")
        .arg("-of")
        .arg("default=noprint_wrappers=1:nokey=1")
        .arg(path)
        .output()
        .await?;

    if !output.status.success() {
        return Err(SmartlearnError::ProbeFailed {
            path: path.to_path_buf(),
            reason: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .trim()
        .parse::<f64>()
        .map_err(|e| SmartlearnError::ProbeFailed {
            path: path.to_path_buf(),
            reason: format!("unparseable duration: {e}"),
        })
}

/// Validity check for downloaded media: exists, has a minimum size and
/// a positive decodable duration.
pub async fn validate_media_file(path: &Path) -> Result<()> {
    let metadata =
        fs::metadata(path)
            .await
            .map_err(|_| SmartlearnError::InvalidMediaFile {
                path: path.to_path_buf(),
                reason: "file does not exist".to_string(),
            })?;

    if metadata.len() < MIN_MEDIA_BYTES {
        return Err(SmartlearnError::InvalidMediaFile {
            path: path.to_path_buf(),
            reason: format!("file too small: {} bytes", metadata.len()),
        });
    }

    let duration = probe_duration(path).await?;
    if duration <= 0.0 {
        return Err(SmartlearnError::InvalidMediaFile {
            path: path.to_path_buf(),
            reason: "zero decodable duration".to_string(),
        });
    }
    Ok(())
}

/// Download a video from URL using yt-dlp, walking the format ladder
/// until a candidate passes validation.
pub async fn download_video(url: &str, dest_dir: &Path) -> Result<PathBuf> {
    let output_template = dest_dir.join("video.%(ext)s");
    let mut last_reason = String::new();

    for format in FORMAT_LADDER {
        tracing::debug!(format, "trying download format");
        let output = Command::new("yt-dlp")
            .args(ytdlp_base_args())
            .arg("--print")
            .arg("after_move:filepath")
            .arg("-f")
            .arg(format)
            .arg("-o")
            .arg(&output_template)
            .arg(url)
            .output()
            .await?;

        if !output.status.success() {
            last_reason = String::from_utf8_lossy(&output.stderr).to_string();
            continue;
        }

        let stdout_str = String::from_utf8_lossy(&output.stdout);
        let filepath = PathBuf::from(stdout_str.trim());

        match validate_media_file(&filepath).await {
            Ok(()) => return Ok(filepath),
            Err(e) => {
                last_reason = e.to_string();
                let _ = fs::remove_file(&filepath).await;
            }
        }
    }

    Err(SmartlearnError::DownloadFailed {
        url: url.to_string(),
        reason: format!("all formats failed, last error: {last_reason}"),
    })
}

/// Extract a 16 kHz mono WAV track from a media file using ffmpeg.
pub async fn extract_audio(video_path: &Path, audio_path: &Path) -> Result<()> {
    let output = Command::new("ffmpeg")
        .arg("-y")
        .arg("-i")
        .arg(video_path)
        .arg("-vn")
        .arg("-acodec")
        .arg("pcm_s16le")
        .arg("-ar")
        .arg("16000")
        .arg("-ac")
        .arg("1")
        .arg(audio_path)
        .output()
        .await?;

    if !output.status.success() {
        return Err(SmartlearnError::AudioExtractionFailed {
            video_path: video_path.to_path_buf(),
            reason: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }
    Ok(())
}

/// Pull the audio track straight from the remote source without a full
/// video download, converted to 16 kHz mono WAV for transcription.
pub async fn extract_audio_only(url: &str, audio_path: &Path) -> Result<()> {
    let output = Command::new("yt-dlp")
        .args(ytdlp_base_args())
        .arg("-f")
        .arg("bestaudio/best")
        .arg("-x")
        .arg("--audio-format")
        .arg("wav")
        .arg("--postprocessor-args")
        .arg("ffmpeg:-ar 16000 -ac 1")
        .arg("-o")
        .arg(audio_path)
        .arg(url)
        .output()
        .await?;

    if !output.status.success() {
        return Err(SmartlearnError::DownloadFailed {
            url: url.to_string(),
            reason: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    let size = fs::metadata(audio_path).await.map(|m| m.len()).unwrap_or(0);
    if size < MIN_MEDIA_BYTES {
        return Err(SmartlearnError::InvalidMediaFile {
            path: audio_path.to_path_buf(),
            reason: "audio file not created or too small".to_string(),
        });
    }
    Ok(())
}

/// Download a non-YouTube media URL to a local file.
pub async fn fetch_remote_file(url: &str, dest: &Path) -> Result<()> {
    let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
    let response = client.get(url).send().await?.error_for_status()?;
    let bytes = response.bytes().await?;
    fs::write(dest, &bytes).await?;
    Ok(())
}
