use std::path::{Path, PathBuf};

use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::naming;

/// Fallback title when the metadata probe fails or reports nothing.
const UNKNOWN_TITLE: &str = "unknown_title";

/// Result of one acquisition: the reported title and the produced artifact.
pub struct Acquired {
    pub title: String,
    pub path: PathBuf,
}

#[derive(Deserialize)]
struct YtDlpInfo {
    title: Option<String>,
}

/// Validate that a string looks like a URL.
/// Rejects anything that isn't http:// or https://.
fn validate_url(url: &str) -> Result<()> {
    let trimmed = url.trim();
    if trimmed.starts_with("https://") || trimmed.starts_with("http://") {
        Ok(())
    } else {
        Err(Error::InvalidUrl(trimmed.to_string()))
    }
}

/// Check that the yt-dlp binary is runnable.
async fn ensure_ytdlp(ytdlp_bin: &Path) -> Result<()> {
    let check = Command::new(ytdlp_bin).arg("--version").output().await;
    if check.is_err() {
        return Err(Error::YtDlpNotFound);
    }
    Ok(())
}

/// Probe the resource's metadata without downloading, to learn its title.
/// A failed probe degrades to the unknown-title fallback.
async fn probe_title(ytdlp_bin: &Path, url: &str) -> String {
    let output = Command::new(ytdlp_bin)
        .args(["--dump-json", "--no-download", "--no-playlist"])
        .arg(url)
        .output()
        .await;

    let info: Option<YtDlpInfo> = match output {
        Ok(out) if out.status.success() => serde_json::from_slice(&out.stdout).ok(),
        _ => None,
    };

    info.and_then(|i| i.title)
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string())
}

/// Sanitize a reported title into the artifact's base name. An all-unsafe
/// title would sanitize to the empty string and produce a dotfile, so it
/// falls back too.
fn artifact_stem(title: &str) -> String {
    let stem = naming::sanitize_title(title);
    if stem.is_empty() {
        UNKNOWN_TITLE.to_string()
    } else {
        stem
    }
}

fn output_template(output_dir: &Path, stem: &str) -> Result<String> {
    output_dir
        .join(format!("{stem}.%(ext)s"))
        .to_str()
        .map(str::to_string)
        .ok_or_else(|| Error::Acquisition("output directory path contains invalid UTF-8".into()))
}

async fn run_ytdlp(mut cmd: Command) -> Result<()> {
    let output = cmd.output().await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        // Limit error message length to avoid dumping huge stderr
        let stderr_truncated: String = stderr.chars().take(1000).collect();
        return Err(Error::Acquisition(format!("yt-dlp failed: {stderr_truncated}")));
    }

    Ok(())
}

/// Acquire best audio extracted to MP3 at 192k.
///
/// Expected artifact: `<output_dir>/<sanitized title>.mp3`. Verification of
/// the artifact is the workflow's job, not this function's.
pub async fn download_audio(ytdlp_bin: &Path, url: &str, output_dir: &Path) -> Result<Acquired> {
    validate_url(url)?;
    ensure_ytdlp(ytdlp_bin).await?;

    info!(%url, "acquiring audio");

    let title = probe_title(ytdlp_bin, url).await;
    let stem = artifact_stem(&title);
    let template = output_template(output_dir, &stem)?;

    let mut cmd = Command::new(ytdlp_bin);
    cmd.args([
        "--extract-audio",
        "--audio-format",
        "mp3",
        "--audio-quality",
        "192K",
        "--no-playlist",
        "--output",
        &template,
    ])
    .arg(url);

    run_ytdlp(cmd).await?;

    let path = output_dir.join(format!("{stem}.mp3"));
    debug!(path = %path.display(), "audio acquired");

    Ok(Acquired { title, path })
}

/// Acquire best video+audio merged into an MP4 container, no postprocessing.
///
/// Expected artifact: `<output_dir>/<sanitized title>.mp4`.
pub async fn download_video(ytdlp_bin: &Path, url: &str, output_dir: &Path) -> Result<Acquired> {
    validate_url(url)?;
    ensure_ytdlp(ytdlp_bin).await?;

    info!(%url, "acquiring video");

    let title = probe_title(ytdlp_bin, url).await;
    let stem = artifact_stem(&title);
    let template = output_template(output_dir, &stem)?;

    let mut cmd = Command::new(ytdlp_bin);
    cmd.args([
        "-f",
        "bestvideo+bestaudio/best",
        "--merge-output-format",
        "mp4",
        "--no-playlist",
        "--output",
        &template,
    ])
    .arg(url);

    run_ytdlp(cmd).await?;

    let path = output_dir.join(format!("{stem}.mp4"));
    debug!(path = %path.display(), "video acquired");

    Ok(Acquired { title, path })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url_https() {
        assert!(validate_url("https://youtube.com/watch?v=abc").is_ok());
    }

    #[test]
    fn test_validate_url_http() {
        assert!(validate_url("http://example.com/clip.mp4").is_ok());
    }

    #[test]
    fn test_validate_url_rejects_no_scheme() {
        assert!(validate_url("youtube.com/watch?v=abc").is_err());
    }

    #[test]
    fn test_validate_url_rejects_file_scheme() {
        assert!(validate_url("file:///etc/passwd").is_err());
    }

    #[test]
    fn test_validate_url_rejects_empty() {
        assert!(validate_url("").is_err());
    }

    #[test]
    fn test_validate_url_rejects_command() {
        assert!(validate_url("$(whoami)").is_err());
    }

    #[test]
    fn test_artifact_stem_sanitizes() {
        assert_eq!(artifact_stem("What? A Video: Part 1"), "What A Video Part 1");
    }

    #[test]
    fn test_artifact_stem_falls_back_when_empty() {
        assert_eq!(artifact_stem("???"), UNKNOWN_TITLE);
        assert_eq!(artifact_stem(""), UNKNOWN_TITLE);
    }

    #[test]
    fn test_output_template_shape() {
        let t = output_template(Path::new("static/downloads"), "clip").unwrap();
        assert_eq!(t, "static/downloads/clip.%(ext)s");
    }
}
