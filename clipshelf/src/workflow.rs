use std::path::Path;

use tracing::info;

use crate::catalog::Catalog;
use crate::config::AppConfig;
use crate::download;
use crate::error::{Error, Result};
use crate::naming;
use crate::transcribe;
use crate::types::{CatalogRecord, NewClip, Platform};

/// Sentinel category applied when the caller leaves the label blank.
const UNCATEGORIZED: &str = "Uncategorized";

/// The acquisition workflow: URL in, one verified artifact, an optional
/// transcript, and exactly one catalog record out.
///
/// Any failing step aborts the whole run with no catalog write. Files already
/// on disk from earlier steps are not rolled back. No retries anywhere.
pub async fn acquire(
    config: &AppConfig,
    catalog: &Catalog,
    url: &str,
    platform: Platform,
    category: &str,
) -> Result<CatalogRecord> {
    let category = if category.trim().is_empty() {
        UNCATEGORIZED
    } else {
        category
    };

    // Repeat-safe: the directory may already exist.
    std::fs::create_dir_all(&config.downloads_dir)?;

    let clip = if platform.supports_transcription() {
        acquire_audio(config, url, platform, category).await?
    } else {
        acquire_video(config, url, platform, category).await?
    };

    let id = catalog.insert(&clip)?;
    info!(id, platform = %clip.platform, title = %clip.title, "cataloged");

    Ok(CatalogRecord {
        id,
        title: clip.title,
        media_path: clip.media_path,
        transcript_path: clip.transcript_path,
        transcript: clip.transcript,
        platform: clip.platform,
        category: clip.category,
    })
}

/// Audio branch: extract to MP3, verify, transcribe, write the sidecar.
async fn acquire_audio(
    config: &AppConfig,
    url: &str,
    platform: Platform,
    category: &str,
) -> Result<NewClip> {
    let acquired =
        download::download_audio(&config.ytdlp_bin, url, &config.downloads_dir).await?;

    verify_artifact(&acquired.path)?;

    // All-or-nothing: a failed transcription aborts the run, so a record with
    // absent transcript fields is only ever produced by the video branch.
    let transcript = transcribe::transcribe_file(&acquired.path, config)
        .await
        .map_err(|e| match e {
            Error::Transcription(_) => e,
            other => Error::Transcription(other.to_string()),
        })?;

    let sidecar = acquired.path.with_extension("txt");
    std::fs::write(&sidecar, &transcript)?;

    Ok(NewClip {
        title: acquired.title,
        media_path: Some(naming::normalize_separators(&acquired.path)),
        transcript_path: Some(naming::normalize_separators(&sidecar)),
        transcript: Some(transcript),
        platform: platform.as_str().to_string(),
        category: category.to_string(),
    })
}

/// Video branch: passthrough container, verify, no transcription.
async fn acquire_video(
    config: &AppConfig,
    url: &str,
    platform: Platform,
    category: &str,
) -> Result<NewClip> {
    let acquired =
        download::download_video(&config.ytdlp_bin, url, &config.downloads_dir).await?;

    verify_artifact(&acquired.path)?;

    Ok(NewClip {
        title: acquired.title,
        media_path: Some(naming::normalize_separators(&acquired.path)),
        transcript_path: None,
        transcript: None,
        platform: platform.as_str().to_string(),
        category: category.to_string(),
    })
}

/// Confirm the acquisition actually produced a usable artifact: the expected
/// file must exist with non-zero size. Guards against the collaborator
/// reporting success while producing nothing.
fn verify_artifact(path: &Path) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|_| Error::Verification {
        path: path.to_path_buf(),
    })?;

    if metadata.len() == 0 {
        return Err(Error::Verification {
            path: path.to_path_buf(),
        });
    }

    Ok(())
}
