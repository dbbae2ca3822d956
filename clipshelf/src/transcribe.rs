use std::path::Path;

use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::audio;
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::model;

/// Transcribe a verified local audio file to plain text.
///
/// Ensures the configured model is cached (downloading on first use), then
/// runs the CPU-bound decode and inference on the blocking pool so HTTP
/// workers are not starved.
pub async fn transcribe_file(audio_path: &Path, config: &AppConfig) -> Result<String> {
    let cache_dir = config.resolve_cache_dir();
    let model_path = model::ensure_model(config.model, &cache_dir).await?;

    let audio_path = audio_path.to_path_buf();
    tokio::task::spawn_blocking(move || {
        let samples = audio::load_audio(&audio_path)?;
        transcribe_samples(&samples, &model_path)
    })
    .await
    .map_err(|e| Error::Transcription(format!("transcription task failed: {e}")))?
}

/// Transcribe audio samples using whisper.cpp.
/// Samples must be 16kHz mono f32.
fn transcribe_samples(samples: &[f32], model_path: &Path) -> Result<String> {
    info!(model = %model_path.display(), "loading whisper model");

    let ctx_params = WhisperContextParameters::new();
    let ctx = WhisperContext::new_with_params(
        model_path
            .to_str()
            .ok_or_else(|| Error::Model("model path contains invalid UTF-8".into()))?,
        ctx_params,
    )?;

    let mut state = ctx.create_state()?;

    let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 5 });
    params.set_detect_language(true);

    // Disable stderr printing from whisper.cpp
    params.set_print_progress(false);
    params.set_print_realtime(false);
    params.set_print_timestamps(false);

    info!(samples = samples.len(), "running transcription");
    state.full(params, samples)?;

    let num_segments = state.full_n_segments();
    debug!(num_segments, "transcription complete");

    let mut parts = Vec::with_capacity(num_segments as usize);
    for i in 0..num_segments {
        let segment = state
            .get_segment(i)
            .ok_or_else(|| Error::Transcription(format!("segment {i} not found")))?;
        let text = segment
            .to_str_lossy()
            .map_err(|e| Error::Transcription(format!("segment text error: {e}")))?
            .into_owned();
        parts.push(text.trim().to_string());
    }

    Ok(parts.join(" "))
}
