use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::error::{Error, Result};
use crate::model::Model;

/// Runtime configuration, filled with defaults for anything the file omits.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: String,
    pub downloads_dir: PathBuf,
    pub db_path: PathBuf,
    pub ytdlp_bin: PathBuf,
    pub model: Model,
    pub model_cache_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct AppConfigFile {
    listen_addr: Option<String>,
    downloads_dir: Option<String>,
    db_path: Option<String>,
    ytdlp_bin: Option<String>,
    model: Option<String>,
    model_cache_dir: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            downloads_dir: PathBuf::from("static/downloads"),
            db_path: PathBuf::from("videos.db"),
            ytdlp_bin: PathBuf::from("yt-dlp"),
            model: Model::Base,
            model_cache_dir: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file. A missing file is not an error —
    /// the built-in defaults apply. An unreadable or malformed file is.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

        let file: AppConfigFile = toml::from_str(&raw)
            .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))?;

        let defaults = Self::default();

        let model = match file.model {
            Some(name) => Model::parse_name(&name).ok_or_else(|| {
                Error::Config(format!(
                    "unknown model \"{name}\" (expected: tiny|base|small|medium|large-v3)"
                ))
            })?,
            None => defaults.model,
        };

        Ok(Self {
            listen_addr: file.listen_addr.unwrap_or(defaults.listen_addr),
            downloads_dir: file
                .downloads_dir
                .map(PathBuf::from)
                .unwrap_or(defaults.downloads_dir),
            db_path: file.db_path.map(PathBuf::from).unwrap_or(defaults.db_path),
            ytdlp_bin: file
                .ytdlp_bin
                .map(PathBuf::from)
                .unwrap_or(defaults.ytdlp_bin),
            model,
            model_cache_dir: file.model_cache_dir.map(PathBuf::from),
        })
    }

    /// Resolve the model cache directory, defaulting to ~/.cache/clipshelf/models.
    pub fn resolve_cache_dir(&self) -> PathBuf {
        self.model_cache_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from(".cache"))
                .join("clipshelf")
                .join("models")
        })
    }
}
